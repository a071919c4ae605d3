use thiserror::Error;

/// Errors that can occur when decoding a record's fields into a domain type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Record {record} is missing field '{field}'")]
    Missing { record: String, field: String },
    #[error("Record {record} has an invalid value in field '{field}': {reason}")]
    Invalid {
        record: String,
        field: String,
        reason: String,
    },
    #[error("Invalid field name '{0}': braces are not allowed")]
    InvalidFieldName(String),
}

/// Result type for field decoding.
pub type Result<T> = std::result::Result<T, FieldError>;
