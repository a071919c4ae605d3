use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::text::display_value;

/// Opaque record identifier assigned by the tabular service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Field name to value map, as sent to and received from the service.
pub type Fields = Map<String, Value>;

/// A record as returned by the service: an identifier plus its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default, rename = "createdTime", skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: Fields,
}

impl Record {
    /// Creates a record with the given identifier and no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(id),
            created_time: None,
            fields: Fields::new(),
        }
    }

    /// Sets a field value (useful for testing).
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Raw value of a field, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Display text of a field; missing or blank fields render empty.
    pub fn text(&self, name: &str) -> String {
        display_value(self.field(name))
    }

    /// Linked record identifiers held by a link field.
    ///
    /// Link fields are arrays of identifiers; a bare string is accepted as a
    /// single link. Anything else yields no links.
    pub fn links(&self, name: &str) -> Vec<RecordId> {
        match self.field(name) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(RecordId::from)
                .collect(),
            Some(Value::String(s)) if !s.is_empty() => vec![RecordId::new(s.clone())],
            _ => Vec::new(),
        }
    }
}

/// One page of a list response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub records: Vec<Record>,
    /// Cursor for the next page; absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

/// Body of a create request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRecords {
    pub records: Vec<NewRecord>,
    /// Ask the service to coerce values (e.g. link names) into column types.
    pub typecast: bool,
}

/// A record to be created.
#[derive(Debug, Clone, Serialize)]
pub struct NewRecord {
    pub fields: Fields,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_list_response() {
        let body = json!({
            "records": [
                {"id": "rec1", "createdTime": "2024-01-01T00:00:00.000Z", "fields": {"Name": "Barolo"}},
                {"id": "rec2", "fields": {}}
            ],
            "offset": "itr123/rec2"
        });

        let page: ListResponse = serde_json::from_value(body).unwrap();

        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].id.as_str(), "rec1");
        assert_eq!(page.records[0].text("Name"), "Barolo");
        assert_eq!(page.offset.as_deref(), Some("itr123/rec2"));
    }

    #[test]
    fn test_record_without_fields_key() {
        let record: Record = serde_json::from_value(json!({"id": "rec9"})).unwrap();
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_links_from_array() {
        let record = Record::new("rec1").with_field("Wine", json!(["recA", "", "recB"]));
        assert_eq!(
            record.links("Wine"),
            vec![RecordId::from("recA"), RecordId::from("recB")]
        );
    }

    #[test]
    fn test_links_missing_or_malformed() {
        let record = Record::new("rec1").with_field("Wine", json!(42));
        assert!(record.links("Wine").is_empty());
        assert!(record.links("Location").is_empty());
    }

    #[test]
    fn test_serialize_create_body() {
        let mut fields = Fields::new();
        fields.insert("Name".to_string(), json!("Barolo"));
        let body = CreateRecords {
            records: vec![NewRecord { fields }],
            typecast: true,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"records": [{"fields": {"Name": "Barolo"}}], "typecast": true})
        );
    }
}
