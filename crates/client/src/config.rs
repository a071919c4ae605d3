//! Connection settings, table names, column mapping and fetch limits.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cellar_core::formula::LOOKUP_CHUNK_SIZE;
use cellar_core::record::{FieldError, FieldMap};
use thiserror::Error;
use url::Url;

/// Default endpoint of the hosted tabular service.
pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// Errors detected before any request is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing base ID (set CELLAR_BASE_ID or --base-id)")]
    MissingBaseId,
    #[error("Missing API token (set CELLAR_TOKEN or --token)")]
    MissingToken,
    #[error("Missing table name for {0}")]
    MissingTable(&'static str),
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },
    #[error("Invalid field mapping: {0}")]
    Fields(#[from] FieldError),
    #[error("Could not read field mapping {path}: {reason}")]
    FieldFile { path: PathBuf, reason: String },
}

/// Where and how to reach the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub api_url: String,
    pub base_id: String,
    pub token: String,
    /// Per-request timeout; `None` leaves the HTTP client's default.
    pub timeout: Option<Duration>,
}

/// Names of the three tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub wines: String,
    pub inventory: String,
    pub locations: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            wines: "Wines".to_string(),
            inventory: "Inventory".to_string(),
            locations: "Locations".to_string(),
        }
    }
}

/// Row caps for each kind of fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Rows returned by the server-filtered search.
    pub search: usize,
    /// Rows fetched unfiltered for the local fallback search.
    pub fallback: usize,
    /// Inventory rows read when building the occupancy index.
    pub placements: usize,
    /// Identifiers per lookup request.
    pub lookup_chunk: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            search: 50,
            fallback: 300,
            placements: 1_000,
            lookup_chunk: LOOKUP_CHUNK_SIZE,
        }
    }
}

/// Everything the client needs to talk to one cellar base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub connection: Connection,
    pub tables: TableNames,
    pub fields: FieldMap,
    pub limits: Limits,
}

impl Settings {
    /// Creates settings for a base with default tables, fields and limits.
    pub fn new(base_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            connection: Connection {
                api_url: DEFAULT_API_URL.to_string(),
                base_id: base_id.into(),
                token: token.into(),
                timeout: None,
            },
            tables: TableNames::default(),
            fields: FieldMap::default(),
            limits: Limits::default(),
        }
    }

    /// Points the client at another endpoint (useful for testing).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.connection.api_url = api_url.into();
        self
    }

    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Checks the settings and returns the parsed API URL.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if self.connection.base_id.trim().is_empty() {
            return Err(ConfigError::MissingBaseId);
        }
        if self.connection.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        for (table, name) in [
            ("wines", &self.tables.wines),
            ("inventory", &self.tables.inventory),
            ("locations", &self.tables.locations),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::MissingTable(table));
            }
        }
        self.fields.validate()?;

        let url = Url::parse(&self.connection.api_url).map_err(|e| ConfigError::InvalidApiUrl {
            url: self.connection.api_url.clone(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidApiUrl {
                url: self.connection.api_url.clone(),
                reason: "not a base URL".to_string(),
            });
        }
        Ok(url)
    }
}

/// Reads a JSON column mapping; missing keys keep their defaults.
pub fn load_field_map(path: &Path) -> Result<FieldMap, ConfigError> {
    let to_error = |reason: String| ConfigError::FieldFile {
        path: path.to_path_buf(),
        reason,
    };
    let contents = std::fs::read_to_string(path).map_err(|e| to_error(e.to_string()))?;
    let fields: FieldMap = serde_json::from_str(&contents).map_err(|e| to_error(e.to_string()))?;
    fields.validate()?;
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = Settings::new("appBase", "patToken");

        assert_eq!(settings.connection.api_url, "https://api.airtable.com/v0");
        assert_eq!(settings.tables.wines, "Wines");
        assert_eq!(settings.tables.inventory, "Inventory");
        assert_eq!(settings.tables.locations, "Locations");
        assert_eq!(settings.limits.search, 50);
        assert_eq!(settings.limits.fallback, 300);
        assert_eq!(settings.limits.lookup_chunk, 50);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_credentials() {
        assert_eq!(
            Settings::new("", "patToken").validate(),
            Err(ConfigError::MissingBaseId)
        );
        assert_eq!(
            Settings::new("appBase", "  ").validate(),
            Err(ConfigError::MissingToken)
        );
    }

    #[test]
    fn test_missing_table() {
        let mut settings = Settings::new("appBase", "patToken");
        settings.tables.locations = String::new();

        assert_eq!(
            settings.validate(),
            Err(ConfigError::MissingTable("locations"))
        );
    }

    #[test]
    fn test_invalid_api_url() {
        let settings = Settings::new("appBase", "patToken").with_api_url("not a url");
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidApiUrl { .. })
        ));
    }

    #[test]
    fn test_load_field_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fields.json");
        std::fs::write(&path, r#"{"items": {"price": "Price (€)"}}"#).unwrap();

        let fields = load_field_map(&path).unwrap();

        assert_eq!(fields.items.price, "Price (€)");
        assert_eq!(fields.locations.rack, "Rack");
    }

    #[test]
    fn test_load_field_map_missing_file() {
        let error = load_field_map(Path::new("/nonexistent/fields.json")).unwrap_err();
        assert!(matches!(error, ConfigError::FieldFile { .. }));
    }
}
