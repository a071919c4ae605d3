//! CLI command definitions.

pub mod intake;
pub mod location;
pub mod search;

use std::path::PathBuf;
use std::time::Duration;

use cellar_core::record::FieldMap;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{
    load_field_map, ConfigError, Limits, Settings, TableNames, DEFAULT_API_URL,
};

/// Search and manage a wine cellar kept in a hosted tabular database.
#[derive(Debug, Parser)]
#[command(name = "cellar")]
#[command(about = "Search and manage a wine cellar", long_about = None)]
pub struct Cli {
    /// API root URL.
    #[arg(long, env = "CELLAR_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Base identifier.
    #[arg(long, env = "CELLAR_BASE_ID", global = true)]
    pub base_id: Option<String>,

    /// Personal access token.
    #[arg(long, env = "CELLAR_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Wines table name.
    #[arg(long, env = "CELLAR_WINES_TABLE", default_value = "Wines", global = true)]
    pub wines_table: String,

    /// Inventory table name.
    #[arg(long, env = "CELLAR_INVENTORY_TABLE", default_value = "Inventory", global = true)]
    pub inventory_table: String,

    /// Locations table name.
    #[arg(long, env = "CELLAR_LOCATIONS_TABLE", default_value = "Locations", global = true)]
    pub locations_table: String,

    /// JSON file overriding column names.
    #[arg(long, env = "CELLAR_FIELDS", global = true)]
    pub fields: Option<PathBuf>,

    /// Rows requested by the filtered search.
    #[arg(long, env = "CELLAR_SEARCH_LIMIT", default_value_t = 50, global = true)]
    pub search_limit: usize,

    /// Rows scanned by the local fallback search.
    #[arg(long, env = "CELLAR_FALLBACK_LIMIT", default_value_t = 300, global = true)]
    pub fallback_limit: usize,

    /// Inventory rows read when building occupancy.
    #[arg(long, env = "CELLAR_PLACEMENT_LIMIT", default_value_t = 1000, global = true)]
    pub placement_limit: usize,

    /// Identifiers per lookup request.
    #[arg(long, env = "CELLAR_LOOKUP_CHUNK", default_value_t = 50, global = true)]
    pub lookup_chunk: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "CELLAR_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format.
    #[arg(long, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search wines by name, vintage, origin or grape.
    Search(search::SearchCommand),
    /// Show the rack grid with occupied cells marked.
    Grid,
    /// Show where a wine is stored.
    Locate {
        /// Wine record ID.
        wine: String,
    },
    /// List inventory rows with wine and location names.
    Inventory,
    /// Add a new wine and place bottles of it.
    Add(intake::AddCommand),
    /// Place bottles of an existing wine.
    Place(intake::PlaceCommand),
    /// Show how a location text is understood.
    ParseLocation(location::ParseLocationCommand),
    /// Read the rack label from a scanned rack code.
    RackCode(location::RackCodeCommand),
}

impl Cli {
    /// Settings for the service, from flags and environment.
    ///
    /// Nothing is checked here beyond loading the field map; the client
    /// validates settings before its first request.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let fields = match &self.fields {
            Some(path) => load_field_map(path)?,
            None => FieldMap::default(),
        };

        let mut settings = Settings::new(
            self.base_id.clone().unwrap_or_default(),
            self.token.clone().unwrap_or_default(),
        )
        .with_api_url(&self.api_url)
        .with_fields(fields)
        .with_limits(Limits {
            search: self.search_limit,
            fallback: self.fallback_limit,
            placements: self.placement_limit,
            lookup_chunk: self.lookup_chunk,
        });
        settings.tables = TableNames {
            wines: self.wines_table.clone(),
            inventory: self.inventory_table.clone(),
            locations: self.locations_table.clone(),
        };
        settings.connection.timeout = self.timeout.map(Duration::from_secs);
        Ok(settings)
    }
}
