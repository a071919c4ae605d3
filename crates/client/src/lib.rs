//! cellar_client - search and manage a wine cellar kept in a hosted tabular database.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod intake;
pub mod lookup;
pub mod occupancy;
pub mod output;
pub mod search;
pub mod source;

pub use client::TableClient;
pub use error::{ClientError, Result};
