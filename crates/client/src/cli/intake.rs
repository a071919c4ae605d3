//! Intake CLI commands.

use clap::Parser;

use crate::intake::NewWine;

/// Add a new wine and place bottles of it.
#[derive(Debug, Parser)]
pub struct AddCommand {
    /// Wine name.
    #[arg(long)]
    pub name: String,
    /// Vintage year.
    #[arg(long)]
    pub vintage: Option<i32>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    /// Grape or blend.
    #[arg(long)]
    pub grape: Option<String>,
    #[arg(long)]
    pub price: Option<f64>,
    /// Where the bottles go, e.g. "rack 2 row 3 col 5".
    #[arg(long)]
    pub location: String,
    /// Number of bottles.
    #[arg(long, default_value_t = 1)]
    pub quantity: i64,
}

impl AddCommand {
    pub fn wine(&self) -> NewWine {
        NewWine {
            name: self.name.clone(),
            vintage: self.vintage,
            country: self.country.clone(),
            region: self.region.clone(),
            grape: self.grape.clone(),
            price: self.price,
        }
    }
}

/// Place bottles of an existing wine.
#[derive(Debug, Parser)]
pub struct PlaceCommand {
    /// Wine record ID.
    #[arg(long)]
    pub wine: String,
    /// Where the bottles go.
    #[arg(long)]
    pub location: String,
    /// Number of bottles.
    #[arg(long, default_value_t = 1)]
    pub quantity: i64,
}
