//! Adding bottles: wine record, location, and the inventory row linking them.

use std::sync::Arc;

use cellar_core::formula::{all_of, field_equals};
use cellar_core::location::{parse_location, ParsedLocation};
use cellar_core::record::{Fields, Record, RecordId};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::Settings;
use crate::error::{ClientError, Result};
use crate::source::{ListQuery, RecordSource};

/// A wine to add to the wines table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewWine {
    pub name: String,
    pub vintage: Option<i32>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub grape: Option<String>,
    pub price: Option<f64>,
}

/// A location row found or created for a free-text location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRef {
    pub id: RecordId,
    pub parsed: ParsedLocation,
    pub created: bool,
}

/// Records written by one intake.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeReceipt {
    pub wine: RecordId,
    pub location: LocationRef,
    pub placement: RecordId,
    pub quantity: i64,
}

pub struct Intake<S> {
    source: Arc<S>,
    settings: Arc<Settings>,
}

impl<S: RecordSource> Intake<S> {
    pub fn new(source: Arc<S>, settings: Arc<Settings>) -> Self {
        Self { source, settings }
    }

    /// Creates a wine record.
    pub async fn add_wine(&self, wine: &NewWine) -> Result<RecordId> {
        let name = wine.name.trim();
        if name.is_empty() {
            return Err(ClientError::InvalidInput("wine name is empty".to_string()));
        }

        let names = &self.settings.fields.items;
        let mut fields = Fields::new();
        fields.insert(names.name.clone(), json!(name));
        if let Some(vintage) = wine.vintage {
            fields.insert(names.vintage.clone(), json!(vintage));
        }
        for (column, value) in [
            (&names.country, &wine.country),
            (&names.region, &wine.region),
            (&names.grape, &wine.grape),
        ] {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                fields.insert(column.clone(), json!(value));
            }
        }
        if let Some(price) = wine.price {
            fields.insert(names.price.clone(), json!(price));
        }

        let record = self.create_one(&self.settings.tables.wines, fields).await?;
        tracing::info!(id = %record.id, name, "wine added");
        Ok(record.id)
    }

    /// Finds the location described by `text`, creating it when absent.
    ///
    /// A fully parsed location is matched on rack, row and column; anything
    /// else is matched on its name.
    pub async fn find_or_create_location(&self, text: &str) -> Result<LocationRef> {
        let parsed = parse_location(text);
        if parsed.text.is_empty() {
            return Err(ClientError::InvalidInput("location is empty".to_string()));
        }

        let names = &self.settings.fields.locations;
        let formula = match parsed.cell() {
            Some(cell) => all_of(&[
                field_equals(&names.rack, &cell.rack),
                field_equals(&names.row, &cell.row.to_string()),
                field_equals(&names.column, &cell.column.to_string()),
            ]),
            None => field_equals(&names.name, &parsed.text),
        };
        let query = ListQuery::new()
            .filter(formula)
            .fields([&names.rack, &names.row, &names.column, &names.name])
            .max_records(1);
        let table = &self.settings.tables.locations;

        if let Some(existing) = self.source.list_records(table, &query).await?.into_iter().next() {
            tracing::debug!(id = %existing.id, location = %parsed.text, "location found");
            return Ok(LocationRef {
                id: existing.id,
                parsed,
                created: false,
            });
        }

        let mut fields = Fields::new();
        fields.insert(names.name.clone(), json!(parsed.text));
        if let Some(rack) = &parsed.rack {
            fields.insert(names.rack.clone(), json!(rack));
        }
        if let Some(row) = parsed.row {
            fields.insert(names.row.clone(), json!(row));
        }
        if let Some(column) = parsed.column {
            fields.insert(names.column.clone(), json!(column));
        }

        let record = self.create_one(table, fields).await?;
        tracing::info!(id = %record.id, location = %parsed.text, "location created");
        Ok(LocationRef {
            id: record.id,
            parsed,
            created: true,
        })
    }

    /// Creates an inventory row placing `quantity` bottles of `wine` at `location`.
    pub async fn place(
        &self,
        wine: &RecordId,
        location: &RecordId,
        quantity: i64,
    ) -> Result<RecordId> {
        check_quantity(quantity)?;

        let names = &self.settings.fields.placements;
        let mut fields = Fields::new();
        fields.insert(names.item_link.clone(), link(wine));
        fields.insert(names.location_link.clone(), link(location));
        fields.insert(names.quantity.clone(), json!(quantity));

        let record = self
            .create_one(&self.settings.tables.inventory, fields)
            .await?;
        tracing::info!(id = %record.id, %wine, %location, quantity, "bottles placed");
        Ok(record.id)
    }

    /// Places bottles of an existing wine at a free-text location.
    pub async fn place_at(
        &self,
        wine: &RecordId,
        location_text: &str,
        quantity: i64,
    ) -> Result<(LocationRef, RecordId)> {
        check_quantity(quantity)?;
        let location = self.find_or_create_location(location_text).await?;
        let placement = self.place(wine, &location.id, quantity).await?;
        Ok((location, placement))
    }

    /// Adds a new wine and places it at a free-text location.
    ///
    /// Input is checked before anything is written.
    pub async fn add_bottle(
        &self,
        wine: &NewWine,
        location_text: &str,
        quantity: i64,
    ) -> Result<IntakeReceipt> {
        check_quantity(quantity)?;
        if location_text.trim().is_empty() {
            return Err(ClientError::InvalidInput("location is empty".to_string()));
        }

        let wine_id = self.add_wine(wine).await?;
        let (location, placement) = self.place_at(&wine_id, location_text, quantity).await?;
        Ok(IntakeReceipt {
            wine: wine_id,
            location,
            placement,
            quantity,
        })
    }

    async fn create_one(&self, table: &str, fields: Fields) -> Result<Record> {
        self.source
            .create_records(table, vec![fields])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ClientError::InvalidResponse(format!("no record returned by table '{}'", table))
            })
    }
}

fn check_quantity(quantity: i64) -> Result<()> {
    if quantity <= 0 {
        return Err(ClientError::InvalidInput(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    Ok(())
}

fn link(id: &RecordId) -> Value {
    json!([id.as_str()])
}
