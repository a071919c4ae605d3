//! Mapping from domain meaning to the service's column names.
//!
//! Column names in the base drift between versions ("Price" vs "Price (€)"),
//! so none of them are baked into the logic. Every lookup goes through a
//! [`FieldMap`], which deserializes from JSON with per-field defaults.

use serde::{Deserialize, Serialize};

use super::error::{FieldError, Result};

/// Column names of the wines table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemFields {
    pub name: String,
    pub vintage: String,
    pub country: String,
    pub region: String,
    pub grape: String,
    pub tasting_notes: String,
    pub pairing: String,
    pub drink_from: String,
    pub drink_until: String,
    pub price: String,
    pub image: String,
    /// Columns concatenated for free-text search, in order.
    pub search: Vec<String>,
}

impl Default for ItemFields {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            vintage: "Vintage".to_string(),
            country: "Country".to_string(),
            region: "Region".to_string(),
            grape: "Grape".to_string(),
            tasting_notes: "Tasting Notes".to_string(),
            pairing: "Food Pairing".to_string(),
            drink_from: "Drink From".to_string(),
            drink_until: "Drink Until".to_string(),
            price: "Price".to_string(),
            image: "Image".to_string(),
            search: ["Name", "Vintage", "Country", "Region", "Grape"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ItemFields {
    /// Columns needed to render a search result.
    pub fn display(&self) -> Vec<String> {
        let mut fields = vec![
            self.name.clone(),
            self.vintage.clone(),
            self.country.clone(),
            self.region.clone(),
            self.grape.clone(),
            self.tasting_notes.clone(),
            self.pairing.clone(),
            self.drink_from.clone(),
            self.drink_until.clone(),
            self.price.clone(),
            self.image.clone(),
        ];
        for field in &self.search {
            if !fields.contains(field) {
                fields.push(field.clone());
            }
        }
        fields
    }
}

/// Column names of the inventory table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementFields {
    pub item_link: String,
    pub location_link: String,
    pub quantity: String,
}

impl Default for PlacementFields {
    fn default() -> Self {
        Self {
            item_link: "Wine (Link to Wines)".to_string(),
            location_link: "Location (Link to Locations)".to_string(),
            quantity: "Quantity".to_string(),
        }
    }
}

/// Column names of the locations table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationFields {
    pub rack: String,
    pub row: String,
    pub column: String,
    pub name: String,
}

impl Default for LocationFields {
    fn default() -> Self {
        Self {
            rack: "Rack".to_string(),
            row: "Row".to_string(),
            column: "Column".to_string(),
            name: "Name".to_string(),
        }
    }
}

/// Column names for all three tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    pub items: ItemFields,
    pub placements: PlacementFields,
    pub locations: LocationFields,
}

impl FieldMap {
    /// Checks that every column name can be embedded in a `{...}` reference.
    pub fn validate(&self) -> Result<()> {
        let items = &self.items;
        let names = [
            &items.name,
            &items.vintage,
            &items.country,
            &items.region,
            &items.grape,
            &items.tasting_notes,
            &items.pairing,
            &items.drink_from,
            &items.drink_until,
            &items.price,
            &items.image,
            &self.placements.item_link,
            &self.placements.location_link,
            &self.placements.quantity,
            &self.locations.rack,
            &self.locations.row,
            &self.locations.column,
            &self.locations.name,
        ];

        names
            .into_iter()
            .chain(items.search.iter())
            .try_for_each(|name| validate_field_name(name))
    }
}

/// Rejects names that would break out of a `{...}` field reference.
pub fn validate_field_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('{') || name.contains('}') {
        return Err(FieldError::InvalidFieldName(name.to_string()));
    }
    Ok(())
}
