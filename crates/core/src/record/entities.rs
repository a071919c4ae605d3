use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{FieldError, Result};
use super::fields::{ItemFields, LocationFields, PlacementFields};
use super::types::{Record, RecordId};

/// Coordinates of one cellar cell.
///
/// Ordering is rack, then row, then column, which is also the paint order
/// of the occupancy grid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub rack: String,
    pub row: u32,
    pub column: u32,
}

impl CellCoord {
    pub fn new(rack: impl Into<String>, row: u32, column: u32) -> Self {
        Self {
            rack: rack.into(),
            row,
            column,
        }
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rack {} · Row {} · Col {}", self.rack, self.row, self.column)
    }
}

/// An inventory row linking wines to cellar cells with a bottle count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: RecordId,
    pub items: Vec<RecordId>,
    pub locations: Vec<RecordId>,
    pub quantity: i64,
}

impl Placement {
    /// Decodes a placement from an inventory record.
    ///
    /// A missing quantity counts as zero.
    pub fn from_record(record: &Record, fields: &PlacementFields) -> Result<Self> {
        let quantity = match record.field(&fields.quantity) {
            None | Some(Value::Null) => 0,
            Some(value) => parse_integer(value).ok_or_else(|| FieldError::Invalid {
                record: record.id.to_string(),
                field: fields.quantity.clone(),
                reason: format!("expected a whole number, got {}", value),
            })?,
        };

        Ok(Self {
            id: record.id.clone(),
            items: record.links(&fields.item_link),
            locations: record.links(&fields.location_link),
            quantity,
        })
    }

    /// A vacant placement holds no bottles or links nothing.
    pub fn is_vacant(&self) -> bool {
        self.quantity <= 0 || self.items.is_empty() || self.locations.is_empty()
    }
}

/// A cellar cell record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: RecordId,
    pub rack: Option<String>,
    pub row: Option<u32>,
    pub column: Option<u32>,
    pub name: Option<String>,
}

impl Location {
    /// Decodes a location record; unreadable coordinates are left unknown.
    pub fn from_record(record: &Record, fields: &LocationFields) -> Self {
        let non_empty = |s: String| (!s.is_empty()).then_some(s);
        Self {
            id: record.id.clone(),
            rack: non_empty(record.text(&fields.rack)),
            row: record.field(&fields.row).and_then(parse_coordinate),
            column: record.field(&fields.column).and_then(parse_coordinate),
            name: non_empty(record.text(&fields.name)),
        }
    }

    /// The full coordinate triple, if every component is known.
    pub fn cell(&self) -> Option<CellCoord> {
        Some(CellCoord::new(self.rack.clone()?, self.row?, self.column?))
    }

    /// Label for display: the record name, else the coordinates, else the id.
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match self.cell() {
            Some(cell) => cell.to_string(),
            None => self.id.to_string(),
        }
    }
}

/// The years during which a wine is meant to be opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkWindow {
    pub from: Option<i32>,
    pub until: Option<i32>,
}

/// Where a wine stands relative to its drinking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrinkStatus {
    TooYoung,
    Ready,
    PastPeak,
    Unknown,
}

impl DrinkWindow {
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.until.is_none()
    }

    /// Status of the window in the given year.
    pub fn status(&self, year: i32) -> DrinkStatus {
        match (self.from, self.until) {
            (None, None) => DrinkStatus::Unknown,
            (Some(from), _) if year < from => DrinkStatus::TooYoung,
            (_, Some(until)) if year > until => DrinkStatus::PastPeak,
            _ => DrinkStatus::Ready,
        }
    }
}

impl std::fmt::Display for DrinkWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.from, self.until) {
            (Some(from), Some(until)) => write!(f, "{}–{}", from, until),
            (Some(from), None) => write!(f, "from {}", from),
            (None, Some(until)) => write!(f, "until {}", until),
            (None, None) => Ok(()),
        }
    }
}

/// The display projection of a wine record used in search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: RecordId,
    pub name: String,
    pub vintage: Option<String>,
    /// "Region • Country", whichever parts are present.
    pub origin: Option<String>,
    pub varietal: Option<String>,
    pub tasting_note: Option<String>,
    pub pairing_note: Option<String>,
    pub drink_window: DrinkWindow,
    pub price: Option<String>,
    pub thumbnail: Option<String>,
}

impl ItemSummary {
    pub fn from_record(record: &Record, fields: &ItemFields) -> Self {
        let text = |name: &str| {
            let value = record.text(name);
            (!value.is_empty()).then_some(value)
        };

        let origin = [record.text(&fields.region), record.text(&fields.country)]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" • ");

        Self {
            id: record.id.clone(),
            name: record.text(&fields.name),
            vintage: text(&fields.vintage),
            origin: (!origin.is_empty()).then_some(origin),
            varietal: text(&fields.grape),
            tasting_note: text(&fields.tasting_notes),
            pairing_note: text(&fields.pairing),
            drink_window: DrinkWindow {
                from: record.field(&fields.drink_from).and_then(parse_year),
                until: record.field(&fields.drink_until).and_then(parse_year),
            },
            price: text(&fields.price),
            thumbnail: record.field(&fields.image).and_then(thumbnail_url),
        }
    }
}

/// Reads a whole number from a numeric or numeric-string value.
fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) if s.trim().is_empty() => Some(0),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a positive grid coordinate.
fn parse_coordinate(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Array(items) => items.first().and_then(parse_integer),
        other => parse_integer(other),
    }?;
    u32::try_from(n).ok().filter(|n| *n > 0)
}

/// Reads a year from a number or from text starting with four digits
/// (`"2026"`, `"2026-01-01"`).
fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            (digits.len() == 4).then(|| digits.parse().ok()).flatten()
        }
        _ => None,
    }
}

/// First attachment's small thumbnail, falling back to its full url.
fn thumbnail_url(value: &Value) -> Option<String> {
    let first = match value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    first
        .pointer("/thumbnails/small/url")
        .or_else(|| first.get("url"))
        .and_then(Value::as_str)
        .map(String::from)
}
