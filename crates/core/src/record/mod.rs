mod entities;
mod error;
mod fields;
mod types;

pub use entities::{CellCoord, DrinkStatus, DrinkWindow, ItemSummary, Location, Placement};
pub use error::{FieldError, Result};
pub use fields::{validate_field_name, FieldMap, ItemFields, LocationFields, PlacementFields};
pub use types::{CreateRecords, Fields, ListResponse, NewRecord, Record, RecordId};
