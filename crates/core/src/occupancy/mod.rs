mod grid;
mod index;
mod types;

pub use grid::{
    GridLayout, PaintedCell, PaintedRack, RackLayout, DEFAULT_COLUMNS, DEFAULT_RACK, DEFAULT_ROWS,
};
pub use index::{build_occupancy, linked_ids};
pub use types::{CellOccupant, InventoryLine, ItemLabel, OccupancyIndex, Position};
