use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{CellCoord, ItemFields, Record, RecordId};

use super::grid::GridLayout;

/// Name and vintage of a wine, as resolved for the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLabel {
    pub name: String,
    pub vintage: Option<String>,
}

impl ItemLabel {
    pub fn from_record(record: &Record, fields: &ItemFields) -> Self {
        let vintage = record.text(&fields.vintage);
        Self {
            name: record.text(&fields.name),
            vintage: (!vintage.is_empty()).then_some(vintage),
        }
    }

    /// Label for an item whose record could not be resolved.
    pub fn unresolved(id: &RecordId) -> Self {
        Self {
            name: id.to_string(),
            vintage: None,
        }
    }
}

impl std::fmt::Display for ItemLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.vintage {
            Some(vintage) => write!(f, "{} {}", self.name, vintage),
            None => f.write_str(&self.name),
        }
    }
}

/// One wine sitting in a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellOccupant {
    pub placement: RecordId,
    pub item: RecordId,
    pub label: ItemLabel,
    pub quantity: i64,
}

/// One cell holding some of a wine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub cell: CellCoord,
    pub quantity: i64,
}

/// An inventory row with its links resolved to display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLine {
    pub placement: RecordId,
    pub wines: Vec<String>,
    pub locations: Vec<String>,
    pub quantity: i64,
}

/// Cell and position indices derived from the inventory.
///
/// Built in one go by [`super::build_occupancy`] and never mutated after.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyIndex {
    pub(super) cells: BTreeMap<CellCoord, Vec<CellOccupant>>,
    pub(super) positions: BTreeMap<RecordId, Vec<Position>>,
    pub(super) inventory: Vec<InventoryLine>,
    pub(super) grid: GridLayout,
}

impl OccupancyIndex {
    /// An index with no occupancy and the default grid.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Occupants of a cell; empty if the cell holds nothing.
    pub fn cell(&self, cell: &CellCoord) -> &[CellOccupant] {
        self.cells.get(cell).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every cell holding some of the given wine.
    pub fn positions(&self, item: &RecordId) -> &[Position] {
        self.positions.get(item).map(Vec::as_slice).unwrap_or_default()
    }

    /// Bottles of a wine across all cells.
    pub fn total_quantity(&self, item: &RecordId) -> i64 {
        self.positions(item).iter().map(|p| p.quantity).sum()
    }

    pub fn is_occupied(&self, cell: &CellCoord) -> bool {
        !self.cell(cell).is_empty()
    }

    /// Occupied cells in rack, row, column order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (&CellCoord, &[CellOccupant])> {
        self.cells.iter().map(|(cell, occupants)| (cell, occupants.as_slice()))
    }

    pub fn inventory(&self) -> &[InventoryLine] {
        &self.inventory
    }

    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }
}
