use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{CellCoord, Location};

use super::types::OccupancyIndex;

/// Rack label used when no locations are known.
pub const DEFAULT_RACK: &str = "1";
/// Rows in the default rack (A–H on the physical racks).
pub const DEFAULT_ROWS: u32 = 8;
/// Columns in the default rack.
pub const DEFAULT_COLUMNS: u32 = 10;

/// Dimensions of one rack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RackLayout {
    pub label: String,
    pub rows: u32,
    pub columns: u32,
}

/// Racks to paint, in label order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub racks: Vec<RackLayout>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            racks: vec![RackLayout {
                label: DEFAULT_RACK.to_string(),
                rows: DEFAULT_ROWS,
                columns: DEFAULT_COLUMNS,
            }],
        }
    }
}

impl GridLayout {
    /// Sizes each rack to the furthest row and column seen in `locations`.
    ///
    /// Locations without a full coordinate triple do not contribute. With
    /// nothing to go on, the default single rack is returned so the map is
    /// never blank.
    pub fn from_locations<'a>(locations: impl IntoIterator<Item = &'a Location>) -> Self {
        let mut racks: BTreeMap<String, (u32, u32)> = BTreeMap::new();
        for cell in locations.into_iter().filter_map(Location::cell) {
            let extent = racks.entry(cell.rack).or_insert((0, 0));
            extent.0 = extent.0.max(cell.row);
            extent.1 = extent.1.max(cell.column);
        }

        if racks.is_empty() {
            return Self::default();
        }

        Self {
            racks: racks
                .into_iter()
                .map(|(label, (rows, columns))| RackLayout {
                    label,
                    rows,
                    columns,
                })
                .collect(),
        }
    }

    /// Paints every cell of every rack with its bottle count.
    pub fn paint(&self, index: &OccupancyIndex) -> Vec<PaintedRack> {
        self.racks
            .iter()
            .map(|rack| PaintedRack {
                label: rack.label.clone(),
                rows: (1..=rack.rows)
                    .map(|row| {
                        (1..=rack.columns)
                            .map(|column| {
                                let cell = CellCoord::new(rack.label.clone(), row, column);
                                let bottles = index.cell(&cell).iter().map(|o| o.quantity).sum();
                                PaintedCell { cell, bottles }
                            })
                            .collect()
                    })
                    .collect(),
            })
            .collect()
    }
}

/// A cell and the number of bottles in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintedCell {
    pub cell: CellCoord,
    pub bottles: i64,
}

impl PaintedCell {
    pub fn is_occupied(&self) -> bool {
        self.bottles > 0
    }
}

/// A rack as rows of painted cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintedRack {
    pub label: String,
    pub rows: Vec<Vec<PaintedCell>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;

    fn location(id: &str, rack: &str, row: u32, column: u32) -> Location {
        Location {
            id: RecordId::from(id),
            rack: Some(rack.to_string()),
            row: Some(row),
            column: Some(column),
            name: None,
        }
    }

    #[test]
    fn test_default_grid_when_no_locations() {
        let grid = GridLayout::from_locations(&[]);

        assert_eq!(grid, GridLayout::default());
        assert_eq!(grid.racks[0].rows, 8);
        assert_eq!(grid.racks[0].columns, 10);
    }

    #[test]
    fn test_grid_sized_by_locations() {
        let locations = vec![
            location("recL1", "B", 2, 5),
            location("recL2", "A", 4, 1),
            location("recL3", "B", 6, 3),
        ];

        let grid = GridLayout::from_locations(&locations);

        assert_eq!(
            grid.racks,
            vec![
                RackLayout { label: "A".to_string(), rows: 4, columns: 1 },
                RackLayout { label: "B".to_string(), rows: 6, columns: 5 },
            ]
        );
    }

    #[test]
    fn test_incomplete_locations_fall_back_to_default() {
        let incomplete = Location {
            id: RecordId::from("recL1"),
            rack: Some("A".to_string()),
            row: None,
            column: Some(2),
            name: None,
        };

        assert_eq!(GridLayout::from_locations(&[incomplete]), GridLayout::default());
    }

    #[test]
    fn test_paint_empty_index() {
        let painted = GridLayout::default().paint(&OccupancyIndex::empty());

        assert_eq!(painted.len(), 1);
        assert_eq!(painted[0].rows.len(), 8);
        assert!(painted[0].rows.iter().all(|row| row.len() == 10));
        assert!(painted[0].rows.iter().flatten().all(|c| !c.is_occupied()));
    }
}
