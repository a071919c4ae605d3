use std::collections::{HashMap, HashSet};

use crate::record::{Location, Placement, RecordId};

use super::grid::GridLayout;
use super::types::{CellOccupant, InventoryLine, ItemLabel, OccupancyIndex, Position};

/// Identifiers referenced by the given placements, each listed once in
/// first-seen order: `(locations, items)`.
pub fn linked_ids<'a>(
    placements: impl IntoIterator<Item = &'a Placement>,
) -> (Vec<RecordId>, Vec<RecordId>) {
    let mut seen_locations = HashSet::new();
    let mut seen_items = HashSet::new();
    let mut locations = Vec::new();
    let mut items = Vec::new();

    for placement in placements {
        for id in &placement.locations {
            if seen_locations.insert(id) {
                locations.push(id.clone());
            }
        }
        for id in &placement.items {
            if seen_items.insert(id) {
                items.push(id.clone());
            }
        }
    }

    (locations, items)
}

/// Joins placements with their resolved locations and items.
///
/// Every (item, location) pair of an occupied placement becomes one entry in
/// both the cell index and the position index, carrying the placement's
/// quantity. Vacant placements are ignored. Links to locations that were not
/// resolved, or that lack a full coordinate triple, are skipped; items that
/// were not resolved are labelled with their identifier.
pub fn build_occupancy(
    placements: &[Placement],
    locations: &HashMap<RecordId, Location>,
    items: &HashMap<RecordId, ItemLabel>,
) -> OccupancyIndex {
    let mut index = OccupancyIndex {
        grid: GridLayout::from_locations(locations.values()),
        ..OccupancyIndex::default()
    };

    for placement in placements.iter().filter(|p| !p.is_vacant()) {
        let labels: Vec<ItemLabel> = placement
            .items
            .iter()
            .map(|id| {
                items
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| ItemLabel::unresolved(id))
            })
            .collect();

        for location_id in &placement.locations {
            let Some(cell) = locations.get(location_id).and_then(Location::cell) else {
                continue;
            };

            for (item_id, label) in placement.items.iter().zip(&labels) {
                index
                    .cells
                    .entry(cell.clone())
                    .or_default()
                    .push(CellOccupant {
                        placement: placement.id.clone(),
                        item: item_id.clone(),
                        label: label.clone(),
                        quantity: placement.quantity,
                    });
                index
                    .positions
                    .entry(item_id.clone())
                    .or_default()
                    .push(Position {
                        cell: cell.clone(),
                        quantity: placement.quantity,
                    });
            }
        }

        index.inventory.push(InventoryLine {
            placement: placement.id.clone(),
            wines: labels.iter().map(ToString::to_string).collect(),
            locations: placement
                .locations
                .iter()
                .map(|id| {
                    locations
                        .get(id)
                        .map(Location::label)
                        .unwrap_or_else(|| id.to_string())
                })
                .collect(),
            quantity: placement.quantity,
        });
    }

    index
}
