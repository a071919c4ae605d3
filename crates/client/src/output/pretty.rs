//! Pretty output formatting.

use cellar_core::location::ParsedLocation;
use cellar_core::occupancy::{InventoryLine, OccupancyIndex, PaintedRack, Position};
use cellar_core::record::{DrinkStatus, ItemSummary};

use crate::intake::IntakeReceipt;
use crate::search::{ResultsView, SearchPhase};

/// Format a wine for display, with where it is stored when known.
pub fn format_item(item: &ItemSummary, year: i32, positions: &[Position]) -> String {
    let mut output = item.name.clone();
    if let Some(vintage) = &item.vintage {
        output.push_str(&format!(" {}", vintage));
    }
    output.push_str(&format!("\n  ID: {}", item.id));
    if let Some(origin) = &item.origin {
        output.push_str(&format!("\n  Origin: {}", origin));
    }
    if let Some(varietal) = &item.varietal {
        output.push_str(&format!("\n  Grape: {}", varietal));
    }
    if !item.drink_window.is_empty() {
        output.push_str(&format!(
            "\n  Drink: {} ({})",
            item.drink_window,
            status_label(item.drink_window.status(year))
        ));
    }
    if let Some(price) = &item.price {
        output.push_str(&format!("\n  Price: {}", price));
    }
    if let Some(note) = &item.tasting_note {
        output.push_str(&format!("\n  Notes: {}", note));
    }
    if let Some(pairing) = &item.pairing_note {
        output.push_str(&format!("\n  Pairing: {}", pairing));
    }
    for position in positions {
        output.push_str(&format!("\n  At: {} ({})", position.cell, bottles(position.quantity)));
    }
    output
}

/// Format the results view; `index` adds storage positions to each wine.
pub fn format_view(view: &ResultsView, year: i32, index: Option<&OccupancyIndex>) -> String {
    match view {
        ResultsView::Empty => "Type a search to see wines.".to_string(),
        ResultsView::Error { phrase, message } => {
            format!("Search for '{}' failed: {}", phrase, message)
        }
        ResultsView::Results { items, .. } if items.is_empty() => "No wines found.".to_string(),
        ResultsView::Results {
            phrase,
            phase,
            items,
        } => {
            let origin = match phase {
                SearchPhase::Server => "",
                SearchPhase::Fallback => ", local match",
            };
            let mut output = format!("WINES matching '{}' ({}{})\n", phrase, items.len(), origin);
            output.push_str(&"-".repeat(40));
            for item in items {
                let positions = index.map(|i| i.positions(&item.id)).unwrap_or_default();
                output.push_str(&format!("\n{}", format_item(item, year, positions)));
                output.push('\n');
            }
            output
        }
    }
}

/// Format racks as grids, `#` for occupied cells and `.` for empty ones.
pub fn format_grid(racks: &[PaintedRack]) -> String {
    let mut output = String::new();
    for rack in racks {
        let occupied = rack
            .rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_occupied())
            .count();
        output.push_str(&format!("RACK {} ({} occupied)\n", rack.label, occupied));

        let columns = rack.rows.first().map(Vec::len).unwrap_or_default();
        output.push_str("    ");
        for column in 1..=columns {
            output.push_str(&format!("{:>3}", column));
        }
        output.push('\n');

        for (row, cells) in rack.rows.iter().enumerate() {
            output.push_str(&format!("{:>3} ", row + 1));
            for cell in cells {
                output.push_str(if cell.is_occupied() { "  #" } else { "  ." });
            }
            output.push('\n');
        }
    }
    output
}

/// Format where a wine is stored.
pub fn format_positions(wine: &str, positions: &[Position]) -> String {
    if positions.is_empty() {
        return format!("{} is not in the cellar.", wine);
    }
    let total: i64 = positions.iter().map(|p| p.quantity).sum();
    let mut output = format!("{} ({})", wine, bottles(total));
    for position in positions {
        output.push_str(&format!("\n  {} ({})", position.cell, bottles(position.quantity)));
    }
    output
}

/// Format inventory rows for display.
pub fn format_inventory(lines: &[InventoryLine]) -> String {
    if lines.is_empty() {
        return "No bottles in the cellar.".to_string();
    }
    let mut output = format!("INVENTORY ({})\n", lines.len());
    output.push_str(&"-".repeat(40));
    for line in lines {
        output.push_str(&format!(
            "\n{}\n  Location: {}\n  Quantity: {}\n",
            line.wines.join(", "),
            line.locations.join(", "),
            line.quantity
        ));
    }
    output
}

/// Format the components recognised in a location text.
pub fn format_parsed_location(parsed: &ParsedLocation) -> String {
    let part = |value: Option<String>| value.unwrap_or_else(|| "?".to_string());
    let mut output = format!(
        "{}\n  Rack: {}\n  Row: {}\n  Column: {}",
        parsed.text,
        part(parsed.rack.clone()),
        part(parsed.row.map(|r| r.to_string())),
        part(parsed.column.map(|c| c.to_string())),
    );
    if !parsed.is_complete() {
        output.push_str("\n  (incomplete: matched by name only)");
    }
    output
}

/// Format the records written by an intake.
pub fn format_receipt(receipt: &IntakeReceipt) -> String {
    let location = if receipt.location.created {
        "new location"
    } else {
        "existing location"
    };
    format!(
        "Placed {} of {} at {} ({})\n  Location ID: {}\n  Inventory ID: {}",
        bottles(receipt.quantity),
        receipt.wine,
        receipt.location.parsed.text,
        location,
        receipt.location.id,
        receipt.placement
    )
}

fn status_label(status: DrinkStatus) -> &'static str {
    match status {
        DrinkStatus::TooYoung => "too young",
        DrinkStatus::Ready => "ready",
        DrinkStatus::PastPeak => "past peak",
        DrinkStatus::Unknown => "unknown",
    }
}

fn bottles(quantity: i64) -> String {
    if quantity == 1 {
        "1 bottle".to_string()
    } else {
        format!("{} bottles", quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellar_core::occupancy::PaintedCell;
    use cellar_core::record::{CellCoord, DrinkWindow, RecordId};

    fn summary() -> ItemSummary {
        ItemSummary {
            id: RecordId::from("rec1"),
            name: "Felton Road".to_string(),
            vintage: Some("2019".to_string()),
            origin: Some("Central Otago • New Zealand".to_string()),
            varietal: Some("Pinot Noir".to_string()),
            tasting_note: None,
            pairing_note: None,
            drink_window: DrinkWindow {
                from: Some(2023),
                until: Some(2030),
            },
            price: None,
            thumbnail: None,
        }
    }

    #[test]
    fn test_format_item_shows_status_and_positions() {
        let positions = [Position {
            cell: CellCoord::new("1", 2, 3),
            quantity: 2,
        }];

        let output = format_item(&summary(), 2026, &positions);

        assert!(output.starts_with("Felton Road 2019"));
        assert!(output.contains("Drink: 2023–2030 (ready)"));
        assert!(output.contains("At: Rack 1 · Row 2 · Col 3 (2 bottles)"));
    }

    #[test]
    fn test_format_view_states() {
        assert_eq!(
            format_view(&ResultsView::Empty, 2026, None),
            "Type a search to see wines."
        );
        let none = ResultsView::Results {
            phrase: "zzz".to_string(),
            phase: SearchPhase::Fallback,
            items: Vec::new(),
        };
        assert_eq!(format_view(&none, 2026, None), "No wines found.");
        let some = ResultsView::Results {
            phrase: "pinot".to_string(),
            phase: SearchPhase::Fallback,
            items: vec![summary()],
        };
        assert!(format_view(&some, 2026, None).starts_with("WINES matching 'pinot' (1, local match)"));
    }

    #[test]
    fn test_format_grid_marks_occupied_cells() {
        let cell = |row, column, bottles| PaintedCell {
            cell: CellCoord::new("1", row, column),
            bottles,
        };
        let rack = PaintedRack {
            label: "1".to_string(),
            rows: vec![vec![cell(1, 1, 0), cell(1, 2, 3)], vec![cell(2, 1, 1), cell(2, 2, 0)]],
        };

        let output = format_grid(&[rack]);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "RACK 1 (2 occupied)");
        assert_eq!(lines[1], "      1  2");
        assert_eq!(lines[2], "  1   .  #");
        assert_eq!(lines[3], "  2   #  .");
    }

    #[test]
    fn test_format_positions_totals_bottles() {
        let positions = [
            Position {
                cell: CellCoord::new("1", 1, 1),
                quantity: 1,
            },
            Position {
                cell: CellCoord::new("2", 4, 4),
                quantity: 2,
            },
        ];

        assert!(format_positions("Ata Rangi", &positions).starts_with("Ata Rangi (3 bottles)"));
        assert_eq!(format_positions("Ata Rangi", &[]), "Ata Rangi is not in the cellar.");
    }

    #[test]
    fn test_format_parsed_location_marks_unknown_parts() {
        let parsed = ParsedLocation {
            rack: Some("2".to_string()),
            row: None,
            column: Some(5),
            text: "rack 2 col 5".to_string(),
        };

        let output = format_parsed_location(&parsed);

        assert!(output.contains("Row: ?"));
        assert!(output.contains("incomplete"));
    }
}
