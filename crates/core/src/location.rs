//! Parsing free-text cellar locations.
//!
//! Users type locations like `"Rack 2, row 3, col 5"` or `"rack2 row3 column5"`.
//! The parser only fills in a component when a keyword is directly followed by
//! a number; anything else stays unknown and the original text is kept as the
//! display name.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::record::CellCoord;

/// Components recognised in a free-text location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLocation {
    pub rack: Option<String>,
    pub row: Option<u32>,
    pub column: Option<u32>,
    /// The input, trimmed; used as display name.
    pub text: String,
}

impl ParsedLocation {
    /// The coordinate triple, if every component was recognised.
    pub fn cell(&self) -> Option<CellCoord> {
        Some(CellCoord::new(self.rack.clone()?, self.row?, self.column?))
    }

    pub fn is_complete(&self) -> bool {
        self.rack.is_some() && self.row.is_some() && self.column.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Rack,
    Row,
    Column,
}

fn keyword(word: &str) -> Option<Component> {
    match word {
        "rack" => Some(Component::Rack),
        "row" => Some(Component::Row),
        "col" | "column" => Some(Component::Column),
        _ => None,
    }
}

/// Splits a token such as `rack12` into its keyword and number.
fn split_glued(token: &str) -> Option<(Component, &str)> {
    let digits_at = token.find(|c: char| c.is_ascii_digit())?;
    let (word, number) = token.split_at(digits_at);
    if !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    keyword(word).map(|component| (component, number))
}

/// Parses a free-text location.
///
/// ```
/// use cellar_core::location::parse_location;
///
/// let parsed = parse_location("Rack 2, row 3, col 5");
/// assert_eq!(parsed.rack.as_deref(), Some("2"));
/// assert_eq!(parsed.row, Some(3));
/// assert_eq!(parsed.column, Some(5));
///
/// let partial = parse_location("rack 1 bottom shelf");
/// assert_eq!(partial.rack.as_deref(), Some("1"));
/// assert_eq!(partial.row, None);
/// ```
pub fn parse_location(text: &str) -> ParsedLocation {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let mut parsed = ParsedLocation {
        text: text.trim().to_string(),
        ..ParsedLocation::default()
    };

    let mut i = 0;
    while i < tokens.len() {
        let found = match keyword(tokens[i]) {
            Some(component) => match tokens.get(i + 1) {
                Some(next) if next.chars().all(|c| c.is_ascii_digit()) => {
                    i += 1;
                    Some((component, *next))
                }
                _ => None,
            },
            None => split_glued(tokens[i]),
        };

        if let Some((component, number)) = found {
            assign(&mut parsed, component, number);
        }
        i += 1;
    }

    parsed
}

/// Records a component; the first occurrence wins.
fn assign(parsed: &mut ParsedLocation, component: Component, number: &str) {
    match component {
        Component::Rack if parsed.rack.is_none() => {
            let label = match number.trim_start_matches('0') {
                "" => "0",
                trimmed => trimmed,
            };
            parsed.rack = Some(label.to_string());
        }
        Component::Row if parsed.row.is_none() => {
            parsed.row = number.parse().ok().filter(|n| *n > 0);
        }
        Component::Column if parsed.column.is_none() => {
            parsed.column = number.parse().ok().filter(|n| *n > 0);
        }
        _ => {}
    }
}

/// Extracts a rack label from a scanned rack code.
///
/// Accepts `RACK=<label>` payloads and URLs carrying a `prefill_Rack` query
/// parameter.
///
/// ```
/// use cellar_core::location::rack_from_code;
///
/// assert_eq!(rack_from_code("RACK=R3").as_deref(), Some("R3"));
/// assert_eq!(
///     rack_from_code("https://forms.example/cellar?prefill_Rack=Left").as_deref(),
///     Some("Left")
/// );
/// assert_eq!(rack_from_code("hello"), None);
/// ```
pub fn rack_from_code(code: &str) -> Option<String> {
    let code = code.trim();
    if let Some(label) = code.strip_prefix("RACK=") {
        let label = label.trim();
        return (!label.is_empty()).then(|| label.to_string());
    }

    let url = Url::parse(code).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "prefill_Rack")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_triple() {
        let parsed = parse_location("Rack 1 Row 2 Column 3");
        assert_eq!(parsed.cell(), Some(CellCoord::new("1", 2, 3)));
        assert!(parsed.is_complete());
    }

    #[test]
    fn test_glued_keywords_and_punctuation() {
        let parsed = parse_location("rack4/row:7 - col#10");
        assert_eq!(parsed.cell(), Some(CellCoord::new("4", 7, 10)));

        let glued = parse_location("RACK12 ROW3 COL1");
        assert_eq!(glued.cell(), Some(CellCoord::new("12", 3, 1)));
    }

    #[test]
    fn test_missing_components_stay_unknown() {
        let parsed = parse_location("row 4 near the door");

        assert_eq!(parsed.rack, None);
        assert_eq!(parsed.row, Some(4));
        assert_eq!(parsed.column, None);
        assert_eq!(parsed.cell(), None);
        assert_eq!(parsed.text, "row 4 near the door");
    }

    #[test]
    fn test_shorthand_is_not_guessed() {
        let parsed = parse_location("Rack A - B3");

        assert_eq!(parsed.rack, None);
        assert_eq!(parsed.row, None);
        assert_eq!(parsed.column, None);
    }

    #[test]
    fn test_keyword_without_number() {
        let parsed = parse_location("column row rack");
        assert_eq!(
            parsed,
            ParsedLocation {
                text: "column row rack".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let parsed = parse_location("row 2 row 5");
        assert_eq!(parsed.row, Some(2));
    }

    #[test]
    fn test_zero_row_is_unknown() {
        let parsed = parse_location("rack 1 row 0 col 1");
        assert_eq!(parsed.row, None);
        assert_eq!(parsed.rack.as_deref(), Some("1"));
    }

    #[test]
    fn test_leading_zero_rack_label() {
        assert_eq!(parse_location("rack 007").rack.as_deref(), Some("7"));
    }

    #[test]
    fn test_words_containing_keywords_are_ignored() {
        let parsed = parse_location("racks rowan 3 colour 4");
        assert_eq!(parsed.rack, None);
        assert_eq!(parsed.row, None);
        assert_eq!(parsed.column, None);
    }

    #[test]
    fn test_rack_from_code() {
        assert_eq!(
            rack_from_code(" RACK=Cellar North ").as_deref(),
            Some("Cellar North")
        );
        assert_eq!(rack_from_code("RACK="), None);
        assert_eq!(
            rack_from_code("https://example.com/form?prefill_Rack=R2&prefill_Row=A").as_deref(),
            Some("R2")
        );
        assert_eq!(rack_from_code("https://example.com/form?other=1"), None);
    }
}
