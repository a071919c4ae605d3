//! Displayable text from heterogeneous field values.
//!
//! The tabular service hands back field values in many shapes depending on
//! how a column is configured: plain strings, numbers, arrays of strings
//! (lookups and multi-selects), or objects such as `{"value": ...}`,
//! `{"text": ...}` and attachment objects. [`TextField`] folds all of them
//! into one tree with a single conversion to display text.

use serde_json::Value;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Object keys that wrap a displayable value, probed in this order.
const WRAPPER_KEYS: [&str; 5] = ["value", "text", "content", "name", "url"];

/// A field value reduced to its displayable structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextField {
    Plain(String),
    List(Vec<TextField>),
    Wrapped(Box<TextField>),
}

impl TextField {
    /// An empty plain value.
    pub fn empty() -> Self {
        TextField::Plain(String::new())
    }

    /// Renders the value as display text.
    ///
    /// List elements are joined with `", "`, skipping blank elements.
    pub fn display(&self) -> String {
        match self {
            TextField::Plain(s) => s.trim().to_string(),
            TextField::List(items) => items
                .iter()
                .map(TextField::display)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            TextField::Wrapped(inner) => inner.display(),
        }
    }

    /// Returns true if the value renders to nothing.
    pub fn is_blank(&self) -> bool {
        self.display().is_empty()
    }
}

impl From<&Value> for TextField {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => TextField::empty(),
            Value::Bool(b) => TextField::Plain(b.to_string()),
            Value::Number(n) => TextField::Plain(n.to_string()),
            Value::String(s) => TextField::Plain(s.clone()),
            Value::Array(items) => TextField::List(items.iter().map(TextField::from).collect()),
            Value::Object(map) => WRAPPER_KEYS
                .iter()
                .find_map(|key| map.get(*key))
                .map(|inner| TextField::Wrapped(Box::new(TextField::from(inner))))
                .unwrap_or_else(|| TextField::List(Vec::new())),
        }
    }
}

/// Display text for an optional field value; missing fields render empty.
pub fn display_value(value: Option<&Value>) -> String {
    value.map(|v| TextField::from(v).display()).unwrap_or_default()
}

/// Folds text for accent- and case-insensitive comparison.
///
/// Applies canonical decomposition, drops combining marks, then lower-cases.
///
/// ```
/// use cellar_core::text::fold;
///
/// assert_eq!(fold("Rosé"), "rose");
/// assert_eq!(fold("GRÜNER Veltliner"), "gruner veltliner");
/// ```
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
