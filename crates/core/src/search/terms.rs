use crate::formula::search_formula;
use crate::text::fold;

/// Search terms extracted from a free-text phrase.
///
/// Holds the raw terms for the server-side formula and their folded forms
/// for the local predicate, so both sides always see the same term list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms {
    raw: Vec<String>,
    folded: Vec<String>,
}

impl SearchTerms {
    /// Splits a phrase on whitespace.
    ///
    /// Returns `None` when the phrase is empty after trimming: no query
    /// should run and results should be cleared.
    pub fn parse(phrase: &str) -> Option<Self> {
        let raw: Vec<String> = phrase.split_whitespace().map(String::from).collect();
        if raw.is_empty() {
            return None;
        }
        let folded = raw.iter().map(|t| fold(t)).collect();
        Some(Self { raw, folded })
    }

    /// Terms as typed.
    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    /// Terms folded for accent- and case-insensitive comparison.
    pub fn normalized(&self) -> &[String] {
        &self.folded
    }

    /// The server-side filter over the given searchable fields.
    pub fn formula<S: AsRef<str>>(&self, fields: &[S]) -> String {
        search_formula(&self.raw, fields)
    }

    /// The phrase re-joined with single spaces.
    pub fn phrase(&self) -> String {
        self.raw.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_whitespace() {
        let terms = SearchTerms::parse("  Pinot\tNoir \n 2019 ").unwrap();

        assert_eq!(terms.raw(), ["Pinot", "Noir", "2019"]);
        assert_eq!(terms.normalized(), ["pinot", "noir", "2019"]);
        assert_eq!(terms.phrase(), "Pinot Noir 2019");
    }

    #[test]
    fn test_parse_empty_phrase() {
        assert_eq!(SearchTerms::parse(""), None);
        assert_eq!(SearchTerms::parse("   \t\n"), None);
    }

    #[test]
    fn test_normalized_folds_accents() {
        let terms = SearchTerms::parse("Rosé Côte").unwrap();
        assert_eq!(terms.normalized(), ["rose", "cote"]);
    }

    #[test]
    fn test_formula_escapes_quotes() {
        let terms = SearchTerms::parse("winemaker's").unwrap();
        let formula = terms.formula(&["Name"]);

        assert!(formula.contains("'winemaker''s'"));
    }
}
