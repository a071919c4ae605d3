use crate::record::Record;
use crate::text::fold;

use super::terms::SearchTerms;

/// Folded concatenation of a record's searchable fields, space separated.
///
/// Mirrors the server-side haystack so both paths search the same text.
pub fn haystack<S: AsRef<str>>(record: &Record, fields: &[S]) -> String {
    let joined = fields
        .iter()
        .map(|f| record.text(f.as_ref()))
        .collect::<Vec<_>>()
        .join(" ");
    fold(&joined)
}

/// True if every term occurs in the record's searchable text.
pub fn matches<S: AsRef<str>>(terms: &SearchTerms, record: &Record, fields: &[S]) -> bool {
    let text = haystack(record, fields);
    terms.normalized().iter().all(|term| text.contains(term.as_str()))
}

/// Keeps the records matching every term, preserving their order.
pub fn filter_records<S: AsRef<str>>(
    terms: &SearchTerms,
    records: Vec<Record>,
    fields: &[S],
) -> Vec<Record> {
    records
        .into_iter()
        .filter(|record| matches(terms, record, fields))
        .collect()
}
