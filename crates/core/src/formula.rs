//! Filter expressions in the tabular service's formula language.
//!
//! Pure string builders. User input only ever lands inside single-quoted
//! literals produced by [`quote`], so no term can terminate a literal early.

use crate::record::RecordId;

/// Maximum number of identifiers per `RECORD_ID()` disjunction.
///
/// Larger expressions run into the service's formula size limit.
pub const LOOKUP_CHUNK_SIZE: usize = 50;

/// Escapes text for use inside a single-quoted literal by doubling quotes.
///
/// ```
/// use cellar_core::formula::escape_literal;
///
/// assert_eq!(escape_literal("winemaker's"), "winemaker''s");
/// ```
pub fn escape_literal(text: &str) -> String {
    text.replace('\'', "''")
}

/// A complete single-quoted literal.
pub fn quote(text: &str) -> String {
    format!("'{}'", escape_literal(text))
}

/// A field reference, `{Name}`.
///
/// Names are checked by [`crate::record::FieldMap::validate`] before they get
/// here; a closing brace would end the reference.
pub fn field_ref(name: &str) -> String {
    format!("{{{}}}", name)
}

/// Lower-cased concatenation of the given fields separated by spaces.
///
/// Blank fields concatenate as empty strings, so the expression never fails
/// on missing values.
pub fn search_haystack<S: AsRef<str>>(fields: &[S]) -> String {
    let joined = fields
        .iter()
        .map(|f| field_ref(f.as_ref()))
        .collect::<Vec<_>>()
        .join("&' '&");
    format!("LOWER({})", joined)
}

/// Conjunctive substring filter: every term must occur in the concatenation
/// of `fields`.
///
/// Terms are lower-cased to match the `LOWER()` haystack. Each `FIND` is
/// wrapped in `IFERROR(.., 0)` so a failing operand counts as "no match" for
/// that term instead of aborting the whole filter.
///
/// ```
/// use cellar_core::formula::search_formula;
///
/// let formula = search_formula(&["Pinot"], &["Name", "Grape"]);
/// assert_eq!(
///     formula,
///     "AND(IFERROR(FIND('pinot', LOWER({Name}&' '&{Grape})), 0) > 0)"
/// );
/// ```
pub fn search_formula<T: AsRef<str>, S: AsRef<str>>(terms: &[T], fields: &[S]) -> String {
    let haystack = search_haystack(fields);
    let clauses = terms
        .iter()
        .map(|term| {
            format!(
                "IFERROR(FIND({}, {}), 0) > 0",
                quote(&term.as_ref().to_lowercase()),
                haystack
            )
        })
        .collect::<Vec<_>>();
    format!("AND({})", clauses.join(", "))
}

/// Disjunction of `RECORD_ID()` equalities matching any of `ids`.
pub fn record_id_formula(ids: &[RecordId]) -> String {
    let clauses = ids
        .iter()
        .map(|id| format!("RECORD_ID()={}", quote(id.as_str())))
        .collect::<Vec<_>>();
    format!("OR({})", clauses.join(","))
}

/// Splits `ids` into lookup formulas of at most `chunk_size` identifiers.
///
/// A `chunk_size` of zero is treated as [`LOOKUP_CHUNK_SIZE`].
pub fn record_id_formulas(ids: &[RecordId], chunk_size: usize) -> Vec<(usize, String)> {
    let size = if chunk_size == 0 {
        LOOKUP_CHUNK_SIZE
    } else {
        chunk_size
    };
    ids.chunks(size)
        .map(|chunk| (chunk.len(), record_id_formula(chunk)))
        .collect()
}

/// Text comparison of a field against a literal, tolerant of numeric columns.
pub fn field_equals(field: &str, value: &str) -> String {
    format!("{}&''={}", field_ref(field), quote(value))
}

/// Conjunction of the given clauses; a single clause is returned unwrapped.
pub fn all_of(clauses: &[String]) -> String {
    match clauses {
        [single] => single.clone(),
        _ => format!("AND({})", clauses.join(", ")),
    }
}
