//! Fetching records by identifier.
//!
//! The service has no "get many by ID" call, so identifiers are resolved
//! through `RECORD_ID()` disjunctions, a bounded number per request.

use std::collections::HashMap;

use cellar_core::formula::record_id_formulas;
use cellar_core::record::{Record, RecordId};

use crate::error::Result;
use crate::source::{ListQuery, RecordSource};

/// Resolves `ids` in `table`, at most `chunk_size` identifiers per request.
///
/// Identifiers the service does not return (deleted upstream, say) are simply
/// absent from the map. A failed request fails the whole lookup.
pub async fn resolve_records<S, F>(
    source: &S,
    table: &str,
    ids: &[RecordId],
    fields: &[F],
    chunk_size: usize,
) -> Result<HashMap<RecordId, Record>>
where
    S: RecordSource + ?Sized,
    F: AsRef<str>,
{
    let mut resolved = HashMap::with_capacity(ids.len());

    for (count, formula) in record_id_formulas(ids, chunk_size) {
        let query = ListQuery::new()
            .filter(formula)
            .fields(fields.iter().map(|f| f.as_ref().to_string()))
            .max_records(count);
        let records = source.list_records(table, &query).await?;
        resolved.extend(records.into_iter().map(|r| (r.id.clone(), r)));
    }

    let missing = ids.iter().filter(|id| !resolved.contains_key(*id)).count();
    if missing > 0 {
        tracing::debug!(table, requested = ids.len(), missing, "unresolved identifiers");
    }

    Ok(resolved)
}
