//! Occupancy of the cellar grid, rebuilt from the inventory table.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use cellar_core::occupancy::{build_occupancy, linked_ids, ItemLabel, OccupancyIndex, Position};
use cellar_core::record::{Location, Placement, RecordId};

use crate::config::Settings;
use crate::error::Result;
use crate::lookup::resolve_records;
use crate::source::{ListQuery, RecordSource};

/// Holds the latest complete [`OccupancyIndex`].
///
/// Readers always see either the previous index or the new one in full; a
/// rebuild assembles its index privately and swaps it in at the end.
pub struct OccupancyService<S> {
    source: Arc<S>,
    settings: Arc<Settings>,
    current: RwLock<Arc<OccupancyIndex>>,
}

impl<S: RecordSource> OccupancyService<S> {
    pub fn new(source: Arc<S>, settings: Arc<Settings>) -> Self {
        Self {
            source,
            settings,
            current: RwLock::new(Arc::new(OccupancyIndex::empty())),
        }
    }

    /// The index currently published.
    pub fn snapshot(&self) -> Arc<OccupancyIndex> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cells holding `item` in the current index.
    pub fn locate(&self, item: &RecordId) -> Vec<Position> {
        self.snapshot().positions(item).to_vec()
    }

    /// Rebuilds the index from the inventory and publishes it.
    ///
    /// On failure the previous index stays in place.
    pub async fn rebuild(&self) -> Result<Arc<OccupancyIndex>> {
        let placements = self.load_placements().await?;
        let (location_ids, item_ids) = linked_ids(&placements);

        let (locations, items) = tokio::try_join!(
            self.resolve_locations(&location_ids),
            self.resolve_items(&item_ids),
        )?;

        let index = Arc::new(build_occupancy(&placements, &locations, &items));
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = index.clone();

        tracing::info!(
            placements = placements.len(),
            locations = locations.len(),
            wines = items.len(),
            "occupancy rebuilt"
        );
        Ok(index)
    }

    /// Occupied placements; rows that cannot be decoded are skipped.
    async fn load_placements(&self) -> Result<Vec<Placement>> {
        let fields = &self.settings.fields.placements;
        let query = ListQuery::new()
            .fields([&fields.item_link, &fields.location_link, &fields.quantity])
            .max_records(self.settings.limits.placements);
        let records = self
            .source
            .list_records(&self.settings.tables.inventory, &query)
            .await?;

        let mut placements = Vec::with_capacity(records.len());
        for record in &records {
            match Placement::from_record(record, fields) {
                Ok(placement) if !placement.is_vacant() => placements.push(placement),
                Ok(_) => {}
                Err(error) => tracing::warn!(%error, "skipping inventory row"),
            }
        }
        Ok(placements)
    }

    async fn resolve_locations(&self, ids: &[RecordId]) -> Result<HashMap<RecordId, Location>> {
        let fields = &self.settings.fields.locations;
        let records = resolve_records(
            self.source.as_ref(),
            &self.settings.tables.locations,
            ids,
            &[&fields.rack, &fields.row, &fields.column, &fields.name],
            self.settings.limits.lookup_chunk,
        )
        .await?;
        Ok(records
            .into_iter()
            .map(|(id, record)| (id, Location::from_record(&record, fields)))
            .collect())
    }

    async fn resolve_items(&self, ids: &[RecordId]) -> Result<HashMap<RecordId, ItemLabel>> {
        let fields = &self.settings.fields.items;
        let records = resolve_records(
            self.source.as_ref(),
            &self.settings.tables.wines,
            ids,
            &[&fields.name, &fields.vintage],
            self.settings.limits.lookup_chunk,
        )
        .await?;
        Ok(records
            .into_iter()
            .map(|(id, record)| (id, ItemLabel::from_record(&record, fields)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::source::mock::MockSource;
    use cellar_core::record::{CellCoord, Record};
    use serde_json::json;

    fn settings() -> Arc<Settings> {
        Arc::new(Settings::new("appCellar", "pat"))
    }

    fn placement(id: &str, wine: &str, location: &str, quantity: i64) -> Record {
        Record::new(id)
            .with_field("Wine (Link to Wines)", json!([wine]))
            .with_field("Location (Link to Locations)", json!([location]))
            .with_field("Quantity", json!(quantity))
    }

    /// Echoes the identifiers named in a `RECORD_ID()` formula.
    fn quoted_ids(query: &ListQuery) -> Vec<String> {
        query
            .formula
            .clone()
            .unwrap_or_default()
            .split("RECORD_ID()='")
            .skip(1)
            .filter_map(|rest| rest.split('\'').next().map(String::from))
            .collect()
    }

    fn cellar_source(placements: Vec<Record>) -> MockSource {
        MockSource::new()
            .on_list("Inventory", move |_: &ListQuery| Ok(placements.clone()))
            .on_list("Locations", |q: &ListQuery| {
                Ok(quoted_ids(q)
                    .into_iter()
                    .map(|id| {
                        let n: u32 = id.trim_start_matches("loc").parse().unwrap_or(1);
                        Record::new(id)
                            .with_field("Rack", json!("1"))
                            .with_field("Row", json!(n))
                            .with_field("Column", json!(n))
                    })
                    .collect())
            })
            .on_list("Wines", |q: &ListQuery| {
                Ok(quoted_ids(q)
                    .into_iter()
                    .map(|id| {
                        let name = format!("Wine {id}");
                        Record::new(id)
                            .with_field("Name", json!(name))
                            .with_field("Vintage", json!(2019))
                    })
                    .collect())
            })
    }

    #[tokio::test]
    async fn test_rebuild_indexes_cells_and_positions() {
        let source = Arc::new(cellar_source(vec![
            placement("inv1", "recA", "loc2", 3),
            placement("inv2", "recA", "loc4", 1),
            placement("inv3", "recB", "loc2", 2),
        ]));
        let service = OccupancyService::new(source, settings());

        let index = service.rebuild().await.unwrap();

        let cell = CellCoord::new("1", 2, 2);
        assert_eq!(index.cell(&cell).len(), 2);
        assert_eq!(index.total_quantity(&RecordId::from("recA")), 4);
        let positions = service.locate(&RecordId::from("recA"));
        assert_eq!(positions.len(), 2);
        assert_eq!(index.cell(&cell)[0].label.to_string(), "Wine recA 2019");
    }

    #[tokio::test]
    async fn test_zero_quantity_rows_never_mark_cells() {
        let source = Arc::new(cellar_source(vec![
            placement("inv1", "recA", "loc2", 0),
            placement("inv2", "recB", "loc3", 1),
        ]));
        let service = OccupancyService::new(source.clone(), settings());

        let index = service.rebuild().await.unwrap();

        assert!(!index.is_occupied(&CellCoord::new("1", 2, 2)));
        assert!(index.is_occupied(&CellCoord::new("1", 3, 3)));
        let location_queries = source.queries_for("Locations");
        assert_eq!(location_queries.len(), 1);
        assert!(!location_queries[0]
            .formula
            .as_deref()
            .unwrap_or_default()
            .contains("loc2"));
    }

    #[tokio::test]
    async fn test_lookups_are_chunked() {
        let rows: Vec<Record> = (0..120)
            .map(|i| placement(&format!("inv{i}"), &format!("rec{i}"), &format!("loc{i}"), 1))
            .collect();
        let source = Arc::new(cellar_source(rows));
        let service = OccupancyService::new(source.clone(), settings());

        service.rebuild().await.unwrap();

        for table in ["Locations", "Wines"] {
            let sizes: Vec<Option<usize>> = source
                .queries_for(table)
                .iter()
                .map(|q| q.max_records)
                .collect();
            assert_eq!(sizes, [Some(50), Some(50), Some(20)], "{table}");
        }
        let inventory = &source.queries_for("Inventory")[0];
        assert_eq!(inventory.max_records, Some(1000));
    }

    #[tokio::test]
    async fn test_failed_rebuild_keeps_previous_index() {
        let source = Arc::new(
            cellar_source(vec![placement("inv1", "recA", "loc2", 1)]).on_list(
                "Wines",
                |q: &ListQuery| {
                    if quoted_ids(q).is_empty() {
                        Ok(Vec::new())
                    } else {
                        Err(ClientError::ServerError {
                            status: 503,
                            message: "unavailable".to_string(),
                        })
                    }
                },
            ),
        );
        let service = OccupancyService::new(source, settings());
        let before = service.snapshot();

        assert!(service.rebuild().await.is_err());

        assert!(Arc::ptr_eq(&before, &service.snapshot()));
    }

    #[tokio::test]
    async fn test_readers_see_old_index_until_swap() {
        let source = Arc::new(cellar_source(vec![placement("inv1", "recA", "loc2", 1)]));
        source.hold("RECORD_ID()");
        let service = Arc::new(OccupancyService::new(source.clone(), settings()));

        let rebuild = tokio::spawn({
            let service = service.clone();
            async move { service.rebuild().await.map(|_| ()) }
        });
        while source.queries_for("Locations").is_empty() {
            tokio::task::yield_now().await;
        }

        assert!(!service.snapshot().is_occupied(&CellCoord::new("1", 2, 2)));
        source.release();
        rebuild.await.unwrap().unwrap();
        assert!(service.snapshot().is_occupied(&CellCoord::new("1", 2, 2)));
    }

    #[tokio::test]
    async fn test_undecodable_rows_are_skipped() {
        let source = Arc::new(cellar_source(vec![
            placement("inv1", "recA", "loc2", 1),
            Record::new("inv2")
                .with_field("Wine (Link to Wines)", json!(["recB"]))
                .with_field("Location (Link to Locations)", json!(["loc3"]))
                .with_field("Quantity", json!("a few")),
        ]));
        let service = OccupancyService::new(source, settings());

        let index = service.rebuild().await.unwrap();

        assert_eq!(index.inventory().len(), 1);
    }
}
