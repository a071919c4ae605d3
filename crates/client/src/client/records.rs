//! Record list and create operations.

use async_trait::async_trait;
use cellar_core::record::{CreateRecords, Fields, ListResponse, NewRecord, Record};

use super::TableClient;
use crate::error::Result;
use crate::source::{ListQuery, RecordSource};

/// Largest page the service returns per list request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Largest number of records the service accepts per create request.
pub const MAX_CREATE_BATCH: usize = 10;

impl ListQuery {
    /// Query string for one page request.
    fn to_params(&self, page_size: usize, offset: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(formula) = &self.formula {
            params.push(("filterByFormula", formula.clone()));
        }
        if let Some(max) = self.max_records {
            params.push(("maxRecords", max.to_string()));
        }
        params.push(("pageSize", page_size.to_string()));
        for field in &self.fields {
            params.push(("fields[]", field.clone()));
        }
        if let Some(offset) = offset {
            params.push(("offset", offset.to_string()));
        }
        params
    }
}

impl TableClient {
    /// List records of a table, following page cursors until the query's
    /// row cap is reached or the service reports no further pages.
    pub async fn list_records(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>> {
        if query.max_records == Some(0) {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let remaining = query
                .max_records
                .map(|max| max.saturating_sub(records.len()))
                .unwrap_or(MAX_PAGE_SIZE);
            let page_size = remaining.clamp(1, MAX_PAGE_SIZE);

            let response = self
                .client
                .get(self.table_url(table))
                .bearer_auth(&self.token)
                .query(&query.to_params(page_size, offset.as_deref()))
                .send()
                .await?;
            let page: ListResponse = self.handle_response(response, table).await?;

            let received = page.records.len();
            records.extend(page.records);
            tracing::debug!(table, received, total = records.len(), "fetched page");

            if let Some(max) = query.max_records {
                if records.len() >= max {
                    records.truncate(max);
                    break;
                }
            }
            match page.offset {
                Some(next) if received > 0 => offset = Some(next),
                _ => break,
            }
        }

        Ok(records)
    }

    /// Create records in a table, batched to the service's request limit.
    ///
    /// Values are sent with `typecast` so link fields accept record IDs and
    /// select fields accept new options.
    pub async fn create_records(&self, table: &str, records: Vec<Fields>) -> Result<Vec<Record>> {
        let mut created = Vec::with_capacity(records.len());

        for batch in records.chunks(MAX_CREATE_BATCH) {
            let body = CreateRecords {
                records: batch
                    .iter()
                    .map(|fields| NewRecord {
                        fields: fields.clone(),
                    })
                    .collect(),
                typecast: true,
            };
            let response = self
                .client
                .post(self.table_url(table))
                .bearer_auth(&self.token)
                .json(&body)
                .send()
                .await?;
            let page: ListResponse = self.handle_response(response, table).await?;
            created.extend(page.records);
        }

        tracing::debug!(table, created = created.len(), "created records");
        Ok(created)
    }
}

#[async_trait]
impl RecordSource for TableClient {
    async fn list_records(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>> {
        TableClient::list_records(self, table, query).await
    }

    async fn create_records(&self, table: &str, records: Vec<Fields>) -> Result<Vec<Record>> {
        TableClient::create_records(self, table, records).await
    }
}
