//! The seam between the cellar logic and the tabular service.

use std::sync::Arc;

use async_trait::async_trait;
use cellar_core::record::{Fields, Record};

use crate::error::Result;

/// Parameters of a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Server-side filter formula.
    pub formula: Option<String>,
    /// Fields to return; empty returns all fields.
    pub fields: Vec<String>,
    /// Total row cap across pages.
    pub max_records: Option<usize>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_records(mut self, max: usize) -> Self {
        self.max_records = Some(max);
        self
    }
}

/// Read and create access to the tables of one base.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Lists records of a table matching the query.
    async fn list_records(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>>;

    /// Creates records and returns them as stored.
    async fn create_records(&self, table: &str, records: Vec<Fields>) -> Result<Vec<Record>>;
}

#[async_trait]
impl<T: RecordSource + ?Sized> RecordSource for Arc<T> {
    async fn list_records(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>> {
        (**self).list_records(table, query).await
    }

    async fn create_records(&self, table: &str, records: Vec<Fields>) -> Result<Vec<Record>> {
        (**self).create_records(table, records).await
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scriptable in-memory source shared by the service tests.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use tokio::sync::Notify;

    use super::*;
    use crate::error::ClientError;

    type Responder = Box<dyn Fn(&ListQuery) -> Result<Vec<Record>> + Send + Sync>;

    /// In-memory source answering list calls per table through responders.
    ///
    /// Calls whose formula contains a held marker block until released.
    #[derive(Default)]
    pub struct MockSource {
        responders: Mutex<HashMap<String, Responder>>,
        held: Mutex<Vec<String>>,
        release: Notify,
        pub list_calls: AtomicUsize,
        pub queries: Mutex<Vec<(String, ListQuery)>>,
        pub created: Mutex<Vec<(String, Fields)>>,
    }

    impl MockSource {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answers list calls on `table` with `responder`.
        pub fn on_list<F>(self, table: &str, responder: F) -> Self
        where
            F: Fn(&ListQuery) -> Result<Vec<Record>> + Send + Sync + 'static,
        {
            self.responders
                .lock()
                .unwrap()
                .insert(table.to_string(), Box::new(responder));
            self
        }

        /// Blocks list calls whose formula contains `marker` until [`Self::release`].
        pub fn hold(&self, marker: &str) {
            self.held.lock().unwrap().push(marker.to_string());
        }

        pub fn release(&self) {
            self.held.lock().unwrap().clear();
            self.release.notify_waiters();
        }

        pub fn calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        /// Queries sent to `table`, in call order.
        pub fn queries_for(&self, table: &str) -> Vec<ListQuery> {
            self.queries
                .lock()
                .unwrap()
                .iter()
                .filter(|(t, _)| t == table)
                .map(|(_, q)| q.clone())
                .collect()
        }

        fn is_held(&self, query: &ListQuery) -> bool {
            let formula = query.formula.as_deref().unwrap_or_default();
            self.held
                .lock()
                .unwrap()
                .iter()
                .any(|marker| formula.contains(marker.as_str()))
        }
    }

    #[async_trait]
    impl RecordSource for MockSource {
        async fn list_records(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.queries
                .lock()
                .unwrap()
                .push((table.to_string(), query.clone()));

            while self.is_held(query) {
                let released = self.release.notified();
                if !self.is_held(query) {
                    break;
                }
                released.await;
            }

            let responders = self.responders.lock().unwrap();
            match responders.get(table) {
                Some(responder) => responder(query),
                None => Err(ClientError::NotFound {
                    resource: format!("table '{}'", table),
                }),
            }
        }

        async fn create_records(&self, table: &str, records: Vec<Fields>) -> Result<Vec<Record>> {
            let mut created = self.created.lock().unwrap();
            let mut stored = Vec::with_capacity(records.len());
            for fields in records {
                let id = format!("recNew{}", created.len() + 1);
                created.push((table.to_string(), fields.clone()));
                stored.push(Record {
                    id: id.as_str().into(),
                    created_time: None,
                    fields,
                });
            }
            Ok(stored)
        }
    }
}
