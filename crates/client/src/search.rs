//! Two-phase wine search with last-request-wins cancellation.
//!
//! Phase one sends the search as a filter formula. The formula language copes
//! badly with accented or punctuated text, so when it returns nothing (or
//! fails) phase two fetches an unfiltered page and applies the same
//! conjunctive match locally, ignoring accents and case.
//!
//! Every call to [`SearchExecutor::search`] supersedes the previous one: the
//! earlier call's requests are cancelled and anything it still produces is
//! dropped before it reaches the [`ResultsView`].

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use cellar_core::record::{ItemSummary, Record};
use cellar_core::search::{filter_records, SearchTerms};
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::error::Result;
use crate::source::{ListQuery, RecordSource};

/// Which phase produced a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    /// Rows filtered by the service.
    Server,
    /// Rows filtered locally after the service returned nothing.
    Fallback,
}

/// What the results pane should currently show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResultsView {
    Empty,
    Results {
        phrase: String,
        phase: SearchPhase,
        items: Vec<ItemSummary>,
    },
    Error {
        phrase: String,
        message: String,
    },
}

/// How a search call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The phrase was blank; results were cleared without a request.
    Cleared,
    /// Results were published.
    Rendered { phase: SearchPhase, count: usize },
    /// A newer search took over; nothing was published.
    Superseded,
}

/// Runs searches against the wines table and publishes their results.
pub struct SearchExecutor<S> {
    source: Arc<S>,
    settings: Arc<Settings>,
    generation: AtomicU64,
    inflight: Mutex<CancellationToken>,
    view: watch::Sender<ResultsView>,
}

impl<S: RecordSource> SearchExecutor<S> {
    pub fn new(source: Arc<S>, settings: Arc<Settings>) -> Self {
        let (view, _) = watch::channel(ResultsView::Empty);
        Self {
            source,
            settings,
            generation: AtomicU64::new(0),
            inflight: Mutex::new(CancellationToken::new()),
            view,
        }
    }

    /// Receives every published view.
    pub fn subscribe(&self) -> watch::Receiver<ResultsView> {
        self.view.subscribe()
    }

    /// The currently published view.
    pub fn view(&self) -> ResultsView {
        self.view.borrow().clone()
    }

    /// Searches for `phrase`, superseding any search still in flight.
    ///
    /// Returns an error only when the fallback phase fails; the error is also
    /// published to the view. A superseded call returns
    /// [`SearchOutcome::Superseded`] and publishes nothing.
    pub async fn search(&self, phrase: &str) -> Result<SearchOutcome> {
        let (generation, token) = self.begin();
        self.execute(generation, token, phrase).await
    }

    /// Supersedes the search in flight now and returns the new search to be
    /// awaited or spawned.
    ///
    /// Ordering follows the calls to `start`, not the order in which the
    /// returned futures are first polled.
    pub fn start(
        self: &Arc<Self>,
        phrase: impl Into<String>,
    ) -> impl Future<Output = Result<SearchOutcome>> + Send + 'static
    where
        S: 'static,
    {
        let (generation, token) = self.begin();
        let executor = Arc::clone(self);
        let phrase = phrase.into();
        async move { executor.execute(generation, token, &phrase).await }
    }

    async fn execute(
        &self,
        generation: u64,
        token: CancellationToken,
        phrase: &str,
    ) -> Result<SearchOutcome> {
        let Some(terms) = SearchTerms::parse(phrase) else {
            self.publish(generation, ResultsView::Empty);
            return Ok(SearchOutcome::Cleared);
        };

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!(phrase = %terms.phrase(), "search superseded");
                return Ok(SearchOutcome::Superseded);
            }
            result = self.run(&terms) => result,
        };

        match result {
            Ok((phase, items)) => {
                let count = items.len();
                let view = ResultsView::Results {
                    phrase: terms.phrase(),
                    phase,
                    items,
                };
                if !self.publish(generation, view) {
                    return Ok(SearchOutcome::Superseded);
                }
                tracing::info!(phrase = %terms.phrase(), ?phase, count, "search finished");
                Ok(SearchOutcome::Rendered { phase, count })
            }
            Err(error) => {
                let view = ResultsView::Error {
                    phrase: terms.phrase(),
                    message: error.to_string(),
                };
                if !self.publish(generation, view) {
                    return Ok(SearchOutcome::Superseded);
                }
                Err(error)
            }
        }
    }

    /// Cancels the search in flight and starts a new generation.
    fn begin(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        inflight.cancel();
        *inflight = token.clone();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        (generation, token)
    }

    /// Publishes `view` if `generation` is still the latest search.
    fn publish(&self, generation: u64, view: ResultsView) -> bool {
        self.view.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = view;
            true
        })
    }

    async fn run(&self, terms: &SearchTerms) -> Result<(SearchPhase, Vec<ItemSummary>)> {
        match self.server_query(terms).await {
            Ok(records) if !records.is_empty() => {
                return Ok((SearchPhase::Server, self.summaries(&records)));
            }
            Ok(_) => tracing::debug!(phrase = %terms.phrase(), "no server matches, filtering locally"),
            Err(error) => {
                tracing::warn!(phrase = %terms.phrase(), %error, "server search failed, filtering locally")
            }
        }

        let records = self.fallback_query(terms).await?;
        Ok((SearchPhase::Fallback, self.summaries(&records)))
    }

    async fn server_query(&self, terms: &SearchTerms) -> Result<Vec<Record>> {
        let items = &self.settings.fields.items;
        let query = ListQuery::new()
            .filter(terms.formula(&items.search))
            .fields(items.display())
            .max_records(self.settings.limits.search);
        self.source
            .list_records(&self.settings.tables.wines, &query)
            .await
    }

    async fn fallback_query(&self, terms: &SearchTerms) -> Result<Vec<Record>> {
        let items = &self.settings.fields.items;
        let query = ListQuery::new()
            .fields(items.display())
            .max_records(self.settings.limits.fallback);
        let records = self
            .source
            .list_records(&self.settings.tables.wines, &query)
            .await?;
        let scanned = records.len();
        let matched = filter_records(terms, records, &items.search);
        tracing::debug!(scanned, matched = matched.len(), "local filter applied");
        Ok(matched)
    }

    fn summaries(&self, records: &[Record]) -> Vec<ItemSummary> {
        records
            .iter()
            .map(|r| ItemSummary::from_record(r, &self.settings.fields.items))
            .collect()
    }
}

impl ResultsView {
    /// Items on display, if any.
    pub fn items(&self) -> &[ItemSummary] {
        match self {
            ResultsView::Results { items, .. } => items,
            _ => &[],
        }
    }
}
