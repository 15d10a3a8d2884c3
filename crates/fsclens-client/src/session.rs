//! Search and dashboard sessions.
//!
//! A session owns one [`RequestLifecycle`] and turns backend outcomes into
//! presentation state. Starting and finishing are split so the host can run
//! several requests concurrently: only the most recently started one is
//! applied.

use fsclens_core::{
    DashboardSnapshot, DecisionRecord, Failure, QueryBuilder, QueryError, RequestLifecycle,
    RequestState, RequestToken, ResultSummary, SearchFilters, SearchRequest, StatsAggregator,
    normalize,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::{DashboardSummaries, SearchApi, SearchResponse};
use crate::error::ClientError;

/// A search that has been issued but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub token: RequestToken,
    pub request: SearchRequest,
}

/// Payload of a successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// The query text as submitted.
    pub query: String,
    pub records: Vec<DecisionRecord>,
    pub summary: ResultSummary,
    /// Backend-reported match count, which may exceed `records.len()`.
    pub total_found: Option<u64>,
    /// Advisory message from the backend, if any.
    pub note: Option<String>,
}

impl SearchResults {
    fn from_response(query: &str, response: SearchResponse) -> Self {
        let records = normalize(&response.results);
        Self {
            query: query.to_string(),
            summary: ResultSummary::from_records(&records),
            records,
            total_found: response.total_found,
            note: response.error,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Search ──

#[derive(Debug, Default)]
pub struct SearchSession {
    builder: QueryBuilder,
    lifecycle: RequestLifecycle<SearchResults>,
}

impl SearchSession {
    pub fn new(builder: QueryBuilder) -> Self {
        Self {
            builder,
            lifecycle: RequestLifecycle::new(),
        }
    }

    pub fn state(&self) -> &RequestState<SearchResults> {
        self.lifecycle.state()
    }

    /// Validate input and move to `Loading`.
    ///
    /// Blank input moves to `Failed` with a validation error instead, and
    /// anything in flight becomes stale.
    pub fn start(
        &mut self,
        raw_query: &str,
        filters: Option<&SearchFilters>,
    ) -> Result<SearchTicket, QueryError> {
        match self.builder.build(raw_query, filters) {
            Ok(request) => {
                let token = self.lifecycle.begin();
                info!(%token, structured = request.is_structured(), "search started");
                Ok(SearchTicket { token, request })
            }
            Err(e) => {
                let token = self.lifecycle.reject(Failure::from(e.clone()));
                warn!(%token, error = %e, "search rejected");
                Err(e)
            }
        }
    }

    /// Apply the outcome for `ticket`. Returns `false` if it was stale.
    pub fn finish(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<SearchResponse, ClientError>,
    ) -> bool {
        let outcome = match outcome {
            Ok(response) => Ok(SearchResults::from_response(ticket.request.text(), response)),
            Err(e) => {
                warn!(token = %ticket.token, error = %e, "search failed");
                Err(Failure::from(e))
            }
        };
        self.lifecycle.complete(ticket.token, outcome)
    }

    /// Start, submit and finish one search.
    pub async fn run<A: SearchApi + ?Sized>(
        &mut self,
        api: &A,
        raw_query: &str,
        filters: Option<&SearchFilters>,
    ) -> &RequestState<SearchResults> {
        if let Ok(ticket) = self.start(raw_query, filters) {
            let outcome = api.submit_search(&ticket.request).await;
            self.finish(&ticket, outcome);
        }
        self.state()
    }

    /// Back to `Idle`; in-flight searches become stale.
    pub fn clear(&mut self) {
        self.lifecycle.reset();
    }
}

// ── Dashboard ──

#[derive(Debug, Default)]
pub struct DashboardSession {
    aggregator: StatsAggregator,
    lifecycle: RequestLifecycle<DashboardSnapshot>,
}

impl DashboardSession {
    pub fn new(aggregator: StatsAggregator) -> Self {
        Self {
            aggregator,
            lifecycle: RequestLifecycle::new(),
        }
    }

    pub fn state(&self) -> &RequestState<DashboardSnapshot> {
        self.lifecycle.state()
    }

    pub fn start(&mut self) -> RequestToken {
        let token = self.lifecycle.begin();
        info!(%token, "dashboard load started");
        token
    }

    /// Aggregate and apply the outcome for `token`. Returns `false` if it
    /// was stale.
    pub fn finish(
        &mut self,
        token: RequestToken,
        outcome: Result<DashboardSummaries, ClientError>,
    ) -> bool {
        let outcome = match outcome {
            Ok(raw) => Ok(self.aggregator.aggregate_with_recent(
                &raw.stats,
                &raw.search_stats,
                &raw.recent_decisions,
            )),
            Err(e) => {
                warn!(%token, error = %e, "dashboard load failed");
                Err(Failure::from(e))
            }
        };
        self.lifecycle.complete(token, outcome)
    }

    pub async fn run<A: SearchApi + ?Sized>(
        &mut self,
        api: &A,
    ) -> &RequestState<DashboardSnapshot> {
        let token = self.start();
        let outcome = api.load_dashboard_summaries().await;
        self.finish(token, outcome);
        self.state()
    }
}
