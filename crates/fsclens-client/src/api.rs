//! The search API seam and its wire payloads.

use async_trait::async_trait;
use fsclens_core::SearchRequest;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// Backend operations the sessions depend on.
///
/// [`HttpSearchApi`](crate::HttpSearchApi) is the production implementation.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Send one search. The request variant selects the endpoint.
    async fn submit_search(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError>;

    /// Fetch the three payloads the dashboard is built from.
    async fn load_dashboard_summaries(&self) -> Result<DashboardSummaries, ClientError>;
}

/// Response envelope of both search endpoints.
///
/// Only `results` matters for rendering; the rest is advisory metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<Value>,
    #[serde(default)]
    pub total_found: Option<u64>,
    #[serde(default)]
    pub returned_count: Option<u64>,
    /// `nl2sql` or `advanced`.
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub query_type: Option<String>,
    #[serde(default)]
    pub sql_query: Option<String>,
    /// Set by the backend when query generation partially failed. Not a
    /// transport failure.
    #[serde(default)]
    pub error: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The decision list endpoint returns either a bare array or `{results}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DecisionList {
    Bare(Vec<Value>),
    Wrapped {
        #[serde(default, deserialize_with = "null_as_empty")]
        results: Vec<Value>,
    },
}

impl DecisionList {
    pub fn into_records(self) -> Vec<Value> {
        match self {
            Self::Bare(records) | Self::Wrapped { results: records } => records,
        }
    }
}

/// Raw dashboard inputs, fetched together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummaries {
    /// Decision statistics payload (summary, categories, trends).
    pub stats: Value,
    /// Most recent decisions from the decision list endpoint.
    pub recent_decisions: Vec<Value>,
    /// Search statistics payload (totals, distributions).
    pub search_stats: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_response_minimal() {
        let resp: SearchResponse = serde_json::from_value(json!({"results": []})).unwrap();
        assert!(resp.results.is_empty());
        assert_eq!(resp.total_found, None);
        assert_eq!(resp.error, None);
    }

    #[test]
    fn search_response_full() {
        let resp: SearchResponse = serde_json::from_value(json!({
            "query": "신한은행 과징금",
            "method": "nl2sql",
            "query_type": "specific_target",
            "sql_query": "SELECT 1",
            "results": [{"decision_year": 2025, "decision_id": 12}],
            "total_found": 1,
            "returned_count": 1
        }))
        .unwrap();
        assert_eq!(resp.results.len(), 1);
        assert_eq!(resp.method.as_deref(), Some("nl2sql"));
        assert_eq!(resp.total_found, Some(1));
    }

    #[test]
    fn search_response_null_results_and_error_note() {
        let resp: SearchResponse =
            serde_json::from_value(json!({"results": null, "error": "fallback used"})).unwrap();
        assert!(resp.results.is_empty());
        assert_eq!(resp.error.as_deref(), Some("fallback used"));
    }

    #[test]
    fn search_response_missing_results() {
        let resp: SearchResponse = serde_json::from_value(json!({"total_found": 0})).unwrap();
        assert!(resp.results.is_empty());
    }

    #[test]
    fn decision_list_shapes() {
        let bare: DecisionList = serde_json::from_value(json!([{"decision_id": 1}])).unwrap();
        assert_eq!(bare.into_records().len(), 1);

        let wrapped: DecisionList =
            serde_json::from_value(json!({"results": [{"decision_id": 1}, {"decision_id": 2}]}))
                .unwrap();
        assert_eq!(wrapped.into_records().len(), 2);

        let empty: DecisionList = serde_json::from_value(json!({})).unwrap();
        assert!(empty.into_records().is_empty());
    }
}
