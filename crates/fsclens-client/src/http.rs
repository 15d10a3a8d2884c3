//! HTTP client for the decision search backend.

use std::time::Duration;

use async_trait::async_trait;
use fsclens_core::{SearchFilters, SearchRequest};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::api::{DashboardSummaries, DecisionList, SearchApi, SearchResponse};
use crate::config::ClientConfig;
use crate::documents::DocumentLinks;
use crate::error::ClientError;

/// HTTP implementation of [`SearchApi`].
#[derive(Debug, Clone)]
pub struct HttpSearchApi {
    client: reqwest::Client,
    base_url: String,
    recent_limit: usize,
}

#[derive(Serialize)]
struct NaturalLanguageBody<'a> {
    query: &'a str,
    limit: u32,
}

#[derive(Serialize)]
struct AdvancedSearchBody<'a> {
    keyword: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    decision_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_1: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_2: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    industry_sector: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    action_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_fine_amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_fine_amount: Option<u64>,
    limit: u32,
}

impl<'a> AdvancedSearchBody<'a> {
    fn new(keyword: &'a str, filters: &'a SearchFilters, limit: u32) -> Self {
        Self {
            keyword,
            decision_year: filters.year,
            category_1: filters.category1.as_deref(),
            category_2: filters.category2.as_deref(),
            industry_sector: filters.industry.as_deref(),
            action_type: filters.action_type.as_deref(),
            min_fine_amount: filters.min_amount,
            max_fine_amount: filters.max_amount,
            limit,
        }
    }
}

impl HttpSearchApi {
    /// Create a client for the configured backend.
    ///
    /// `base_url` should include the API prefix, e.g.
    /// `http://localhost:8000/api/v1`.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            recent_limit: config.recent_limit,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Document link helper sharing this client's connection pool.
    pub fn documents(&self) -> DocumentLinks {
        DocumentLinks::new(self.client.clone(), self.base_url.clone())
    }

    /// `POST /search/nl2sql`.
    pub async fn natural_language_search(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<SearchResponse, ClientError> {
        let url = format!("{}/search/nl2sql", self.base_url);
        info!(url = %url, limit, "natural-language search");
        let resp: SearchResponse = self
            .post_json(&url, &NaturalLanguageBody { query, limit })
            .await?;
        log_search(&resp);
        Ok(resp)
    }

    /// `POST /search/advanced`. Unset filters are omitted from the body.
    pub async fn advanced_search(
        &self,
        keyword: &str,
        filters: &SearchFilters,
        limit: u32,
    ) -> Result<SearchResponse, ClientError> {
        let url = format!("{}/search/advanced", self.base_url);
        info!(url = %url, limit, "advanced search");
        let body = AdvancedSearchBody::new(keyword, filters, limit);
        let resp: SearchResponse = self.post_json(&url, &body).await?;
        log_search(&resp);
        Ok(resp)
    }

    /// `GET /decisions/stats/dashboard`.
    pub async fn decision_stats(&self) -> Result<Value, ClientError> {
        let url = format!("{}/decisions/stats/dashboard", self.base_url);
        self.get_json(&url).await
    }

    /// `GET /decisions/?limit=N`.
    pub async fn recent_decisions(&self, limit: usize) -> Result<Vec<Value>, ClientError> {
        let url = format!("{}/decisions/?limit={limit}", self.base_url);
        let list: DecisionList = self.get_json(&url).await?;
        Ok(list.into_records())
    }

    /// `GET /search/stats`.
    pub async fn search_stats(&self) -> Result<Value, ClientError> {
        let url = format!("{}/search/stats", self.base_url);
        self.get_json(&url).await
    }

    // ── Transport ──

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        debug!(url = %url, "GET");
        let resp = self.client.get(url).send().await?;
        read_json(resp).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self.client.post(url).json(body).send().await?;
        read_json(resp).await
    }
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::from_response(status, &body));
    }
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn log_search(resp: &SearchResponse) {
    info!(
        returned = resp.results.len(),
        total_found = resp.total_found,
        method = resp.method.as_deref().unwrap_or("-"),
        "search complete"
    );
    if let Some(note) = &resp.error {
        debug!(note = %note, "backend reported a search note");
    }
}

#[async_trait]
impl SearchApi for HttpSearchApi {
    async fn submit_search(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError> {
        match request {
            SearchRequest::NaturalLanguage { query, limit } => {
                self.natural_language_search(query, *limit).await
            }
            SearchRequest::Structured {
                keyword,
                filters,
                limit,
            } => self.advanced_search(keyword, filters, *limit).await,
        }
    }

    async fn load_dashboard_summaries(&self) -> Result<DashboardSummaries, ClientError> {
        info!(url = %self.base_url, "loading dashboard statistics");
        let (stats, recent_decisions, search_stats) = futures::try_join!(
            self.decision_stats(),
            self.recent_decisions(self.recent_limit),
            self.search_stats(),
        )?;
        info!(recent = recent_decisions.len(), "dashboard statistics loaded");
        Ok(DashboardSummaries {
            stats,
            recent_decisions,
            search_stats,
        })
    }
}
