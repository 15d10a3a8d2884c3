//! Turns user input into a [`SearchRequest`].
//!
//! Free text alone becomes a natural-language search. Free text plus at
//! least one structured filter becomes an advanced (structured) search.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Result limit sent with every search unless the caller overrides it.
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("search query is empty")]
    BlankQuery,
}

/// Optional structured constraints for an advanced search.
///
/// A value with every field `None` means "no filters".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub category1: Option<String>,
    pub category2: Option<String>,
    pub industry: Option<String>,
    pub action_type: Option<String>,
    pub year: Option<i32>,
    pub min_amount: Option<u64>,
    pub max_amount: Option<u64>,
}

impl SearchFilters {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.category1.is_none()
            && self.category2.is_none()
            && self.industry.is_none()
            && self.action_type.is_none()
            && self.year.is_none()
            && self.min_amount.is_none()
            && self.max_amount.is_none()
    }

    /// True when both bounds are set and `min_amount > max_amount`.
    ///
    /// The backend does not reject this; it simply matches nothing.
    pub fn has_inverted_amount_range(&self) -> bool {
        matches!((self.min_amount, self.max_amount), (Some(min), Some(max)) if min > max)
    }
}

/// The two request shapes the search API accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SearchRequest {
    NaturalLanguage {
        query: String,
        limit: u32,
    },
    Structured {
        keyword: String,
        filters: SearchFilters,
        limit: u32,
    },
}

impl SearchRequest {
    /// The user's free text, whichever variant this is.
    pub fn text(&self) -> &str {
        match self {
            Self::NaturalLanguage { query, .. } => query,
            Self::Structured { keyword, .. } => keyword,
        }
    }

    pub fn limit(&self) -> u32 {
        match self {
            Self::NaturalLanguage { limit, .. } | Self::Structured { limit, .. } => *limit,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured { .. })
    }
}

/// Builds [`SearchRequest`]s with a fixed result limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryBuilder {
    limit: u32,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: u32) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Build a request from raw input.
    ///
    /// The query text is kept verbatim (not trimmed). Filters are copied as
    /// given; an inverted amount range is logged but not rejected.
    pub fn build(
        &self,
        raw_query: &str,
        filters: Option<&SearchFilters>,
    ) -> Result<SearchRequest, QueryError> {
        if raw_query.trim().is_empty() {
            return Err(QueryError::BlankQuery);
        }

        match filters {
            Some(f) if !f.is_empty() => {
                if f.has_inverted_amount_range() {
                    warn!(
                        min_amount = ?f.min_amount,
                        max_amount = ?f.max_amount,
                        "minimum amount exceeds maximum amount"
                    );
                }
                Ok(SearchRequest::Structured {
                    keyword: raw_query.to_string(),
                    filters: f.clone(),
                    limit: self.limit,
                })
            }
            _ => Ok(SearchRequest::NaturalLanguage {
                query: raw_query.to_string(),
                limit: self.limit,
            }),
        }
    }
}
