//! Canonical decision record shared by search results and the dashboard.

use std::fmt;

use serde::{Serialize, Serializer};

/// Display text for a required field the backend did not supply.
pub const UNKNOWN: &str = "정보 없음";

/// Display text for a decision whose month or day is unknown.
pub const NO_DATE_INFO: &str = "날짜 정보 없음";

/// Top-level category used for sanction decisions.
pub const SANCTION_CATEGORY: &str = "제재";

/// Identity of a decision: `(decision_year, decision_id)`.
///
/// Ordering is year first, then id, which matches the backend's recency order
/// when reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DecisionKey {
    pub year: i32,
    pub id: i32,
}

impl DecisionKey {
    pub fn new(year: i32, id: i32) -> Self {
        Self { year, id }
    }
}

impl fmt::Display for DecisionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.id)
    }
}

/// Resolved decision date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecisionDate {
    /// `YYYY-MM-DD`, either supplied by the backend or composed from parts.
    Known(String),
    /// Month or day is zero, or there was nothing to compose a date from.
    Unknown,
}

impl DecisionDate {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(date) => date,
            Self::Unknown => NO_DATE_INFO,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for DecisionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for DecisionDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One regulatory decision as shown to the user.
///
/// Built by [`normalize`](crate::normalize::normalize) from a raw backend
/// record. Required fields are still optional here: older records may lack
/// them, and display code falls back to [`UNKNOWN`] via [`or_unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct DecisionRecord {
    pub key: DecisionKey,
    pub title: Option<String>,
    /// Top-level classification, e.g. 제재 / 인허가 / 정책.
    pub category_1: Option<String>,
    /// Sub-classification, e.g. 기관 / 임직원 / 전문가.
    pub category_2: Option<String>,
    pub stated_purpose: Option<String>,
    pub entity_name: Option<String>,
    pub industry_sector: Option<String>,
    pub action_type: Option<String>,
    /// Fine in won. Never negative; `Some(0)` renders like `None`.
    pub fine_amount: Option<u64>,
    pub violation_details: Option<String>,
    pub violation_summary: Option<String>,
    pub effective_date: Option<String>,
    pub decision_date: DecisionDate,
}

impl DecisionRecord {
    /// `"{year}-{id}"`, the number printed on the decision document.
    pub fn decision_number(&self) -> String {
        self.key.to_string()
    }

    /// Whether the backend supplied both identity fields.
    pub fn has_identity(&self) -> bool {
        self.key.year != 0 && self.key.id != 0
    }

    pub fn is_sanction(&self) -> bool {
        self.category_1.as_deref() == Some(SANCTION_CATEGORY)
    }

    /// Fine amount if it is worth displaying (present and non-zero).
    pub fn payable_fine(&self) -> Option<u64> {
        self.fine_amount.filter(|&amount| amount > 0)
    }
}

/// Text for a required field, or [`UNKNOWN`] when it is missing or blank.
pub fn or_unknown(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => UNKNOWN,
    }
}

/// Aggregate figures over a result set, shown above the result list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub total: usize,
    pub sanctions: usize,
    /// Records whose action type mentions 과징금 (administrative fine).
    pub fines: usize,
    pub total_fine_amount: u64,
}

impl ResultSummary {
    pub fn from_records(records: &[DecisionRecord]) -> Self {
        records.iter().fold(
            Self {
                total: records.len(),
                ..Self::default()
            },
            |mut acc, r| {
                if r.is_sanction() {
                    acc.sanctions += 1;
                }
                if r.action_type.as_deref().is_some_and(|t| t.contains("과징금")) {
                    acc.fines += 1;
                }
                acc.total_fine_amount = acc
                    .total_fine_amount
                    .saturating_add(r.fine_amount.unwrap_or(0));
                acc
            },
        )
    }
}
