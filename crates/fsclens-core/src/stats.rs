//! Dashboard aggregation from backend summary payloads.
//!
//! Percentages are always recomputed here from the counts in each list.
//! Any percentage the backend sends along is ignored. Each entry is rounded
//! independently (half-up), so a list may sum to 99 or 101.
//!
//! When the backend omits a distribution, or sends something that is not an
//! array, a fixed label list with zero counts is used instead and
//! [`Distribution::from_backend`] is `false`.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::decision::{DecisionRecord, UNKNOWN};
use crate::normalize::{int_value, json_kind, normalize};

/// Number of recent decisions shown on the dashboard.
pub const DEFAULT_RECENT_CAP: usize = 5;

/// Labels used when the backend omits the violation distribution.
pub const DEFAULT_VIOLATION_TYPES: &[&str] = &[
    "회계처리기준 위반",
    "독립성 위반",
    "내부통제 위반",
    "준법감시 소홀",
    "기타",
];

/// Labels used when the backend omits the industry distribution.
pub const DEFAULT_INDUSTRY_SECTORS: &[&str] = &["금융투자", "회계/감사", "은행", "보험"];

/// Labels used when the backend omits both sanction-type sources.
pub const DEFAULT_SANCTION_TYPES: &[&str] = &["제재", "인허가", "정책"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub decisions: u64,
    pub actions: u64,
    pub laws: u64,
    pub total_fine_amount: u64,
}

/// One labelled count with its share of the list total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: u64,
    /// `round(100 * count / total)`, or 0 when the total is 0.
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub buckets: Vec<Bucket>,
    pub total: u64,
    /// `true` when the list came from the backend, `false` for the default list.
    pub from_backend: bool,
}

impl Distribution {
    /// Build a distribution from `(label, count)` pairs, computing percentages.
    pub fn from_counts(entries: Vec<(String, u64)>, from_backend: bool) -> Self {
        let total = entries
            .iter()
            .fold(0u64, |acc, (_, count)| acc.saturating_add(*count));
        let buckets = entries
            .into_iter()
            .map(|(label, count)| Bucket {
                percentage: percentage(count, total),
                label,
                count,
            })
            .collect();
        Self {
            buckets,
            total,
            from_backend,
        }
    }

    fn fallback(labels: &[&str]) -> Self {
        Self::from_counts(labels.iter().map(|l| (l.to_string(), 0)).collect(), false)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of the rounded percentages. May differ from 100 by rounding.
    pub fn percentage_sum(&self) -> u32 {
        self.buckets.iter().map(|b| b.percentage).sum()
    }
}

/// `round(100 * count / total)` with half-up rounding; 0 when `total == 0`.
pub fn percentage(count: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let count = u128::from(count);
    let total = u128::from(total);
    ((200 * count + total) / (2 * total)) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub count: u64,
}

/// Presentation-ready dashboard statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub totals: Totals,
    /// Most recent first, at most the aggregator's cap.
    pub recent_decisions: Vec<DecisionRecord>,
    pub violation_stats: Distribution,
    pub industry_stats: Distribution,
    pub sanction_types: Distribution,
    pub monthly_trends: Vec<MonthlyTrend>,
}

/// Computes [`DashboardSnapshot`]s. Pure: same input, same output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsAggregator {
    recent_cap: usize,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self {
            recent_cap: DEFAULT_RECENT_CAP,
        }
    }
}

impl StatsAggregator {
    pub fn new(recent_cap: usize) -> Self {
        Self { recent_cap }
    }

    pub fn recent_cap(&self) -> usize {
        self.recent_cap
    }

    /// Aggregate the decision-stats payload and the search-stats payload.
    ///
    /// Recent decisions come from `stats.recent_decisions`.
    pub fn aggregate(&self, stats: &Value, search_stats: &Value) -> DashboardSnapshot {
        self.aggregate_with_recent(stats, search_stats, &[])
    }

    /// Like [`aggregate`](Self::aggregate), but a non-empty `recent` list
    /// (from the decision list endpoint) takes precedence over the one
    /// embedded in `stats`.
    pub fn aggregate_with_recent(
        &self,
        stats: &Value,
        search_stats: &Value,
        recent: &[Value],
    ) -> DashboardSnapshot {
        let embedded;
        let recent_raw = if recent.is_empty() {
            embedded = array_at(stats, "recent_decisions").unwrap_or_default();
            embedded.as_slice()
        } else {
            recent
        };
        let mut recent_decisions = normalize(recent_raw);
        recent_decisions.truncate(self.recent_cap);

        let sanction_source = array_at(search_stats, "action_type_distribution")
            .map(|entries| (entries, &["type", "name", "action_type"][..]))
            .or_else(|| {
                array_at(&stats["categories"], "category_1")
                    .map(|entries| (entries, &["name", "category", "type"][..]))
            });
        let sanction_types = match sanction_source {
            Some((entries, label_keys)) => {
                Distribution::from_counts(parse_entries(&entries, label_keys), true)
            }
            None => Distribution::fallback(DEFAULT_SANCTION_TYPES),
        };

        DashboardSnapshot {
            totals: totals(stats, search_stats),
            recent_decisions,
            violation_stats: distribution(
                search_stats,
                "violation_distribution",
                &["type", "name", "violation_type"],
                DEFAULT_VIOLATION_TYPES,
            ),
            industry_stats: distribution(
                search_stats,
                "industry_distribution",
                &["sector", "name", "industry_sector"],
                DEFAULT_INDUSTRY_SECTORS,
            ),
            sanction_types,
            monthly_trends: monthly_trends(stats),
        }
    }
}

// ── Payload readers ──

fn totals(stats: &Value, search_stats: &Value) -> Totals {
    if let Some(summary) = stats.get("summary").filter(|v| v.is_object()) {
        return Totals {
            decisions: count_at(summary, "total_decisions"),
            actions: count_at(summary, "total_actions"),
            laws: count_at(summary, "total_laws"),
            total_fine_amount: count_at(summary, "total_fine_amount"),
        };
    }
    if let Some(legacy) = search_stats.get("totals").filter(|v| v.is_object()) {
        return Totals {
            decisions: count_at(legacy, "decisions"),
            actions: count_at(legacy, "actions"),
            laws: count_at(legacy, "laws"),
            total_fine_amount: 0,
        };
    }
    Totals::default()
}

fn distribution(
    payload: &Value,
    field: &str,
    label_keys: &[&str],
    defaults: &[&str],
) -> Distribution {
    match array_at(payload, field) {
        Some(entries) => Distribution::from_counts(parse_entries(&entries, label_keys), true),
        None => Distribution::fallback(defaults),
    }
}

fn monthly_trends(stats: &Value) -> Vec<MonthlyTrend> {
    array_at(stats, "monthly_trends")
        .unwrap_or_default()
        .iter()
        .map(|entry| MonthlyTrend {
            year: int_value(&entry["year"])
                .and_then(|n| i32::try_from(n).ok())
                .unwrap_or(0),
            month: int_value(&entry["month"])
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0),
            count: count_at(entry, "count"),
        })
        .collect()
}

/// The array at `payload[field]`, or `None` if absent or not an array.
fn array_at(payload: &Value, field: &str) -> Option<Vec<Value>> {
    match payload.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(items.clone()),
        Some(other) => {
            warn!(field, kind = json_kind(other), "expected array, using default");
            None
        }
    }
}

fn parse_entries(entries: &[Value], label_keys: &[&str]) -> Vec<(String, u64)> {
    entries
        .iter()
        .map(|entry| {
            let label = label_keys
                .iter()
                .find_map(|key| entry.get(*key).and_then(Value::as_str))
                .unwrap_or(UNKNOWN)
                .to_string();
            let count = ["count", "value"]
                .iter()
                .find(|key| entry.get(**key).is_some_and(|v| !v.is_null()))
                .map(|key| count_at(entry, key))
                .unwrap_or(0);
            (label, count)
        })
        .collect()
}

/// Non-negative integer at `obj[key]`; anything else counts as 0.
fn count_at(obj: &Value, key: &str) -> u64 {
    match obj.get(key) {
        None | Some(Value::Null) => 0,
        Some(value) => match int_value(value) {
            Some(n) if n >= 0 => n as u64,
            _ => {
                warn!(field = key, "invalid count treated as 0");
                0
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dashboard_stats() -> Value {
        json!({
            "summary": {
                "total_decisions": 58,
                "total_actions": 59,
                "total_laws": 30,
                "total_fine_amount": 7463000000u64
            },
            "recent_decisions": [
                {"decision_year": 2025, "decision_id": 200, "title": "공인회계사 징계의결안",
                 "category_1": "제재", "category_2": "전문가", "decision_date": "2025-01-15"},
                {"decision_year": 2025, "decision_id": 195, "title": "정기검사 결과 조치안",
                 "category_1": "제재", "category_2": "기관", "decision_date": null}
            ],
            "monthly_trends": [
                {"year": 2025, "month": 1, "count": 10},
                {"year": 2024, "month": 12, "count": 4}
            ],
            "categories": {
                "category_1": [
                    {"name": "제재", "count": 40},
                    {"name": "인허가", "count": 15},
                    {"name": "정책", "count": 3}
                ]
            }
        })
    }

    fn search_stats() -> Value {
        json!({
            "totals": {"decisions": 1, "actions": 1, "laws": 1},
            "industry_distribution": [
                {"sector": "금융투자", "count": 8, "percentage": 99},
                {"sector": "회계/감사", "count": 4},
                {"sector": "은행", "count": 2},
                {"sector": "보험", "count": 1}
            ]
        })
    }

    #[test]
    fn thirty_twenty_ten() {
        let d = Distribution::from_counts(
            vec![("a".into(), 30), ("b".into(), 20), ("c".into(), 10)],
            true,
        );
        let pcts: Vec<u32> = d.buckets.iter().map(|b| b.percentage).collect();
        assert_eq!(d.total, 60);
        assert_eq!(pcts, vec![50, 33, 17]);
        assert_eq!(d.percentage_sum(), 100);
    }

    #[test]
    fn rounding_drift_is_accepted() {
        // 1/3 each rounds to 33: the list sums to 99.
        let d = Distribution::from_counts(
            vec![("a".into(), 1), ("b".into(), 1), ("c".into(), 1)],
            true,
        );
        assert_eq!(d.percentage_sum(), 99);

        // 1/6 rounds to 17 twice and 2/3 to 67: the list sums to 101.
        let d = Distribution::from_counts(
            vec![("a".into(), 1), ("b".into(), 1), ("c".into(), 4)],
            true,
        );
        assert_eq!(d.percentage_sum(), 101);
    }

    #[test]
    fn zero_total_yields_zero_percentages() {
        let d = Distribution::from_counts(vec![("a".into(), 0), ("b".into(), 0)], true);
        assert_eq!(d.total, 0);
        assert!(d.buckets.iter().all(|b| b.percentage == 0));
        assert_eq!(percentage(5, 0), 0);
    }

    #[test]
    fn half_rounds_up() {
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(1, 200), 1); // 0.5
        assert_eq!(percentage(1, 201), 0); // 0.497...
    }

    #[test]
    fn totals_from_summary() {
        let snap = StatsAggregator::default().aggregate(&dashboard_stats(), &search_stats());
        assert_eq!(
            snap.totals,
            Totals {
                decisions: 58,
                actions: 59,
                laws: 30,
                total_fine_amount: 7_463_000_000,
            }
        );
    }

    #[test]
    fn totals_fall_back_to_legacy_shape() {
        let snap = StatsAggregator::default().aggregate(&Value::Null, &search_stats());
        assert_eq!(snap.totals.decisions, 1);
        assert_eq!(snap.totals.total_fine_amount, 0);
    }

    #[test]
    fn totals_absent_are_zero() {
        let snap = StatsAggregator::default().aggregate(&json!({}), &json!({}));
        assert_eq!(snap.totals, Totals::default());

        let snap = StatsAggregator::default()
            .aggregate(&json!({"summary": {"total_decisions": 3}}), &json!({}));
        assert_eq!(snap.totals.decisions, 3);
        assert_eq!(snap.totals.laws, 0);
    }

    #[test]
    fn industry_percentages_recomputed() {
        let snap = StatsAggregator::default().aggregate(&dashboard_stats(), &search_stats());
        let industry = &snap.industry_stats;
        assert!(industry.from_backend);
        assert_eq!(industry.total, 15);
        let pcts: Vec<u32> = industry.buckets.iter().map(|b| b.percentage).collect();
        assert_eq!(pcts, vec![53, 27, 13, 7]);
        assert_eq!(industry.buckets[0].label, "금융투자");
    }

    #[test]
    fn sanction_types_from_categories() {
        let snap = StatsAggregator::default().aggregate(&dashboard_stats(), &search_stats());
        let s = &snap.sanction_types;
        assert!(s.from_backend);
        assert_eq!(s.buckets.len(), 3);
        assert_eq!(s.buckets[0].label, "제재");
        assert_eq!(s.buckets[0].count, 40);
        assert_eq!(s.buckets[0].percentage, 69);
    }

    #[test]
    fn sanction_types_from_legacy_category_key() {
        let stats = json!({
            "categories": {
                "category_1": [
                    {"category": "제재", "count": 30},
                    {"category": "인허가", "count": 20},
                    {"category": "정책", "count": 10}
                ]
            }
        });
        let snap = StatsAggregator::default().aggregate(&stats, &json!({}));
        let buckets: Vec<(&str, u32)> = snap
            .sanction_types
            .buckets
            .iter()
            .map(|b| (b.label.as_str(), b.percentage))
            .collect();
        assert_eq!(buckets, vec![("제재", 50), ("인허가", 33), ("정책", 17)]);
    }

    #[test]
    fn sanction_types_prefer_action_type_distribution() {
        let search = json!({
            "action_type_distribution": [
                {"type": "과징금", "value": 3},
                {"type": "과태료", "value": 1}
            ]
        });
        let snap = StatsAggregator::default().aggregate(&dashboard_stats(), &search);
        let labels: Vec<&str> = snap
            .sanction_types
            .buckets
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(labels, vec!["과징금", "과태료"]);
        assert_eq!(snap.sanction_types.buckets[0].percentage, 75);
    }

    #[test]
    fn omitted_distributions_use_defaults() {
        let snap = StatsAggregator::default().aggregate(&json!({}), &json!({}));
        assert!(!snap.violation_stats.from_backend);
        assert_eq!(snap.violation_stats.buckets.len(), DEFAULT_VIOLATION_TYPES.len());
        assert!(!snap.industry_stats.from_backend);
        assert!(!snap.sanction_types.from_backend);
        assert_eq!(snap.sanction_types.buckets[0].label, "제재");
        assert!(snap.violation_stats.buckets.iter().all(|b| b.count == 0 && b.percentage == 0));
    }

    #[test]
    fn real_empty_list_is_distinguishable() {
        let snap = StatsAggregator::default()
            .aggregate(&json!({}), &json!({"industry_distribution": []}));
        assert!(snap.industry_stats.from_backend);
        assert!(snap.industry_stats.is_empty());
        assert_eq!(snap.industry_stats.total, 0);
    }

    #[test]
    fn malformed_distribution_uses_default() {
        let snap = StatsAggregator::default()
            .aggregate(&json!({}), &json!({"industry_distribution": {"은행": 3}}));
        assert!(!snap.industry_stats.from_backend);
        assert_eq!(snap.industry_stats.buckets.len(), DEFAULT_INDUSTRY_SECTORS.len());
    }

    #[test]
    fn malformed_entries_count_as_zero() {
        let snap = StatsAggregator::default().aggregate(
            &json!({}),
            &json!({"violation_distribution": [
                {"type": "독립성 위반", "count": "3"},
                {"count": 1},
                {"type": "기타", "count": -4},
                "junk"
            ]}),
        );
        let v = &snap.violation_stats;
        assert_eq!(v.buckets.len(), 4);
        assert_eq!(v.buckets[0].count, 3);
        assert_eq!(v.buckets[1].label, UNKNOWN);
        assert_eq!(v.buckets[2].count, 0);
        assert_eq!(v.total, 4);
        assert_eq!(v.buckets[0].percentage, 75);
    }

    #[test]
    fn recent_decisions_capped_and_ordered() {
        let recent: Vec<Value> = (0..8)
            .map(|i| json!({"decision_year": 2025, "decision_id": 200 - i}))
            .collect();
        let snap = StatsAggregator::default().aggregate_with_recent(
            &dashboard_stats(),
            &json!({}),
            &recent,
        );
        let ids: Vec<i32> = snap.recent_decisions.iter().map(|r| r.key.id).collect();
        assert_eq!(ids, vec![200, 199, 198, 197, 196]);
    }

    #[test]
    fn recent_decisions_fall_back_to_embedded() {
        let snap = StatsAggregator::new(1).aggregate(&dashboard_stats(), &json!({}));
        assert_eq!(snap.recent_decisions.len(), 1);
        assert_eq!(snap.recent_decisions[0].key.id, 200);
        assert_eq!(snap.recent_decisions[0].decision_date.as_str(), "2025-01-15");
    }

    #[test]
    fn monthly_trends_copied_in_order() {
        let snap = StatsAggregator::default().aggregate(&dashboard_stats(), &json!({}));
        assert_eq!(
            snap.monthly_trends,
            vec![
                MonthlyTrend {
                    year: 2025,
                    month: 1,
                    count: 10,
                },
                MonthlyTrend {
                    year: 2024,
                    month: 12,
                    count: 4,
                },
            ]
        );
    }

    #[test]
    fn aggregation_is_deterministic() {
        let agg = StatsAggregator::default();
        let a = agg.aggregate(&dashboard_stats(), &search_stats());
        let b = agg.aggregate(&dashboard_stats(), &search_stats());
        assert_eq!(a, b);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every percentage is within 0..=100 and the sum drifts by at most
        /// half a point per bucket.
        #[test]
        fn percentages_bounded(counts in proptest::collection::vec(0u64..1_000_000, 1..12)) {
            let n = counts.len() as u32;
            let d = Distribution::from_counts(
                counts.into_iter().enumerate().map(|(i, c)| (i.to_string(), c)).collect(),
                true,
            );
            prop_assert!(d.buckets.iter().all(|b| b.percentage <= 100));
            if d.total == 0 {
                prop_assert_eq!(d.percentage_sum(), 0);
            } else {
                let sum = d.percentage_sum() as i64;
                prop_assert!((sum - 100).abs() <= (n as i64 + 1) / 2);
            }
        }
    }
}
