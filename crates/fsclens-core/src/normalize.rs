//! Maps raw backend records to [`DecisionRecord`]s.
//!
//! The backend schema has changed over time and different endpoints return
//! different subsets of fields, so this layer is permissive: every raw record
//! yields exactly one `DecisionRecord`, in the order received. Missing fields
//! become `None`; fields of the wrong type are logged and dropped.
//!
//! # Accepted shapes
//!
//! - Keys in `snake_case` (`decision_year`) or `camelCase` (`decisionYear`).
//! - Integers as JSON numbers, integral floats, or numeric strings.
//!
//! # Date resolution
//!
//! 1. `decision_month == 0` or `decision_day == 0` → [`DecisionDate::Unknown`].
//! 2. A non-empty `decision_date` string → used verbatim.
//! 3. Year, month and day all present → `YYYY-MM-DD`, zero-padded.
//! 4. Otherwise → [`DecisionDate::Unknown`].

use serde_json::{Map, Value};
use tracing::warn;

use crate::decision::{DecisionDate, DecisionKey, DecisionRecord};

/// Normalise a backend result array, preserving order.
pub fn normalize(raw: &[Value]) -> Vec<DecisionRecord> {
    raw.iter().map(normalize_record).collect()
}

/// Normalise a single raw record. Never fails.
pub fn normalize_record(raw: &Value) -> DecisionRecord {
    let empty = Map::new();
    let obj = match raw.as_object() {
        Some(obj) => obj,
        None => {
            warn!(kind = json_kind(raw), "decision record is not an object");
            &empty
        }
    };

    let year = int_field(obj, "decision_year", "decisionYear");
    let month = int_field(obj, "decision_month", "decisionMonth");
    let day = int_field(obj, "decision_day", "decisionDay");
    let date_text = text_field(obj, "decision_date", "decisionDate");

    DecisionRecord {
        key: DecisionKey {
            year: identity_part(year, "decision_year"),
            id: identity_part(int_field(obj, "decision_id", "decisionId"), "decision_id"),
        },
        title: text_field(obj, "title", "title"),
        category_1: text_field(obj, "category_1", "category1"),
        category_2: text_field(obj, "category_2", "category2"),
        stated_purpose: text_field(obj, "stated_purpose", "statedPurpose"),
        entity_name: text_field(obj, "entity_name", "entityName"),
        industry_sector: text_field(obj, "industry_sector", "industrySector"),
        action_type: text_field(obj, "action_type", "actionType"),
        fine_amount: amount_field(obj, "fine_amount", "fineAmount"),
        violation_details: text_field(obj, "violation_details", "violationDetails"),
        violation_summary: text_field(obj, "violation_summary", "violationSummary"),
        effective_date: text_field(obj, "effective_date", "effectiveDate"),
        decision_date: resolve_date(year, month, day, date_text.as_deref()),
    }
}

/// Apply the date resolution policy described in the module docs.
pub fn resolve_date(
    year: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
    decision_date: Option<&str>,
) -> DecisionDate {
    if month == Some(0) || day == Some(0) {
        return DecisionDate::Unknown;
    }
    if let Some(date) = decision_date
        && !date.trim().is_empty()
    {
        return DecisionDate::Known(date.to_string());
    }
    match (year, month, day) {
        (Some(y), Some(m), Some(d)) => DecisionDate::Known(format!("{y:04}-{m:02}-{d:02}")),
        _ => DecisionDate::Unknown,
    }
}

// ── Field access ──

fn lookup<'a>(obj: &'a Map<String, Value>, snake: &str, camel: &str) -> Option<&'a Value> {
    obj.get(snake)
        .or_else(|| obj.get(camel))
        .filter(|v| !v.is_null())
}

fn text_field(obj: &Map<String, Value>, snake: &str, camel: &str) -> Option<String> {
    match lookup(obj, snake, camel)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => {
            warn!(field = snake, kind = json_kind(other), "expected text field");
            None
        }
    }
}

fn int_field(obj: &Map<String, Value>, snake: &str, camel: &str) -> Option<i64> {
    let value = lookup(obj, snake, camel)?;
    let parsed = int_value(value);
    if parsed.is_none() {
        warn!(field = snake, kind = json_kind(value), "expected integer field");
    }
    parsed
}

fn amount_field(obj: &Map<String, Value>, snake: &str, camel: &str) -> Option<u64> {
    let value = lookup(obj, snake, camel)?;
    match int_value(value) {
        Some(n) if n >= 0 => Some(n as u64),
        Some(n) => {
            warn!(field = snake, value = n, "negative amount dropped");
            None
        }
        None => {
            warn!(field = snake, kind = json_kind(value), "non-integral amount dropped");
            None
        }
    }
}

fn identity_part(value: Option<i64>, field: &str) -> i32 {
    match value {
        Some(n) => i32::try_from(n).unwrap_or_else(|_| {
            warn!(field, value = n, "identity out of range");
            0
        }),
        None => 0,
    }
}

/// Coerce a JSON value to an integer: numbers, integral floats, numeric strings.
pub(crate) fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn raw_record() -> impl Strategy<Value = Value> {
        (
            proptest::option::of(1990i64..2030),
            proptest::option::of(0i64..400),
            proptest::option::of(0i64..13),
            proptest::option::of(0i64..32),
            proptest::option::of("[가-힣 ]{0,20}"),
            proptest::option::of(-10i64..10_000_000_000),
        )
            .prop_map(|(year, id, month, day, title, fine)| {
                json!({
                    "decision_year": year,
                    "decision_id": id,
                    "decision_month": month,
                    "decision_day": day,
                    "title": title,
                    "fine_amount": fine,
                })
            })
    }

    proptest! {
        /// No hidden state: the same input always normalises the same way.
        #[test]
        fn normalize_is_deterministic(raw in proptest::collection::vec(raw_record(), 0..20)) {
            let first = normalize(&raw);
            let second = normalize(&raw);
            prop_assert_eq!(first.len(), raw.len());
            prop_assert_eq!(first, second);
        }

        /// A zero month or day always yields the sentinel date.
        #[test]
        fn zero_month_or_day_unknown(year in 1990i64..2030, month in 0i64..13, day in 0i64..32) {
            let date = resolve_date(Some(year), Some(month), Some(day), None);
            if month == 0 || day == 0 {
                prop_assert_eq!(date, DecisionDate::Unknown);
            } else {
                prop_assert_eq!(date.as_str().len(), 10);
            }
        }
    }
}
