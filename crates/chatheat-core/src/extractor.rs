//! Conversation timestamp extraction
//!
//! Reads the provider-specific creation-time field of one raw export record
//! and turns it into an instant.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::error::{HeatmapError, Result};
use crate::providers::{Provider, TimestampRule, TimestampUnit};

/// Extract the creation instant of one conversation record.
///
/// The provider decides which field is read. The value's own JSON type
/// decides how it is decoded: numbers are epoch seconds, strings are
/// ISO-8601 dates.
pub fn extract_timestamp(provider: Provider, record: &Value) -> Result<DateTime<Utc>> {
    let rule = provider
        .timestamp_rule()
        .ok_or(HeatmapError::UnsupportedModel(provider))?;

    if record.is_null() {
        return Err(invalid(rule, "record is null".to_string()));
    }

    let value = record
        .get(rule.field)
        .filter(|v| is_truthy(v))
        .ok_or(HeatmapError::InvalidRecordFormat { field: rule.field })?;

    decode(rule, value)
}

/// Parse an ISO-8601 date or date-time. Values without an offset are read as UTC.
pub fn parse_iso8601(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn decode(rule: TimestampRule, value: &Value) -> Result<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            note_form(rule, TimestampUnit::EpochSeconds, value);
            let seconds = n
                .as_f64()
                .ok_or_else(|| invalid(rule, format!("epoch value {} is not representable", n)))?;
            from_epoch_millis(rule, seconds * 1000.0)
        }
        Value::String(text) => {
            note_form(rule, TimestampUnit::Iso8601, value);
            parse_iso8601(text).ok_or_else(|| invalid(rule, format!("unparseable date `{}`", text)))
        }
        other => Err(invalid(rule, format!("expected a date, got {}", kind(other)))),
    }
}

fn note_form(rule: TimestampRule, stored: TimestampUnit, value: &Value) {
    if stored != rule.unit {
        debug!(
            field = rule.field,
            stored = kind(value),
            "timestamp not in the provider's usual form"
        );
    }
}

fn from_epoch_millis(rule: TimestampRule, millis: f64) -> Result<DateTime<Utc>> {
    if !millis.is_finite() {
        return Err(invalid(rule, format!("non-finite epoch value {}", millis)));
    }
    // Sub-millisecond precision is dropped, truncating toward zero.
    DateTime::<Utc>::from_timestamp_millis(millis.trunc() as i64)
        .ok_or_else(|| invalid(rule, format!("epoch value {} out of range", millis)))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn invalid(rule: TimestampRule, reason: String) -> HeatmapError {
    HeatmapError::InvalidTimestamp {
        field: rule.field,
        reason,
    }
}
