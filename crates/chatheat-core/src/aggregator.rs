//! Daily aggregation of conversation timestamps
//!
//! Aggregation is fail-fast: the first record that cannot be dated aborts the
//! whole run and no partial table is ever returned.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{HeatmapError, Result};
use crate::extractor::extract_timestamp;
use crate::providers::Provider;

/// One heatmap cell as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapDay {
    pub day: String,
    pub value: u32,
}

/// Sparse day -> conversation count table. Every present day has a count of
/// at least one; iteration is in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DailyCounts {
    days: BTreeMap<String, u32>,
}

impl DailyCounts {
    /// Count for a day; days never seen are zero.
    pub fn get(&self, day: &str) -> u32 {
        self.days.get(day).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.days.values().map(|&c| u64::from(c)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.days.iter().map(|(day, &count)| (day.as_str(), count))
    }

    pub fn to_heatmap_days(&self) -> Vec<HeatmapDay> {
        self.iter()
            .map(|(day, value)| HeatmapDay {
                day: day.to_string(),
                value,
            })
            .collect()
    }
}

impl FromIterator<(String, u32)> for DailyCounts {
    /// Repeated days are summed and zero counts dropped.
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        let mut days: BTreeMap<String, u32> = BTreeMap::new();
        for (day, count) in iter {
            if count == 0 {
                continue;
            }
            let entry = days.entry(day).or_insert(0);
            *entry = entry.saturating_add(count);
        }
        Self { days }
    }
}

/// UTC calendar date of an instant, as `YYYY-MM-DD`.
pub fn day_key(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Aggregate raw conversation records into per-day counts.
pub fn aggregate_by_date(provider: Provider, records: &[Value]) -> Result<DailyCounts> {
    if provider.timestamp_rule().is_none() {
        return Err(HeatmapError::UnsupportedModel(provider));
    }

    let counts = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            extract_timestamp(provider, record)
                .map(|instant| (day_key(&instant), 1))
                .map_err(|err| normalize_failure(index, err))
        })
        .collect::<Result<DailyCounts>>()?;

    debug!(
        provider = provider.as_str(),
        records = records.len(),
        days = counts.len(),
        "aggregated conversations by day"
    );

    Ok(counts)
}

/// Parse an uploaded payload into its array of raw conversation records.
pub fn parse_records(payload: &str) -> Result<Vec<Value>> {
    let mut bytes = payload.as_bytes().to_vec();
    simd_json::from_slice::<Vec<Value>>(&mut bytes).map_err(|err| {
        debug!(error = %err, "payload is not a JSON array");
        HeatmapError::processing(err)
    })
}

/// Full pipeline entry point: JSON payload in, unsorted-by-contract day cells out.
pub fn process_json(provider: Provider, payload: &str) -> Result<Vec<HeatmapDay>> {
    let records = parse_records(payload)?;
    Ok(aggregate_by_date(provider, &records)?.to_heatmap_days())
}

fn normalize_failure(index: usize, err: HeatmapError) -> HeatmapError {
    if err.is_structured() {
        debug!(index, error = %err, "rejected conversation record");
        return err;
    }
    warn!(index, error = %err, "unexpected failure while processing conversation data");
    HeatmapError::Processing { source: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claude_records(stamps: &[&str]) -> Vec<Value> {
        stamps
            .iter()
            .map(|s| json!({ "uuid": "u", "created_at": s, "chat_messages": [] }))
            .collect()
    }

    #[test]
    fn test_aggregate_by_date_empty() {
        let result = aggregate_by_date(Provider::Claude, &[]).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total(), 0);
    }

    #[test]
    fn test_aggregate_by_date_claude_scenario() {
        let records = claude_records(&[
            "2024-03-01T10:00:00Z",
            "2024-03-01T12:00:00Z",
            "2024-03-02T08:00:00Z",
        ]);

        let result = aggregate_by_date(Provider::Claude, &records).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.get("2024-03-01"), 2);
        assert_eq!(result.get("2024-03-02"), 1);
        assert_eq!(result.get("2024-03-03"), 0);
    }

    #[test]
    fn test_aggregate_by_date_sum_matches_record_count() {
        let records = claude_records(&[
            "2023-12-31T23:59:59Z",
            "2024-01-01T00:00:00Z",
            "2024-01-01T00:00:01Z",
            "2024-02-29T12:00:00Z",
            "2024-02-29T13:00:00+05:00",
        ]);

        let result = aggregate_by_date(Provider::Claude, &records).unwrap();
        assert_eq!(result.total(), records.len() as u64);
        assert_eq!(result.get("2023-12-31"), 1);
        assert_eq!(result.get("2024-01-01"), 2);
        assert_eq!(result.get("2024-02-29"), 2);
    }

    #[test]
    fn test_aggregate_by_date_uses_utc_day() {
        let records = claude_records(&["2024-03-01T22:30:00-05:00"]);
        let result = aggregate_by_date(Provider::Claude, &records).unwrap();
        assert_eq!(result.get("2024-03-02"), 1);
    }

    #[test]
    fn test_aggregate_by_date_chatgpt_epoch_forms_agree() {
        let records = vec![
            json!({ "title": "a", "create_time": 1700000000 }),
            json!({ "title": "b", "create_time": 1700000000.0 }),
        ];
        let result = aggregate_by_date(Provider::ChatGpt, &records).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("2023-11-14"), 2);
    }

    #[test]
    fn test_aggregate_by_date_fails_fast_on_missing_field() {
        let mut records = claude_records(&["2024-03-01T10:00:00Z", "2024-03-02T10:00:00Z"]);
        records.insert(1, json!({ "uuid": "broken" }));

        let err = aggregate_by_date(Provider::Claude, &records).unwrap_err();
        assert!(matches!(err, HeatmapError::InvalidRecordFormat { .. }));
    }

    #[test]
    fn test_aggregate_by_date_wraps_unstructured_failures() {
        let records = claude_records(&["2024-03-01T10:00:00Z", "not a date"]);

        let err = aggregate_by_date(Provider::Claude, &records).unwrap_err();
        assert!(matches!(err, HeatmapError::Processing { source: None }));
        assert_eq!(err.to_string(), "Error processing conversation data");
    }

    #[test]
    fn test_aggregate_by_date_null_record_is_processing_error() {
        let records = vec![json!({ "created_at": "2024-03-01T10:00:00Z" }), json!(null)];

        let err = aggregate_by_date(Provider::Claude, &records).unwrap_err();
        assert!(matches!(err, HeatmapError::Processing { source: None }));
    }

    #[test]
    fn test_aggregate_by_date_accepts_cross_type_timestamps() {
        let records = vec![
            json!({ "create_time": 1718452800 }),
            json!({ "create_time": "2024-06-15T18:00:00Z" }),
        ];

        let result = aggregate_by_date(Provider::ChatGpt, &records).unwrap();
        assert_eq!(result.get("2024-06-15"), 2);
    }

    #[test]
    fn test_aggregate_by_date_rejects_disabled_provider() {
        let records = claude_records(&["2024-03-01T10:00:00Z"]);
        for provider in [Provider::MistralAi, Provider::Gemini] {
            let err = aggregate_by_date(provider, &records).unwrap_err();
            assert!(matches!(err, HeatmapError::UnsupportedModel(_)));

            let err = aggregate_by_date(provider, &[]).unwrap_err();
            assert!(matches!(err, HeatmapError::UnsupportedModel(_)));
        }
    }

    #[test]
    fn test_aggregate_by_date_is_deterministic() {
        let records = claude_records(&["2024-05-05T05:05:05Z", "2024-05-06T06:06:06Z"]);
        let first = aggregate_by_date(Provider::Claude, &records).unwrap();
        let second = aggregate_by_date(Provider::Claude, &records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_process_json_claude_scenario() {
        let payload = r#"[
            {"created_at":"2024-03-01T10:00:00Z"},
            {"created_at":"2024-03-01T12:00:00Z"},
            {"created_at":"2024-03-02T08:00:00Z"}
        ]"#;

        let mut days = process_json(Provider::Claude, payload).unwrap();
        days.sort_by(|a, b| a.day.cmp(&b.day));
        assert_eq!(
            days,
            vec![
                HeatmapDay {
                    day: "2024-03-01".to_string(),
                    value: 2
                },
                HeatmapDay {
                    day: "2024-03-02".to_string(),
                    value: 1
                },
            ]
        );
    }

    #[test]
    fn test_process_json_empty_array() {
        let days = process_json(Provider::ChatGpt, "[]").unwrap();
        assert!(days.is_empty());
    }

    #[test]
    fn test_process_json_rejects_malformed_payload() {
        let err = process_json(Provider::Claude, "{\"created_at\": ").unwrap_err();
        assert!(matches!(err, HeatmapError::Processing { source: Some(_) }));
    }

    #[test]
    fn test_process_json_rejects_non_array() {
        let err = process_json(Provider::Claude, r#"{"created_at":"2024-03-01T10:00:00Z"}"#)
            .unwrap_err();
        assert!(matches!(err, HeatmapError::Processing { .. }));
    }

    #[test]
    fn test_process_json_tolerates_extra_fields() {
        let payload = r#"[{
            "id": "c1",
            "title": "Weekend plans",
            "create_time": 1718452800.123,
            "update_time": 1718456400.0,
            "mapping": {"root": {"parent": null, "children": []}}
        }]"#;
        let days = process_json(Provider::ChatGpt, payload).unwrap();
        assert_eq!(
            days,
            vec![HeatmapDay {
                day: "2024-06-15".to_string(),
                value: 1
            }]
        );
    }

    #[test]
    fn test_daily_counts_from_iter_sums_and_drops_zero() {
        let counts: DailyCounts = vec![
            ("2024-01-01".to_string(), 2),
            ("2024-01-02".to_string(), 0),
            ("2024-01-01".to_string(), 3),
        ]
        .into_iter()
        .collect();

        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("2024-01-01"), 5);
    }

    #[test]
    fn test_daily_counts_serializes_as_map() {
        let counts: DailyCounts = [("2024-01-02".to_string(), 1), ("2024-01-01".to_string(), 1)]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json, json!({ "2024-01-01": 1, "2024-01-02": 1 }));
    }

    #[test]
    fn test_day_key_format() {
        let instant = "2024-07-04T23:59:59Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(day_key(&instant), "2024-07-04");
    }
}
