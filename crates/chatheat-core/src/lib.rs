#![deny(clippy::all)]

mod aggregator;
pub mod colors;
pub mod error;
mod extractor;
pub mod grid;
pub mod providers;
mod report;
mod years;

pub use aggregator::*;
pub use colors::{
    color_ranges, color_scheme, color_scheme_by_id, ColorRange, ColorRanges, ColorScheme,
    ColorSchemeId, COLOR_SCHEMES,
};
pub use error::{ErrorCode, ErrorReport, HeatmapError, Result, MAX_UPLOAD_BYTES};
pub use extractor::*;
pub use providers::{Provider, ProviderDescriptor, PROVIDERS};
pub use report::*;
pub use years::*;

pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Parse, aggregate and partition an uploaded export in one step.
pub fn generate_report(
    provider: Provider,
    payload: &str,
    scheme: ColorSchemeId,
    current_year: i32,
) -> Result<HeatmapReport> {
    let records = parse_records(payload)?;
    let counts = aggregate_by_date(provider, &records)?;
    Ok(build_report(provider, &counts, scheme, current_year))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_report_end_to_end() {
        let payload = r#"[
            {"title": "a", "create_time": 1704067200.0},
            {"title": "b", "create_time": 1704070800},
            {"title": "c", "create_time": 1672574400.25}
        ]"#;

        let report =
            generate_report(Provider::ChatGpt, payload, ColorSchemeId::CosmicTwilight, 2024)
                .unwrap();

        assert_eq!(report.total_conversations, 3);
        assert_eq!(report.years.len(), 2);
        assert_eq!(report.years[0].days[0].day, "2023-01-01");
        assert_eq!(
            report.years[1].stats.most_active_day,
            Some(HeatmapDay {
                day: "2024-01-01".to_string(),
                value: 2
            })
        );
    }

    #[test]
    fn test_generate_report_propagates_failures() {
        let err = generate_report(
            Provider::Gemini,
            "[]",
            ColorSchemeId::CosmicTwilight,
            2024,
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidModel);
    }

    #[test]
    fn test_version_matches_manifest() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
