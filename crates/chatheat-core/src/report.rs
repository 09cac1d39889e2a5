//! Everything a renderer needs for one upload, in one serializable value.

use serde::Serialize;

use crate::aggregator::{DailyCounts, HeatmapDay};
use crate::colors::{color_ranges, color_scheme, ColorRanges, ColorScheme, ColorSchemeId};
use crate::grid::{weekday_month_grid, GridRow};
use crate::providers::Provider;
use crate::years::{partition_years, YearStats, YearSubset};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearPanel {
    pub year: i32,
    pub days: Vec<HeatmapDay>,
    pub stats: YearStats,
    pub grid: Vec<GridRow>,
}

impl From<&YearSubset> for YearPanel {
    fn from(subset: &YearSubset) -> Self {
        Self {
            year: subset.year,
            days: subset.days.clone(),
            stats: subset.stats.clone(),
            grid: weekday_month_grid(&subset.days),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapReport {
    pub provider: Provider,
    pub scheme: &'static ColorScheme,
    pub color_ranges: ColorRanges,
    pub total_conversations: u64,
    pub days: Vec<HeatmapDay>,
    /// Previous year first; years without activity are left out.
    pub years: Vec<YearPanel>,
}

pub fn build_report(
    provider: Provider,
    counts: &DailyCounts,
    scheme: ColorSchemeId,
    current_year: i32,
) -> HeatmapReport {
    let partition = partition_years(counts, current_year);

    HeatmapReport {
        provider,
        scheme: color_scheme(scheme),
        color_ranges: color_ranges(scheme),
        total_conversations: counts.total(),
        days: counts.to_heatmap_days(),
        years: partition.panels().map(YearPanel::from).collect(),
    }
}
