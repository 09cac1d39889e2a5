//! Year partitioning and per-year summary statistics

use chrono::{Datelike, Local};
use serde::Serialize;

use crate::aggregator::{DailyCounts, HeatmapDay};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearStats {
    pub total_conversations: u64,
    pub most_active_day: Option<HeatmapDay>,
}

/// The days of one calendar year together with their stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSubset {
    pub year: i32,
    pub days: Vec<HeatmapDay>,
    pub stats: YearStats,
}

impl YearSubset {
    pub fn of(days: &[HeatmapDay], year: i32) -> Self {
        let days = filter_year(days, year);
        let stats = year_stats(&days);
        Self { year, days, stats }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearPartition {
    pub previous: YearSubset,
    pub current: YearSubset,
}

impl YearPartition {
    /// Non-empty subsets, previous year first.
    pub fn panels(&self) -> impl Iterator<Item = &YearSubset> {
        [&self.previous, &self.current]
            .into_iter()
            .filter(|subset| !subset.is_empty())
    }
}

/// Local calendar year right now.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Days whose key starts with the four-digit `year`.
pub fn filter_year(days: &[HeatmapDay], year: i32) -> Vec<HeatmapDay> {
    let prefix = format!("{:04}", year);
    days.iter()
        .filter(|d| d.day.get(..4) == Some(prefix.as_str()))
        .cloned()
        .collect()
}

/// Total and most active day. On a tie the earliest entry in `days` wins.
pub fn year_stats(days: &[HeatmapDay]) -> YearStats {
    let total_conversations = days.iter().map(|d| u64::from(d.value)).sum();

    let most_active_day = days
        .iter()
        .fold(None, |best: Option<&HeatmapDay>, day| match best {
            Some(max) if day.value <= max.value => Some(max),
            _ => Some(day),
        })
        .cloned();

    YearStats {
        total_conversations,
        most_active_day,
    }
}

/// Split a day table into the previous and the current calendar year.
pub fn partition_years(counts: &DailyCounts, current_year: i32) -> YearPartition {
    let days = counts.to_heatmap_days();
    YearPartition {
        previous: YearSubset::of(&days, current_year - 1),
        current: YearSubset::of(&days, current_year),
    }
}
