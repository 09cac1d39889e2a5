//! Weekday x month layout of one year of day counts.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::HeatmapDay;

pub const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub x: &'static str,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub name: &'static str,
    pub data: Vec<GridCell>,
}

/// Seven rows (Sunday first), twelve month cells each. A cell holds the sum
/// of all days falling on that weekday in that month; several days share a
/// cell, so no single day's count overwrites the others.
pub fn weekday_month_grid(days: &[HeatmapDay]) -> Vec<GridRow> {
    let mut rows: Vec<GridRow> = WEEKDAYS
        .iter()
        .map(|&name| GridRow {
            name,
            data: MONTHS.iter().map(|&x| GridCell { x, y: 0 }).collect(),
        })
        .collect();

    for day in days {
        let date = match NaiveDate::parse_from_str(&day.day, "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                debug!(day = %day.day, "skipping malformed day key");
                continue;
            }
        };
        let weekday = date.weekday().num_days_from_sunday() as usize;
        let cell = &mut rows[weekday].data[date.month0() as usize];
        cell.y = cell.y.saturating_add(day.value);
    }

    rows
}
