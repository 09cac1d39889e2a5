//! Terminal rendering of a heatmap report.

use chatheat_core::grid::{GridRow, MONTHS};
use chatheat_core::{ColorRanges, HeatmapReport, YearPanel, YearStats};
use chrono::NaiveDate;
use colored::{ColoredString, Colorize, CustomColor};

use crate::settings::Appearance;

const CELL: &str = "   ";

pub fn print_report(report: &HeatmapReport, appearance: Appearance) {
    println!();
    println!(
        "  {}",
        heading(
            &format!("Your {} usage", report.provider.display_name()),
            appearance
        )
    );
    println!(
        "  {}",
        muted(&format!("Theme: {}", report.scheme.name), appearance)
    );

    if report.days.is_empty() {
        println!("\n  {}", muted("No conversations found in this export.", appearance));
        println!();
        return;
    }

    if report.years.is_empty() {
        println!(
            "\n  {}",
            muted(
                &format!(
                    "{} conversations found, none in the current or previous year.",
                    report.total_conversations
                ),
                appearance
            )
        );
        println!();
        return;
    }

    for panel in &report.years {
        print_panel(panel, &report.color_ranges, appearance);
    }

    print_legend(&report.color_ranges, appearance);
    println!();
}

pub fn panel_title(year: i32) -> String {
    format!("{} Activity", year)
}

pub fn panel_subtitle(stats: &YearStats) -> String {
    match &stats.most_active_day {
        Some(day) => format!(
            "Total conversations: {} - Most active day: {} ({} conversations)",
            stats.total_conversations,
            format_day(&day.day),
            day.value
        ),
        None => format!("Total conversations: {}", stats.total_conversations),
    }
}

fn format_day(day: &str) -> String {
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| day.to_string())
}

fn print_panel(panel: &YearPanel, ranges: &ColorRanges, appearance: Appearance) {
    println!();
    println!("  {}", heading(&panel_title(panel.year), appearance));
    println!("  {}", muted(&panel_subtitle(&panel.stats), appearance));
    println!();

    let months: String = MONTHS.iter().map(|m| format!("{:<4}", m)).collect();
    println!("  {:<5}{}", "", muted(&months, appearance));

    for row in &panel.grid {
        print_row(row, ranges, appearance);
    }
}

fn print_row(row: &GridRow, ranges: &ColorRanges, appearance: Appearance) {
    let label: String = row.name.chars().take(3).collect();
    let cells: Vec<String> = row
        .data
        .iter()
        .map(|cell| swatch(ranges.color_for(cell.y)).to_string())
        .collect();
    println!("  {:<5}{}", muted(&label, appearance), cells.join(" "));
}

fn print_legend(ranges: &ColorRanges, appearance: Appearance) {
    let swatches: Vec<String> = ranges
        .ranges
        .iter()
        .map(|range| swatch(range.color).to_string())
        .collect();
    println!();
    println!(
        "  {} {} {}",
        muted("Less", appearance),
        swatches.join(" "),
        muted("More", appearance)
    );
}

fn swatch(hex: &str) -> ColoredString {
    match swatch_color(hex) {
        Some(color) => CELL.on_custom_color(color),
        None => CELL.normal(),
    }
}

fn heading(text: &str, appearance: Appearance) -> ColoredString {
    match appearance {
        Appearance::Dark => text.white().bold(),
        Appearance::Light => text.black().bold(),
    }
}

fn muted(text: &str, appearance: Appearance) -> ColoredString {
    match appearance {
        Appearance::Dark => text.bright_black(),
        Appearance::Light => text.normal(),
    }
}

/// Scheme colors are `#rrggbb`; anything else renders uncolored.
pub fn swatch_color(hex: &str) -> Option<CustomColor> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = u32::from_str_radix(digits, 16).ok()?;
    Some(CustomColor {
        r: (rgb >> 16) as u8,
        g: (rgb >> 8) as u8,
        b: rgb as u8,
    })
}
