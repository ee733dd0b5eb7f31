// ABOUTME: Output formatting helpers for raceday-cli
// ABOUTME: Renders scored days and month summaries as tables or JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use raceday_planner::errors::AppResult;
use raceday_planner::intelligence::MonthSummary;
use raceday_planner::models::DayScore;
use serde::Serialize;

/// Print any serializable value as pretty JSON
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print one line per scored day with its reasons
pub fn display_scores<'a>(scores: impl IntoIterator<Item = &'a DayScore>) {
    println!("{:<10}  {:<3}  {:>5}  {:<6}  Reasons", "Date", "Day", "Score", "Status");
    println!("{}", "=".repeat(80));
    for day in scores {
        let reasons = if day.reasons.is_empty() {
            "-".to_owned()
        } else {
            day.reasons.join("; ")
        };
        println!(
            "{:<10}  {:<3}  {:>5}  {:<6}  {reasons}",
            day.date,
            day.date.format("%a"),
            day.score,
            day.status.to_string(),
        );
    }
}

/// Print the breakdown of a single day
pub fn display_breakdown(day: &DayScore) {
    println!("\n{} scored {} ({})", day.date, day.score, day.status);
    for entry in &day.breakdown {
        println!("   {:<28} {:>+5}", entry.label, entry.delta);
    }
    if let Some(hours) = day.details.daylight_hours {
        println!("   Daylight: {hours:.1} h");
    }
    if let Some(weather) = &day.details.weather {
        println!(
            "   Weather: {:.1}/{:.1} °C, rain {:.0}%, mud {:.1} ({} years)",
            weather.avg_max_temp,
            weather.avg_min_temp,
            weather.rain_probability,
            weather.mud_index,
            weather.sample_years
        );
    }
}

/// Print per-month status counts
pub fn display_summaries(summaries: &[MonthSummary]) {
    println!(
        "{:<7}  {:>5}  {:>6}  {:>3}  {:>6}  Best",
        "Month", "Green", "Yellow", "Red", "Mean"
    );
    println!("{}", "=".repeat(60));
    for month in summaries {
        let best = month
            .best
            .map_or_else(|| "-".to_owned(), |(date, score)| format!("{date} ({score})"));
        println!(
            "{}-{:02}  {:>5}  {:>6}  {:>3}  {:>6.1}  {best}",
            month.year, month.month, month.green, month.yellow, month.red, month.mean_score
        );
    }
}
