// ABOUTME: Score command scoring every day of a month or a year
// ABOUTME: Prints a table with reasons or the full day scores as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use raceday_planner::config::PlannerConfig;
use raceday_planner::session::ScoringScope;

use crate::helpers::display::{display_breakdown, display_scores, print_json};
use crate::helpers::{month_start, run_plan, PlanArgs};
use crate::Result;

/// Score a month, or the whole year when `month` is `None`
pub async fn run(
    config: &PlannerConfig,
    plan: &PlanArgs,
    year: i32,
    month: Option<u32>,
    json: bool,
) -> Result<()> {
    let (target, scope) = match month {
        Some(month) => (month_start(year, month)?, ScoringScope::TargetMonth),
        None => (month_start(year, 1)?, ScoringScope::Year(year)),
    };
    let result = run_plan(config, plan, target, scope).await?;

    if json {
        return print_json(&result.scores);
    }

    display_scores(&result.scores);
    if let [single] = result.scores.as_slice() {
        display_breakdown(single);
    }
    println!(
        "\n{} days scored, {} sample-year statistics{}",
        result.scores.len(),
        if result.weather.is_empty() { "without" } else { "with" },
        if result.cache_hit { " (cached)" } else { "" }
    );
    Ok(())
}
