// ABOUTME: Summary command printing per-month traffic-light counts for a year
// ABOUTME: Includes each month's mean score and best day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use raceday_planner::config::PlannerConfig;
use raceday_planner::intelligence::summarize_year;
use raceday_planner::session::ScoringScope;

use crate::helpers::display::{display_summaries, print_json};
use crate::helpers::{month_start, run_plan, PlanArgs};
use crate::Result;

/// Summarize every month of `year`
pub async fn run(config: &PlannerConfig, plan: &PlanArgs, year: i32, json: bool) -> Result<()> {
    let result = run_plan(config, plan, month_start(year, 1)?, ScoringScope::Year(year)).await?;
    let summaries = summarize_year(&result.scores);

    if json {
        return print_json(&summaries);
    }
    display_summaries(&summaries);
    Ok(())
}
