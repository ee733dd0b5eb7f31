// ABOUTME: Best command listing the top-scoring days of a year
// ABOUTME: Ties are listed in date order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use raceday_planner::config::PlannerConfig;
use raceday_planner::intelligence::rank_days;
use raceday_planner::session::ScoringScope;

use crate::helpers::display::{display_breakdown, display_scores, print_json};
use crate::helpers::{month_start, run_plan, PlanArgs};
use crate::Result;

/// List the `top` best days of `year`
pub async fn run(
    config: &PlannerConfig,
    plan: &PlanArgs,
    year: i32,
    top: usize,
    json: bool,
) -> Result<()> {
    let result = run_plan(config, plan, month_start(year, 1)?, ScoringScope::Year(year)).await?;
    let best = rank_days(&result.scores, top);

    if json {
        return print_json(&best);
    }

    display_scores(best.iter().copied());
    for day in &best {
        display_breakdown(day);
    }
    Ok(())
}
