// ABOUTME: Best-day ranking and per-month traffic-light summaries over scored days
// ABOUTME: Ties are broken by the earlier date so results are stable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use raceday_core::models::{DayScore, ScoreStatus};
use serde::{Deserialize, Serialize};

/// Top `n` days by score, ties broken by the earlier date
#[must_use]
pub fn rank_days(scores: &[DayScore], n: usize) -> Vec<&DayScore> {
    let mut ranked: Vec<&DayScore> = scores.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.date.cmp(&b.date)));
    ranked.truncate(n);
    ranked
}

/// Status counts and best day for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    /// Year
    pub year: i32,
    /// Month (1-12)
    pub month: u32,
    /// Days scored green
    pub green: usize,
    /// Days scored yellow
    pub yellow: usize,
    /// Days scored red
    pub red: usize,
    /// Mean score across the month
    pub mean_score: f64,
    /// Best date and its score
    pub best: Option<(NaiveDate, u8)>,
}

/// Summarize the scores of one month; `None` for an empty slice
///
/// The month is taken from the first score; callers pass one month at a time.
#[must_use]
pub fn summarize_month(scores: &[DayScore]) -> Option<MonthSummary> {
    let first = scores.first()?;
    let count = |status: ScoreStatus| scores.iter().filter(|s| s.status == status).count();
    let total: u32 = scores.iter().map(|s| u32::from(s.score)).sum();

    Some(MonthSummary {
        year: first.date.year(),
        month: first.date.month(),
        green: count(ScoreStatus::Green),
        yellow: count(ScoreStatus::Yellow),
        red: count(ScoreStatus::Red),
        mean_score: f64::from(total) / scores.len() as f64,
        best: rank_days(scores, 1).first().map(|s| (s.date, s.score)),
    })
}

/// One summary per (year, month) present in the scores, in calendar order
#[must_use]
pub fn summarize_year(scores: &[DayScore]) -> Vec<MonthSummary> {
    let mut by_month: BTreeMap<(i32, u32), Vec<DayScore>> = BTreeMap::new();
    for score in scores {
        by_month
            .entry((score.date.year(), score.date.month()))
            .or_default()
            .push(score.clone());
    }
    by_month
        .values()
        .filter_map(|month| summarize_month(month))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use raceday_core::models::{DayDetails, Persona, RaceStartTime};

    fn scored(m: u32, d: u32, score: u8) -> DayScore {
        DayScore {
            date: NaiveDate::from_ymd_opt(2026, m, d).unwrap(),
            score,
            reasons: Vec::new(),
            breakdown: Vec::new(),
            status: ScoreStatus::from_score(score),
            details: DayDetails {
                daylight_hours: None,
                civil_dawn: None,
                sunrise: None,
                sunset: None,
                civil_dusk: None,
                daylight_minutes_in_race: None,
                darkness_minutes: None,
                training_weeks: 20,
                is_weekend: false,
                weather: None,
                holiday: None,
                race_start: RaceStartTime::default(),
                race_duration_hours: 6.0,
                persona: Persona::Competition,
            },
        }
    }

    #[test]
    fn test_rank_days_breaks_ties_by_date() {
        let scores = vec![
            scored(5, 3, 90),
            scored(5, 1, 90),
            scored(5, 2, 100),
            scored(5, 4, 10),
        ];
        let best: Vec<u32> = rank_days(&scores, 3).iter().map(|s| s.date.day()).collect();
        assert_eq!(best, vec![2, 1, 3]);
        assert_eq!(rank_days(&scores, 10).len(), 4);
    }

    #[test]
    fn test_summaries() {
        let scores = vec![
            scored(5, 1, 100),
            scored(5, 2, 80),
            scored(5, 3, 0),
            scored(6, 1, 60),
        ];
        let may = summarize_month(&scores[..3]).unwrap();
        assert_eq!((may.green, may.yellow, may.red), (1, 1, 1));
        assert!((may.mean_score - 60.0).abs() < 1e-9);
        assert_eq!(may.best.map(|(d, s)| (d.day(), s)), Some((1, 100)));

        let year = summarize_year(&scores);
        assert_eq!(year.len(), 2);
        assert_eq!(year[1].month, 6);
        assert!(summarize_month(&[]).is_none());
    }
}
