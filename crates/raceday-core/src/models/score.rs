// ABOUTME: Day score output with ordered breakdown, reasons and traffic-light status
// ABOUTME: Safe to serialize directly for display or storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::constraints::{Persona, RaceStartTime};
use super::weather::WeatherStats;
use crate::constants::scoring::{GREEN_ABOVE, RED_BELOW};

/// Traffic-light classification of a day score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStatus {
    /// Score below 40
    Red,
    /// Score from 40 through 80
    Yellow,
    /// Score above 80
    Green,
}

impl ScoreStatus {
    /// Classify a clamped score
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        if score < RED_BELOW {
            Self::Red
        } else if score > GREEN_ABOVE {
            Self::Green
        } else {
            Self::Yellow
        }
    }
}

impl fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Yellow => write!(f, "yellow"),
            Self::Green => write!(f, "green"),
        }
    }
}

/// One audited rule outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    /// Rule category label
    pub label: String,
    /// Signed score delta (zero for informational entries)
    pub delta: i32,
}

impl BreakdownEntry {
    /// Create an entry
    pub fn new(label: impl Into<String>, delta: i32) -> Self {
        Self {
            label: label.into(),
            delta,
        }
    }
}

/// Context echoed alongside a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayDetails {
    /// Hours between sunrise and sunset
    pub daylight_hours: Option<f64>,
    /// Civil dawn (local)
    pub civil_dawn: Option<NaiveDateTime>,
    /// Sunrise (local)
    pub sunrise: Option<NaiveDateTime>,
    /// Sunset (local)
    pub sunset: Option<NaiveDateTime>,
    /// Civil dusk (local)
    pub civil_dusk: Option<NaiveDateTime>,
    /// Race minutes between sunrise and sunset
    pub daylight_minutes_in_race: Option<i64>,
    /// Race minutes outside sunrise to sunset
    pub darkness_minutes: Option<i64>,
    /// Whole weeks of training lead available (negative for past dates)
    pub training_weeks: i64,
    /// Saturday or Sunday
    pub is_weekend: bool,
    /// Weather statistics matched for the calendar day
    pub weather: Option<WeatherStats>,
    /// Holiday name matched for the date
    pub holiday: Option<String>,
    /// Race start time
    pub race_start: RaceStartTime,
    /// Race duration (hours)
    pub race_duration_hours: f64,
    /// Persona used for weather penalties
    pub persona: Persona,
}

/// Score for one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayScore {
    /// Scored date
    pub date: NaiveDate,
    /// Clamped score (0-100)
    pub score: u8,
    /// Human-readable reasons in rule order
    pub reasons: Vec<String>,
    /// Every evaluated rule with its delta, in rule order
    pub breakdown: Vec<BreakdownEntry>,
    /// Traffic-light status
    pub status: ScoreStatus,
    /// Echoed context
    pub details: DayDetails,
}

impl DayScore {
    /// Sum of all breakdown deltas
    #[must_use]
    pub fn total_delta(&self) -> i32 {
        self.breakdown.iter().map(|entry| entry.delta).sum()
    }

    /// Breakdown delta recorded under a label, if the rule was evaluated
    #[must_use]
    pub fn delta_for(&self, label: &str) -> Option<i32> {
        self.breakdown
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.delta)
    }
}
