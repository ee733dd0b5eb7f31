// ABOUTME: Orchestrates calendar, daylight and weather rules into one score per day
// ABOUTME: Scores single days, whole months and full years in date order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

//! Day Score Assembly
//!
//! For each day the rules run in a fixed order: calendar, daylight, weather.
//! Every outcome lands in the breakdown, then the sum is clamped to `[0, 100]`
//! and classified into a traffic-light status.

use chrono::{Datelike, NaiveDate, NaiveTime};
use raceday_core::errors::{AppError, AppResult};
use raceday_core::models::{
    CalendarDay, ConflictingEvent, DayDetails, DayScore, EventConstraints, HolidayCalendar,
    ScoreStatus, WeatherHistory,
};
use tracing::debug;

use crate::calendar::evaluate_calendar;
use crate::daylight::assess_daylight;
use crate::ledger::ScoreLedger;
use crate::persona::evaluate_weather;

/// Everything the scorer reads; all of it is owned by the caller
#[derive(Debug, Clone, Copy)]
pub struct ScoringInputs<'a> {
    /// Event constraints
    pub constraints: &'a EventConstraints,
    /// Holidays for the target year and region
    pub holidays: &'a HolidayCalendar,
    /// Per-calendar-day weather statistics
    pub weather: &'a WeatherHistory,
    /// Competing events, used only when conflict checks are enabled
    pub conflicts: &'a [ConflictingEvent],
    /// Reference date for training lead time
    pub today: NaiveDate,
}

/// Scores days against validated inputs
#[derive(Debug, Clone, Copy)]
pub struct DayScorer<'a> {
    inputs: ScoringInputs<'a>,
    race_start: NaiveTime,
    race_minutes: i64,
}

impl<'a> DayScorer<'a> {
    /// Validate the constraints and prepare a scorer
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid constraints; no day is
    /// scored in that case
    pub fn new(inputs: ScoringInputs<'a>) -> AppResult<Self> {
        inputs.constraints.validate()?;
        Ok(Self {
            race_start: inputs.constraints.race_start.to_naive_time()?,
            race_minutes: inputs.constraints.race_duration_minutes(),
            inputs,
        })
    }

    /// Score a single date
    #[must_use]
    pub fn score_day(&self, date: NaiveDate) -> DayScore {
        let constraints = self.inputs.constraints;
        let mut ledger = ScoreLedger::new();

        let calendar = evaluate_calendar(
            date,
            self.inputs.today,
            constraints,
            self.inputs.holidays,
            self.inputs.conflicts,
        );
        for outcome in calendar.outcomes {
            ledger.apply(outcome);
        }

        let daylight = assess_daylight(
            date,
            &constraints.location,
            constraints.timezone,
            self.race_start,
            self.race_minutes,
        );
        ledger.apply(daylight.outcome);

        let weather = self.inputs.weather.get(&CalendarDay::of(date));
        if let Some(stats) = weather {
            for outcome in evaluate_weather(stats, date.month(), constraints.persona) {
                ledger.apply(outcome);
            }
        }

        let score = ledger.score();
        let (breakdown, reasons) = ledger.into_parts();
        let solar = daylight.solar;

        DayScore {
            date,
            score,
            reasons,
            breakdown,
            status: ScoreStatus::from_score(score),
            details: DayDetails {
                daylight_hours: solar.map(|s| s.daylight_hours()),
                civil_dawn: solar.and_then(|s| s.civil_dawn),
                sunrise: solar.and_then(|s| s.sunrise),
                sunset: solar.and_then(|s| s.sunset),
                civil_dusk: solar.and_then(|s| s.civil_dusk),
                daylight_minutes_in_race: daylight.daylight_minutes_in_race,
                darkness_minutes: daylight.darkness_minutes,
                training_weeks: calendar.training_weeks,
                is_weekend: calendar.is_weekend,
                weather: weather.cloned(),
                holiday: calendar.holiday,
                race_start: constraints.race_start,
                race_duration_hours: constraints.race_duration_hours,
                persona: constraints.persona,
            },
        }
    }

    /// Score every day of a month in ascending order
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error for an invalid year/month
    pub fn score_month(&self, year: i32, month: u32) -> AppResult<Vec<DayScore>> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            AppError::out_of_range("month", format!("{year}-{month:02} is not a month"))
        })?;

        let scores: Vec<DayScore> = first
            .iter_days()
            .take_while(|day| day.month() == month)
            .map(|day| self.score_day(day))
            .collect();

        debug!(
            year,
            month,
            days = scores.len(),
            green = scores
                .iter()
                .filter(|s| s.status == ScoreStatus::Green)
                .count(),
            "Scored month"
        );
        Ok(scores)
    }

    /// Score the month named by the constraints' target month
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error if the target month cannot be iterated
    pub fn score_target_month(&self) -> AppResult<Vec<DayScore>> {
        let target = self.inputs.constraints.target_month_start();
        self.score_month(target.year(), target.month())
    }

    /// Score all twelve months of a year, month then day ascending
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error for a year chrono cannot represent
    pub fn score_year(&self, year: i32) -> AppResult<Vec<DayScore>> {
        let mut scores = Vec::with_capacity(366);
        for month in 1..=12 {
            scores.extend(self.score_month(year, month)?);
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raceday_core::models::{GeoPoint, Persona, WeatherStats};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn constraints() -> EventConstraints {
        EventConstraints::new(date(2026, 6, 1), GeoPoint::new(48.1374, 11.5755))
    }

    #[test]
    fn test_invalid_constraints_fail_before_scoring() {
        let mut c = constraints();
        c.race_duration_hours = -1.0;
        let inputs = ScoringInputs {
            constraints: &c,
            holidays: &HolidayCalendar::new(),
            weather: &WeatherHistory::new(),
            conflicts: &[],
            today: date(2026, 1, 1),
        };
        let error = DayScorer::new(inputs).unwrap_err();
        assert!(error.code.is_config());
    }

    #[test]
    fn test_month_and_year_are_ordered() {
        let c = constraints();
        let holidays = HolidayCalendar::new();
        let weather = WeatherHistory::new();
        let scorer = DayScorer::new(ScoringInputs {
            constraints: &c,
            holidays: &holidays,
            weather: &weather,
            conflicts: &[],
            today: date(2025, 1, 1),
        })
        .unwrap();

        let february = scorer.score_month(2028, 2).unwrap();
        assert_eq!(february.len(), 29);
        assert!(february.windows(2).all(|w| w[0].date < w[1].date));

        let year = scorer.score_year(2026).unwrap();
        assert_eq!(year.len(), 365);
        assert_eq!(year[0].date, date(2026, 1, 1));
        assert_eq!(year[364].date, date(2026, 12, 31));

        assert!(scorer.score_month(2026, 13).is_err());
        assert_eq!(scorer.score_target_month().unwrap().len(), 30);
    }

    #[test]
    fn test_missing_weather_skips_weather_categories() {
        let c = constraints();
        let holidays = HolidayCalendar::new();
        let weather = WeatherHistory::new();
        let scorer = DayScorer::new(ScoringInputs {
            constraints: &c,
            holidays: &holidays,
            weather: &weather,
            conflicts: &[],
            today: date(2025, 1, 1),
        })
        .unwrap();

        let day = scorer.score_day(date(2026, 6, 20));
        assert!(day.details.weather.is_none());
        assert!(day.delta_for("Rain Risk").is_none());
        assert_eq!(day.delta_for("Darkness Hours"), Some(0));
        assert_eq!(day.score, 100);
    }

    #[test]
    fn test_breakdown_sum_matches_score() {
        let mut c = constraints();
        c.persona = Persona::Experience;
        c.min_training_weeks = 20;
        let holidays = HolidayCalendar::new();
        let mut weather = WeatherHistory::new();
        for day in 1..=30 {
            let mut stats = WeatherStats::with_temperatures(f64::from(day), 0.0);
            stats.rain_probability = f64::from(day) * 3.0;
            stats.mud_index = f64::from(day) / 2.0;
            weather.insert(CalendarDay::new(6, day).unwrap(), stats);
        }
        let scorer = DayScorer::new(ScoringInputs {
            constraints: &c,
            holidays: &holidays,
            weather: &weather,
            conflicts: &[],
            today: date(2026, 1, 20),
        })
        .unwrap();

        for day in scorer.score_month(2026, 6).unwrap() {
            let expected = (100 + day.total_delta()).clamp(0, 100);
            assert_eq!(i32::from(day.score), expected, "{}", day.date);
            assert_eq!(day.status, ScoreStatus::from_score(day.score));
        }
    }
}
