// ABOUTME: Event constraints supplied by the caller for one scoring invocation
// ABOUTME: Includes persona selection, race timing parsing, and up-front validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::location::GeoPoint;
use crate::constants::{defaults, units::MINUTES_PER_HOUR};
use crate::errors::{AppError, AppResult};

/// Scoring personality selecting the temperature curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Performance-oriented: cool conditions are ideal
    #[default]
    Competition,
    /// Enjoyment-oriented: mild conditions are ideal
    Experience,
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Competition => write!(f, "competition"),
            Self::Experience => write!(f, "experience"),
        }
    }
}

impl FromStr for Persona {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "competition" => Ok(Self::Competition),
            "experience" => Ok(Self::Experience),
            other => Err(AppError::invalid_input(format!(
                "unknown persona '{other}' (expected competition or experience)"
            ))),
        }
    }
}

/// Local wall-clock start time of the race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceStartTime {
    /// Hour of day (0-23)
    pub hour: u32,
    /// Minute of hour (0-59)
    pub minute: u32,
}

impl RaceStartTime {
    /// Create a start time, rejecting out-of-range components
    ///
    /// # Errors
    ///
    /// Returns a configuration error if hour ≥ 24 or minute ≥ 60
    pub fn new(hour: u32, minute: u32) -> AppResult<Self> {
        let start = Self { hour, minute };
        start.validate()?;
        Ok(start)
    }

    /// Parse an `HH:MM` string
    ///
    /// # Errors
    ///
    /// Returns a configuration error for malformed or out-of-range input
    pub fn parse(value: &str) -> AppResult<Self> {
        let malformed =
            || AppError::config_invalid(format!("race start '{value}' is not in HH:MM format"));
        let (hour, minute) = value.trim().split_once(':').ok_or_else(malformed)?;
        let hour = hour.parse::<u32>().map_err(|_| malformed())?;
        let minute = minute.parse::<u32>().map_err(|_| malformed())?;
        Self::new(hour, minute)
    }

    /// Convert to a naive time
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the components are out of range
    pub fn to_naive_time(self) -> AppResult<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).ok_or_else(|| {
            AppError::config_invalid(format!("race start {self} is not a valid time of day"))
        })
    }

    fn validate(self) -> AppResult<()> {
        if self.hour >= 24 || self.minute >= 60 {
            return Err(AppError::config_invalid(format!(
                "race start {:02}:{:02} is out of range",
                self.hour, self.minute
            )));
        }
        Ok(())
    }
}

impl fmt::Display for RaceStartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Default for RaceStartTime {
    fn default() -> Self {
        Self {
            hour: defaults::RACE_START_HOUR,
            minute: 0,
        }
    }
}

/// Caller constraints for one scoring invocation
///
/// Immutable once handed to the scorer; every day of the requested range is
/// evaluated against the same constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConstraints {
    /// Month the caller is planning for (any day; normalized to the first)
    pub target_month: NaiveDate,
    /// Event location
    pub location: GeoPoint,
    /// Region/state code used to select holidays
    pub region: String,
    /// Minimum recommended training lead in weeks
    pub min_training_weeks: u32,
    /// Local race start time
    pub race_start: RaceStartTime,
    /// Race duration in hours (fractional allowed)
    pub race_duration_hours: f64,
    /// Nominal event distance in kilometers
    pub distance_km: f64,
    /// Dates the organizer has ruled out
    #[serde(default)]
    pub blocked_dates: BTreeSet<NaiveDate>,
    /// Holidays reduce the score instead of being informational
    pub penalize_holidays: bool,
    /// Enforce the minimum training lead time
    pub require_training_time: bool,
    /// Saturdays and Sundays are acceptable
    pub allow_weekends: bool,
    /// Monday through Friday are acceptable
    pub allow_weekdays: bool,
    /// Holidays take precedence over weekend/weekday rules
    pub consider_holidays: bool,
    /// Penalize dates with nearby competing events
    pub check_event_conflicts: bool,
    /// Scoring personality
    pub persona: Persona,
    /// Radius for conflicting-event searches in kilometers
    pub conflict_radius_km: f64,
    /// Local timezone of the event
    pub timezone: Tz,
}

impl EventConstraints {
    /// Create constraints with default toggles for a month and location
    #[must_use]
    pub fn new(target_month: NaiveDate, location: GeoPoint) -> Self {
        Self {
            target_month: target_month.with_day(1).unwrap_or(target_month),
            location,
            region: String::new(),
            min_training_weeks: defaults::MIN_TRAINING_WEEKS,
            race_start: RaceStartTime::default(),
            race_duration_hours: defaults::RACE_DURATION_HOURS,
            distance_km: defaults::DISTANCE_KM,
            blocked_dates: BTreeSet::new(),
            penalize_holidays: true,
            require_training_time: true,
            allow_weekends: true,
            allow_weekdays: true,
            consider_holidays: true,
            check_event_conflicts: false,
            persona: Persona::default(),
            conflict_radius_km: defaults::CONFLICT_RADIUS_KM,
            timezone: chrono_tz::Europe::Berlin,
        }
    }

    /// First day of the target month
    #[must_use]
    pub fn target_month_start(&self) -> NaiveDate {
        self.target_month.with_day(1).unwrap_or(self.target_month)
    }

    /// Race duration rounded to whole minutes
    #[must_use]
    pub fn race_duration_minutes(&self) -> i64 {
        (self.race_duration_hours * MINUTES_PER_HOUR).round() as i64
    }

    /// Validate constraints before any scoring happens
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a malformed start time, a
    /// non-positive duration, out-of-range coordinates or a negative radius
    pub fn validate(&self) -> AppResult<()> {
        self.race_start.validate()?;
        if !self.race_duration_hours.is_finite() || self.race_duration_hours <= 0.0 {
            return Err(AppError::config_invalid(format!(
                "race duration must be positive, got {} hours",
                self.race_duration_hours
            )));
        }
        if self.race_duration_minutes() <= 0 {
            return Err(AppError::config_invalid(
                "race duration rounds to zero minutes",
            ));
        }
        self.location.validate()?;
        if !self.conflict_radius_km.is_finite() || self.conflict_radius_km < 0.0 {
            return Err(AppError::config_invalid(format!(
                "conflict radius must be non-negative, got {} km",
                self.conflict_radius_km
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints() -> EventConstraints {
        EventConstraints::new(
            NaiveDate::from_ymd_opt(2026, 5, 17).unwrap(),
            GeoPoint::new(48.14, 11.58),
        )
    }

    #[test]
    fn test_target_month_is_normalized() {
        assert_eq!(
            constraints().target_month,
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
        );
    }

    #[test]
    fn test_race_start_parse() {
        let start = RaceStartTime::parse("07:30").unwrap();
        assert_eq!(start, RaceStartTime { hour: 7, minute: 30 });
        assert_eq!(start.to_string(), "07:30");
        assert!(RaceStartTime::parse("7h30").is_err());
        assert!(RaceStartTime::parse("24:00").is_err());
        assert!(RaceStartTime::parse("08:60").is_err());
    }

    #[test]
    fn test_non_positive_duration_is_config_error() {
        let mut c = constraints();
        c.race_duration_hours = 0.0;
        let error = c.validate().unwrap_err();
        assert!(error.code.is_config());

        c.race_duration_hours = f64::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_fractional_duration_minutes() {
        let mut c = constraints();
        c.race_duration_hours = 4.75;
        assert_eq!(c.race_duration_minutes(), 285);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_persona_from_str() {
        assert_eq!("Experience".parse::<Persona>().unwrap(), Persona::Experience);
        assert!("triathlon".parse::<Persona>().is_err());
    }
}
