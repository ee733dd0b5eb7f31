// ABOUTME: Raw daily weather samples and per-calendar-day aggregate statistics
// ABOUTME: Calendar days ignore the year so statistics can be reused for any target year
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::location::GeoPoint;
use crate::errors::{AppError, AppResult};

/// Leap year used to validate calendar days so that February 29 is accepted
const REFERENCE_LEAP_YEAR: i32 = 2000;

/// A month/day pair without a year
///
/// Serialized as `"MM-DD"` so it can be used as a JSON object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CalendarDay {
    month: u32,
    day: u32,
}

impl CalendarDay {
    /// Create a calendar day
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error if the pair never occurs in any year
    pub fn new(month: u32, day: u32) -> AppResult<Self> {
        if NaiveDate::from_ymd_opt(REFERENCE_LEAP_YEAR, month, day).is_none() {
            return Err(AppError::out_of_range(
                "calendar_day",
                format!("{month:02}-{day:02} is not a calendar day"),
            ));
        }
        Ok(Self { month, day })
    }

    /// Calendar day of a date
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Month (1-12)
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Day of month (1-31)
    #[must_use]
    pub const fn day(self) -> u32 {
        self.day
    }

    /// The date of this calendar day in a year; `None` for February 29 in common years
    #[must_use]
    pub fn in_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl From<CalendarDay> for String {
    fn from(day: CalendarDay) -> Self {
        day.to_string()
    }
}

impl TryFrom<String> for CalendarDay {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let malformed = || AppError::invalid_format(format!("'{value}' is not an MM-DD day"));
        let (month, day) = value.split_once('-').ok_or_else(malformed)?;
        let month = month.parse::<u32>().map_err(|_| malformed())?;
        let day = day.parse::<u32>().map_err(|_| malformed())?;
        Self::new(month, day)
    }
}

/// An inclusive range of months within one year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSpan {
    first: u32,
    last: u32,
}

impl MonthSpan {
    /// Create a span from `first` through `last`
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error for months outside 1-12 or an inverted span
    pub fn new(first: u32, last: u32) -> AppResult<Self> {
        if !(1..=12).contains(&first) || !(1..=12).contains(&last) || first > last {
            return Err(AppError::out_of_range(
                "month_span",
                format!("{first}..={last} is not a span of months"),
            ));
        }
        Ok(Self { first, last })
    }

    /// A single month
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error for months outside 1-12
    pub fn single(month: u32) -> AppResult<Self> {
        Self::new(month, month)
    }

    /// January through December
    #[must_use]
    pub const fn full_year() -> Self {
        Self { first: 1, last: 12 }
    }

    /// First month
    #[must_use]
    pub const fn first(self) -> u32 {
        self.first
    }

    /// Last month
    #[must_use]
    pub const fn last(self) -> u32 {
        self.last
    }

    /// Whether the span includes the month
    #[must_use]
    pub const fn contains(self, month: u32) -> bool {
        self.first <= month && month <= self.last
    }

    /// Months in ascending order
    #[must_use]
    pub const fn months(self) -> RangeInclusive<u32> {
        self.first..=self.last
    }

    /// First day of the span in a year
    #[must_use]
    pub fn start_in(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.first, 1)
    }

    /// Last day of the span in a year
    #[must_use]
    pub fn end_in(self, year: i32) -> Option<NaiveDate> {
        let (next_year, next_month) = if self.last == 12 {
            (year + 1, 1)
        } else {
            (year, self.last + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
    }
}

/// One day of observed weather at one point; any field may be missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySample {
    /// Observation date
    pub date: NaiveDate,
    /// Daily maximum temperature (°C)
    pub temp_max: Option<f64>,
    /// Daily minimum temperature (°C)
    pub temp_min: Option<f64>,
    /// Daily precipitation sum (mm)
    pub precipitation: Option<f64>,
    /// Daily mean relative humidity (%)
    pub humidity: Option<f64>,
    /// Daily maximum wind speed (km/h)
    pub wind_max: Option<f64>,
}

impl DailySample {
    /// A sample with no readings
    #[must_use]
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            temp_max: None,
            temp_min: None,
            precipitation: None,
            humidity: None,
            wind_max: None,
        }
    }
}

/// The daily series retrieved for one point and one historical year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSeries {
    /// Historical year the series belongs to
    pub year: i32,
    /// Daily samples, including the lead window before the first requested day
    pub samples: Vec<DailySample>,
}

/// All retrieved years for one route sample point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointHistory {
    /// Sampled point
    pub point: GeoPoint,
    /// One series per year that returned data
    pub years: Vec<YearSeries>,
}

/// The values one historical year contributed to a calendar day
///
/// Kept for display; scoring never reads or mutates these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSample {
    /// Historical year
    pub year: i32,
    /// Maximum temperature (°C)
    pub temp_max: f64,
    /// Minimum temperature after fallback (°C)
    pub temp_min: f64,
    /// Precipitation (mm)
    pub precipitation: f64,
    /// Humidity after default (%)
    pub humidity: f64,
    /// Maximum wind after default (km/h)
    pub wind_max: f64,
}

/// Aggregated statistics for one calendar day across sample years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherStats {
    /// Mean daily maximum temperature (°C)
    pub avg_max_temp: f64,
    /// Mean daily minimum temperature (°C)
    pub avg_min_temp: f64,
    /// Mean relative humidity (%)
    pub avg_humidity: f64,
    /// Mean of the per-year daily maximum wind speed (km/h)
    pub max_wind_speed: f64,
    /// Mean daily precipitation (mm)
    pub avg_precipitation: f64,
    /// Share of sample years with more than 1 mm (%)
    pub rain_probability: f64,
    /// Share of sample years with more than 5 mm (%)
    pub heavy_rain_probability: f64,
    /// Mean trailing three-day precipitation ending the day before (mm/day)
    pub mud_index: f64,
    /// Number of sample years that contributed
    pub sample_years: u32,
    /// Raw per-year values, for display only
    #[serde(default)]
    pub samples: Vec<YearSample>,
}

impl WeatherStats {
    /// Statistics with the given temperatures and otherwise calm, dry conditions
    #[must_use]
    pub const fn with_temperatures(avg_max_temp: f64, avg_min_temp: f64) -> Self {
        Self {
            avg_max_temp,
            avg_min_temp,
            avg_humidity: 50.0,
            max_wind_speed: 0.0,
            avg_precipitation: 0.0,
            rain_probability: 0.0,
            heavy_rain_probability: 0.0,
            mud_index: 0.0,
            sample_years: 0,
            samples: Vec::new(),
        }
    }

    /// Diurnal temperature spread (°C)
    #[must_use]
    pub fn temperature_swing(&self) -> f64 {
        self.avg_max_temp - self.avg_min_temp
    }
}

/// Per-calendar-day statistics for one location or route
pub type WeatherHistory = BTreeMap<CalendarDay, WeatherStats>;
