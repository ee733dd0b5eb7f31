// ABOUTME: Holiday and conflicting-event models consumed by the calendar rules
// ABOUTME: Builds a first-match holiday index and matches events at day, range or month granularity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::location::GeoPoint;

/// Kind of holiday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayKind {
    /// Public (bank) holiday
    Public,
    /// School holiday
    School,
}

impl fmt::Display for HolidayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::School => write!(f, "school"),
        }
    }
}

/// A single holiday on a calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Date of the holiday
    pub date: NaiveDate,
    /// Display name
    pub name: String,
    /// Public or school holiday
    pub kind: HolidayKind,
}

impl Holiday {
    /// Create a holiday
    pub fn new(date: NaiveDate, name: impl Into<String>, kind: HolidayKind) -> Self {
        Self {
            date,
            name: name.into(),
            kind,
        }
    }
}

/// Date-indexed holidays where the first upstream entry for a date wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    by_date: BTreeMap<NaiveDate, Holiday>,
}

impl HolidayCalendar {
    /// Create an empty calendar
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a holiday unless the date already has one; returns whether it was kept
    pub fn insert(&mut self, holiday: Holiday) -> bool {
        match self.by_date.entry(holiday.date) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(holiday);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Holiday for a date, if any
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&Holiday> {
        self.by_date.get(&date)
    }

    /// Number of indexed dates
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    /// Whether no holidays are indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Holidays in date order
    pub fn iter(&self) -> impl Iterator<Item = &Holiday> {
        self.by_date.values()
    }
}

impl FromIterator<Holiday> for HolidayCalendar {
    fn from_iter<I: IntoIterator<Item = Holiday>>(iter: I) -> Self {
        let mut calendar = Self::new();
        for holiday in iter {
            calendar.insert(holiday);
        }
        calendar
    }
}

/// When a competing event takes place, at the granularity the source provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "granularity", rename_all = "lowercase")]
pub enum EventSchedule {
    /// A single day
    Day {
        /// Event date
        date: NaiveDate,
    },
    /// An inclusive range of days
    Range {
        /// First day
        start: NaiveDate,
        /// Last day (inclusive)
        end: NaiveDate,
    },
    /// Somewhere within a month, exact day unknown
    Month {
        /// Year
        year: i32,
        /// Month (1-12)
        month: u32,
    },
}

impl EventSchedule {
    /// Whether the schedule includes the given date
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Day { date: day } => day == date,
            Self::Range { start, end } => start <= date && date <= end,
            Self::Month { year, month } => date.year() == year && date.month() == month,
        }
    }
}

impl fmt::Display for EventSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day { date } => write!(f, "{date}"),
            Self::Range { start, end } => write!(f, "{start} to {end}"),
            Self::Month { year, month } => write!(f, "{year}-{month:02}"),
        }
    }
}

/// A competing event near the planned location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictingEvent {
    /// Event name
    pub name: String,
    /// When the event takes place
    pub schedule: EventSchedule,
    /// Where the event takes place
    pub location: GeoPoint,
    /// Optional link to the event page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_holiday_wins() {
        let calendar: HolidayCalendar = [
            Holiday::new(date(2026, 5, 1), "Tag der Arbeit", HolidayKind::Public),
            Holiday::new(date(2026, 5, 1), "Pfingstferien", HolidayKind::School),
        ]
        .into_iter()
        .collect();

        assert_eq!(calendar.len(), 1);
        assert_eq!(calendar.get(date(2026, 5, 1)).unwrap().name, "Tag der Arbeit");
        assert!(calendar.get(date(2026, 5, 2)).is_none());
    }

    #[test]
    fn test_schedule_granularity() {
        let day = EventSchedule::Day {
            date: date(2026, 6, 13),
        };
        assert!(day.covers(date(2026, 6, 13)));
        assert!(!day.covers(date(2026, 6, 14)));

        let range = EventSchedule::Range {
            start: date(2026, 6, 12),
            end: date(2026, 6, 14),
        };
        assert!(range.covers(date(2026, 6, 14)));
        assert!(!range.covers(date(2026, 6, 15)));

        let month = EventSchedule::Month {
            year: 2026,
            month: 6,
        };
        assert!(month.covers(date(2026, 6, 30)));
        assert!(!month.covers(date(2027, 6, 1)));
    }

    #[test]
    fn test_schedule_json_shape() {
        let schedule: EventSchedule =
            serde_json::from_str(r#"{"granularity":"range","start":"2026-06-12","end":"2026-06-14"}"#)
                .unwrap();
        assert_eq!(
            schedule,
            EventSchedule::Range {
                start: date(2026, 6, 12),
                end: date(2026, 6, 14),
            }
        );
    }
}
