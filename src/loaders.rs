// ABOUTME: JSON loaders for holiday calendars and competing-event lists
// ABOUTME: Expands multi-day school holiday ranges into per-day calendar entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use raceday_core::models::{ConflictingEvent, Holiday, HolidayCalendar, HolidayKind};
use serde::Deserialize;
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Holiday file entry: a single day or an inclusive range
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HolidayRecord {
    Day(Holiday),
    Range {
        start: NaiveDate,
        end: NaiveDate,
        name: String,
        kind: HolidayKind,
    },
}

/// Parse a JSON array of holidays
///
/// Entries either carry a `date` or a `start`/`end` range. Where entries
/// overlap, the first one listed for a date wins.
///
/// # Errors
///
/// Returns an error for invalid JSON or a range that ends before it starts
pub fn parse_holidays(json: &str) -> AppResult<HolidayCalendar> {
    let records: Vec<HolidayRecord> = serde_json::from_str(json)?;
    let mut calendar = HolidayCalendar::new();
    for record in records {
        match record {
            HolidayRecord::Day(holiday) => {
                calendar.insert(holiday);
            }
            HolidayRecord::Range {
                start,
                end,
                name,
                kind,
            } => {
                if end < start {
                    return Err(AppError::invalid_format(format!(
                        "holiday '{name}' ends ({end}) before it starts ({start})"
                    )));
                }
                for date in start.iter_days().take_while(|d| *d <= end) {
                    calendar.insert(Holiday::new(date, name.clone(), kind));
                }
            }
        }
    }
    Ok(calendar)
}

/// Load holidays from a JSON file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed
pub fn load_holidays(path: &Path) -> AppResult<HolidayCalendar> {
    let calendar = parse_holidays(&fs::read_to_string(path)?)?;
    debug!(path = %path.display(), days = calendar.len(), "Loaded holidays");
    Ok(calendar)
}

/// Parse a JSON array of competing events
///
/// # Errors
///
/// Returns an error for invalid JSON or an event with invalid coordinates
pub fn parse_conflicts(json: &str) -> AppResult<Vec<ConflictingEvent>> {
    let events: Vec<ConflictingEvent> = serde_json::from_str(json)?;
    for event in &events {
        event.location.validate().map_err(|e| {
            AppError::invalid_format(format!("event '{}': {}", event.name, e.message))
        })?;
    }
    Ok(events)
}

/// Load competing events from a JSON file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed
pub fn load_conflicts(path: &Path) -> AppResult<Vec<ConflictingEvent>> {
    let events = parse_conflicts(&fs::read_to_string(path)?)?;
    debug!(path = %path.display(), events = events.len(), "Loaded conflicting events");
    Ok(events)
}
