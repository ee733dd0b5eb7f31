// ABOUTME: Data models shared between the scoring engine and its collaborators
// ABOUTME: Re-exports constraints, holidays, conflicts, weather aggregates and day scores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

/// Event constraints, persona and race timing
pub mod constraints;
/// Holidays and conflicting events
pub mod event;
/// Geographic points
pub mod location;
/// Day scores, breakdown entries and traffic-light status
pub mod score;
/// Raw daily weather samples and aggregated per-calendar-day statistics
pub mod weather;

pub use constraints::{EventConstraints, Persona, RaceStartTime};
pub use event::{ConflictingEvent, EventSchedule, Holiday, HolidayCalendar, HolidayKind};
pub use location::GeoPoint;
pub use score::{BreakdownEntry, DayDetails, DayScore, ScoreStatus};
pub use weather::{
    CalendarDay, DailySample, MonthSpan, PointHistory, WeatherHistory, WeatherStats, YearSample,
    YearSeries,
};
