// ABOUTME: Day suitability scoring engine for outdoor endurance event dates
// ABOUTME: Composes weather aggregation, daylight, calendar and persona rules into day scores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

//! # Raceday Intelligence
//!
//! Turns per-calendar-day weather statistics, holidays and caller constraints
//! into a reproducible 0-100 score per day, with an ordered breakdown of
//! every evaluated rule and human-readable reasons.
//!
//! Everything in this crate is synchronous and deterministic: "today" is an
//! explicit input and no I/O happens here. Retrieval of raw history belongs
//! to the caller.
//!
//! Rule order per day is fixed: calendar rules, then daylight, then weather.

/// Multi-year weather history aggregation into per-calendar-day statistics
pub mod aggregation;
/// Day and year scoring orchestration
pub mod assembler;
/// Training lead, manual blocks, holiday/weekend/weekday and conflict rules
pub mod calendar;
/// Solar events and race/daylight overlap
pub mod daylight;
/// Great-circle distance
pub mod geo;
/// Breakdown and reason accumulation
pub mod ledger;
/// Persona temperature curves and weather penalties
pub mod persona;
/// Best-day ranking and monthly summaries
pub mod ranking;

pub use aggregation::{aggregate_point, aggregate_route, lead_window_start, merge_point_histories};
pub use assembler::{DayScorer, ScoringInputs};
pub use daylight::{assess_daylight, format_duration, overlap_minutes, solar_day, SolarDay};
pub use geo::haversine_km;
pub use ledger::{RuleOutcome, ScoreLedger};
pub use persona::{temperature_penalty, TemperatureAssessment};
pub use ranking::{rank_days, summarize_month, summarize_year, MonthSummary};
