// ABOUTME: Main library entry point for the Raceday Planner
// ABOUTME: Wires historical weather retrieval, caching and sessions around the scoring engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

#![deny(unsafe_code)]

//! # Raceday Planner
//!
//! Recommends calendar dates for an outdoor multi-hour endurance event by
//! scoring every day of a month or year against historical weather,
//! astronomical daylight, holiday and weekday rules, training lead time and
//! competing events.
//!
//! ## Architecture
//!
//! - **`raceday-core`**: models, scoring constants and the error type
//! - **`raceday-intelligence`**: the synchronous scoring engine
//! - **This crate**: environment configuration, logging, the Open-Meteo
//!   archive client, paced retrieval, the weather cache and planning sessions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use raceday_planner::config::PlannerConfig;
//! use raceday_planner::errors::AppResult;
//! use raceday_planner::models::{EventConstraints, GeoPoint};
//! use raceday_planner::session::{PlanningRequest, PlanningSession};
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = PlannerConfig::from_env()?;
//!     let session = PlanningSession::new(&config, None);
//!     let target = NaiveDate::from_ymd_opt(2027, 6, 1).unwrap_or_default();
//!     let constraints = EventConstraints::new(target, GeoPoint::new(48.137, 11.575));
//!     let today = chrono::Local::now().date_naive();
//!
//!     let result = session
//!         .run_cycle(&PlanningRequest::target_month(constraints, today))
//!         .await?;
//!     println!("scored {} days", result.scores.len());
//!     Ok(())
//! }
//! ```

/// Weather history cache keyed by location or route and year
pub mod cache;

/// Environment-based configuration
pub mod config;

/// Application constants
pub mod constants;

/// Error types
pub mod errors;

/// External API clients
pub mod external;

/// Holiday and competing-event file loaders
pub mod loaders;

/// Logging configuration
pub mod logging;

/// Request pacing for the weather archive
pub mod rate_limiting;

/// Paced multi-year history retrieval
pub mod retrieval;

/// Planning sessions with supersession
pub mod session;

pub use raceday_core::models;
pub use raceday_intelligence as intelligence;
