// ABOUTME: Core types and constants for the Raceday Planner date-scoring engine
// ABOUTME: Foundation crate with error handling, scoring constants, and data models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

#![deny(unsafe_code)]

//! # Raceday Core
//!
//! Foundation crate providing shared types and constants for the Raceday
//! Planner. It performs no I/O and is designed to change infrequently so the
//! scoring engine and the collaborator layer can compile against a stable base.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Scoring thresholds, penalty magnitudes, units and defaults
//! - **models**: Event constraints, holidays, weather aggregates and day scores

/// Unified error handling system with standard error codes
pub mod errors;

/// Scoring thresholds, penalty magnitudes and unit conversions
pub mod constants;

/// Core data models (constraints, holidays, weather statistics, day scores)
pub mod models;

pub use errors::{AppError, AppResult, ErrorCode};
