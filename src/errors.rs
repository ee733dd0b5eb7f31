// ABOUTME: Error types for the planner, re-exported from raceday-core
// ABOUTME: Keeps `crate::errors::AppError` paths stable for the collaborator modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

pub use raceday_core::errors::{AppError, AppResult, ErrorCode};
