// ABOUTME: External API client modules (Open-Meteo historical archive)
// ABOUTME: Implements the history source used by planning sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

//! External API Clients

pub mod open_meteo;

pub use open_meteo::{parse_archive_response, OpenMeteoArchive};
