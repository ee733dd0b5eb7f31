// ABOUTME: Application constants for the planner collaborators: service names, endpoints, env defaults
// ABOUTME: Re-exports the scoring constants from raceday-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

pub use raceday_core::constants::*;

/// Service names used in logs and error messages
pub mod service_names {
    /// This application
    pub const RACEDAY_PLANNER: &str = "raceday-planner";
    /// Open-Meteo historical archive
    pub const OPEN_METEO_ARCHIVE: &str = "Open-Meteo archive";
}

/// Open-Meteo archive request shape
pub mod open_meteo {
    /// Default archive endpoint
    pub const ARCHIVE_BASE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
    /// Daily variables requested per year
    pub const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,relative_humidity_2m_mean,wind_speed_10m_max";
}

/// Retrieval, pacing and cache defaults
pub mod retrieval {
    /// Milliseconds between token refills
    pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 1000;
    /// Token bucket capacity
    pub const DEFAULT_REQUEST_BURST: u32 = 1;
    /// HTTP timeout in seconds
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Cached (location, year) histories
    pub const DEFAULT_CACHE_CAPACITY: usize = 32;
    /// Back-off applied after a rate-limit response without `Retry-After` (seconds)
    pub const DEFAULT_RATE_LIMIT_BACKOFF_SECS: u64 = 5;
}

/// Environment variable names
pub mod env_vars {
    /// Trailing sample years
    pub const HISTORY_YEARS: &str = "RACEDAY_HISTORY_YEARS";
    /// Token refill interval
    pub const REQUEST_INTERVAL_MS: &str = "RACEDAY_REQUEST_INTERVAL_MS";
    /// Token bucket capacity
    pub const REQUEST_BURST: &str = "RACEDAY_REQUEST_BURST";
    /// Archive endpoint override
    pub const ARCHIVE_BASE_URL: &str = "RACEDAY_ARCHIVE_BASE_URL";
    /// HTTP timeout
    pub const REQUEST_TIMEOUT_SECS: &str = "RACEDAY_REQUEST_TIMEOUT_SECS";
    /// Cache capacity
    pub const CACHE_CAPACITY: &str = "RACEDAY_CACHE_CAPACITY";
    /// Default event timezone
    pub const TIMEZONE: &str = "RACEDAY_TIMEZONE";
}
