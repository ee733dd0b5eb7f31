// ABOUTME: Environment-only configuration for retrieval pacing, caching and defaults
// ABOUTME: Parses RACEDAY_* variables with defaults and rejects invalid values up front
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

//! Planner configuration
//!
//! Every setting comes from the environment with a sensible default; there
//! are no configuration files. Invalid values are reported as
//! [`ErrorCode::ConfigInvalid`](crate::errors::ErrorCode::ConfigInvalid)
//! before any retrieval starts.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use serde_json::{json, Value};

use crate::constants::{aggregation, env_vars, open_meteo, retrieval};
use crate::errors::{AppError, AppResult};

/// Planner configuration loaded from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Trailing historical years sampled before the target year
    pub history_years: u32,
    /// Time between token refills of the request pacer
    pub request_interval: Duration,
    /// Token bucket capacity of the request pacer
    pub request_burst: u32,
    /// Archive endpoint for historical weather
    pub archive_base_url: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// Number of (location, year) histories kept in memory
    pub cache_capacity: usize,
    /// Timezone applied to events that do not name one
    pub timezone: Tz,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            history_years: aggregation::DEFAULT_HISTORY_YEARS,
            request_interval: Duration::from_millis(retrieval::DEFAULT_REQUEST_INTERVAL_MS),
            request_burst: retrieval::DEFAULT_REQUEST_BURST,
            archive_base_url: open_meteo::ARCHIVE_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(retrieval::DEFAULT_REQUEST_TIMEOUT_SECS),
            cache_capacity: retrieval::DEFAULT_CACHE_CAPACITY,
            timezone: chrono_tz::Europe::Berlin,
        }
    }
}

impl PlannerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any variable is set but cannot be
    /// parsed, or if the resulting configuration fails validation
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            history_years: parse_env(env_vars::HISTORY_YEARS, aggregation::DEFAULT_HISTORY_YEARS)?,
            request_interval: Duration::from_millis(parse_env(
                env_vars::REQUEST_INTERVAL_MS,
                retrieval::DEFAULT_REQUEST_INTERVAL_MS,
            )?),
            request_burst: parse_env(env_vars::REQUEST_BURST, retrieval::DEFAULT_REQUEST_BURST)?,
            archive_base_url: env_var_or(env_vars::ARCHIVE_BASE_URL, open_meteo::ARCHIVE_BASE_URL),
            request_timeout: Duration::from_secs(parse_env(
                env_vars::REQUEST_TIMEOUT_SECS,
                retrieval::DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            cache_capacity: parse_env(env_vars::CACHE_CAPACITY, retrieval::DEFAULT_CACHE_CAPACITY)?,
            timezone: parse_env(env_vars::TIMEZONE, chrono_tz::Europe::Berlin)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns a configuration error for zero history years, a zero burst,
    /// a zero cache capacity or an empty archive URL
    pub fn validate(&self) -> AppResult<()> {
        if self.history_years == 0 {
            return Err(AppError::config_invalid(format!(
                "{} must be at least 1",
                env_vars::HISTORY_YEARS
            )));
        }
        if self.request_burst == 0 {
            return Err(AppError::config_invalid(format!(
                "{} must be at least 1",
                env_vars::REQUEST_BURST
            )));
        }
        if self.cache_capacity == 0 {
            return Err(AppError::config_invalid(format!(
                "{} must be at least 1",
                env_vars::CACHE_CAPACITY
            )));
        }
        if self.archive_base_url.trim().is_empty() {
            return Err(AppError::config_invalid(format!(
                "{} must not be empty",
                env_vars::ARCHIVE_BASE_URL
            )));
        }
        Ok(())
    }

    /// Structured summary for startup logging
    #[must_use]
    pub fn summary(&self) -> Value {
        json!({
            "history_years": self.history_years,
            "pacing": {
                "interval_ms": u64::try_from(self.request_interval.as_millis()).unwrap_or(u64::MAX),
                "burst": self.request_burst,
            },
            "archive_base_url": self.archive_base_url,
            "request_timeout_secs": self.request_timeout.as_secs(),
            "cache_capacity": self.cache_capacity,
            "timezone": self.timezone.name(),
        })
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config_invalid(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}
