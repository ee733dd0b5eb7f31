// ABOUTME: Geographic point used for event locations, route samples and conflicts
// ABOUTME: Validates coordinate ranges and derives a stable signature for cache keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// A latitude/longitude pair with an optional display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl GeoPoint {
    /// Create an unnamed point
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            name: None,
        }
    }

    /// Create a named point
    pub fn named(lat: f64, lng: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            name: Some(name.into()),
        }
    }

    /// Check that both coordinates are finite and inside their ranges
    ///
    /// # Errors
    ///
    /// Returns a configuration error when either coordinate is out of range
    pub fn validate(&self) -> AppResult<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(AppError::config_invalid(format!(
                "latitude {} is outside [-90, 90]",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(AppError::config_invalid(format!(
                "longitude {} is outside [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Coordinates rounded to four decimals (~11 m), used in cache keys
    #[must_use]
    pub fn signature(&self) -> String {
        format!("{:.4},{:.4}", self.lat, self.lng)
    }
}
