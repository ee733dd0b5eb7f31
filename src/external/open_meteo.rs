// ABOUTME: Open-Meteo historical archive client returning daily weather samples
// ABOUTME: Maps HTTP 429 to a rate-limit error with the server's Retry-After delay
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use raceday_core::models::{DailySample, GeoPoint};
use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};
use serde::Deserialize;

use crate::config::PlannerConfig;
use crate::constants::open_meteo::DAILY_FIELDS;
use crate::errors::{AppError, AppResult};
use crate::retrieval::{HistoryError, HistorySource};

/// Column-oriented daily block of an archive response
#[derive(Debug, Deserialize)]
struct DailyColumns {
    time: Vec<NaiveDate>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<DailyColumns>,
    #[serde(default)]
    reason: Option<String>,
}

fn column(values: &[Option<f64>], index: usize) -> Option<f64> {
    values
        .get(index)
        .copied()
        .flatten()
        .filter(|value| value.is_finite())
}

/// Turn an archive JSON body into daily samples
///
/// Columns shorter than `time` leave the missing values empty.
///
/// # Errors
///
/// Returns [`HistoryError::Malformed`] if the body is not an archive response
/// or carries no daily block
pub fn parse_archive_response(body: &str) -> Result<Vec<DailySample>, HistoryError> {
    let response: ArchiveResponse = serde_json::from_str(body)
        .map_err(|e| HistoryError::Malformed(format!("JSON parse error: {e}")))?;
    let daily = response.daily.ok_or_else(|| {
        HistoryError::Malformed(
            response
                .reason
                .unwrap_or_else(|| "response has no daily block".to_owned()),
        )
    })?;

    Ok(daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| DailySample {
            date: *date,
            temp_max: column(&daily.temperature_2m_max, i),
            temp_min: column(&daily.temperature_2m_min, i),
            precipitation: column(&daily.precipitation_sum, i),
            humidity: column(&daily.relative_humidity_2m_mean, i),
            wind_max: column(&daily.wind_speed_10m_max, i),
        })
        .collect())
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Open-Meteo archive client
#[derive(Debug, Clone)]
pub struct OpenMeteoArchive {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoArchive {
    /// Create a client using the configured endpoint and timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &PlannerConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http_client,
            base_url: config.archive_base_url.clone(),
        })
    }
}

#[async_trait]
impl HistorySource for OpenMeteoArchive {
    async fn fetch_daily(
        &self,
        point: &GeoPoint,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySample>, HistoryError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("latitude", point.lat.to_string()),
                ("longitude", point.lng.to_string()),
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
                ("daily", DAILY_FIELDS.to_owned()),
                ("timezone", "auto".to_owned()),
            ])
            .send()
            .await
            .map_err(|e| HistoryError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(HistoryError::RateLimited {
                retry_after: retry_after(&response),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| HistoryError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(HistoryError::Transport(format!("HTTP {status}: {body}")));
        }
        parse_archive_response(&body)
    }
}
