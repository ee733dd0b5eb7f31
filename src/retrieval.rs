// ABOUTME: Sequential, paced retrieval of trailing historical weather years per point
// ABOUTME: Skips failed years, records rate limiting, and feeds the aggregator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

//! # Historical weather retrieval
//!
//! One request per trailing sample year, issued one after another through the
//! shared [`RequestPacer`]. A failed year never fails the whole retrieval: it
//! is logged, skipped, and reported in the [`RetrievalOutcome`].

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use raceday_core::models::{DailySample, GeoPoint, MonthSpan, PointHistory, YearSeries};
use raceday_intelligence::lead_window_start;
use thiserror::Error;

use crate::constants::{retrieval, service_names};
use crate::errors::AppError;
use crate::logging::PlannerLogger;
use crate::rate_limiting::RequestPacer;

/// Failure of a single historical request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// The archive rejected the request with a rate limit
    #[error("rate limited by the weather archive")]
    RateLimited {
        /// Server-provided delay before retrying, if any
        retry_after: Option<Duration>,
    },
    /// Network failure or unexpected HTTP status
    #[error("weather archive request failed: {0}")]
    Transport(String),
    /// Response body could not be interpreted
    #[error("malformed weather archive response: {0}")]
    Malformed(String),
}

impl HistoryError {
    /// Whether this failure is a rate limit
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl From<HistoryError> for AppError {
    fn from(error: HistoryError) -> Self {
        match &error {
            HistoryError::RateLimited { .. } => {
                Self::rate_limited(service_names::OPEN_METEO_ARCHIVE).with_source(error)
            }
            HistoryError::Transport(_) | HistoryError::Malformed(_) => {
                Self::external_service(service_names::OPEN_METEO_ARCHIVE, error.to_string())
                    .with_source(error)
            }
        }
    }
}

/// Source of daily historical weather for one point
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch daily samples for `point` covering `start..=end`
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::RateLimited`] when throttled, otherwise a
    /// transport or parse error
    async fn fetch_daily(
        &self,
        point: &GeoPoint,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySample>, HistoryError>;
}

/// Result of retrieving history for one point or a route
#[derive(Debug, Clone, Default)]
pub struct RetrievalOutcome {
    /// One history per requested point, in request order
    pub histories: Vec<PointHistory>,
    /// `(point signature, year)` pairs that produced no data
    pub skipped: Vec<(String, i32)>,
    /// Whether any year was skipped because of rate limiting
    pub rate_limited: bool,
}

impl RetrievalOutcome {
    /// Number of year series retrieved across all points
    #[must_use]
    pub fn years_retrieved(&self) -> usize {
        self.histories.iter().map(|h| h.years.len()).sum()
    }

    /// Whether nothing at all was retrieved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years_retrieved() == 0
    }
}

/// Retrieves trailing historical years through a paced [`HistorySource`]
#[derive(Clone)]
pub struct HistoryRetriever {
    source: Arc<dyn HistorySource>,
    pacer: RequestPacer,
    history_years: u32,
}

impl HistoryRetriever {
    /// Create a retriever sampling `history_years` trailing years
    #[must_use]
    pub fn new(source: Arc<dyn HistorySource>, pacer: RequestPacer, history_years: u32) -> Self {
        Self {
            source,
            pacer,
            history_years: history_years.max(1),
        }
    }

    /// Historical years sampled for a target year
    ///
    /// Years end before both the target year and the current year, so only
    /// complete archive years are requested.
    #[must_use]
    pub fn sample_years(&self, target_year: i32, today: NaiveDate) -> RangeInclusive<i32> {
        let last = target_year.min(today.year()) - 1;
        let span = i32::try_from(self.history_years).unwrap_or(i32::MAX);
        last.saturating_sub(span - 1)..=last
    }

    /// Retrieve history for a single point
    pub async fn fetch_point(
        &self,
        point: &GeoPoint,
        span: MonthSpan,
        target_year: i32,
        today: NaiveDate,
    ) -> RetrievalOutcome {
        self.fetch_route(std::slice::from_ref(point), span, target_year, today)
            .await
    }

    /// Retrieve history for every point of a route, one year at a time
    pub async fn fetch_route(
        &self,
        points: &[GeoPoint],
        span: MonthSpan,
        target_year: i32,
        today: NaiveDate,
    ) -> RetrievalOutcome {
        let mut outcome = RetrievalOutcome::default();
        for point in points {
            let mut history = PointHistory {
                point: point.clone(),
                years: Vec::new(),
            };
            for year in self.sample_years(target_year, today) {
                match self.fetch_year(point, span, year).await {
                    Ok(series) => history.years.push(series),
                    Err(error) => {
                        PlannerLogger::log_year_skipped(
                            &point.signature(),
                            year,
                            error.is_rate_limited(),
                            &error.to_string(),
                        );
                        if let HistoryError::RateLimited { retry_after } = error {
                            outcome.rate_limited = true;
                            self.pacer
                                .back_off(retry_after.unwrap_or(Duration::from_secs(
                                    retrieval::DEFAULT_RATE_LIMIT_BACKOFF_SECS,
                                )))
                                .await;
                        }
                        outcome.skipped.push((point.signature(), year));
                    }
                }
            }
            outcome.histories.push(history);
        }
        outcome
    }

    async fn fetch_year(
        &self,
        point: &GeoPoint,
        span: MonthSpan,
        year: i32,
    ) -> Result<YearSeries, HistoryError> {
        let (Some(start), Some(end)) = (lead_window_start(span, year), span.end_in(year)) else {
            return Err(HistoryError::Malformed(format!(
                "year {year} cannot be represented"
            )));
        };

        self.pacer.acquire().await;
        let started = Instant::now();
        let samples = self.source.fetch_daily(point, start, end).await?;
        if samples.is_empty() {
            return Err(HistoryError::Malformed(format!("no samples for {year}")));
        }

        PlannerLogger::log_year_fetched(
            &point.signature(),
            year,
            samples.len(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        Ok(YearSeries { year, samples })
    }
}
