// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Provides a scripted in-memory history source with gating and call counting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `raceday_planner`

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use raceday_planner::config::PlannerConfig;
use raceday_planner::models::{DailySample, GeoPoint};
use raceday_planner::retrieval::{HistoryError, HistorySource};
use tokio::sync::Notify;

/// In-memory history source with per-year failures and an optional gate
#[derive(Default)]
pub struct ScriptedSource {
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
    failures: HashMap<i32, HistoryError>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every request whose end date falls in `year`
    pub fn failing(mut self, year: i32, error: HistoryError) -> Self {
        self.failures.insert(year, error);
        self
    }

    /// Signal `entered` on each request, then wait for `release`
    pub fn gated(mut self, entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        self.gate = Some((entered, release));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, NaiveDate, NaiveDate)> {
        self.requests.lock().unwrap().clone()
    }
}

/// Dry, mild day with a temperature that depends on latitude
pub fn synthetic_sample(point: &GeoPoint, date: NaiveDate) -> DailySample {
    let temp_max = 8.0 + (point.lat - 48.0);
    DailySample {
        date,
        temp_max: Some(temp_max),
        temp_min: Some(temp_max - 6.0),
        precipitation: Some(0.0),
        humidity: Some(50.0),
        wind_max: Some(5.0),
    }
}

#[async_trait]
impl HistorySource for ScriptedSource {
    async fn fetch_daily(
        &self,
        point: &GeoPoint,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySample>, HistoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((point.signature(), start, end));

        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        if let Some(error) = self.failures.get(&end.year()) {
            return Err(error.clone());
        }
        Ok(start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| synthetic_sample(point, d))
            .collect())
    }
}

/// Configuration without pacing delays
pub fn fast_config(history_years: u32) -> PlannerConfig {
    PlannerConfig {
        history_years,
        request_interval: Duration::ZERO,
        ..PlannerConfig::default()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
