// ABOUTME: Planning session running one retrieval, aggregation and scoring cycle at a time
// ABOUTME: Generation counter lets newer inputs supersede in-flight cycles before they commit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

//! # Planning sessions
//!
//! A cycle takes the caller's inputs, reuses or retrieves the aggregated
//! weather history, scores the requested days and publishes the result.
//! Starting a cycle, or calling [`SessionHandle::supersede`], advances the
//! session generation. A cycle whose generation is no longer current neither
//! writes to the cache nor publishes; it returns
//! [`ErrorCode::CycleSuperseded`](crate::errors::ErrorCode::CycleSuperseded).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use raceday_core::models::{
    ConflictingEvent, DayScore, EventConstraints, GeoPoint, HolidayCalendar, MonthSpan,
    WeatherHistory,
};
use raceday_intelligence::{aggregate_route, DayScorer, ScoringInputs};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheKey, WeatherCache};
use crate::config::PlannerConfig;
use crate::errors::{AppError, AppResult};
use crate::logging::PlannerLogger;
use crate::rate_limiting::RequestPacer;
use crate::retrieval::{HistoryRetriever, HistorySource};

/// Days a cycle scores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringScope {
    /// Every day of the constraints' target month
    TargetMonth,
    /// Every day of a calendar year
    Year(i32),
}

/// Inputs of one planning cycle
#[derive(Debug, Clone)]
pub struct PlanningRequest {
    /// Event constraints
    pub constraints: EventConstraints,
    /// Route points sampled for weather; empty means the event location only
    pub route: Vec<GeoPoint>,
    /// Holidays for the scored year
    pub holidays: HolidayCalendar,
    /// Competing events
    pub conflicts: Vec<ConflictingEvent>,
    /// Reference date for training lead and sample years
    pub today: NaiveDate,
    /// Days to score
    pub scope: ScoringScope,
}

impl PlanningRequest {
    /// Request scoring the target month at the event location
    #[must_use]
    pub fn target_month(constraints: EventConstraints, today: NaiveDate) -> Self {
        Self {
            constraints,
            route: Vec::new(),
            holidays: HolidayCalendar::new(),
            conflicts: Vec::new(),
            today,
            scope: ScoringScope::TargetMonth,
        }
    }

    /// Year whose days are scored
    #[must_use]
    pub fn target_year(&self) -> i32 {
        match self.scope {
            ScoringScope::TargetMonth => self.constraints.target_month_start().year(),
            ScoringScope::Year(year) => year,
        }
    }

    fn weather_points(&self) -> Vec<GeoPoint> {
        if self.route.is_empty() {
            vec![self.constraints.location.clone()]
        } else {
            self.route.clone()
        }
    }
}

/// Published result of a completed cycle
#[derive(Debug, Clone)]
pub struct CycleResult {
    /// Generation the cycle ran under
    pub generation: u64,
    /// Scores in date order
    pub scores: Vec<DayScore>,
    /// Weather statistics the scores were computed from
    pub weather: Arc<WeatherHistory>,
    /// Whether the weather came from the cache
    pub cache_hit: bool,
    /// Whether any historical year was lost to rate limiting
    pub rate_limited: bool,
    /// Number of historical years that produced no data
    pub skipped_years: usize,
}

/// Handle that can invalidate in-flight cycles from elsewhere
#[derive(Debug, Clone)]
pub struct SessionHandle {
    generation: Arc<AtomicU64>,
}

impl SessionHandle {
    /// Mark every in-flight cycle stale; returns the new generation
    pub fn supersede(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "Planning session superseded");
        generation
    }

    /// Current generation
    #[must_use]
    pub fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// Weather retrieval and cache state shared across cycles
#[derive(Clone)]
pub struct PlanningSession {
    retriever: Option<HistoryRetriever>,
    cache: WeatherCache,
    generation: Arc<AtomicU64>,
    latest: Arc<RwLock<Option<Arc<CycleResult>>>>,
}

impl PlanningSession {
    /// Create a session; without a source every cycle scores without weather
    #[must_use]
    pub fn new(config: &PlannerConfig, source: Option<Arc<dyn HistorySource>>) -> Self {
        let retriever = source.map(|source| {
            HistoryRetriever::new(
                source,
                RequestPacer::from_config(config),
                config.history_years,
            )
        });
        Self::with_parts(retriever, WeatherCache::new(config.cache_capacity))
    }

    /// Create a session from an existing retriever and cache
    #[must_use]
    pub fn with_parts(retriever: Option<HistoryRetriever>, cache: WeatherCache) -> Self {
        Self {
            retriever,
            cache,
            generation: Arc::new(AtomicU64::new(0)),
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// Handle for superseding cycles of this session
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            generation: Arc::clone(&self.generation),
        }
    }

    /// Cache shared by this session's cycles
    #[must_use]
    pub const fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Most recently published result
    pub async fn latest(&self) -> Option<Arc<CycleResult>> {
        self.latest.read().await.clone()
    }

    fn ensure_live(&self, generation: u64) -> AppResult<()> {
        if self.generation.load(Ordering::SeqCst) == generation {
            Ok(())
        } else {
            debug!(generation, "Discarding stale planning cycle");
            Err(AppError::superseded(generation))
        }
    }

    /// Run one cycle, superseding any cycle still in flight
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid constraints (before any
    /// retrieval), or a superseded error if a newer cycle started before
    /// this one committed
    pub async fn run_cycle(&self, request: &PlanningRequest) -> AppResult<Arc<CycleResult>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();
        request.constraints.validate()?;

        let target_year = request.target_year();
        let points = request.weather_points();
        let key = CacheKey::for_route(&points, target_year);

        let mut rate_limited = false;
        let mut skipped_years = 0;
        let (weather, cache_hit) = if let Some(cached) = self.cache.get(&key).await {
            (cached, true)
        } else if let Some(retriever) = &self.retriever {
            let span = MonthSpan::full_year();
            let outcome = retriever
                .fetch_route(&points, span, target_year, request.today)
                .await;
            rate_limited = outcome.rate_limited;
            skipped_years = outcome.skipped.len();
            let weather = Arc::new(aggregate_route(&outcome.histories, span));

            self.ensure_live(generation)?;
            // Partial histories are not cached so a later cycle can fill the gaps
            if !outcome.is_empty() && !rate_limited {
                self.cache.insert(key, Arc::clone(&weather)).await;
            }
            (weather, false)
        } else {
            (Arc::new(WeatherHistory::new()), false)
        };

        let scorer = DayScorer::new(ScoringInputs {
            constraints: &request.constraints,
            holidays: &request.holidays,
            weather: &weather,
            conflicts: &request.conflicts,
            today: request.today,
        })?;
        let scores = match request.scope {
            ScoringScope::TargetMonth => scorer.score_target_month()?,
            ScoringScope::Year(year) => scorer.score_year(year)?,
        };

        self.ensure_live(generation)?;
        let result = Arc::new(CycleResult {
            generation,
            scores,
            weather,
            cache_hit,
            rate_limited,
            skipped_years,
        });
        *self.latest.write().await = Some(Arc::clone(&result));

        if rate_limited {
            info!(generation, "Weather archive rate limited; some years are missing");
        }
        PlannerLogger::log_cycle_completed(
            generation,
            result.scores.len(),
            cache_hit,
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_offline_cycle_scores_target_month() {
        let session = PlanningSession::new(&PlannerConfig::default(), None);
        let constraints = EventConstraints::new(date(2027, 6, 1), GeoPoint::new(48.1374, 11.5755));
        let request = PlanningRequest::target_month(constraints, date(2026, 10, 18));

        let result = session.run_cycle(&request).await.unwrap();
        assert_eq!(result.scores.len(), 30);
        assert!(result.weather.is_empty());
        assert!(!result.cache_hit);
        assert_eq!(session.latest().await.unwrap().generation, result.generation);
    }

    #[tokio::test]
    async fn test_invalid_constraints_fail_cycle() {
        let session = PlanningSession::new(&PlannerConfig::default(), None);
        let mut constraints =
            EventConstraints::new(date(2027, 6, 1), GeoPoint::new(48.1374, 11.5755));
        constraints.race_duration_hours = 0.0;
        let request = PlanningRequest::target_month(constraints, date(2026, 10, 18));

        let error = session.run_cycle(&request).await.unwrap_err();
        assert!(error.code.is_config());
        assert!(session.latest().await.is_none());
    }

    #[test]
    fn test_handle_advances_generation() {
        let session = PlanningSession::new(&PlannerConfig::default(), None);
        let handle = session.handle();
        assert_eq!(handle.current(), 0);
        assert_eq!(handle.supersede(), 1);
        assert_eq!(
            session.ensure_live(0).unwrap_err().code,
            ErrorCode::CycleSuperseded
        );
        assert!(session.ensure_live(1).is_ok());
    }
}
