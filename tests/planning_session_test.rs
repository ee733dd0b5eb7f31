// ABOUTME: Integration tests for planning sessions over a scripted history source
// ABOUTME: Covers cache reuse, supersession, rate limiting and route sampling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{date, fast_config, ScriptedSource};
use raceday_planner::cache::CacheKey;
use raceday_planner::errors::ErrorCode;
use raceday_planner::models::{CalendarDay, EventConstraints, GeoPoint, ScoreStatus};
use raceday_planner::retrieval::{HistoryError, HistorySource};
use raceday_planner::session::{PlanningRequest, PlanningSession, ScoringScope};
use tokio::sync::Notify;

fn munich() -> GeoPoint {
    GeoPoint::new(48.1374, 11.5755)
}

fn june_request() -> PlanningRequest {
    let constraints = EventConstraints::new(date(2027, 6, 1), munich());
    PlanningRequest::target_month(constraints, date(2026, 10, 18))
}

#[tokio::test]
async fn test_cycle_retrieves_then_reuses_cache() {
    let source = Arc::new(ScriptedSource::new());
    let session = PlanningSession::new(
        &fast_config(3),
        Some(Arc::clone(&source) as Arc<dyn HistorySource>),
    );

    let first = session.run_cycle(&june_request()).await.unwrap();
    assert_eq!(source.calls(), 3);
    assert!(!first.cache_hit);
    assert!(!first.rate_limited);
    assert_eq!(first.scores.len(), 30);

    // Full calendar years with a five-day lead window, 2023-2025
    let requests = source.requests();
    assert_eq!(requests[0].1, date(2022, 12, 27));
    assert_eq!(requests[0].2, date(2023, 12, 31));
    assert_eq!(requests[2].2, date(2025, 12, 31));

    let stats = first.weather.get(&CalendarDay::new(6, 19).unwrap()).unwrap();
    assert_eq!(stats.sample_years, 3);

    let saturday = first
        .scores
        .iter()
        .find(|d| d.date == date(2027, 6, 19))
        .unwrap();
    assert_eq!(saturday.score, 100);
    assert_eq!(saturday.status, ScoreStatus::Green);

    let second = session.run_cycle(&june_request()).await.unwrap();
    assert!(second.cache_hit);
    assert_eq!(source.calls(), 3);
    assert!(second.generation > first.generation);
    assert_eq!(
        session.latest().await.unwrap().generation,
        second.generation
    );
}

#[tokio::test]
async fn test_superseded_cycle_is_discarded() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let source = ScriptedSource::new().gated(Arc::clone(&entered), Arc::clone(&release));
    let session = PlanningSession::new(&fast_config(1), Some(Arc::new(source)));
    let handle = session.handle();

    let running = {
        let session = session.clone();
        tokio::spawn(async move { session.run_cycle(&june_request()).await })
    };

    entered.notified().await;
    handle.supersede();
    release.notify_one();

    let error = running.await.unwrap().unwrap_err();
    assert_eq!(error.code, ErrorCode::CycleSuperseded);
    assert!(session.cache().is_empty().await);
    assert!(session.latest().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_year_is_skipped_and_not_cached() {
    let source = ScriptedSource::new().failing(
        2024,
        HistoryError::RateLimited {
            retry_after: Some(Duration::from_secs(30)),
        },
    );
    let session = PlanningSession::new(&fast_config(3), Some(Arc::new(source)));

    let result = session.run_cycle(&june_request()).await.unwrap();
    assert!(result.rate_limited);
    assert_eq!(result.skipped_years, 1);

    let stats = result.weather.get(&CalendarDay::new(6, 1).unwrap()).unwrap();
    assert_eq!(stats.sample_years, 2);
    assert!(stats.samples.iter().all(|s| s.year != 2024));
    assert!(session.cache().is_empty().await);
}

#[tokio::test]
async fn test_transport_failures_degrade_to_missing_weather() {
    let source = ScriptedSource::new()
        .failing(2025, HistoryError::Transport("connection reset".into()));
    let session = PlanningSession::new(&fast_config(1), Some(Arc::new(source)));

    let result = session.run_cycle(&june_request()).await.unwrap();
    assert!(!result.rate_limited);
    assert_eq!(result.skipped_years, 1);
    assert!(result.weather.is_empty());
    assert!(result.scores.iter().all(|d| d.details.weather.is_none()));
    assert!(session.cache().is_empty().await);
}

#[tokio::test]
async fn test_route_is_cached_under_route_key() {
    let source = Arc::new(ScriptedSource::new());
    let session = PlanningSession::new(
        &fast_config(2),
        Some(Arc::clone(&source) as Arc<dyn HistorySource>),
    );
    let summit = GeoPoint::new(50.1374, 11.5755);

    let mut request = june_request();
    request.route = vec![munich(), summit.clone()];
    request.scope = ScoringScope::Year(2027);

    let result = session.run_cycle(&request).await.unwrap();
    assert_eq!(source.calls(), 4);
    assert_eq!(result.scores.len(), 365);

    // Munich averages 8.1 °C, the second point 10.1 °C
    let stats = result.weather.get(&CalendarDay::new(3, 14).unwrap()).unwrap();
    assert!((stats.avg_max_temp - 9.1374).abs() < 1e-6);

    let key = CacheKey::for_route(&[munich(), summit], 2027);
    assert!(session.cache().get(&key).await.is_some());
    assert!(session
        .cache()
        .get(&CacheKey::for_location(&munich(), 2027))
        .await
        .is_none());
}
