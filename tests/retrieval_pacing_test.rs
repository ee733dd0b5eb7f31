// ABOUTME: Integration tests for paced multi-year history retrieval
// ABOUTME: Uses a paused tokio clock to verify pacing and rate-limit back-off
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{date, ScriptedSource};
use raceday_planner::models::{GeoPoint, MonthSpan};
use raceday_planner::rate_limiting::RequestPacer;
use raceday_planner::retrieval::{HistoryError, HistoryRetriever};
use tokio::time::Instant;

fn point() -> GeoPoint {
    GeoPoint::new(48.1374, 11.5755)
}

#[tokio::test(start_paused = true)]
async fn test_years_are_requested_one_interval_apart() {
    let retriever = HistoryRetriever::new(
        Arc::new(ScriptedSource::new()),
        RequestPacer::new(Duration::from_secs(1), 1),
        4,
    );
    let start = Instant::now();
    let outcome = retriever
        .fetch_point(&point(), MonthSpan::single(6).unwrap(), 2027, date(2026, 10, 18))
        .await;

    assert_eq!(outcome.years_retrieved(), 4);
    assert!(outcome.skipped.is_empty());
    assert_eq!(start.elapsed(), Duration::from_secs(3));

    let years: Vec<i32> = outcome.histories[0].years.iter().map(|y| y.year).collect();
    assert_eq!(years, vec![2022, 2023, 2024, 2025]);

    let june = &outcome.histories[0].years[0].samples;
    assert_eq!(june.first().unwrap().date, date(2022, 5, 27));
    assert_eq!(june.last().unwrap().date, date(2022, 6, 30));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_backs_off_and_continues() {
    let source = ScriptedSource::new().failing(
        2023,
        HistoryError::RateLimited {
            retry_after: Some(Duration::from_secs(10)),
        },
    );
    let retriever = HistoryRetriever::new(
        Arc::new(source),
        RequestPacer::new(Duration::from_secs(1), 1),
        3,
    );
    let start = Instant::now();
    let outcome = retriever
        .fetch_point(&point(), MonthSpan::single(6).unwrap(), 2026, date(2026, 10, 18))
        .await;

    // 2023 at t=0 is rejected, 2024 waits out the back-off, 2025 one interval later
    assert!(outcome.rate_limited);
    assert_eq!(outcome.skipped, vec![(point().signature(), 2023)]);
    assert_eq!(outcome.years_retrieved(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(11));
}

#[tokio::test(start_paused = true)]
async fn test_route_points_share_one_pacer() {
    let source = Arc::new(ScriptedSource::new());
    let retriever = HistoryRetriever::new(
        Arc::clone(&source) as Arc<dyn raceday_planner::retrieval::HistorySource>,
        RequestPacer::new(Duration::from_millis(500), 2),
        2,
    );
    let points = [point(), GeoPoint::new(47.42, 10.98)];
    let start = Instant::now();
    let outcome = retriever
        .fetch_route(&points, MonthSpan::full_year(), 2027, date(2026, 10, 18))
        .await;

    assert_eq!(source.calls(), 4);
    assert_eq!(outcome.histories.len(), 2);
    assert_eq!(outcome.histories[1].point, points[1]);
    // Two burst tokens, then two refills
    assert_eq!(start.elapsed(), Duration::from_secs(1));
}
