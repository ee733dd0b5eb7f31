// ABOUTME: Token-bucket request pacer for sequential historical weather retrieval
// ABOUTME: Supports burst capacity, steady refill and explicit back-off after rate limiting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

//! # Request pacing
//!
//! The archive allows a modest request rate. Every historical-year request
//! acquires one token first; tokens refill one per interval up to the burst
//! capacity. After a rate-limit response the pacer can be told to back off,
//! which holds all acquisitions until the delay has passed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::config::PlannerConfig;

#[derive(Debug)]
struct Bucket {
    tokens: u32,
    capacity: u32,
    interval: Duration,
    last_refill: Instant,
    blocked_until: Option<Instant>,
}

impl Bucket {
    fn refill(&mut self, now: Instant) {
        if self.interval.is_zero() {
            self.tokens = self.capacity;
            self.last_refill = now;
            return;
        }
        let elapsed = now.saturating_duration_since(self.last_refill);
        let earned = elapsed.as_nanos() / self.interval.as_nanos();
        if earned == 0 {
            return;
        }
        let earned = u32::try_from(earned).unwrap_or(u32::MAX);
        self.tokens = self.tokens.saturating_add(earned).min(self.capacity);
        if self.tokens == self.capacity {
            self.last_refill = now;
        } else {
            self.last_refill += self.interval * earned;
        }
    }

    /// Instant at which the next token can be taken; `None` if one is available now
    fn ready_at(&self, now: Instant) -> Option<Instant> {
        if let Some(until) = self.blocked_until.filter(|until| *until > now) {
            return Some(until);
        }
        if self.tokens > 0 {
            None
        } else {
            Some(self.last_refill + self.interval)
        }
    }
}

/// Shared token-bucket pacer; clones draw from the same bucket
#[derive(Debug, Clone)]
pub struct RequestPacer {
    bucket: Arc<Mutex<Bucket>>,
}

impl RequestPacer {
    /// Create a pacer that starts with a full bucket
    ///
    /// A zero burst is treated as one.
    #[must_use]
    pub fn new(interval: Duration, burst: u32) -> Self {
        let capacity = burst.max(1);
        Self {
            bucket: Arc::new(Mutex::new(Bucket {
                tokens: capacity,
                capacity,
                interval,
                last_refill: Instant::now(),
                blocked_until: None,
            })),
        }
    }

    /// Create a pacer from the planner configuration
    #[must_use]
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.request_interval, config.request_burst)
    }

    /// Take a token if one is available right now
    pub async fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock().await;
        let now = Instant::now();
        bucket.refill(now);
        if bucket.ready_at(now).is_some() {
            return false;
        }
        bucket.tokens -= 1;
        true
    }

    /// Wait until a token is available and take it
    pub async fn acquire(&self) {
        loop {
            let mut bucket = self.bucket.lock().await;
            let now = Instant::now();
            bucket.refill(now);
            match bucket.ready_at(now) {
                None => {
                    bucket.tokens -= 1;
                    return;
                }
                Some(at) => {
                    drop(bucket);
                    debug!(wait_ms = at.saturating_duration_since(now).as_millis(), "Pacing request");
                    sleep_until(at).await;
                }
            }
        }
    }

    /// Hold all acquisitions for at least `delay` from now
    pub async fn back_off(&self, delay: Duration) {
        let until = Instant::now() + delay;
        let mut bucket = self.bucket.lock().await;
        bucket.blocked_until = Some(bucket.blocked_until.map_or(until, |b| b.max(until)));
    }

    /// Tokens available right now
    pub async fn available(&self) -> u32 {
        let mut bucket = self.bucket.lock().await;
        let now = Instant::now();
        bucket.refill(now);
        if bucket.blocked_until.is_some_and(|until| until > now) {
            0
        } else {
            bucket.tokens
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_then_steady_rate() {
        let pacer = RequestPacer::new(Duration::from_secs(1), 2);
        let start = Instant::now();

        pacer.acquire().await;
        pacer.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(!pacer.try_acquire().await);

        pacer.acquire().await;
        assert_eq!(start.elapsed(), Duration::from_secs(1));
        pacer.acquire().await;
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refill_caps_at_burst() {
        let pacer = RequestPacer::new(Duration::from_millis(100), 3);
        for _ in 0..3 {
            assert!(pacer.try_acquire().await);
        }
        assert_eq!(pacer.available().await, 0);
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(pacer.available().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_off_holds_acquisition() {
        let pacer = RequestPacer::new(Duration::from_millis(10), 5);
        pacer.back_off(Duration::from_secs(5)).await;
        assert_eq!(pacer.available().await, 0);
        assert!(!pacer.try_acquire().await);

        let start = Instant::now();
        pacer.acquire().await;
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_burst_behaves_as_one() {
        let pacer = RequestPacer::new(Duration::from_secs(1), 0);
        assert!(pacer.try_acquire().await);
        assert!(!pacer.try_acquire().await);
    }
}
