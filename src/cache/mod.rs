// ABOUTME: Cache layer for aggregated weather histories keyed by location or route and year
// ABOUTME: Provides the cache key type and the in-memory LRU implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

/// In-memory cache implementation
pub mod memory;

use std::fmt;

use raceday_core::models::GeoPoint;
use serde::{Deserialize, Serialize};

pub use memory::WeatherCache;

/// Cache key for one aggregated history
///
/// The signature identifies a single point or an ordered route; the year is
/// the target year the trailing history was sampled for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Location or route signature
    pub signature: String,
    /// Target year
    pub year: i32,
}

impl CacheKey {
    /// Key for a single location
    #[must_use]
    pub fn for_location(point: &GeoPoint, year: i32) -> Self {
        Self {
            signature: point.signature(),
            year,
        }
    }

    /// Key for an ordered route; point order is significant
    #[must_use]
    pub fn for_route(points: &[GeoPoint], year: i32) -> Self {
        let signature = points
            .iter()
            .map(GeoPoint::signature)
            .collect::<Vec<_>>()
            .join("|");
        Self { signature, year }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "history:{}:{}", self.signature, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_key_joins_points_in_order() {
        let a = GeoPoint::new(48.1374, 11.5755);
        let b = GeoPoint::new(47.4210, 10.9850);

        let single = CacheKey::for_location(&a, 2026);
        assert_eq!(single.to_string(), "history:48.1374,11.5755:2026");

        let forward = CacheKey::for_route(&[a.clone(), b.clone()], 2026);
        let backward = CacheKey::for_route(&[b, a], 2026);
        assert_ne!(forward, backward);
        assert_eq!(forward.signature, "48.1374,11.5755|47.4210,10.9850");
    }

    #[test]
    fn test_single_point_route_matches_location_key() {
        let a = GeoPoint::new(48.1374, 11.5755);
        assert_eq!(
            CacheKey::for_route(std::slice::from_ref(&a), 2026),
            CacheKey::for_location(&a, 2026)
        );
    }
}
