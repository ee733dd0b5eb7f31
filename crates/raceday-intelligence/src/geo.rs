// ABOUTME: Great-circle distance between geographic points
// ABOUTME: Used to decide whether a competing event is within the search radius
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use raceday_core::constants::units::EARTH_RADIUS_KM;
use raceday_core::models::GeoPoint;

/// Haversine distance in kilometers
#[must_use]
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // Munich to Stuttgart: ~190 km
        let munich = GeoPoint::new(48.1374, 11.5755);
        let stuttgart = GeoPoint::new(48.7758, 9.1829);
        let distance = haversine_km(&munich, &stuttgart);
        assert!((distance - 190.0).abs() < 5.0, "got {distance}");

        assert!(haversine_km(&munich, &munich).abs() < 1e-9);
    }
}
