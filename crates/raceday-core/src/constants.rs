// ABOUTME: Named scoring thresholds, penalty magnitudes, and unit conversions
// ABOUTME: Single source of truth for every number the day-scoring engine relies on
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

//! Scoring constants
//!
//! Every threshold and penalty used by the scoring engine lives here so the
//! two persona curves, the calendar rules and the weather aggregation stay
//! comparable across implementations. Penalties are signed score deltas.

/// Overall score composition
pub mod scoring {
    /// Every day starts from this score before penalties are applied
    pub const BASE_SCORE: i32 = 100;

    /// Upper bound of the clamped score
    pub const MAX_SCORE: i32 = 100;

    /// Lower bound of the clamped score
    pub const MIN_SCORE: i32 = 0;

    /// Delta recorded by a hard fail; always drives the clamped score to zero
    pub const HARD_FAIL_PENALTY: i32 = -100;

    /// Scores strictly below this are red
    pub const RED_BELOW: u8 = 40;

    /// Scores strictly above this are green; the boundary itself is yellow
    pub const GREEN_ABOVE: u8 = 80;
}

/// Calendar rule penalties and thresholds
pub mod calendar {
    /// Penalty for a holiday when holiday impact is negative
    pub const HOLIDAY_PENALTY: i32 = -30;

    /// Penalty applied once per day when nearby events compete for the date
    pub const CONFLICT_PENALTY: i32 = -30;

    /// Training lead ratio below which the day hard-fails
    pub const TRAINING_HARD_FAIL_RATIO: f64 = 0.5;

    /// Darkness beyond this many minutes warrants a headlamp reason
    pub const HEADLAMP_DARKNESS_MINUTES: i64 = 30;
}

/// Weather aggregation thresholds
pub mod aggregation {
    /// Trailing sample years used by default
    pub const DEFAULT_HISTORY_YEARS: u32 = 10;

    /// Extra days fetched before the first requested day for the mud index
    pub const LEAD_WINDOW_DAYS: i64 = 5;

    /// Days of trailing precipitation averaged into the mud index
    pub const MUD_LOOKBACK_DAYS: i64 = 3;

    /// Daily precipitation above this counts as a rainy year (mm)
    pub const RAIN_THRESHOLD_MM: f64 = 1.0;

    /// Daily precipitation above this counts as a heavy-rain year (mm)
    pub const HEAVY_RAIN_THRESHOLD_MM: f64 = 5.0;

    /// Fallback offset when a year has no minimum temperature (°C below max)
    pub const MIN_TEMP_FALLBACK_OFFSET: f64 = 10.0;

    /// Humidity assumed when a year has no humidity reading (%)
    pub const DEFAULT_HUMIDITY: f64 = 50.0;

    /// Wind assumed when a year has no wind reading (km/h)
    pub const DEFAULT_WIND_KMH: f64 = 0.0;
}

/// Persona-independent weather penalties
pub mod weather {
    /// Relative humidity above which warm and hot bands shrink (%)
    pub const HUMID_THRESHOLD: f64 = 70.0;

    /// Wind above which windchill penalties apply (km/h)
    pub const WINDY_THRESHOLD_KMH: f64 = 20.0;

    /// Day/night temperature spread that destabilizes pacing (°C)
    pub const TEMP_SWING_THRESHOLD: f64 = 15.0;

    /// Penalty for a large diurnal temperature swing
    pub const TEMP_SWING_PENALTY: i32 = -15;

    /// Rain probability above which the rain penalty applies (%)
    pub const HIGH_RAIN_PROBABILITY: f64 = 50.0;

    /// Penalty for high rain probability
    pub const HIGH_RAIN_PENALTY: i32 = -40;

    /// Spring heat: average max above this in April-June (°C)
    pub const SPRING_HEAT_THRESHOLD: f64 = 15.0;

    /// Autumn cold: average max below this in September-November (°C)
    pub const AUTUMN_COLD_THRESHOLD: f64 = 5.0;

    /// Penalty for an acclimatization risk
    pub const ACCLIMATIZATION_PENALTY: i32 = -10;

    /// Mud index above which trails count as very muddy
    pub const VERY_MUDDY_INDEX: f64 = 15.0;

    /// Mud index above which trails count as muddy
    pub const MUDDY_INDEX: f64 = 5.0;

    /// Penalty for very muddy trails
    pub const VERY_MUDDY_PENALTY: i32 = -30;

    /// Penalty for muddy trails
    pub const MUDDY_PENALTY: i32 = -10;
}

/// Unit conversion constants
pub mod units {
    /// Minutes per hour
    pub const MINUTES_PER_HOUR: f64 = 60.0;

    /// Days per week
    pub const DAYS_PER_WEEK: i64 = 7;

    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
}

/// Defaults for freshly created event constraints
pub mod defaults {
    /// Default IANA timezone for events
    pub const TIMEZONE: &str = "Europe/Berlin";

    /// Default minimum training lead (weeks)
    pub const MIN_TRAINING_WEEKS: u32 = 12;

    /// Default race start hour (local time)
    pub const RACE_START_HOUR: u32 = 8;

    /// Default race duration (hours)
    pub const RACE_DURATION_HOURS: f64 = 6.0;

    /// Default nominal event distance (km)
    pub const DISTANCE_KM: f64 = 50.0;

    /// Default radius for conflicting-event searches (km)
    pub const CONFLICT_RADIUS_KM: f64 = 50.0;
}
