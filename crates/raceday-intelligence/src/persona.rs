// ABOUTME: Persona temperature curves and persona-independent weather penalties
// ABOUTME: Maps aggregated calendar-day weather to signed score deltas with readable labels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

//! Persona Weather Penalties
//!
//! Each persona owns one pure temperature curve. The remaining categories
//! (temperature swing, rain, acclimatization and trail conditions) apply to
//! every persona. All categories are additive and always recorded.

use raceday_core::constants::weather::{
    ACCLIMATIZATION_PENALTY, AUTUMN_COLD_THRESHOLD, HIGH_RAIN_PENALTY, HIGH_RAIN_PROBABILITY,
    HUMID_THRESHOLD, MUDDY_INDEX, MUDDY_PENALTY, SPRING_HEAT_THRESHOLD, TEMP_SWING_PENALTY,
    TEMP_SWING_THRESHOLD, VERY_MUDDY_INDEX, VERY_MUDDY_PENALTY, WINDY_THRESHOLD_KMH,
};
use raceday_core::models::{Persona, WeatherStats};

use crate::ledger::RuleOutcome;

/// Breakdown label for the diurnal swing category
pub const SWING_LABEL: &str = "Temperature Swing";
/// Breakdown label for the rain category
pub const RAIN_LABEL: &str = "Rain Risk";
/// Breakdown label for the seasonal acclimatization category
pub const ACCLIMATIZATION_LABEL: &str = "Acclimatization";
/// Breakdown label for the mud category
pub const TRAIL_LABEL: &str = "Trail Conditions";

/// Result of a temperature curve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemperatureAssessment {
    /// Signed score delta
    pub delta: i32,
    /// Short description such as `"ideal"` or `"chilly + windchill"`
    pub label: String,
}

impl TemperatureAssessment {
    fn new(delta: i32, label: impl Into<String>) -> Self {
        Self {
            delta,
            label: label.into(),
        }
    }

    /// Add a wind penalty on top of the base band
    fn with_wind(mut self, delta: i32, suffix: &str) -> Self {
        self.delta += delta;
        self.label = format!("{} + {suffix}", self.label);
        self
    }
}

/// Performance curve: cool is ideal, humidity narrows the warm bands
#[must_use]
pub fn competition_curve(temp: f64, humidity: f64, wind: f64) -> TemperatureAssessment {
    let humid = humidity > HUMID_THRESHOLD;
    let windy = wind > WINDY_THRESHOLD_KMH;
    let warm_upper = if humid { 15.0 } else { 18.0 };
    let hot_upper = if humid { 22.0 } else { 25.0 };

    match temp {
        t if (5.0..=12.0).contains(&t) => TemperatureAssessment::new(0, "ideal"),
        t if t > 12.0 && t <= warm_upper => TemperatureAssessment::new(-10, "warm"),
        t if t > 12.0 && t <= hot_upper => {
            TemperatureAssessment::new(-20, if humid { "humid & hot" } else { "hot" })
        }
        t if t > 12.0 => TemperatureAssessment::new(-30, "very hot"),
        t if t >= 0.0 => {
            let chilly = TemperatureAssessment::new(-10, "chilly");
            if windy {
                chilly.with_wind(-10, "windchill")
            } else {
                chilly
            }
        }
        t if t >= -5.0 => {
            let freezing = TemperatureAssessment::new(-20, "freezing");
            if windy {
                freezing.with_wind(-15, "severe windchill")
            } else {
                freezing
            }
        }
        _ => TemperatureAssessment::new(-30, "deep freeze"),
    }
}

/// Enjoyment curve: mild is ideal, wind adds to any cool band
#[must_use]
pub fn experience_curve(temp: f64, wind: f64) -> TemperatureAssessment {
    let base = match temp {
        t if (15.0..=22.0).contains(&t) => TemperatureAssessment::new(0, "ideal"),
        t if t > 22.0 && t <= 26.0 => TemperatureAssessment::new(-10, "warm"),
        t if t > 26.0 => TemperatureAssessment::new(-30, "very hot"),
        t if t >= 10.0 => TemperatureAssessment::new(-10, "cool"),
        t if t >= 5.0 => TemperatureAssessment::new(-20, "chilly"),
        _ => TemperatureAssessment::new(-40, "too cold"),
    };

    if temp < 15.0 && wind > WINDY_THRESHOLD_KMH {
        base.with_wind(-10, "wind")
    } else {
        base
    }
}

/// Temperature penalty for a persona, using the average daily maximum
#[must_use]
pub fn temperature_penalty(stats: &WeatherStats, persona: Persona) -> TemperatureAssessment {
    match persona {
        Persona::Competition => {
            competition_curve(stats.avg_max_temp, stats.avg_humidity, stats.max_wind_speed)
        }
        Persona::Experience => experience_curve(stats.avg_max_temp, stats.max_wind_speed),
    }
}

fn temperature_outcome(stats: &WeatherStats, persona: Persona) -> RuleOutcome {
    let assessment = temperature_penalty(stats, persona);
    let label = format!("Temperature ({})", assessment.label);
    if assessment.delta == 0 {
        return RuleOutcome::neutral(label);
    }
    RuleOutcome::with_reason(
        label,
        assessment.delta,
        format!(
            "{} temperatures ({:.1}°C average high)",
            assessment.label, stats.avg_max_temp
        ),
    )
}

fn swing_outcome(stats: &WeatherStats) -> RuleOutcome {
    let swing = stats.temperature_swing();
    if swing > TEMP_SWING_THRESHOLD {
        RuleOutcome::with_reason(
            SWING_LABEL,
            TEMP_SWING_PENALTY,
            format!("high temp swing ({swing:.1}°C between low and high)"),
        )
    } else {
        RuleOutcome::neutral(SWING_LABEL)
    }
}

fn rain_outcome(stats: &WeatherStats) -> RuleOutcome {
    if stats.rain_probability > HIGH_RAIN_PROBABILITY {
        RuleOutcome::with_reason(
            RAIN_LABEL,
            HIGH_RAIN_PENALTY,
            format!(
                "high rain risk ({:.0}% of years rainy)",
                stats.rain_probability
            ),
        )
    } else {
        RuleOutcome::neutral(RAIN_LABEL)
    }
}

fn acclimatization_outcome(stats: &WeatherStats, month: u32) -> RuleOutcome {
    match month {
        4..=6 if stats.avg_max_temp > SPRING_HEAT_THRESHOLD => RuleOutcome::with_reason(
            ACCLIMATIZATION_LABEL,
            ACCLIMATIZATION_PENALTY,
            "sudden heat risk before heat acclimatization",
        ),
        9..=11 if stats.avg_max_temp < AUTUMN_COLD_THRESHOLD => RuleOutcome::with_reason(
            ACCLIMATIZATION_LABEL,
            ACCLIMATIZATION_PENALTY,
            "sudden cold risk before cold acclimatization",
        ),
        _ => RuleOutcome::neutral(ACCLIMATIZATION_LABEL),
    }
}

/// Trail penalty for a mud index; never positive and non-increasing in the index
#[must_use]
pub fn mud_penalty(mud_index: f64) -> i32 {
    if mud_index > VERY_MUDDY_INDEX {
        VERY_MUDDY_PENALTY
    } else if mud_index > MUDDY_INDEX {
        MUDDY_PENALTY
    } else {
        0
    }
}

fn trail_outcome(stats: &WeatherStats) -> RuleOutcome {
    match mud_penalty(stats.mud_index) {
        0 => RuleOutcome::neutral(TRAIL_LABEL),
        delta if delta == VERY_MUDDY_PENALTY => RuleOutcome::with_reason(
            TRAIL_LABEL,
            delta,
            format!("very muddy trails (mud index {:.1})", stats.mud_index),
        ),
        delta => RuleOutcome::with_reason(
            TRAIL_LABEL,
            delta,
            format!("muddy trails (mud index {:.1})", stats.mud_index),
        ),
    }
}

/// Every weather category for a day in fixed order
#[must_use]
pub fn evaluate_weather(stats: &WeatherStats, month: u32, persona: Persona) -> Vec<RuleOutcome> {
    vec![
        temperature_outcome(stats, persona),
        swing_outcome(stats),
        rain_outcome(stats),
        acclimatization_outcome(stats, month),
        trail_outcome(stats),
    ]
}
