// ABOUTME: Aggregates multi-year daily weather series into per-calendar-day statistics
// ABOUTME: Computes means, rain probabilities and the trailing-rain mud index, per point or per route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

//! Weather History Aggregation
//!
//! For every calendar day inside the requested months, each historical year
//! contributes one observation when both its maximum temperature and its
//! precipitation are present. Days with no valid year get no entry at all;
//! callers must treat them as unknown rather than as zero.
//!
//! Route mode aggregates every sample point independently and then takes the
//! unweighted arithmetic mean of each statistic across the points that have
//! an entry for the day.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate};
use raceday_core::constants::aggregation::{
    DEFAULT_HUMIDITY, DEFAULT_WIND_KMH, HEAVY_RAIN_THRESHOLD_MM, LEAD_WINDOW_DAYS,
    MIN_TEMP_FALLBACK_OFFSET, MUD_LOOKBACK_DAYS, RAIN_THRESHOLD_MM,
};
use raceday_core::models::{
    CalendarDay, DailySample, MonthSpan, PointHistory, WeatherHistory, WeatherStats, YearSample,
    YearSeries,
};
use tracing::debug;

/// First date to fetch for a year so the mud index of the first requested day is complete
#[must_use]
pub fn lead_window_start(span: MonthSpan, year: i32) -> Option<NaiveDate> {
    span.start_in(year)
        .map(|start| start - Duration::days(LEAD_WINDOW_DAYS))
}

/// Per-day accumulator across years
#[derive(Default)]
struct DayAccumulator {
    samples: Vec<YearSample>,
    mud_sum: f64,
    rainy_years: u32,
    heavy_years: u32,
}

impl DayAccumulator {
    fn push(&mut self, sample: YearSample, trailing_mud: f64) {
        if sample.precipitation > RAIN_THRESHOLD_MM {
            self.rainy_years += 1;
        }
        if sample.precipitation > HEAVY_RAIN_THRESHOLD_MM {
            self.heavy_years += 1;
        }
        self.mud_sum += trailing_mud;
        self.samples.push(sample);
    }

    fn finish(self) -> Option<WeatherStats> {
        if self.samples.is_empty() {
            return None;
        }
        let years = self.samples.len() as f64;
        let mean = |field: fn(&YearSample) -> f64| self.samples.iter().map(field).sum::<f64>() / years;

        Some(WeatherStats {
            avg_max_temp: mean(|s| s.temp_max),
            avg_min_temp: mean(|s| s.temp_min),
            avg_humidity: mean(|s| s.humidity),
            max_wind_speed: mean(|s| s.wind_max),
            avg_precipitation: mean(|s| s.precipitation),
            rain_probability: f64::from(self.rainy_years) / years * 100.0,
            heavy_rain_probability: f64::from(self.heavy_years) / years * 100.0,
            mud_index: self.mud_sum / years,
            sample_years: self.samples.len() as u32,
            samples: self.samples,
        })
    }
}

/// Convert a raw sample into a year observation, or `None` when the year is not usable
fn observation(year: i32, sample: &DailySample) -> Option<YearSample> {
    let temp_max = sample.temp_max.filter(|t| t.is_finite())?;
    let precipitation = sample.precipitation.filter(|p| p.is_finite())?;
    Some(YearSample {
        year,
        temp_max,
        temp_min: sample
            .temp_min
            .filter(|t| t.is_finite())
            .unwrap_or(temp_max - MIN_TEMP_FALLBACK_OFFSET),
        precipitation,
        humidity: sample
            .humidity
            .filter(|h| h.is_finite())
            .unwrap_or(DEFAULT_HUMIDITY),
        wind_max: sample
            .wind_max
            .filter(|w| w.is_finite())
            .unwrap_or(DEFAULT_WIND_KMH),
    })
}

/// Mean precipitation over the days immediately preceding `date`; gaps count as dry
fn trailing_precipitation(by_date: &HashMap<NaiveDate, &DailySample>, date: NaiveDate) -> f64 {
    let total: f64 = (1..=MUD_LOOKBACK_DAYS)
        .map(|offset| {
            by_date
                .get(&(date - Duration::days(offset)))
                .and_then(|s| s.precipitation)
                .filter(|p| p.is_finite())
                .unwrap_or(0.0)
        })
        .sum();
    total / MUD_LOOKBACK_DAYS as f64
}

/// Aggregate the yearly series of a single point
///
/// Only days of each series' own year that fall inside `span` are aggregated;
/// earlier lead-window days feed the mud index of the first requested days.
#[must_use]
pub fn aggregate_point(years: &[YearSeries], span: MonthSpan) -> WeatherHistory {
    let mut accumulators: BTreeMap<CalendarDay, DayAccumulator> = BTreeMap::new();

    for series in years {
        let by_date: HashMap<NaiveDate, &DailySample> =
            series.samples.iter().map(|s| (s.date, s)).collect();

        let mut used = 0_usize;
        for sample in &series.samples {
            if sample.date.year() != series.year || !span.contains(sample.date.month()) {
                continue;
            }
            let Some(observation) = observation(series.year, sample) else {
                continue;
            };
            let mud = trailing_precipitation(&by_date, sample.date);
            accumulators
                .entry(CalendarDay::of(sample.date))
                .or_default()
                .push(observation, mud);
            used += 1;
        }
        debug!(year = series.year, days = used, "Aggregated historical year");
    }

    accumulators
        .into_iter()
        .filter_map(|(day, acc)| acc.finish().map(|stats| (day, stats)))
        .collect()
}

/// Unweighted mean of each statistic across point histories
///
/// Raw samples are merged by averaging each year's values across the points
/// that observed that year.
#[must_use]
pub fn merge_point_histories(histories: &[WeatherHistory]) -> WeatherHistory {
    let mut per_day: BTreeMap<CalendarDay, Vec<&WeatherStats>> = BTreeMap::new();
    for history in histories {
        for (day, stats) in history {
            per_day.entry(*day).or_default().push(stats);
        }
    }

    per_day
        .into_iter()
        .map(|(day, stats)| (day, mean_stats(&stats)))
        .collect()
}

fn mean_stats(stats: &[&WeatherStats]) -> WeatherStats {
    let n = stats.len() as f64;
    let mean = |field: fn(&WeatherStats) -> f64| stats.iter().map(|s| field(s)).sum::<f64>() / n;

    WeatherStats {
        avg_max_temp: mean(|s| s.avg_max_temp),
        avg_min_temp: mean(|s| s.avg_min_temp),
        avg_humidity: mean(|s| s.avg_humidity),
        max_wind_speed: mean(|s| s.max_wind_speed),
        avg_precipitation: mean(|s| s.avg_precipitation),
        rain_probability: mean(|s| s.rain_probability),
        heavy_rain_probability: mean(|s| s.heavy_rain_probability),
        mud_index: mean(|s| s.mud_index),
        sample_years: stats.iter().map(|s| s.sample_years).max().unwrap_or(0),
        samples: merge_samples(stats),
    }
}

fn merge_samples(stats: &[&WeatherStats]) -> Vec<YearSample> {
    let mut by_year: BTreeMap<i32, Vec<&YearSample>> = BTreeMap::new();
    for sample in stats.iter().flat_map(|s| s.samples.iter()) {
        by_year.entry(sample.year).or_default().push(sample);
    }

    by_year
        .into_iter()
        .map(|(year, samples)| {
            let n = samples.len() as f64;
            let mean =
                |field: fn(&YearSample) -> f64| samples.iter().map(|s| field(s)).sum::<f64>() / n;
            YearSample {
                year,
                temp_max: mean(|s| s.temp_max),
                temp_min: mean(|s| s.temp_min),
                precipitation: mean(|s| s.precipitation),
                humidity: mean(|s| s.humidity),
                wind_max: mean(|s| s.wind_max),
            }
        })
        .collect()
}

/// Aggregate one or more route sample points into a single history
#[must_use]
pub fn aggregate_route(points: &[PointHistory], span: MonthSpan) -> WeatherHistory {
    match points {
        [] => WeatherHistory::new(),
        [single] => aggregate_point(&single.years, span),
        many => {
            let histories: Vec<WeatherHistory> = many
                .iter()
                .map(|point| aggregate_point(&point.years, span))
                .collect();
            debug!(points = histories.len(), "Merging route point histories");
            merge_point_histories(&histories)
        }
    }
}
