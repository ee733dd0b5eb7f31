// ABOUTME: Civil dawn, sunrise, sunset and civil dusk via the NREL solar position algorithm
// ABOUTME: Measures how much of the race window falls outside daylight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use raceday_core::constants::calendar::HEADLAMP_DARKNESS_MINUTES;
use raceday_core::constants::units::MINUTES_PER_HOUR;
use raceday_core::models::GeoPoint;
use solar_positioning::{spa, time::DeltaT, types::SunriseResult, Horizon};
use tracing::debug;

use crate::ledger::RuleOutcome;

/// Breakdown label for the informational darkness entry
pub const DARKNESS_LABEL: &str = "Darkness Hours";

/// Solar events for one local date
///
/// Times are local wall-clock times in the event timezone. During polar day
/// sunrise and sunset span the whole date; during polar night they are absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarDay {
    /// Start of civil twilight
    pub civil_dawn: Option<NaiveDateTime>,
    /// Sunrise
    pub sunrise: Option<NaiveDateTime>,
    /// Sunset
    pub sunset: Option<NaiveDateTime>,
    /// End of civil twilight
    pub civil_dusk: Option<NaiveDateTime>,
}

impl SolarDay {
    /// The `[sunrise, sunset]` window, if the sun rises at all
    #[must_use]
    pub fn daylight_window(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.sunrise?, self.sunset?))
    }

    /// Hours between sunrise and sunset (zero during polar night)
    #[must_use]
    pub fn daylight_hours(&self) -> f64 {
        self.daylight_window().map_or(0.0, |(rise, set)| {
            (set - rise).num_minutes() as f64 / MINUTES_PER_HOUR
        })
    }
}

/// Daylight facts for a scored day
#[derive(Debug, Clone, PartialEq)]
pub struct DaylightAssessment {
    /// Solar events, `None` if they could not be computed
    pub solar: Option<SolarDay>,
    /// Race minutes between sunrise and sunset
    pub daylight_minutes_in_race: Option<i64>,
    /// Race minutes outside sunrise to sunset
    pub darkness_minutes: Option<i64>,
    /// Breakdown outcome (always zero-valued)
    pub outcome: RuleOutcome,
}

/// First instant of a local date; 01:00 where clocks skip midnight
fn day_start(date: NaiveDate, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&date.and_hms_opt(1, 0, 0)?)
                .earliest()
        })
}

fn events(
    anchor: DateTime<Tz>,
    point: &GeoPoint,
    delta_t: f64,
    horizon: Horizon,
) -> Option<(Option<NaiveDateTime>, Option<NaiveDateTime>)> {
    let result =
        spa::sunrise_sunset_for_horizon(anchor, point.lat, point.lng, delta_t, horizon).ok()?;
    let local = anchor.date_naive().and_time(NaiveTime::MIN);
    Some(match result {
        SunriseResult::RegularDay {
            sunrise, sunset, ..
        } => (Some(sunrise.naive_local()), Some(sunset.naive_local())),
        SunriseResult::AllDay { .. } => (Some(local), Some(local + Duration::days(1))),
        SunriseResult::AllNight { .. } => (None, None),
    })
}

/// Compute solar events for a local date; `None` if the computation fails
#[must_use]
pub fn solar_day(date: NaiveDate, point: &GeoPoint, tz: Tz) -> Option<SolarDay> {
    let anchor = day_start(date, tz)?;
    let delta_t = DeltaT::estimate_from_date(date.year(), date.month()).ok()?;

    let (sunrise, sunset) = events(anchor, point, delta_t, Horizon::SunriseSunset)?;
    let (civil_dawn, civil_dusk) = events(anchor, point, delta_t, Horizon::CivilTwilight)?;

    Some(SolarDay {
        civil_dawn,
        sunrise,
        sunset,
        civil_dusk,
    })
}

/// Minutes of intersection between two intervals, never negative
#[must_use]
pub fn overlap_minutes(
    a: (NaiveDateTime, NaiveDateTime),
    b: (NaiveDateTime, NaiveDateTime),
) -> i64 {
    let start = a.0.max(b.0);
    let end = a.1.min(b.1);
    (end - start).num_minutes().max(0)
}

/// Format minutes as `"Xh Ymin"`
#[must_use]
pub fn format_duration(minutes: i64) -> String {
    format!("{}h {}min", minutes / 60, minutes % 60)
}

/// Race window on `date` in local wall-clock time
#[must_use]
pub fn race_window(
    date: NaiveDate,
    start: NaiveTime,
    duration_minutes: i64,
) -> (NaiveDateTime, NaiveDateTime) {
    let begin = date.and_time(start);
    (begin, begin + Duration::minutes(duration_minutes))
}

/// Compare the race window with daylight for one date
///
/// Darkness is informational only: the breakdown entry is always zero, and a
/// headlamp reason is added when more than half an hour is spent in the dark.
#[must_use]
pub fn assess_daylight(
    date: NaiveDate,
    point: &GeoPoint,
    tz: Tz,
    start: NaiveTime,
    duration_minutes: i64,
) -> DaylightAssessment {
    let Some(solar) = solar_day(date, point, tz) else {
        debug!(%date, "Solar events unavailable");
        return DaylightAssessment {
            solar: None,
            daylight_minutes_in_race: None,
            darkness_minutes: None,
            outcome: RuleOutcome::neutral(DARKNESS_LABEL),
        };
    };

    let race = race_window(date, start, duration_minutes);
    let daylight = solar
        .daylight_window()
        .map_or(0, |window| overlap_minutes(race, window));
    let darkness = (duration_minutes - daylight).max(0);

    let mut outcome = RuleOutcome::neutral(DARKNESS_LABEL);
    if darkness > HEADLAMP_DARKNESS_MINUTES {
        outcome.reasons.push(format!(
            "headlamp required: {} of the race in darkness",
            format_duration(darkness)
        ));
    }

    DaylightAssessment {
        solar: Some(solar),
        daylight_minutes_in_race: Some(daylight),
        darkness_minutes: Some(darkness),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }

    fn munich() -> GeoPoint {
        GeoPoint::new(48.1374, 11.5755)
    }

    #[test]
    fn test_overlap_minutes() {
        let d = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        assert_eq!(
            overlap_minutes((at(d, 8, 0), at(d, 14, 0)), (at(d, 5, 0), at(d, 21, 0))),
            360
        );
        assert_eq!(
            overlap_minutes((at(d, 5, 0), at(d, 9, 0)), (at(d, 7, 30), at(d, 17, 0))),
            90
        );
        assert_eq!(
            overlap_minutes((at(d, 1, 0), at(d, 3, 0)), (at(d, 7, 30), at(d, 17, 0))),
            0
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(95), "1h 35min");
        assert_eq!(format_duration(45), "0h 45min");
    }

    #[test]
    fn test_summer_race_is_in_daylight() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 20).unwrap();
        let start = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let assessment = assess_daylight(date, &munich(), chrono_tz::Europe::Berlin, start, 360);

        let solar = assessment.solar.unwrap();
        let sunrise = solar.sunrise.unwrap();
        // Munich midsummer sunrise is about 05:12 local
        assert!(sunrise > at(date, 4, 45) && sunrise < at(date, 5, 40), "{sunrise}");
        assert!(solar.civil_dawn.unwrap() < sunrise);
        assert!(solar.civil_dusk.unwrap() > solar.sunset.unwrap());
        assert!(solar.daylight_hours() > 15.0);

        assert_eq!(assessment.darkness_minutes, Some(0));
        assert_eq!(assessment.daylight_minutes_in_race, Some(360));
        assert_eq!(assessment.outcome.delta, 0);
        assert!(assessment.outcome.reasons.is_empty());
    }

    #[test]
    fn test_winter_ultra_needs_headlamp() {
        let date = NaiveDate::from_ymd_opt(2026, 12, 19).unwrap();
        let start = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
        let assessment = assess_daylight(date, &munich(), chrono_tz::Europe::Berlin, start, 600);

        let darkness = assessment.darkness_minutes.unwrap();
        let daylight = assessment.daylight_minutes_in_race.unwrap();
        assert_eq!(darkness, 600 - daylight);
        assert!(darkness > HEADLAMP_DARKNESS_MINUTES);
        assert_eq!(assessment.outcome.label, DARKNESS_LABEL);
        assert_eq!(assessment.outcome.delta, 0);
        assert!(assessment.outcome.reasons[0].starts_with("headlamp required"));
    }

    #[test]
    fn test_polar_night_has_no_daylight() {
        let tromso = GeoPoint::new(69.6492, 18.9553);
        let date = NaiveDate::from_ymd_opt(2026, 12, 21).unwrap();
        let start = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let assessment = assess_daylight(date, &tromso, chrono_tz::Europe::Oslo, start, 120);

        let solar = assessment.solar.unwrap();
        assert!(solar.sunrise.is_none());
        assert!(solar.daylight_hours().abs() < f64::EPSILON);
        assert_eq!(assessment.darkness_minutes, Some(120));
    }

    #[test]
    fn test_dst_jump_at_midnight_still_has_events() {
        // Chile springs forward from 00:00 to 01:00 on this date
        let santiago = GeoPoint::new(-33.45, -70.66);
        let date = NaiveDate::from_ymd_opt(2026, 9, 6).unwrap();
        let tz = chrono_tz::America::Santiago;
        assert!(tz
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .earliest()
            .is_none());

        let solar = solar_day(date, &santiago, tz).unwrap();
        let sunrise = solar.sunrise.unwrap();
        let sunset = solar.sunset.unwrap();
        assert_eq!(sunrise.date(), date);
        assert_eq!(sunset.date(), date);
        assert!((6..=9).contains(&sunrise.hour()), "{sunrise}");
        assert!((18..=21).contains(&sunset.hour()), "{sunset}");
        assert!(solar.civil_dawn.unwrap() < sunrise);

        let start = NaiveTime::from_hms_opt(5, 0, 0).unwrap();
        let assessment = assess_daylight(date, &santiago, tz, start, 240);
        assert_eq!(
            assessment.darkness_minutes.unwrap() + assessment.daylight_minutes_in_race.unwrap(),
            240
        );
        assert!(assessment.darkness_minutes.unwrap() > 0);
    }

    #[test]
    fn test_midnight_sun_covers_whole_day() {
        let tromso = GeoPoint::new(69.6492, 18.9553);
        let date = NaiveDate::from_ymd_opt(2026, 6, 21).unwrap();
        let start = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
        let assessment = assess_daylight(date, &tromso, chrono_tz::Europe::Oslo, start, 180);

        // The window ends at the following midnight
        assert_eq!(assessment.daylight_minutes_in_race, Some(180));
        assert_eq!(assessment.darkness_minutes, Some(0));
    }
}
