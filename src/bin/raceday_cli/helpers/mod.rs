// ABOUTME: Shared argument parsing and session setup for raceday-cli commands
// ABOUTME: Turns command-line flags into event constraints and runs planning cycles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

pub mod display;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, Offset, TimeZone};
use chrono_tz::Tz;
use clap::Args;
use raceday_planner::config::PlannerConfig;
use raceday_planner::errors::{AppError, AppResult};
use raceday_planner::external::OpenMeteoArchive;
use raceday_planner::loaders::{load_conflicts, load_holidays};
use raceday_planner::models::{EventConstraints, GeoPoint, Persona, RaceStartTime};
use raceday_planner::retrieval::HistorySource;
use raceday_planner::session::{CycleResult, PlanningRequest, PlanningSession, ScoringScope};
use tracing::warn;

/// Event and scoring options shared by all commands
#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Event latitude
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Event longitude
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    /// Display name of the event location
    #[arg(long)]
    pub name: Option<String>,

    /// Extra route points sampled for weather ("lat,lng"); repeat per point
    #[arg(long = "route", allow_negative_numbers = true)]
    pub route: Vec<String>,

    /// Region/state code used when selecting holidays
    #[arg(long, default_value = "")]
    pub region: String,

    /// Scoring persona (competition or experience)
    #[arg(long, default_value = "competition")]
    pub persona: Persona,

    /// Local race start (HH:MM)
    #[arg(long, default_value = "08:00")]
    pub start: String,

    /// Race duration in hours
    #[arg(long, default_value = "6")]
    pub duration: f64,

    /// Nominal distance in kilometers
    #[arg(long, default_value = "50")]
    pub distance: f64,

    /// Recommended training lead in weeks
    #[arg(long, default_value = "12")]
    pub min_weeks: u32,

    /// Skip the training lead rule
    #[arg(long)]
    pub no_training_check: bool,

    /// Rule out a date (YYYY-MM-DD); repeat per date
    #[arg(long = "block")]
    pub blocked: Vec<NaiveDate>,

    /// Disallow Saturdays and Sundays
    #[arg(long)]
    pub no_weekends: bool,

    /// Disallow Monday through Friday
    #[arg(long)]
    pub no_weekdays: bool,

    /// Treat holidays as ordinary days
    #[arg(long)]
    pub ignore_holidays: bool,

    /// Record holidays without penalizing them
    #[arg(long)]
    pub neutral_holidays: bool,

    /// Holiday JSON file
    #[arg(long)]
    pub holidays: Option<PathBuf>,

    /// Competing events JSON file; enables conflict checks
    #[arg(long)]
    pub conflicts: Option<PathBuf>,

    /// Conflict search radius in kilometers
    #[arg(long, default_value = "50")]
    pub conflict_radius: f64,

    /// IANA timezone of the event; without it `RACEDAY_TIMEZONE` applies,
    /// which itself defaults to Europe/Berlin
    #[arg(long)]
    pub timezone: Option<String>,

    /// Reference date for training lead (defaults to today)
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Score without retrieving historical weather
    #[arg(long)]
    pub offline: bool,
}

fn parse_point(raw: &str) -> AppResult<GeoPoint> {
    let malformed = || AppError::invalid_input(format!("route point '{raw}' is not 'lat,lng'"));
    let (lat, lng) = raw.split_once(',').ok_or_else(malformed)?;
    let point = GeoPoint::new(
        lat.trim().parse().map_err(|_| malformed())?,
        lng.trim().parse().map_err(|_| malformed())?,
    );
    point.validate()?;
    Ok(point)
}

/// Longitude offset beyond which a timezone is probably not the event's own
const TIMEZONE_MISMATCH_HOURS: f64 = 3.0;

/// Hours between a zone's UTC offset on `date` and the solar offset of `lng`
#[must_use]
pub fn timezone_drift_hours(tz: Tz, lng: f64, date: NaiveDate) -> f64 {
    let zone_hours = f64::from(tz.offset_from_utc_date(&date).fix().local_minus_utc()) / 3600.0;
    (zone_hours - lng / 15.0).abs()
}

impl PlanArgs {
    /// Build event constraints for a target month
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a malformed start time or timezone
    pub fn constraints(
        &self,
        config: &PlannerConfig,
        target_month: NaiveDate,
    ) -> AppResult<EventConstraints> {
        let location = match &self.name {
            Some(name) => GeoPoint::named(self.lat, self.lng, name.clone()),
            None => GeoPoint::new(self.lat, self.lng),
        };
        let timezone = match &self.timezone {
            Some(raw) => raw.parse::<Tz>().map_err(|e| {
                AppError::config_invalid(format!("unknown timezone '{raw}': {e}"))
            })?,
            None => config.timezone,
        };

        let mut constraints = EventConstraints::new(target_month, location);
        constraints.region.clone_from(&self.region);
        constraints.persona = self.persona;
        constraints.race_start = RaceStartTime::parse(&self.start)?;
        constraints.race_duration_hours = self.duration;
        constraints.distance_km = self.distance;
        constraints.min_training_weeks = self.min_weeks;
        constraints.require_training_time = !self.no_training_check;
        constraints.blocked_dates = self.blocked.iter().copied().collect();
        constraints.allow_weekends = !self.no_weekends;
        constraints.allow_weekdays = !self.no_weekdays;
        constraints.consider_holidays = !self.ignore_holidays;
        constraints.penalize_holidays = !self.neutral_holidays;
        constraints.check_event_conflicts = self.conflicts.is_some();
        constraints.conflict_radius_km = self.conflict_radius;
        constraints.timezone = timezone;
        constraints.validate()?;

        let drift = timezone_drift_hours(timezone, self.lng, target_month);
        if drift > TIMEZONE_MISMATCH_HOURS {
            warn!(
                timezone = %timezone,
                lng = self.lng,
                drift_hours = drift,
                "Event timezone looks far from the location; pass --timezone to set local time"
            );
        }
        Ok(constraints)
    }

    /// Build a planning request for a scope
    ///
    /// # Errors
    ///
    /// Returns an error for invalid flags or unreadable input files
    pub fn request(
        &self,
        config: &PlannerConfig,
        target_month: NaiveDate,
        scope: ScoringScope,
    ) -> AppResult<PlanningRequest> {
        let constraints = self.constraints(config, target_month)?;
        let today = self
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        let mut request = PlanningRequest::target_month(constraints, today);
        request.scope = scope;
        if !self.route.is_empty() {
            request.route = std::iter::once(Ok(request.constraints.location.clone()))
                .chain(self.route.iter().map(|raw| parse_point(raw)))
                .collect::<AppResult<_>>()?;
        }
        if let Some(path) = &self.holidays {
            request.holidays = load_holidays(path)?;
        }
        if let Some(path) = &self.conflicts {
            request.conflicts = load_conflicts(path)?;
        }
        Ok(request)
    }
}

/// Run one planning cycle for the given scope
///
/// # Errors
///
/// Returns an error for invalid flags, unreadable input files or a failed
/// HTTP client setup
pub async fn run_plan(
    config: &PlannerConfig,
    plan: &PlanArgs,
    target_month: NaiveDate,
    scope: ScoringScope,
) -> AppResult<Arc<CycleResult>> {
    let request = plan.request(config, target_month, scope)?;
    let source: Option<Arc<dyn HistorySource>> = if plan.offline {
        None
    } else {
        Some(Arc::new(OpenMeteoArchive::new(config)?))
    };

    let session = PlanningSession::new(config, source);
    let result = session.run_cycle(&request).await?;
    if result.rate_limited {
        warn!(
            skipped = result.skipped_years,
            "Weather archive rate limited the request; scores use fewer sample years"
        );
    }
    Ok(result)
}

/// First day of a month
///
/// # Errors
///
/// Returns an out-of-range error for an invalid year/month
pub fn month_start(year: i32, month: u32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::out_of_range("month", format!("{year}-{month:02} is not a month")))
}
