// ABOUTME: Calendar rules: training lead time, manual blocks, holiday/weekend/weekday and conflicts
// ABOUTME: Rules run in fixed precedence and every rule records an outcome even without a penalty
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

//! Calendar Constraint Evaluation
//!
//! Rules never short-circuit: a hard fail records `-100` and evaluation
//! continues so the breakdown stays complete. The clamped sum decides the
//! final score.

use chrono::{Datelike, NaiveDate, Weekday};
use raceday_core::constants::calendar::{
    CONFLICT_PENALTY, HOLIDAY_PENALTY, TRAINING_HARD_FAIL_RATIO,
};
use raceday_core::constants::scoring::HARD_FAIL_PENALTY;
use raceday_core::constants::units::DAYS_PER_WEEK;
use raceday_core::models::{ConflictingEvent, EventConstraints, Holiday, HolidayCalendar};

use crate::geo::haversine_km;
use crate::ledger::RuleOutcome;

/// Breakdown label for the training lead rule
pub const TRAINING_LABEL: &str = "Training Time";
/// Breakdown label for manually blocked dates
pub const BLOCKED_LABEL: &str = "Blocked Date";
/// Breakdown label for holidays
pub const HOLIDAY_LABEL: &str = "Holiday";
/// Breakdown label for weekend days
pub const WEEKEND_LABEL: &str = "Weekend";
/// Breakdown label for weekdays
pub const WEEKDAY_LABEL: &str = "Weekday";
/// Breakdown label for nearby competing events
pub const CONFLICT_LABEL: &str = "Event Conflict";

/// Whole weeks from `today` to `date`, truncated toward zero (negative for past dates)
#[must_use]
pub fn weeks_between(today: NaiveDate, date: NaiveDate) -> i64 {
    (date - today).num_days() / DAYS_PER_WEEK
}

/// Training lead rule
///
/// A zero-week requirement is always satisfied. Below half the requirement
/// the day hard-fails; otherwise the shortfall becomes a proportional penalty.
#[must_use]
pub fn evaluate_training_lead(weeks_available: i64, min_weeks: u32) -> RuleOutcome {
    if min_weeks == 0 || weeks_available >= i64::from(min_weeks) {
        return RuleOutcome::neutral(TRAINING_LABEL);
    }

    let ratio = (weeks_available as f64 / f64::from(min_weeks)).max(0.0);
    if ratio < TRAINING_HARD_FAIL_RATIO {
        return RuleOutcome::with_reason(
            TRAINING_LABEL,
            HARD_FAIL_PENALTY,
            format!(
                "insufficient training time: {weeks_available} of {min_weeks} recommended weeks"
            ),
        );
    }

    let delta = (-(1.0 - ratio) * 100.0).round() as i32;
    RuleOutcome::with_reason(
        TRAINING_LABEL,
        delta,
        format!(
            "short training prep: {:.0}% of recommended lead time",
            ratio * 100.0
        ),
    )
}

/// Manual block rule
#[must_use]
pub fn evaluate_blocked(date: NaiveDate, constraints: &EventConstraints) -> RuleOutcome {
    if constraints.blocked_dates.contains(&date) {
        RuleOutcome::with_reason(BLOCKED_LABEL, HARD_FAIL_PENALTY, "blocked date")
    } else {
        RuleOutcome::neutral(BLOCKED_LABEL)
    }
}

/// Whether a date falls on Saturday or Sunday
#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Mutually exclusive day classification, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind<'a> {
    /// A holiday that the caller asked to consider
    Holiday(&'a Holiday),
    /// Saturday or Sunday
    Weekend,
    /// Monday through Friday
    Weekday,
}

/// Classify a date; holidays win over weekends, weekends over weekdays
#[must_use]
pub fn classify_day<'a>(
    date: NaiveDate,
    constraints: &EventConstraints,
    holidays: &'a HolidayCalendar,
) -> DayKind<'a> {
    if constraints.consider_holidays {
        if let Some(holiday) = holidays.get(date) {
            return DayKind::Holiday(holiday);
        }
    }
    if is_weekend(date) {
        DayKind::Weekend
    } else {
        DayKind::Weekday
    }
}

/// Holiday, weekend or weekday rule for a classified day
#[must_use]
pub fn evaluate_day_kind(kind: DayKind<'_>, constraints: &EventConstraints) -> RuleOutcome {
    match kind {
        DayKind::Holiday(holiday) if constraints.penalize_holidays => RuleOutcome::with_reason(
            HOLIDAY_LABEL,
            HOLIDAY_PENALTY,
            format!("holiday (negative impact): {}", holiday.name),
        ),
        DayKind::Holiday(holiday) => {
            RuleOutcome::with_reason(HOLIDAY_LABEL, 0, format!("holiday: {}", holiday.name))
        }
        DayKind::Weekend if !constraints.allow_weekends => {
            RuleOutcome::with_reason(WEEKEND_LABEL, HARD_FAIL_PENALTY, "weekend not allowed")
        }
        DayKind::Weekend => RuleOutcome::neutral(WEEKEND_LABEL),
        DayKind::Weekday if !constraints.allow_weekdays => {
            RuleOutcome::with_reason(WEEKDAY_LABEL, HARD_FAIL_PENALTY, "weekday not allowed")
        }
        DayKind::Weekday => RuleOutcome::neutral(WEEKDAY_LABEL),
    }
}

/// Conflict rule: one penalty per day, one reason per competing event in range
#[must_use]
pub fn evaluate_conflicts(
    date: NaiveDate,
    constraints: &EventConstraints,
    events: &[ConflictingEvent],
) -> RuleOutcome {
    let reasons: Vec<String> = events
        .iter()
        .filter(|event| event.schedule.covers(date))
        .filter_map(|event| {
            let distance = haversine_km(&constraints.location, &event.location);
            (distance <= constraints.conflict_radius_km).then(|| {
                format!(
                    "conflicting event: {} ({distance:.1} km away)",
                    event.name
                )
            })
        })
        .collect();

    if reasons.is_empty() {
        return RuleOutcome::neutral(CONFLICT_LABEL);
    }
    RuleOutcome {
        label: CONFLICT_LABEL.to_owned(),
        delta: CONFLICT_PENALTY,
        reasons,
    }
}

/// Calendar facts and rule outcomes for one date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarAssessment {
    /// Outcomes in rule order
    pub outcomes: Vec<RuleOutcome>,
    /// Whole weeks of training lead available
    pub training_weeks: i64,
    /// Saturday or Sunday
    pub is_weekend: bool,
    /// Matched holiday name, when holidays are considered
    pub holiday: Option<String>,
}

/// Run every calendar rule for one date in precedence order
#[must_use]
pub fn evaluate_calendar(
    date: NaiveDate,
    today: NaiveDate,
    constraints: &EventConstraints,
    holidays: &HolidayCalendar,
    conflicts: &[ConflictingEvent],
) -> CalendarAssessment {
    let training_weeks = weeks_between(today, date);
    let mut outcomes = Vec::with_capacity(4);

    if constraints.require_training_time {
        outcomes.push(evaluate_training_lead(
            training_weeks,
            constraints.min_training_weeks,
        ));
    }
    outcomes.push(evaluate_blocked(date, constraints));

    let kind = classify_day(date, constraints, holidays);
    outcomes.push(evaluate_day_kind(kind, constraints));

    if constraints.check_event_conflicts {
        outcomes.push(evaluate_conflicts(date, constraints, conflicts));
    }

    CalendarAssessment {
        outcomes,
        training_weeks,
        is_weekend: is_weekend(date),
        holiday: match kind {
            DayKind::Holiday(holiday) => Some(holiday.name.clone()),
            DayKind::Weekend | DayKind::Weekday => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raceday_core::models::{EventSchedule, GeoPoint, HolidayKind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn constraints() -> EventConstraints {
        EventConstraints::new(date(2026, 9, 1), GeoPoint::new(48.1374, 11.5755))
    }

    #[test]
    fn test_weeks_truncate_toward_zero() {
        let today = date(2026, 1, 1);
        assert_eq!(weeks_between(today, date(2026, 1, 14)), 1);
        assert_eq!(weeks_between(today, date(2026, 1, 15)), 2);
        assert_eq!(weeks_between(today, date(2025, 12, 20)), -1);
    }

    #[test]
    fn test_training_lead_tiers() {
        assert_eq!(evaluate_training_lead(12, 12).delta, 0);
        assert_eq!(evaluate_training_lead(30, 12).delta, 0);

        let soft = evaluate_training_lead(9, 12);
        assert_eq!(soft.delta, -25);
        assert_eq!(soft.reasons[0], "short training prep: 75% of recommended lead time");

        let half = evaluate_training_lead(6, 12);
        assert_eq!(half.delta, -50);

        let hard = evaluate_training_lead(5, 12);
        assert_eq!(hard.delta, HARD_FAIL_PENALTY);
        assert!(hard.reasons[0].starts_with("insufficient training time"));

        let past = evaluate_training_lead(-3, 12);
        assert!(past.is_hard_fail());
    }

    #[test]
    fn test_zero_week_requirement_is_satisfied() {
        let outcome = evaluate_training_lead(-10, 0);
        assert_eq!(outcome.delta, 0);
        assert!(outcome.reasons.is_empty());
    }

    #[test]
    fn test_training_disabled_records_nothing() {
        let mut c = constraints();
        c.require_training_time = false;
        let today = date(2026, 8, 30);
        let assessment =
            evaluate_calendar(date(2026, 9, 5), today, &c, &HolidayCalendar::new(), &[]);
        assert!(assessment
            .outcomes
            .iter()
            .all(|o| o.label != TRAINING_LABEL));
    }

    #[test]
    fn test_holiday_precedence_over_weekend() {
        let mut c = constraints();
        c.allow_weekends = false;
        c.penalize_holidays = false;
        // 2026-10-03 is a Saturday and German Unity Day
        let holidays: HolidayCalendar = [Holiday::new(
            date(2026, 10, 3),
            "Tag der Deutschen Einheit",
            HolidayKind::Public,
        )]
        .into_iter()
        .collect();

        let kind = classify_day(date(2026, 10, 3), &c, &holidays);
        let outcome = evaluate_day_kind(kind, &c);
        assert_eq!(outcome.label, HOLIDAY_LABEL);
        assert_eq!(outcome.delta, 0);
        assert_eq!(outcome.reasons, vec!["holiday: Tag der Deutschen Einheit"]);

        c.penalize_holidays = true;
        let outcome = evaluate_day_kind(kind, &c);
        assert_eq!(outcome.delta, HOLIDAY_PENALTY);

        c.consider_holidays = false;
        let kind = classify_day(date(2026, 10, 3), &c, &holidays);
        assert_eq!(kind, DayKind::Weekend);
        assert!(evaluate_day_kind(kind, &c).is_hard_fail());
    }

    #[test]
    fn test_weekday_disallowed_is_hard_fail() {
        let mut c = constraints();
        c.allow_weekdays = false;
        let outcome = evaluate_day_kind(DayKind::Weekday, &c);
        assert_eq!(outcome.delta, HARD_FAIL_PENALTY);
        assert_eq!(outcome.reasons, vec!["weekday not allowed"]);
    }

    #[test]
    fn test_conflicts_penalize_once_with_reason_per_event() {
        let c = constraints();
        let nearby = |name: &str, schedule| ConflictingEvent {
            name: name.to_owned(),
            schedule,
            location: GeoPoint::new(48.20, 11.60),
            url: None,
        };
        let events = vec![
            nearby(
                "Isar Trail",
                EventSchedule::Day {
                    date: date(2026, 9, 12),
                },
            ),
            nearby(
                "Alpen Ultra",
                EventSchedule::Month {
                    year: 2026,
                    month: 9,
                },
            ),
            ConflictingEvent {
                name: "Far Away 100".to_owned(),
                schedule: EventSchedule::Day {
                    date: date(2026, 9, 12),
                },
                location: GeoPoint::new(52.52, 13.40),
                url: None,
            },
        ];

        let outcome = evaluate_conflicts(date(2026, 9, 12), &c, &events);
        assert_eq!(outcome.delta, CONFLICT_PENALTY);
        assert_eq!(outcome.reasons.len(), 2);
        assert!(outcome.reasons[0].contains("Isar Trail"));
        assert!(outcome.reasons[0].contains("km away"));

        let quiet = evaluate_conflicts(date(2026, 10, 12), &c, &events);
        assert_eq!(quiet.delta, 0);
        assert!(quiet.reasons.is_empty());
    }

    #[test]
    fn test_blocked_date_keeps_evaluating() {
        let mut c = constraints();
        c.require_training_time = false;
        c.allow_weekends = false;
        c.blocked_dates.insert(date(2026, 9, 5));

        let assessment = evaluate_calendar(
            date(2026, 9, 5),
            date(2026, 1, 1),
            &c,
            &HolidayCalendar::new(),
            &[],
        );
        let labels: Vec<&str> = assessment.outcomes.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec![BLOCKED_LABEL, WEEKEND_LABEL]);
        assert!(assessment.outcomes.iter().all(RuleOutcome::is_hard_fail));
        assert!(assessment.is_weekend);
    }
}
