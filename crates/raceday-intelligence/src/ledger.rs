// ABOUTME: Running breakdown and reason log for one scored day
// ABOUTME: Every evaluated rule lands here, so the clamped sum always equals the score
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use raceday_core::constants::scoring::{BASE_SCORE, HARD_FAIL_PENALTY, MAX_SCORE, MIN_SCORE};
use raceday_core::models::BreakdownEntry;

/// Outcome of one rule: a labelled delta plus any reasons it produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Breakdown label
    pub label: String,
    /// Signed score delta
    pub delta: i32,
    /// Reasons, in the order they should be shown
    pub reasons: Vec<String>,
}

impl RuleOutcome {
    /// A rule that was evaluated and changed nothing
    pub fn neutral(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            delta: 0,
            reasons: Vec::new(),
        }
    }

    /// A rule with a delta and a single reason
    pub fn with_reason(label: impl Into<String>, delta: i32, reason: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            delta,
            reasons: vec![reason.into()],
        }
    }

    /// Whether this outcome is a hard fail
    #[must_use]
    pub const fn is_hard_fail(&self) -> bool {
        self.delta <= HARD_FAIL_PENALTY
    }
}

/// Accumulates breakdown entries and reasons in rule order
#[derive(Debug, Clone, Default)]
pub struct ScoreLedger {
    breakdown: Vec<BreakdownEntry>,
    reasons: Vec<String>,
}

impl ScoreLedger {
    /// Empty ledger at the base score
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule outcome
    pub fn apply(&mut self, outcome: RuleOutcome) {
        self.breakdown
            .push(BreakdownEntry::new(outcome.label, outcome.delta));
        self.reasons.extend(outcome.reasons);
    }

    /// Append a reason without a breakdown entry
    pub fn note(&mut self, reason: impl Into<String>) {
        self.reasons.push(reason.into());
    }

    /// Sum of deltas so far
    #[must_use]
    pub fn total_delta(&self) -> i32 {
        self.breakdown.iter().map(|entry| entry.delta).sum()
    }

    /// `clamp(100 + Σdelta, 0, 100)`
    #[must_use]
    pub fn score(&self) -> u8 {
        (BASE_SCORE + self.total_delta()).clamp(MIN_SCORE, MAX_SCORE) as u8
    }

    /// Consume into `(breakdown, reasons)`
    #[must_use]
    pub fn into_parts(self) -> (Vec<BreakdownEntry>, Vec<String>) {
        (self.breakdown, self.reasons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_clamps_both_ends() {
        let mut ledger = ScoreLedger::new();
        assert_eq!(ledger.score(), 100);

        ledger.apply(RuleOutcome::neutral("Darkness Hours"));
        assert_eq!(ledger.score(), 100);

        ledger.apply(RuleOutcome::with_reason("Blocked Date", -100, "blocked date"));
        ledger.apply(RuleOutcome::with_reason("Weekend", -100, "weekend not allowed"));
        assert_eq!(ledger.total_delta(), -200);
        assert_eq!(ledger.score(), 0);

        let (breakdown, reasons) = ledger.into_parts();
        assert_eq!(breakdown.len(), 3);
        assert_eq!(reasons, vec!["blocked date", "weekend not allowed"]);
    }
}
