//! Impact scoring.
//!
//! Starts from 100 and deducts the configured penalty for every exposure the
//! relationship creates. Rating polarity is inverted relative to maturity: a
//! high impact score means little exposure, which is a LOW impact rating.

use serde::{Deserialize, Serialize};

use super::rules::{FlagRule, RuleSet};
use crate::questionnaire::{ImpactAnswers, ImpactFlag};
use crate::scoring::{Rating, ScoreResult};

/// Score boundaries for the impact rating.
///
/// - `score > low_above` is LOW impact
/// - `medium_above < score <= low_above` is MEDIUM impact
/// - `score <= medium_above` is HIGH impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImpactThresholds {
    #[serde(default = "default_low_above")]
    pub low_above: u8,
    #[serde(default = "default_medium_above")]
    pub medium_above: u8,
}

fn default_low_above() -> u8 {
    80
}

fn default_medium_above() -> u8 {
    60
}

impl Default for ImpactThresholds {
    fn default() -> Self {
        Self {
            low_above: default_low_above(),
            medium_above: default_medium_above(),
        }
    }
}

impl ImpactThresholds {
    pub fn rate(&self, score: u8) -> Rating {
        if score > self.low_above {
            Rating::Low
        } else if score > self.medium_above {
            Rating::Medium
        } else {
            Rating::High
        }
    }
}

/// Rule set used when no impact rules are configured: each exposure costs 20
/// points, and so does the absence of role-based access.
pub fn default_rules() -> RuleSet<ImpactFlag> {
    RuleSet::new(vec![
        FlagRule::present(ImpactFlag::RequireOperationData, 20),
        FlagRule::present(ImpactFlag::RequireFinancialData, 20),
        FlagRule::present(ImpactFlag::RequirePersonalData, 20),
        FlagRule::present(ImpactFlag::CanCauseBusinessOutage, 20),
        FlagRule::absent(ImpactFlag::RoleBasedAccess, 20),
    ])
}

/// Calculate the impact score and rating for a set of answers.
pub fn impact_score(
    answers: &ImpactAnswers,
    rules: &RuleSet<ImpactFlag>,
    thresholds: &ImpactThresholds,
) -> ScoreResult {
    let score = rules.deduct(|flag| answers.get(flag));
    ScoreResult::new(score, thresholds.rate(score))
}
