//! Security maturity scoring.
//!
//! Starts from 100 and deducts the configured penalty for every practice the
//! vendor does not have. The certification flag carries the largest weight.

use serde::{Deserialize, Serialize};

use super::rules::{FlagRule, RuleSet};
use crate::questionnaire::{MaturityAnswers, MaturityFlag};
use crate::scoring::{Rating, ScoreResult};

/// Score boundaries for the maturity rating.
///
/// - `score > high_above` is HIGH
/// - `medium_min <= score <= high_above` is MEDIUM
/// - anything lower is LOW
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaturityThresholds {
    #[serde(default = "default_high_above")]
    pub high_above: u8,
    #[serde(default = "default_medium_min")]
    pub medium_min: u8,
}

fn default_high_above() -> u8 {
    80
}

fn default_medium_min() -> u8 {
    50
}

impl Default for MaturityThresholds {
    fn default() -> Self {
        Self {
            high_above: default_high_above(),
            medium_min: default_medium_min(),
        }
    }
}

impl MaturityThresholds {
    pub fn rate(&self, score: u8) -> Rating {
        if score > self.high_above {
            Rating::High
        } else if score >= self.medium_min {
            Rating::Medium
        } else {
            Rating::Low
        }
    }
}

/// Rule set used when no maturity rules are configured: ISO-27001 costs 20
/// points, each of the four core practices costs 5.
pub fn default_rules() -> RuleSet<MaturityFlag> {
    RuleSet::new(vec![
        FlagRule::absent(MaturityFlag::HasIso27001, 20).certification(),
        FlagRule::absent(MaturityFlag::PerformsVulnerabilityScan, 5),
        FlagRule::absent(MaturityFlag::UsesMfa, 5),
        FlagRule::absent(MaturityFlag::UsesAutomatedAccessControl, 5),
        FlagRule::absent(MaturityFlag::MaintainsIncidentResponsePlan, 5),
    ])
}

/// Calculate the maturity score and rating for a set of answers.
pub fn maturity_score(
    answers: &MaturityAnswers,
    rules: &RuleSet<MaturityFlag>,
    thresholds: &MaturityThresholds,
) -> ScoreResult {
    let score = rules.deduct(|flag| answers.get(flag));
    ScoreResult::new(score, thresholds.rate(score))
}
