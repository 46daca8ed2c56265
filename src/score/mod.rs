//! Risk scoring engine.
//!
//! Pure, stateless functions: maturity and impact are scored independently,
//! then their ratings are combined through the risk matrix. Nothing here does
//! I/O or fails; every input has a defined result.

pub mod impact;
pub mod maturity;
pub mod risk_matrix;
pub mod rules;

pub use impact::{impact_score, ImpactThresholds};
pub use maturity::{maturity_score, MaturityThresholds};
pub use risk_matrix::{combine_ratings, risk_rating, risk_rating_from_labels};
pub use rules::{FlagRule, RuleSet};

use crate::config::ScoringConfig;
use crate::questionnaire::QuestionnaireAnswers;
use crate::scoring::Evaluation;

/// Score a questionnaire with the given rule sets and thresholds.
pub fn evaluate(answers: &QuestionnaireAnswers, config: &ScoringConfig) -> Evaluation {
    let maturity = maturity_score(
        &answers.maturity,
        &config.maturity.rules,
        &config.maturity.thresholds,
    );
    let impact = impact_score(
        &answers.impact,
        &config.impact.rules,
        &config.impact.thresholds,
    );
    let risk = risk_rating(impact.rating, maturity.rating);

    Evaluation {
        maturity,
        impact,
        risk,
    }
}
