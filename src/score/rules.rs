//! Data-driven penalty rules.
//!
//! A rule set is a list of `(flag, penalty, penalize_when)` entries. Scoring
//! starts from a perfect 100 and deducts the penalty of every rule whose flag
//! has the value the rule penalises. Swapping rule sets changes which
//! questions count and how much, without touching the scoring algorithm.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Score every questionnaire starts from.
pub const PERFECT_SCORE: u8 = 100;

/// A single penalty rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagRule<F> {
    pub flag: F,
    pub penalty: u32,
    /// The answer that triggers the penalty. Practices are penalised when
    /// absent (`false`), exposures when present (`true`).
    #[serde(default)]
    pub penalize_when: bool,
    /// Marks the flag that requires certificate evidence when answered yes.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub certification: bool,
}

impl<F> FlagRule<F> {
    /// Rule that penalises a missing practice.
    pub fn absent(flag: F, penalty: u32) -> Self {
        Self {
            flag,
            penalty,
            penalize_when: false,
            certification: false,
        }
    }

    /// Rule that penalises a present exposure.
    pub fn present(flag: F, penalty: u32) -> Self {
        Self {
            flag,
            penalty,
            penalize_when: true,
            certification: false,
        }
    }

    /// Mark this rule as the certification rule.
    pub fn certification(mut self) -> Self {
        self.certification = true;
        self
    }

    fn applies(&self, value: bool) -> bool {
        value == self.penalize_when
    }
}

/// Ordered collection of penalty rules over one flag type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet<F> {
    rules: Vec<FlagRule<F>>,
}

impl<F> Default for RuleSet<F> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<F> RuleSet<F>
where
    F: Copy + Eq + Hash + fmt::Display,
{
    pub fn new(rules: Vec<FlagRule<F>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FlagRule<F>] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The flag marked as certification, if any.
    pub fn certification_flag(&self) -> Option<F> {
        self.rules.iter().find(|r| r.certification).map(|r| r.flag)
    }

    /// Penalty configured for a flag, or 0 when the flag is not scored.
    pub fn penalty_for(&self, flag: F) -> u32 {
        self.rules
            .iter()
            .filter(|r| r.flag == flag)
            .map(|r| r.penalty)
            .sum()
    }

    /// Sum of all penalties, i.e. the most a questionnaire can lose.
    pub fn max_penalty(&self) -> u32 {
        self.rules
            .iter()
            .fold(0u32, |acc, r| acc.saturating_add(r.penalty))
    }

    /// Deduct penalties from a perfect score, clamped to `[0, 100]`.
    ///
    /// `value` returns the effective answer for a flag; callers resolve
    /// unanswered questions to `false` before this point.
    pub fn deduct(&self, value: impl Fn(F) -> bool) -> u8 {
        let total = self
            .rules
            .iter()
            .filter(|rule| rule.applies(value(rule.flag)))
            .fold(0u32, |acc, rule| acc.saturating_add(rule.penalty));

        let score = u32::from(PERFECT_SCORE).saturating_sub(total);
        score.min(u32::from(PERFECT_SCORE)) as u8
    }

    /// Validate the rule set, using `section` to name it in error messages.
    pub fn validate(&self, section: &str) -> Result<()> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.penalty > u32::from(PERFECT_SCORE) {
                anyhow::bail!(
                    "{}: penalty for '{}' must be at most {}, got {}",
                    section,
                    rule.flag,
                    PERFECT_SCORE,
                    rule.penalty
                );
            }
            if !seen.insert(rule.flag) {
                anyhow::bail!("{}: flag '{}' is listed more than once", section, rule.flag);
            }
        }

        let certification_rules = self.rules.iter().filter(|r| r.certification).count();
        if certification_rules > 1 {
            anyhow::bail!(
                "{}: only one rule may be marked as certification, found {}",
                section,
                certification_rules
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::{ImpactFlag, MaturityFlag};

    fn practices() -> RuleSet<MaturityFlag> {
        RuleSet::new(vec![
            FlagRule::absent(MaturityFlag::HasIso27001, 20).certification(),
            FlagRule::absent(MaturityFlag::UsesMfa, 5),
        ])
    }

    #[test]
    fn test_deduct_nothing_when_all_practices_present() {
        assert_eq!(practices().deduct(|_| true), 100);
    }

    #[test]
    fn test_deduct_absent_practices() {
        assert_eq!(practices().deduct(|_| false), 75);
        assert_eq!(
            practices().deduct(|flag| flag != MaturityFlag::HasIso27001),
            80
        );
    }

    #[test]
    fn test_deduct_present_exposures() {
        let rules = RuleSet::new(vec![
            FlagRule::present(ImpactFlag::RequirePersonalData, 20),
            FlagRule::absent(ImpactFlag::RoleBasedAccess, 20),
        ]);

        assert_eq!(rules.deduct(|flag| flag == ImpactFlag::RoleBasedAccess), 100);
        assert_eq!(rules.deduct(|_| true), 80);
        assert_eq!(rules.deduct(|_| false), 80);
        assert_eq!(
            rules.deduct(|flag| flag == ImpactFlag::RequirePersonalData),
            60
        );
    }

    #[test]
    fn test_deduct_clamps_at_zero() {
        let rules = RuleSet::new(vec![
            FlagRule::absent(MaturityFlag::HasIso27001, 80),
            FlagRule::absent(MaturityFlag::UsesMfa, 80),
        ]);
        assert_eq!(rules.deduct(|_| false), 0);
    }

    #[test]
    fn test_deduct_survives_overflowing_penalties() {
        let rules = RuleSet::new(vec![
            FlagRule::absent(MaturityFlag::HasIso27001, u32::MAX),
            FlagRule::absent(MaturityFlag::UsesMfa, u32::MAX),
        ]);
        assert_eq!(rules.deduct(|_| false), 0);
        assert_eq!(rules.max_penalty(), u32::MAX);
    }

    #[test]
    fn test_empty_rule_set_scores_perfect() {
        let rules: RuleSet<MaturityFlag> = RuleSet::default();
        assert!(rules.is_empty());
        assert_eq!(rules.deduct(|_| false), 100);
    }

    #[test]
    fn test_certification_flag() {
        assert_eq!(
            practices().certification_flag(),
            Some(MaturityFlag::HasIso27001)
        );

        let rules = RuleSet::new(vec![FlagRule::absent(MaturityFlag::UsesMfa, 5)]);
        assert_eq!(rules.certification_flag(), None);
    }

    #[test]
    fn test_penalty_for() {
        assert_eq!(practices().penalty_for(MaturityFlag::HasIso27001), 20);
        assert_eq!(practices().penalty_for(MaturityFlag::UsesSso), 0);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let rules = RuleSet::new(vec![
            FlagRule::absent(MaturityFlag::UsesMfa, 5),
            FlagRule::absent(MaturityFlag::UsesMfa, 10),
        ]);
        let err = rules.validate("scoring.maturity").unwrap_err();
        assert!(err.to_string().contains("'uses_mfa' is listed more than once"));
    }

    #[test]
    fn test_validate_rejects_large_penalty() {
        let rules = RuleSet::new(vec![FlagRule::absent(MaturityFlag::UsesMfa, 101)]);
        let err = rules.validate("scoring.maturity").unwrap_err();
        assert!(err.to_string().contains("must be at most 100"));
    }

    #[test]
    fn test_validate_rejects_two_certifications() {
        let rules = RuleSet::new(vec![
            FlagRule::absent(MaturityFlag::HasIso27001, 20).certification(),
            FlagRule::absent(MaturityFlag::UsesMfa, 5).certification(),
        ]);
        assert!(rules.validate("scoring.maturity").is_err());
    }

    #[test]
    fn test_rule_set_yaml_shape() {
        let yaml = r#"
- flag: has_iso27001
  penalty: 20
  certification: true
- flag: uses_mfa
  penalty: 5
"#;
        let rules: RuleSet<MaturityFlag> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rules.rules().len(), 2);
        assert!(rules.rules()[0].certification);
        assert!(!rules.rules()[1].penalize_when);
        assert_eq!(rules, practices());
    }
}
