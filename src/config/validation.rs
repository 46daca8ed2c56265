//! Validation logic for configuration.

use anyhow::Result;

use super::defaults::{ReviewConfig, ScoringConfig, StorageConfig};
use super::Config;
use crate::score::rules::PERFECT_SCORE;

/// Upper bound for review scheduling windows (100 years).
pub const MAX_REVIEW_DAYS: u32 = 36_500;

/// Upper bound for signed URL lifetimes (one year).
pub const MAX_SIGNED_URL_TTL_SECS: u64 = 365 * 24 * 60 * 60;

impl Config {
    /// Validate every section. Called whenever a config is parsed.
    pub fn validate(&self) -> Result<()> {
        if self.organization.name.trim().is_empty() {
            anyhow::bail!("organization.name must not be empty");
        }
        self.scoring.validate()?;
        self.storage.validate()?;
        self.review.validate()
    }

    /// Non-fatal observations about the configuration, for `config --validate`.
    pub fn warnings(&self) -> Vec<String> {
        self.scoring.warnings()
    }
}

impl ScoringConfig {
    /// Validate rule sets and thresholds
    pub fn validate(&self) -> Result<()> {
        self.maturity.rules.validate("scoring.maturity.rules")?;
        self.impact.rules.validate("scoring.impact.rules")?;

        if self
            .impact
            .rules
            .rules()
            .iter()
            .any(|rule| rule.certification)
        {
            anyhow::bail!("scoring.impact.rules: certification can only be set on maturity rules");
        }

        let maturity = &self.maturity.thresholds;
        if maturity.high_above > PERFECT_SCORE {
            anyhow::bail!(
                "scoring.maturity.thresholds.high_above must be at most {}, got {}",
                PERFECT_SCORE,
                maturity.high_above
            );
        }
        if maturity.medium_min > maturity.high_above {
            anyhow::bail!(
                "scoring.maturity.thresholds.medium_min ({}) must not exceed high_above ({})",
                maturity.medium_min,
                maturity.high_above
            );
        }

        let impact = &self.impact.thresholds;
        if impact.low_above > PERFECT_SCORE {
            anyhow::bail!(
                "scoring.impact.thresholds.low_above must be at most {}, got {}",
                PERFECT_SCORE,
                impact.low_above
            );
        }
        if impact.medium_above > impact.low_above {
            anyhow::bail!(
                "scoring.impact.thresholds.medium_above ({}) must not exceed low_above ({})",
                impact.medium_above,
                impact.low_above
            );
        }

        Ok(())
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.maturity.rules.is_empty() {
            warnings.push("scoring.maturity.rules is empty: every vendor scores 100".to_string());
        }
        if self.impact.rules.is_empty() {
            warnings.push("scoring.impact.rules is empty: every vendor scores 100".to_string());
        }
        if self.certification_flag().is_none() {
            warnings.push(
                "No maturity rule is marked as certification: certificate uploads are never required"
                    .to_string(),
            );
        }

        let lowest_maturity = u32::from(PERFECT_SCORE)
            .saturating_sub(self.maturity.rules.max_penalty());
        if lowest_maturity >= u32::from(self.maturity.thresholds.medium_min) {
            warnings.push(format!(
                "Maturity rating LOW is unreachable: the lowest possible score is {} (medium_min is {})",
                lowest_maturity, self.maturity.thresholds.medium_min
            ));
        }

        let lowest_impact =
            u32::from(PERFECT_SCORE).saturating_sub(self.impact.rules.max_penalty());
        if lowest_impact > u32::from(self.impact.thresholds.medium_above) {
            warnings.push(format!(
                "Impact rating HIGH is unreachable: the lowest possible score is {} (medium_above is {})",
                lowest_impact, self.impact.thresholds.medium_above
            ));
        }

        warnings
    }
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() || self.bucket.contains(['/', '\\']) {
            anyhow::bail!(
                "storage.bucket must be a non-empty name without path separators, got '{}'",
                self.bucket
            );
        }
        if !self.base_url.ends_with('/') {
            anyhow::bail!("storage.base_url must end with '/', got '{}'", self.base_url);
        }
        url::Url::parse(&self.base_url).map_err(|e| {
            anyhow::anyhow!("storage.base_url '{}' is not a valid URL: {}", self.base_url, e)
        })?;
        if self.signed_url_ttl_secs == 0 {
            anyhow::bail!("storage.signed_url_ttl_secs must be greater than 0");
        }
        if self.signed_url_ttl_secs > MAX_SIGNED_URL_TTL_SECS {
            anyhow::bail!(
                "storage.signed_url_ttl_secs must be at most {}, got {}",
                MAX_SIGNED_URL_TTL_SECS,
                self.signed_url_ttl_secs
            );
        }
        if self.signing_key_env.trim().is_empty() {
            anyhow::bail!("storage.signing_key_env must not be empty");
        }

        Ok(())
    }
}

impl ReviewConfig {
    /// Validate review scheduling configuration
    pub fn validate(&self) -> Result<()> {
        if self.interval_days == 0 {
            anyhow::bail!("review.interval_days must be greater than 0");
        }
        if self.interval_days > MAX_REVIEW_DAYS {
            anyhow::bail!(
                "review.interval_days must be at most {}, got {}",
                MAX_REVIEW_DAYS,
                self.interval_days
            );
        }
        if self.upcoming_window_days > MAX_REVIEW_DAYS {
            anyhow::bail!(
                "review.upcoming_window_days must be at most {}, got {}",
                MAX_REVIEW_DAYS,
                self.upcoming_window_days
            );
        }

        Ok(())
    }
}
