//! Default values and configuration structs with default implementations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::questionnaire::{ImpactFlag, MaturityFlag};
use crate::score::{impact, maturity, ImpactThresholds, MaturityThresholds, RuleSet};

/// Macro to generate default functions for serde attributes
macro_rules! default_fn {
    ($name:ident, $type:ty, $value:expr) => {
        pub(crate) fn $name() -> $type {
            $value
        }
    };
}

// =========================================================================
// DEFAULT VALUE FUNCTIONS
// =========================================================================

default_fn!(default_maturity_rules, RuleSet<MaturityFlag>, maturity::default_rules());
default_fn!(default_impact_rules, RuleSet<ImpactFlag>, impact::default_rules());
default_fn!(default_uploads_dir, PathBuf, PathBuf::from(".vendor-risk/uploads"));
default_fn!(default_bucket, String, "vendor-uploads".to_string());
default_fn!(default_base_url, String, "vendor-risk://documents/".to_string());
default_fn!(default_signed_url_ttl_secs, u64, 3600); // 1 hour
default_fn!(default_signing_key_env, String, "VENDOR_RISK_SIGNING_KEY".to_string());
default_fn!(default_review_interval_days, u32, 365);
default_fn!(default_upcoming_window_days, u32, 30);

// =========================================================================
// CONFIG STRUCTS WITH DEFAULTS
// =========================================================================

/// Rules and thresholds for the maturity score
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MaturityScoring {
    /// Penalty rules (default: ISO-27001 20, four core practices 5 each)
    #[serde(default = "default_maturity_rules")]
    pub rules: RuleSet<MaturityFlag>,
    /// Rating boundaries (default: HIGH above 80, MEDIUM from 50)
    #[serde(default)]
    pub thresholds: MaturityThresholds,
}

impl Default for MaturityScoring {
    fn default() -> Self {
        Self {
            rules: default_maturity_rules(),
            thresholds: MaturityThresholds::default(),
        }
    }
}

/// Rules and thresholds for the impact score
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImpactScoring {
    /// Penalty rules (default: four exposures and missing role-based access, 20 each)
    #[serde(default = "default_impact_rules")]
    pub rules: RuleSet<ImpactFlag>,
    /// Rating boundaries (default: LOW above 80, MEDIUM above 60)
    #[serde(default)]
    pub thresholds: ImpactThresholds,
}

impl Default for ImpactScoring {
    fn default() -> Self {
        Self {
            rules: default_impact_rules(),
            thresholds: ImpactThresholds::default(),
        }
    }
}

/// Scoring configuration: the rule sets the engine is driven by
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default)]
    pub maturity: MaturityScoring,
    #[serde(default)]
    pub impact: ImpactScoring,
}

impl ScoringConfig {
    /// The maturity flag that requires a certificate upload when answered yes.
    pub fn certification_flag(&self) -> Option<MaturityFlag> {
        self.maturity.rules.certification_flag()
    }
}

/// Where uploaded documents live and how retrieval URLs are signed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Root directory for uploads (default: .vendor-risk/uploads)
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
    /// Bucket directory under the uploads root (default: vendor-uploads)
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Prefix for signed retrieval URLs; must end with `/`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Lifetime of a signed URL in seconds (default: 3600)
    #[serde(default = "default_signed_url_ttl_secs")]
    pub signed_url_ttl_secs: u64,
    /// Environment variable holding the URL signing key
    #[serde(default = "default_signing_key_env")]
    pub signing_key_env: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            bucket: default_bucket(),
            base_url: default_base_url(),
            signed_url_ttl_secs: default_signed_url_ttl_secs(),
            signing_key_env: default_signing_key_env(),
        }
    }
}

/// Review scheduling
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewConfig {
    /// Days between a review and the next scheduled review (default: 365)
    #[serde(default = "default_review_interval_days")]
    pub interval_days: u32,
    /// How far ahead the dashboard looks for upcoming reviews (default: 30)
    #[serde(default = "default_upcoming_window_days")]
    pub upcoming_window_days: u32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            interval_days: default_review_interval_days(),
            upcoming_window_days: default_upcoming_window_days(),
        }
    }
}
