//! Configuration management for vendor-risk projects.
//!
//! Configuration lives in the YAML frontmatter of a markdown file so that the
//! body can carry free-form notes for the team. The global file is merged
//! under the project file, section by section.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::CONFIG_FILE;

pub mod defaults;
pub mod organization;
pub mod validation;

pub use defaults::*;
pub use organization::*;

/// Environment variable that overrides the global config location
pub const GLOBAL_CONFIG_ENV: &str = "VENDOR_RISK_GLOBAL_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub organization: OrganizationConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub review: ReviewConfig,
}

impl Config {
    /// Load configuration with full merge semantics.
    /// Merge order (later overrides earlier):
    /// 1. Global config (~/.config/vendor-risk/config.md)
    /// 2. Project config (.vendor-risk/config.md)
    pub fn load() -> Result<Self> {
        Self::load_merged_from(global_config_path().as_deref(), Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let (frontmatter, _body) = split_frontmatter(content);
        let frontmatter = frontmatter.context("Failed to extract frontmatter from config")?;

        let config: Config =
            serde_yaml::from_str(&frontmatter).context("Failed to parse config frontmatter")?;
        config.validate()?;

        Ok(config)
    }

    /// Load merged configuration from specified global and project config paths.
    /// A section present in the project config replaces the global one entirely.
    pub fn load_merged_from(global_path: Option<&Path>, project_path: &Path) -> Result<Self> {
        let global_config = global_path
            .filter(|p| p.exists())
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let project_config = PartialConfig::load_from(project_path)?;

        let config = global_config.merge_with(project_config);
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", project_path.display()))?;

        // Surfaced in colour by `config --validate`
        for warning in config.warnings() {
            log::info!("{}", warning);
        }

        Ok(config)
    }

    /// Render the config back to a markdown file with frontmatter.
    pub fn to_markdown(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config")?;
        Ok(format!(
            "---\n{}---\n\n# {} vendor risk configuration\n",
            yaml, self.organization.name
        ))
    }

    /// A config with defaults everywhere except the organization name.
    pub fn with_organization(name: &str) -> Self {
        Self {
            organization: OrganizationConfig {
                name: name.to_string(),
                reviewer: None,
            },
            scoring: ScoringConfig::default(),
            storage: StorageConfig::default(),
            review: ReviewConfig::default(),
        }
    }
}

/// Returns the path to the global config file, normally
/// `<config dir>/vendor-risk/config.md`.
pub fn global_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(GLOBAL_CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("vendor-risk").join("config.md"))
}

/// Split a markdown document into its YAML frontmatter and body.
pub fn split_frontmatter(content: &str) -> (Option<String>, &str) {
    let content = content.trim();

    let Some(rest) = content.strip_prefix("---") else {
        return (None, content);
    };

    if let Some(end) = rest.find("\n---") {
        let frontmatter = rest[..end + 1].to_string();
        let body = rest[end + 4..].trim_start();
        (Some(frontmatter), body)
    } else {
        (None, content)
    }
}

/// Partial config for merging - all fields optional
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    pub organization: Option<PartialOrganizationConfig>,
    pub scoring: Option<ScoringConfig>,
    pub storage: Option<StorageConfig>,
    pub review: Option<ReviewConfig>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialOrganizationConfig {
    pub name: Option<String>,
    pub reviewer: Option<String>,
}

impl PartialConfig {
    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        let (frontmatter, _body) = split_frontmatter(content);
        let frontmatter = frontmatter.context("Failed to extract frontmatter from config")?;

        serde_yaml::from_str(&frontmatter).context("Failed to parse config frontmatter")
    }

    /// Merge this global config with a project config, returning the merged result.
    /// Values from the project config take precedence over global.
    fn merge_with(self, project: PartialConfig) -> Config {
        let global_org = self.organization.unwrap_or_default();
        let project_org = project.organization.unwrap_or_default();

        Config {
            organization: OrganizationConfig {
                name: project_org.name.or(global_org.name).unwrap_or_default(),
                reviewer: project_org.reviewer.or(global_org.reviewer),
            },
            scoring: project.scoring.or(self.scoring).unwrap_or_default(),
            storage: project.storage.or(self.storage).unwrap_or_default(),
            review: project.review.or(self.review).unwrap_or_default(),
        }
    }
}
