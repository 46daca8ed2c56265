//! Config command for showing and validating vendor-risk configuration

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use vendor_risk::config::{self, split_frontmatter, Config};
use vendor_risk::paths::CONFIG_FILE;

use super::ensure_initialized;

/// Print the effective (merged) configuration as YAML.
pub fn cmd_config_show() -> Result<()> {
    ensure_initialized()?;
    let config = Config::load()?;
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

/// Validate config semantically and report issues
pub fn cmd_config_validate() -> Result<()> {
    ensure_initialized()?;
    println!("{}", "Validating vendor-risk configuration...".bold());
    println!();

    let mut errors = 0;
    let global = config::global_config_path().filter(|p| p.exists());
    if let Some(path) = &global {
        errors += check_file(path);
    }
    errors += check_file(Path::new(CONFIG_FILE));

    let config = match Config::load_merged_from(global.as_deref(), Path::new(CONFIG_FILE)) {
        Ok(config) => Some(config),
        Err(e) => {
            println!("  {} merged config: {:#}", "✗".red(), e);
            errors += 1;
            None
        }
    };

    let warnings = config.as_ref().map(Config::warnings).unwrap_or_default();
    if let Some(config) = &config {
        show_scoring_summary(config);
    }
    for warning in &warnings {
        println!("  {} {}", "⚠".yellow(), warning);
    }

    println!();
    if errors == 0 && warnings.is_empty() {
        println!("{} Configuration is valid", "✓".green());
    } else if errors == 0 {
        println!(
            "{} Configuration valid with {} warning(s)",
            "✓".green(),
            warnings.len()
        );
    } else {
        println!(
            "{} Found {} error(s) and {} warning(s)",
            "✗".red(),
            errors,
            warnings.len()
        );
        std::process::exit(1);
    }

    Ok(())
}

/// Parse one config file on its own; project files must be complete.
fn check_file(path: &Path) -> usize {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            println!("  {} {}: {}", "✗".red(), path.display(), e);
            return 1;
        }
    };
    if split_frontmatter(&content).0.is_none() {
        println!("  {} {}: missing YAML frontmatter", "✗".red(), path.display());
        return 1;
    }
    println!("  {} {}", "✓".green(), path.display());
    0
}

fn show_scoring_summary(config: &Config) {
    let scoring = &config.scoring;
    println!("{}", "Scoring rules:".dimmed());
    for rule in scoring.maturity.rules.rules() {
        let tag = if rule.certification { " (certification)" } else { "" };
        println!(
            "  maturity {:<34} -{:<3} when {}{}",
            rule.flag.name(),
            rule.penalty,
            rule.penalize_when,
            tag
        );
    }
    for rule in scoring.impact.rules.rules() {
        println!(
            "  impact   {:<34} -{:<3} when {}",
            rule.flag.name(),
            rule.penalty,
            rule.penalize_when
        );
    }
}
