//! Centralized UI formatting and color utilities
//!
//! Ratings, statuses, and table helpers shared by every vendor-risk command.

use colored::{ColoredString, Colorize};

use crate::domain::{ReviewStatus, VendorStatus, UNRATED_LABEL};
use crate::scoring::Rating;

/// Check if quiet mode is enabled via environment variable or --quiet flag
pub fn is_quiet() -> bool {
    std::env::var("VENDOR_RISK_QUIET")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Colored rating label. A missing rating renders as `N/A`.
///
/// Risk and impact use the same palette: HIGH is bad. Maturity is the
/// other way round, so callers pass `higher_is_better` for it.
pub fn rating_badge(rating: Option<Rating>, higher_is_better: bool) -> ColoredString {
    let Some(rating) = rating else {
        return UNRATED_LABEL.dimmed();
    };
    let label = rating.as_str();
    match (rating, higher_is_better) {
        (Rating::Medium, _) => label.yellow(),
        (Rating::High, false) | (Rating::Low, true) => label.red().bold(),
        (Rating::Low, false) | (Rating::High, true) => label.green(),
    }
}

/// Shorthand for a risk rating badge.
pub fn risk_badge(rating: Option<Rating>) -> ColoredString {
    rating_badge(rating, false)
}

/// Returns a colored icon for a vendor status.
///
/// Icons:
/// - Active: ● (green)
/// - Pending: ○ (yellow)
/// - Inactive: ✗ (dimmed)
pub fn vendor_status_icon(status: VendorStatus) -> ColoredString {
    match status {
        VendorStatus::Active => "●".green(),
        VendorStatus::Pending => "○".yellow(),
        VendorStatus::Inactive => "✗".dimmed(),
    }
}

pub fn review_status_icon(status: ReviewStatus) -> ColoredString {
    match status {
        ReviewStatus::Completed => "◐".yellow(),
        ReviewStatus::Approved => "✓".green(),
    }
}

/// Color scheme for status-related text output
pub mod colors {
    use colored::{ColoredString, Colorize};

    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    /// Cyan for identifiers (vendor IDs, assessment IDs)
    pub fn identifier(text: &str) -> ColoredString {
        text.cyan()
    }

    /// Dimmed for secondary text
    pub fn secondary(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn heading(text: &str) -> ColoredString {
        text.bold()
    }
}

/// Common text formatting patterns
pub mod format {
    use chrono::{DateTime, Utc};

    /// Truncate to `max_len` characters, ending with `...` when cut.
    pub fn truncate(text: &str, max_len: usize) -> String {
        if text.chars().count() <= max_len {
            text.to_string()
        } else {
            let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", kept)
        }
    }

    /// `YYYY-MM-DD`, or `-` when unset.
    pub fn date(value: Option<DateTime<Utc>>) -> String {
        value
            .map(|v| v.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    /// Days from `now` until `when`, as "in 3d", "today" or "5d overdue".
    pub fn days_until(when: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let days = (when.date_naive() - now.date_naive()).num_days();
        match days {
            0 => "today".to_string(),
            d if d > 0 => format!("in {}d", d),
            d => format!("{}d overdue", -d),
        }
    }

    pub fn separator(width: usize) -> String {
        "─".repeat(width)
    }
}
