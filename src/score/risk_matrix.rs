//! Risk rating determination.
//!
//! Combines the impact and maturity ratings into the headline risk rating
//! through a fixed decision table. The numeric scores are never consulted:
//! two vendors with the same pair of ratings always get the same risk.
//!
//! | Impact \ Maturity | HIGH   | MEDIUM | LOW    |
//! |-------------------|--------|--------|--------|
//! | LOW               | LOW    | LOW    | MEDIUM |
//! | MEDIUM            | LOW    | MEDIUM | HIGH   |
//! | HIGH              | MEDIUM | HIGH   | HIGH   |

use crate::scoring::Rating;

use Rating::{High, Low, Medium};

/// Rows are impact (LOW, MEDIUM, HIGH), columns are maturity (HIGH, MEDIUM, LOW).
const RISK_MATRIX: [[Rating; 3]; 3] = [
    [Low, Low, Medium],
    [Low, Medium, High],
    [Medium, High, High],
];

/// Rating used when either input is missing or unrecognised.
pub const FALLBACK_RISK: Rating = Medium;

fn impact_row(impact: Rating) -> usize {
    match impact {
        Low => 0,
        Medium => 1,
        High => 2,
    }
}

fn maturity_column(maturity: Rating) -> usize {
    match maturity {
        High => 0,
        Medium => 1,
        Low => 2,
    }
}

/// Look up the risk rating for an impact and maturity rating.
pub fn risk_rating(impact: Rating, maturity: Rating) -> Rating {
    RISK_MATRIX[impact_row(impact)][maturity_column(maturity)]
}

/// Like [`risk_rating`], but tolerates a missing input by falling back to
/// MEDIUM instead of failing.
pub fn combine_ratings(impact: Option<Rating>, maturity: Option<Rating>) -> Rating {
    match (impact, maturity) {
        (Some(impact), Some(maturity)) => risk_rating(impact, maturity),
        _ => FALLBACK_RISK,
    }
}

/// Combine ratings stored as text labels (e.g. legacy records holding `N/A`).
pub fn risk_rating_from_labels(impact: &str, maturity: &str) -> Rating {
    combine_ratings(Rating::parse_label(impact), Rating::parse_label(maturity))
}
