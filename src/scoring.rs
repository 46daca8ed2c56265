//! Vendor risk scoring types
//!
//! Ratings and score results produced by the maturity, impact, and combined
//! risk calculations in [`crate::score`].

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categorical rating shared by maturity, impact, and the combined risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rating {
    Low,
    Medium,
    High,
}

impl Rating {
    /// All ratings, highest first. This is the column order of the risk matrix.
    pub const ALL: [Rating; 3] = [Rating::High, Rating::Medium, Rating::Low];

    /// Upper-case label as persisted and displayed: `LOW`, `MEDIUM`, `HIGH`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    /// Parse a persisted or user supplied label, ignoring case and surrounding
    /// whitespace. Returns `None` for anything unrecognised, including the
    /// `N/A` placeholder used for vendors that were never assessed.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Rating {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s).ok_or_else(|| {
            anyhow!(
                "Invalid rating '{}'. Expected one of: low, medium, high",
                s
            )
        })
    }
}

/// Numeric score in `[0, 100]` together with the rating it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub rating: Rating,
}

impl ScoreResult {
    pub fn new(score: u8, rating: Rating) -> Self {
        Self { score, rating }
    }
}

impl fmt::Display for ScoreResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/100 ({})", self.score, self.rating)
    }
}

/// Full result of scoring one questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Maturity of the vendor's security practices (higher score is better)
    pub maturity: ScoreResult,
    /// Exposure created by the relationship (higher score means less exposure)
    pub impact: ScoreResult,
    /// Headline risk rating derived from the two ratings above
    pub risk: Rating,
}
