//! Assessment snapshots and the review workflow.
//!
//! A snapshot records one questionnaire submission and the scores computed
//! from it. Scores are written once at submission and never change; the only
//! later mutation is the move from COMPLETED to APPROVED.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::questionnaire::QuestionnaireAnswers;
use crate::scoring::{Evaluation, Rating, ScoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReviewStatus {
    /// Scored at submission, awaiting reviewer sign-off
    Completed,
    Approved,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Approved => "APPROVED",
        }
    }

    pub fn can_transition_to(&self, target: ReviewStatus) -> bool {
        matches!((self, target), (Self::Completed, Self::Approved))
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    InvalidTransition { from: ReviewStatus, to: ReviewStatus },
    MissingApprover,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::InvalidTransition { from, to } => {
                write!(f, "Invalid transition from {} to {}", from, to)
            }
            TransitionError::MissingApprover => write!(f, "Approver name is required"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// Where an uploaded certificate lives and when it expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRef {
    /// Path relative to the storage bucket
    pub path: String,
    pub expires_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSnapshot {
    pub id: String,
    pub vendor_id: String,
    pub answers: QuestionnaireAnswers,
    /// Free-text notes entered alongside the maturity questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity_notes: Option<String>,
    /// Free-text notes entered alongside the impact questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateRef>,
    pub maturity: ScoreResult,
    pub impact: ScoreResult,
    pub risk: Rating,
    pub status: ReviewStatus,
    pub review_date: DateTime<Utc>,
    pub next_review_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

impl AssessmentSnapshot {
    /// Build a freshly scored snapshot with status COMPLETED.
    pub fn completed(
        id: String,
        vendor_id: String,
        answers: QuestionnaireAnswers,
        evaluation: Evaluation,
        review_date: DateTime<Utc>,
        next_review_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            vendor_id,
            answers,
            maturity_notes: None,
            impact_notes: None,
            certificate: None,
            maturity: evaluation.maturity,
            impact: evaluation.impact,
            risk: evaluation.risk,
            status: ReviewStatus::Completed,
            review_date,
            next_review_date,
            approved_by: None,
            approved_at: None,
        }
    }

    pub fn evaluation(&self) -> Evaluation {
        Evaluation {
            maturity: self.maturity,
            impact: self.impact,
            risk: self.risk,
        }
    }

    /// Record reviewer approval. Scores are left untouched.
    pub fn approve(&mut self, by: &str, at: DateTime<Utc>) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(ReviewStatus::Approved) {
            return Err(TransitionError::InvalidTransition {
                from: self.status,
                to: ReviewStatus::Approved,
            });
        }
        let by = by.trim();
        if by.is_empty() {
            return Err(TransitionError::MissingApprover);
        }

        self.status = ReviewStatus::Approved;
        self.approved_by = Some(by.to_string());
        self.approved_at = Some(at);
        Ok(())
    }
}
