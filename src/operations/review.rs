//! Review approval.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::domain::AssessmentSnapshot;
use crate::repository::VendorRepository;

/// Mark a COMPLETED assessment as APPROVED by `by`.
pub fn approve_assessment<R: VendorRepository>(
    repo: &R,
    assessment_id: &str,
    by: &str,
    now: DateTime<Utc>,
) -> Result<AssessmentSnapshot> {
    let snapshot = repo.transaction(|store| {
        let snapshot = store
            .assessment_mut(assessment_id)
            .with_context(|| format!("Assessment not found: {}", assessment_id))?;
        snapshot.approve(by, now)?;
        Ok(snapshot.clone())
    })?;

    log::info!("Assessment {} approved by {}", snapshot.id, by.trim());
    Ok(snapshot)
}
