//! Questionnaire submission.
//!
//! Validates the request, uploads the certificate, scores the answers, and
//! persists the snapshot together with the vendor's mirrored rating. Each
//! step fails closed: nothing is scored after a failed upload, and nothing is
//! persisted unless every earlier step succeeded.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::domain::{AssessmentSnapshot, CertificateRef, Vendor};
use crate::id::{self, IdKind};
use crate::questionnaire::{MaturityFlag, QuestionnaireAnswers};
use crate::repository::VendorRepository;
use crate::score;
use crate::storage::{DocumentStore, ISO27001_DOCUMENT};

/// Form field holding the vendor name.
pub const VENDOR_FIELD: &str = "companyName";
/// Form field holding the certificate expiry date (`YYYY-MM-DD`).
pub const CERTIFICATE_EXPIRY_FIELD: &str = "iso27001ExpiryDate";
pub const MATURITY_NOTES_FIELD: &str = "additionalNotesMaturity";
pub const IMPACT_NOTES_FIELD: &str = "additionalNotesImpact";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    MissingVendor,
    MissingCertificate,
    MissingCertificateExpiry,
    Upload(String),
    Persistence(String),
}

impl SubmissionError {
    /// Whether the request was rejected before any work was done.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingVendor | Self::MissingCertificate | Self::MissingCertificateExpiry
        )
    }
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::MissingVendor => write!(f, "Please select a vendor name"),
            SubmissionError::MissingCertificate => {
                write!(f, "Please upload your ISO-27001 certificate")
            }
            SubmissionError::MissingCertificateExpiry => {
                write!(f, "Please provide the certificate expiry date")
            }
            SubmissionError::Upload(detail) => {
                write!(f, "Failed to upload ISO-27001 certificate: {}", detail)
            }
            SubmissionError::Persistence(_) => {
                write!(f, "Failed to submit form. Please try again.")
            }
        }
    }
}

impl std::error::Error for SubmissionError {}

/// A questionnaire submission as received at the boundary.
#[derive(Debug, Clone, Default)]
pub struct SubmissionRequest {
    pub vendor_name: String,
    pub answers: QuestionnaireAnswers,
    pub maturity_notes: Option<String>,
    pub impact_notes: Option<String>,
    pub certificate: Option<PathBuf>,
    pub certificate_expiry: Option<NaiveDate>,
}

impl SubmissionRequest {
    /// Build a request from submitted form fields plus an uploaded file.
    ///
    /// An unparseable expiry date is treated as missing.
    pub fn from_form(form: &HashMap<String, String>, certificate: Option<PathBuf>) -> Self {
        let text = |key: &str| {
            form.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let certificate_expiry = text(CERTIFICATE_EXPIRY_FIELD).and_then(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|e| log::warn!("Ignoring certificate expiry '{}': {}", raw, e))
                .ok()
        });

        Self {
            vendor_name: text(VENDOR_FIELD).unwrap_or_default(),
            answers: QuestionnaireAnswers::from_form(form),
            maturity_notes: text(MATURITY_NOTES_FIELD),
            impact_notes: text(IMPACT_NOTES_FIELD),
            certificate,
            certificate_expiry,
        }
    }

    fn claims_certification(&self, flag: Option<MaturityFlag>) -> bool {
        flag.is_some_and(|flag| self.answers.maturity.get(flag))
    }

    /// Required-field checks, run before anything else.
    pub fn validate(&self, certification_flag: Option<MaturityFlag>) -> Result<(), SubmissionError> {
        if self.vendor_name.trim().is_empty() {
            return Err(SubmissionError::MissingVendor);
        }

        if self.claims_certification(certification_flag) {
            let has_file = self
                .certificate
                .as_ref()
                .and_then(|path| fs::metadata(path).ok())
                .is_some_and(|m| m.is_file() && m.len() > 0);
            if !has_file {
                return Err(SubmissionError::MissingCertificate);
            }
            if self.certificate_expiry.is_none() {
                return Err(SubmissionError::MissingCertificateExpiry);
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub vendor_id: String,
    pub vendor_name: String,
    /// Whether the vendor did not exist before this submission
    pub created_vendor: bool,
    pub assessment: AssessmentSnapshot,
}

/// Run a questionnaire submission end to end.
pub fn submit_assessment<R, D>(
    request: SubmissionRequest,
    repo: &R,
    documents: &D,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<SubmissionOutcome, SubmissionError>
where
    R: VendorRepository,
    D: DocumentStore,
{
    let certification_flag = config.scoring.certification_flag();
    request.validate(certification_flag)?;
    let vendor_name = request.vendor_name.trim().to_string();
    let next_review = now
        .checked_add_signed(Duration::days(i64::from(config.review.interval_days)))
        .ok_or_else(|| {
            log::error!(
                "review.interval_days {} puts the next review out of range",
                config.review.interval_days
            );
            SubmissionError::Persistence(format!(
                "review.interval_days {} is out of range",
                config.review.interval_days
            ))
        })?;

    let certificate = if request.claims_certification(certification_flag) {
        upload_certificate(&request, &vendor_name, documents)?
    } else {
        None
    };

    let evaluation = score::evaluate(&request.answers, &config.scoring);
    log::debug!(
        "Scored {}: maturity {}, impact {}, risk {}",
        vendor_name,
        evaluation.maturity,
        evaluation.impact,
        evaluation.risk
    );

    let SubmissionRequest {
        answers,
        maturity_notes,
        impact_notes,
        ..
    } = request;

    let outcome = repo
        .transaction(|store| {
            let (vendor, created_vendor) = match store.vendor_by_name(&vendor_name) {
                Some(existing) => (existing.clone(), false),
                None => {
                    let vendor_id = id::generate_id(IdKind::Vendor, store.vendor_ids());
                    (Vendor::placeholder(vendor_id, &vendor_name, now), true)
                }
            };

            let assessment_id = id::generate_id(IdKind::Assessment, store.assessment_ids());
            let mut snapshot = AssessmentSnapshot::completed(
                assessment_id,
                vendor.id.clone(),
                answers,
                evaluation,
                now,
                next_review,
            );
            snapshot.maturity_notes = maturity_notes;
            snapshot.impact_notes = impact_notes;
            snapshot.certificate = certificate.clone();

            let outcome = SubmissionOutcome {
                vendor_id: vendor.id.clone(),
                vendor_name: vendor.name.clone(),
                created_vendor,
                assessment: snapshot.clone(),
            };
            store.record_assessment(vendor, snapshot)?;
            Ok(outcome)
        })
        .map_err(|e| {
            log::error!("Failed to persist assessment for {}: {:#}", vendor_name, e);
            if let Some(certificate) = &certificate {
                log::warn!("Uploaded certificate {} is not referenced by any assessment", certificate.path);
            }
            SubmissionError::Persistence(format!("{:#}", e))
        })?;

    log::info!(
        "Recorded assessment {} for {} (risk {})",
        outcome.assessment.id,
        outcome.vendor_name,
        outcome.assessment.risk
    );
    Ok(outcome)
}

fn upload_certificate<D: DocumentStore>(
    request: &SubmissionRequest,
    vendor_name: &str,
    documents: &D,
) -> Result<Option<CertificateRef>, SubmissionError> {
    let (Some(source), Some(expires_on)) = (&request.certificate, request.certificate_expiry) else {
        return Err(SubmissionError::MissingCertificate);
    };

    match documents.upload(source, vendor_name, ISO27001_DOCUMENT) {
        Ok(Some(path)) => Ok(Some(CertificateRef { path, expires_on })),
        Ok(None) => Err(SubmissionError::MissingCertificate),
        Err(e) => {
            log::error!("Certificate upload failed for {}: {:#}", vendor_name, e);
            Err(SubmissionError::Upload(format!("{:#}", e)))
        }
    }
}
