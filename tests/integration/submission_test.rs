//! Submission flow through the library API against real file-backed collaborators.

use chrono::{Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::fs;

use vendor_risk::domain::{ReviewStatus, VendorStatus};
use vendor_risk::operations::{self, SubmissionError, SubmissionRequest};
use vendor_risk::questionnaire::{ImpactFlag, MaturityFlag};
use vendor_risk::repository::VendorRepository;
use vendor_risk::scoring::Rating;
use vendor_risk::storage::DocumentStore;

use crate::support::builders::AnswersBuilder;
use crate::support::harness::LibraryProject;

fn expiry() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2027, 6, 30)
}

#[test]
fn test_best_case_submission_creates_vendor_and_stores_certificate() {
    let project = LibraryProject::new();
    let certificate = project.file("cert.pdf", b"%PDF-1.4 certificate");
    let now = Utc::now();

    let request = SubmissionRequest {
        vendor_name: "Acme Corp".to_string(),
        answers: AnswersBuilder::best_case().build(),
        certificate: Some(certificate),
        certificate_expiry: expiry(),
        ..Default::default()
    };
    let outcome =
        operations::submit_assessment(request, &project.repo, &project.documents, &project.config, now)
            .unwrap();

    assert!(outcome.created_vendor);
    let snapshot = &outcome.assessment;
    assert_eq!(snapshot.maturity.score, 100);
    assert_eq!(snapshot.maturity.rating, Rating::High);
    assert_eq!(snapshot.impact.score, 100);
    assert_eq!(snapshot.impact.rating, Rating::Low);
    assert_eq!(snapshot.risk, Rating::Low);
    assert_eq!(snapshot.status, ReviewStatus::Completed);
    assert_eq!(snapshot.next_review_date, now + Duration::days(365));

    let cert = snapshot.certificate.as_ref().unwrap();
    assert!(cert.path.starts_with("acme-corp/iso27001-"));
    assert!(cert.path.ends_with(".pdf"));
    assert_eq!(cert.expires_on, expiry().unwrap());

    let stored = project.documents.local_path(&cert.path).unwrap();
    assert_eq!(fs::read(stored).unwrap(), b"%PDF-1.4 certificate");

    let store = project.repo.load().unwrap();
    let vendor = store.vendor(&outcome.vendor_id).unwrap();
    assert_eq!(vendor.status, VendorStatus::Active);
    assert_eq!(vendor.risk_rating(), Some(Rating::Low));
    assert_eq!(vendor.next_review_date, Some(snapshot.next_review_date));
}

#[test]
fn test_missing_certificate_persists_nothing() {
    let project = LibraryProject::new();
    let request = SubmissionRequest {
        vendor_name: "Acme".to_string(),
        answers: AnswersBuilder::new().maturity(MaturityFlag::HasIso27001, true).build(),
        certificate_expiry: expiry(),
        ..Default::default()
    };

    let err = operations::submit_assessment(
        request,
        &project.repo,
        &project.documents,
        &project.config,
        Utc::now(),
    )
    .unwrap_err();

    assert_eq!(err, SubmissionError::MissingCertificate);
    assert_eq!(err.to_string(), "Please upload your ISO-27001 certificate");
    assert!(project.repo.load().unwrap().vendors.is_empty());
}

#[test]
fn test_empty_certificate_counts_as_missing() {
    let project = LibraryProject::new();
    let certificate = project.file("empty.pdf", b"");
    let request = SubmissionRequest {
        vendor_name: "Acme".to_string(),
        answers: AnswersBuilder::new().maturity(MaturityFlag::HasIso27001, true).build(),
        certificate: Some(certificate),
        certificate_expiry: expiry(),
        ..Default::default()
    };

    let err = operations::submit_assessment(
        request,
        &project.repo,
        &project.documents,
        &project.config,
        Utc::now(),
    )
    .unwrap_err();
    assert_eq!(err, SubmissionError::MissingCertificate);
}

#[test]
fn test_form_submission_scores_typed_answers() {
    let project = LibraryProject::new();
    let form: HashMap<String, String> = [
        ("companyName", "  Globex  "),
        ("usesMFA", "true"),
        ("requirePersonalData", "true"),
        ("requireFinancialData", "true"),
        ("roleBasedAccess", "on"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let request = SubmissionRequest::from_form(&form, None);
    assert_eq!(request.vendor_name, "Globex");

    let outcome = operations::submit_assessment(
        request,
        &project.repo,
        &project.documents,
        &project.config,
        Utc::now(),
    )
    .unwrap();

    // 100 - 20 (certificate) - 15 (three practices)
    assert_eq!(outcome.assessment.maturity.score, 65);
    assert_eq!(outcome.assessment.maturity.rating, Rating::Medium);
    // 100 - 20 - 20 - 20 (role-based access "on" is not "true")
    assert_eq!(outcome.assessment.impact.score, 40);
    assert_eq!(outcome.assessment.impact.rating, Rating::High);
    assert_eq!(outcome.assessment.risk, Rating::High);
    assert!(outcome.assessment.certificate.is_none());
}

#[test]
fn test_resubmission_keeps_history_and_mirrors_latest() {
    let project = LibraryProject::new();
    let now = Utc::now();

    let submit = |answers, at| {
        let request = SubmissionRequest {
            vendor_name: "Initech".to_string(),
            answers,
            ..Default::default()
        };
        operations::submit_assessment(request, &project.repo, &project.documents, &project.config, at)
            .unwrap()
    };

    let first = submit(
        AnswersBuilder::new()
            .impact(ImpactFlag::RequirePersonalData, true)
            .build(),
        now - Duration::days(30),
    );
    let second = submit(
        AnswersBuilder::new()
            .maturity(MaturityFlag::UsesMfa, true)
            .impact(ImpactFlag::RoleBasedAccess, true)
            .build(),
        now,
    );

    assert!(first.created_vendor);
    assert!(!second.created_vendor);
    assert_eq!(first.vendor_id, second.vendor_id);

    let details = operations::get_vendor(&project.repo, "Initech").unwrap();
    assert_eq!(details.assessments.len(), 2);
    assert_eq!(details.assessments[0].id, second.assessment.id);
    // The first snapshot is untouched by the second submission
    assert_eq!(details.assessments[1], first.assessment);

    let current = details.vendor.current.unwrap();
    assert_eq!(current.risk, second.assessment.risk);
    assert_eq!(current.maturity, second.assessment.maturity);
}

#[test]
fn test_approval_round_trip_and_signed_url() {
    let project = LibraryProject::new();
    let certificate = project.file("iso.png", b"certificate image");
    let now = Utc::now();

    let request = SubmissionRequest {
        vendor_name: "Hooli".to_string(),
        answers: AnswersBuilder::best_case().build(),
        certificate: Some(certificate),
        certificate_expiry: expiry(),
        ..Default::default()
    };
    let outcome =
        operations::submit_assessment(request, &project.repo, &project.documents, &project.config, now)
            .unwrap();

    let approved =
        operations::approve_assessment(&project.repo, &outcome.assessment.id, "Dana", now).unwrap();
    assert_eq!(approved.status, ReviewStatus::Approved);
    assert_eq!(approved.risk, outcome.assessment.risk);

    let path = &approved.certificate.as_ref().unwrap().path;
    let url = project.documents.signed_url(path, now).unwrap();
    assert!(url.starts_with("vendor-risk://documents/vendor-uploads/hooli/"));

    let resolved = project.documents.resolve(&url, now).unwrap();
    assert_eq!(fs::read(resolved).unwrap(), b"certificate image");

    let later = now + Duration::seconds(3601);
    let err = project.documents.resolve(&url, later).unwrap_err();
    assert!(err.to_string().contains("expired"));
}

#[test]
fn test_dashboard_reads_persisted_ratings() {
    let project = LibraryProject::new();
    let now = Utc::now();

    for (name, answers) in [
        ("Low Co", AnswersBuilder::best_case().build()),
        (
            "High Co",
            AnswersBuilder::new()
                .impact(ImpactFlag::RequirePersonalData, true)
                .impact(ImpactFlag::RequireFinancialData, true)
                .build(),
        ),
    ] {
        let request = SubmissionRequest {
            vendor_name: name.to_string(),
            answers,
            certificate: Some(project.file(&format!("{}.pdf", name), b"cert")),
            certificate_expiry: expiry(),
            ..Default::default()
        };
        operations::submit_assessment(request, &project.repo, &project.documents, &project.config, now)
            .unwrap();
    }

    let store = project.repo.load().unwrap();
    let stats = operations::dashboard_stats(&store.vendors, now, &project.config.review);
    assert_eq!(stats.total_vendors, 2);
    assert_eq!(stats.assessed, 2);
    assert_eq!(stats.low_risk, 1);
    assert_eq!(stats.high_risk, 1);
    // Next reviews are a year out
    assert!(stats.upcoming_reviews.is_empty());
}
