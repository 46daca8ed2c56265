//! End-to-end tests driving the compiled binary.

use std::fs;

use crate::support::builders::AnswersBuilder;
use crate::support::harness::{stderr, stdout, TestHarness};
use vendor_risk::questionnaire::ImpactFlag;

const BEST_CASE_FLAGS: [&str; 6] = [
    "has_iso27001",
    "performs_vulnerability_scan",
    "uses_mfa",
    "uses_automated_access_control",
    "maintains_incident_response_plan",
    "role_based_access",
];

fn assess_best_case(harness: &TestHarness, vendor: &str) -> serde_json::Value {
    let certificate = harness.write_file("docs/cert.pdf", b"certificate bytes");
    let certificate = certificate.to_string_lossy().to_string();

    let mut args = vec!["assess", vendor];
    for flag in BEST_CASE_FLAGS {
        args.extend(["--yes", flag]);
    }
    args.extend(["--certificate", &certificate, "--expires", "2027-06-30", "--json"]);
    harness.run_json(&args)
}

#[test]
fn test_commands_require_init() {
    let harness = TestHarness::new();
    let output = harness.run(&["vendor", "list"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not initialized"));
}

#[test]
fn test_init_creates_project() {
    let harness = TestHarness::initialized();
    let root = harness.path().join(".vendor-risk");
    assert!(root.join("config.md").is_file());
    assert!(root.join("store.json").is_file());
    assert!(root.join(".signing-key").is_file());

    let config = fs::read_to_string(root.join("config.md")).unwrap();
    assert!(config.starts_with("---\n"));
    assert!(config.contains("name: Allnex"));

    // A second init leaves the config alone
    let out = harness.run_ok(&["init", "--name", "Other"]);
    assert!(out.contains("already initialized"));
    let again = fs::read_to_string(root.join("config.md")).unwrap();
    assert_eq!(config, again);
}

#[test]
fn test_vendor_add_list_show() {
    let harness = TestHarness::initialized();
    harness.run_ok(&[
        "vendor",
        "add",
        "Acme Corp",
        "--contact",
        "Alice",
        "--email",
        "alice@acme.test",
        "--category",
        "Cloud",
    ]);

    let list = harness.run_json(&["vendor", "list", "--json"]);
    let vendors = list.as_array().unwrap();
    assert_eq!(vendors.len(), 1);
    assert_eq!(vendors[0]["name"], "Acme Corp");
    assert_eq!(vendors[0]["status"], "PENDING");
    assert!(vendors[0]["current"].is_null());

    let shown = harness.run_ok(&["vendor", "show", "Acme Corp"]);
    assert!(shown.contains("Acme Corp"));
    assert!(shown.contains("N/A"));

    let filtered = harness.run_json(&["vendor", "list", "--category", "cloud", "--json"]);
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    let filtered = harness.run_json(&["vendor", "list", "--risk", "high", "--json"]);
    assert!(filtered.as_array().unwrap().is_empty());
}

#[test]
fn test_vendor_add_rejects_bad_email() {
    let harness = TestHarness::initialized();
    let output = harness.run(&["vendor", "add", "Acme", "--contact", "Alice", "--email", "nope"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not a valid address"));
    assert!(harness.store().vendors.is_empty());
}

#[test]
fn test_assess_missing_certificate_fails_closed() {
    let harness = TestHarness::initialized();
    let output = harness.run(&["assess", "Acme", "--yes", "has_iso27001"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Please upload your ISO-27001 certificate"));
    assert!(harness.store().vendors.is_empty());
}

#[test]
fn test_assess_from_answers_file() {
    let harness = TestHarness::initialized();
    let answers = AnswersBuilder::new()
        .impact(ImpactFlag::RequirePersonalData, true)
        .impact(ImpactFlag::RoleBasedAccess, true);
    let path = harness.write_file("answers.yaml", answers.to_yaml().as_bytes());

    let snapshot = harness.run_json(&[
        "assess",
        "Globex",
        "--answers",
        &path.to_string_lossy(),
        "--maturity-notes",
        "No certification yet",
        "--json",
    ]);
    assert_eq!(snapshot["maturity"]["score"], 60);
    assert_eq!(snapshot["maturity"]["rating"], "MEDIUM");
    assert_eq!(snapshot["impact"]["score"], 80);
    assert_eq!(snapshot["impact"]["rating"], "MEDIUM");
    assert_eq!(snapshot["risk"], "MEDIUM");
    assert_eq!(snapshot["status"], "COMPLETED");
    assert_eq!(snapshot["maturity_notes"], "No certification yet");

    let vendor = harness.run_json(&["vendor", "show", "Globex", "--json"]);
    assert_eq!(vendor["vendor"]["status"], "ACTIVE");
    assert_eq!(vendor["vendor"]["current"]["risk"], "MEDIUM");
    assert_eq!(vendor["assessments"].as_array().unwrap().len(), 1);
}

#[test]
fn test_assess_approve_and_fetch_document() {
    let harness = TestHarness::initialized();
    let snapshot = assess_best_case(&harness, "Hooli");
    assert_eq!(snapshot["risk"], "LOW");
    let id = snapshot["id"].as_str().unwrap().to_string();

    // Reviewer comes from organization.reviewer
    let out = harness.run_ok(&["review", "approve", &id]);
    assert!(out.contains("approved by Security Team"));

    let output = harness.run(&["review", "approve", &id, "--by", "Dana"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("APPROVED"));

    let url = harness.run_ok(&["document", "url", "Hooli"]);
    let url = url.trim();
    assert!(url.starts_with("vendor-risk://documents/vendor-uploads/hooli/iso27001-"));

    harness.run_ok(&["document", "fetch", url, "--output", "copy.pdf"]);
    let copied = fs::read(harness.path().join("copy.pdf")).unwrap();
    assert_eq!(copied, b"certificate bytes");

    let tampered = url.replace("signature=", "signature=00");
    let output = harness.run(&["document", "fetch", &tampered, "--output", "bad.pdf"]);
    assert!(!output.status.success());
    assert!(!harness.path().join("bad.pdf").exists());
}

#[test]
fn test_dashboard_and_matrix() {
    let harness = TestHarness::initialized();
    assess_best_case(&harness, "Hooli");
    harness.run_ok(&["assess", "Initech", "--yes", "require_personal_data"]);

    let stats = harness.run_json(&["dashboard", "--json"]);
    assert_eq!(stats["total_vendors"], 2);
    assert_eq!(stats["assessed"], 2);
    assert_eq!(stats["low_risk"], 1);
    assert_eq!(stats["high_risk"], 1);

    let matrix = harness.run_ok(&["matrix"]);
    let lines: Vec<&str> = matrix.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("LOW"));
    assert!(lines[3].starts_with("HIGH"));
    assert!(lines[3].contains("MEDIUM"));
}

#[test]
fn test_question_bank() {
    let harness = TestHarness::initialized();
    let out = harness.run(&[
        "--quiet",
        "question",
        "add",
        "Do you encrypt backups?",
        "--category",
        "Data",
        "--type",
        "single_choice",
        "--weight",
        "10",
        "--options",
        r#"["Yes","No"]"#,
    ]);
    assert!(out.status.success(), "{}", stderr(&out));
    let id = stdout(&out).trim().to_string();

    let questions = harness.run_json(&["question", "list", "--json"]);
    assert_eq!(questions[0]["id"], id.as_str());
    assert_eq!(questions[0]["type"], "SINGLE_CHOICE");
    assert_eq!(questions[0]["options"][1], "No");

    let output = harness.run(&[
        "question", "add", "Bad?", "--category", "Data", "--type", "boolean", "--weight", "101",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Weight must be a number between 0 and 100"));

    harness.run_ok(&["question", "delete", &id]);
    let questions = harness.run_json(&["question", "list", "--json"]);
    assert!(questions.as_array().unwrap().is_empty());
}

#[test]
fn test_vendor_delete_cascades() {
    let harness = TestHarness::initialized();
    harness.run_ok(&["assess", "Initech"]);
    assert_eq!(harness.store().assessments.len(), 1);

    let output = harness.run(&["vendor", "delete", "Initech"]);
    assert!(!output.status.success(), "delete without --yes must not proceed");

    harness.run_ok(&["vendor", "delete", "Initech", "--yes"]);
    let store = harness.store();
    assert!(store.vendors.is_empty());
    assert!(store.assessments.is_empty());
}

#[test]
fn test_config_validate_reports_warnings() {
    let harness = TestHarness::initialized();
    let out = harness.run_ok(&["config", "--validate"]);
    assert!(out.contains("Maturity rating LOW is unreachable"));
    assert!(out.contains("valid with 1 warning"));
}

#[test]
fn test_config_validate_rejects_bad_thresholds() {
    let harness = TestHarness::initialized();
    harness.write_file(
        ".vendor-risk/config.md",
        b"---\norganization:\n  name: Allnex\nscoring:\n  maturity:\n    thresholds:\n      high_above: 40\n      medium_min: 50\n---\n",
    );
    let output = harness.run(&["config", "--validate"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("medium_min"));
}

#[test]
fn test_version() {
    let harness = TestHarness::new();
    let out = harness.run_ok(&["version"]);
    assert!(out.starts_with("vendor-risk "));
}
