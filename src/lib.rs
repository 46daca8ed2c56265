//! # vendor-risk - Vendor Security Risk Assessment
//!
//! vendor-risk is an admin tool for registering vendors, collecting their
//! answers to a security questionnaire, and turning those answers into a
//! risk rating that reviewers can track over time.
//!
//! ## Overview
//!
//! Every questionnaire submission is scored on two independent axes:
//!
//! - **Maturity**: how mature the vendor's own security practices are
//!   (higher is better).
//! - **Impact**: how much exposure the vendor relationship creates
//!   (a higher score means *less* exposure).
//!
//! The two categorical ratings are then combined through a fixed decision
//! table into the headline LOW / MEDIUM / HIGH risk rating.
//!
//! ## Modules
//!
//! - [`score`] - The pure scoring engine (maturity, impact, risk matrix)
//! - [`scoring`] - Rating and score result types
//! - [`questionnaire`] - Typed questionnaire answers and flag names
//! - [`config`] - Configuration management and scoring rule sets
//! - [`domain`] - Vendors, assessment snapshots, questions
//! - [`repository`] - Persistence of vendors and assessment history
//! - [`storage`] - Certificate uploads and signed retrieval URLs
//! - [`operations`] - Submission, vendor, question, and dashboard operations
//!
//! ## Example
//!
//! ```
//! use vendor_risk::config::ScoringConfig;
//! use vendor_risk::questionnaire::{MaturityAnswers, QuestionnaireAnswers};
//! use vendor_risk::score;
//! use vendor_risk::scoring::Rating;
//!
//! let answers = QuestionnaireAnswers {
//!     maturity: MaturityAnswers::all(true),
//!     ..Default::default()
//! };
//!
//! let evaluation = score::evaluate(&answers, &ScoringConfig::default());
//! assert_eq!(evaluation.maturity.score, 100);
//! // Role-based access was not confirmed, so impact drops to MEDIUM.
//! assert_eq!(evaluation.impact.rating, Rating::Medium);
//! assert_eq!(evaluation.risk, Rating::Low);
//! ```

pub mod config;
pub mod domain;
pub mod id;
pub mod lock;
pub mod operations;
pub mod questionnaire;
pub mod repository;
pub mod score;
pub mod scoring;
pub mod storage;
pub mod ui;

/// Default path constants for the vendor-risk directory structure.
pub mod paths {
    /// Project root directory: `.vendor-risk`
    pub const ROOT_DIR: &str = ".vendor-risk";
    /// Project config file: `.vendor-risk/config.md`
    pub const CONFIG_FILE: &str = ".vendor-risk/config.md";
    /// Vendor and assessment store: `.vendor-risk/store.json`
    pub const STORE_FILE: &str = ".vendor-risk/store.json";
    /// Directory containing lock files: `.vendor-risk/.locks`
    pub const LOCKS_DIR: &str = ".vendor-risk/.locks";
    /// Fallback signing key for document URLs: `.vendor-risk/.signing-key`
    pub const SIGNING_KEY_FILE: &str = ".vendor-risk/.signing-key";
}

