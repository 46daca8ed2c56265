//! Shared business logic layer.
//!
//! Each operation takes its collaborators (repository, document store,
//! configuration, clock) as arguments, so the CLI and the tests drive exactly
//! the same code.

pub mod dashboard;
pub mod question;
pub mod review;
pub mod submit;
pub mod vendor;

pub use dashboard::{dashboard_stats, DashboardStats, UpcomingReview};
pub use question::{add_question, delete_question, list_questions};
pub use review::approve_assessment;
pub use submit::{submit_assessment, SubmissionError, SubmissionOutcome, SubmissionRequest};
pub use vendor::{
    add_vendor, delete_vendor, get_vendor, list_vendors, search_vendors, update_vendor,
    VendorDetails,
};
