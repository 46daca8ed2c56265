//! Domain types for the vendor registry.
//!
//! Plain records plus the pure validation and transition rules that apply to
//! them. Persistence lives in [`crate::repository`].

pub mod assessment;
pub mod question;
pub mod vendor;

pub use assessment::{AssessmentSnapshot, CertificateRef, ReviewStatus, TransitionError};
pub use question::{NewQuestion, Question, QuestionError, QuestionType};
pub use vendor::{
    Contact, ContactInput, ContactType, CurrentRating, NewVendor, Vendor, VendorStatus,
    VendorUpdate, UNRATED_LABEL,
};
