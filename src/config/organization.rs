use serde::{Deserialize, Serialize};

/// The organization running the assessments
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OrganizationConfig {
    pub name: String,
    /// Default reviewer recorded on approvals when none is given
    #[serde(default)]
    pub reviewer: Option<String>,
}
