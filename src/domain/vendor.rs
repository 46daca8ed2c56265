//! Vendors and their contacts.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::assessment::AssessmentSnapshot;
use crate::scoring::{Rating, ScoreResult};

/// Label shown for a vendor that has never been assessed.
pub const UNRATED_LABEL: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VendorStatus {
    Active,
    Inactive,
    /// Registered by staff, not yet assessed
    #[default]
    Pending,
}

impl VendorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Pending => "PENDING",
        }
    }
}

impl fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "PENDING" => Ok(Self::Pending),
            _ => anyhow::bail!(
                "Invalid vendor status '{}'. Must be one of: ACTIVE, INACTIVE, PENDING",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContactType {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(rename = "type")]
    pub contact_type: ContactType,
}

/// Contact details as entered, before they are attached to a vendor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
}

impl ContactInput {
    fn into_contact(self, contact_type: ContactType) -> Contact {
        Contact {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: non_blank(self.phone),
            role: non_blank(self.role),
            department: non_blank(self.department),
            contact_type,
        }
    }

    fn validate(&self, label: &str) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("{} contact name is required", label);
        }
        let email = self.email.trim();
        if email.is_empty() {
            anyhow::bail!("{} contact email is required", label);
        }
        if !email.contains('@') {
            anyhow::bail!("{} contact email '{}' is not a valid address", label, email);
        }
        Ok(())
    }
}

/// The scores of the latest assessment, mirrored onto the vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentRating {
    pub maturity: ScoreResult,
    pub impact: ScoreResult,
    pub risk: Rating,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: VendorStatus,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    /// `None` until the first assessment
    #[serde(default)]
    pub current: Option<CurrentRating>,
    #[serde(default)]
    pub last_review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    /// Create a vendor from validated input.
    pub fn new(id: String, input: NewVendor, now: DateTime<Utc>) -> Result<Self> {
        input.validate()?;

        let mut contacts = vec![input.primary.into_contact(ContactType::Primary)];
        if let Some(secondary) = input.secondary {
            if !secondary.name.trim().is_empty() {
                contacts.push(secondary.into_contact(ContactType::Secondary));
            }
        }

        Ok(Self {
            id,
            name: input.name.trim().to_string(),
            owner_name: non_blank(input.owner_name),
            website: non_blank(input.website),
            category: non_blank(input.category),
            description: non_blank(input.description),
            status: input.status,
            contacts,
            current: None,
            last_review_date: None,
            next_review_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Minimal vendor created on the fly by a questionnaire submission.
    pub fn placeholder(id: String, name: &str, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            owner_name: None,
            website: None,
            category: None,
            description: None,
            status: VendorStatus::Active,
            contacts: Vec::new(),
            current: None,
            last_review_date: None,
            next_review_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn primary_contact(&self) -> Option<&Contact> {
        self.contacts
            .iter()
            .find(|c| c.contact_type == ContactType::Primary)
    }

    pub fn secondary_contact(&self) -> Option<&Contact> {
        self.contacts
            .iter()
            .find(|c| c.contact_type == ContactType::Secondary)
    }

    pub fn risk_rating(&self) -> Option<Rating> {
        self.current.map(|c| c.risk)
    }

    /// Risk label for display, `N/A` when unassessed.
    pub fn risk_label(&self) -> &'static str {
        self.risk_rating()
            .map(|r| r.as_str())
            .unwrap_or(UNRATED_LABEL)
    }

    /// Copy the scores and review dates of `snapshot` onto the vendor.
    pub fn mirror(&mut self, snapshot: &AssessmentSnapshot) {
        self.current = Some(CurrentRating {
            maturity: snapshot.maturity,
            impact: snapshot.impact,
            risk: snapshot.risk,
        });
        self.last_review_date = Some(snapshot.review_date);
        self.next_review_date = Some(snapshot.next_review_date);
        self.updated_at = snapshot.review_date;
    }

    /// Apply a partial update. Blank strings clear optional fields.
    pub fn apply(&mut self, update: VendorUpdate, now: DateTime<Utc>) -> Result<()> {
        if update.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            anyhow::bail!("Vendor name must not be empty");
        }
        let website = update.website.map(|w| non_blank(Some(w)));
        if let Some(website) = &website {
            validate_website(website.as_deref())?;
        }

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(owner_name) = update.owner_name {
            self.owner_name = non_blank(Some(owner_name));
        }
        if let Some(website) = website {
            self.website = website;
        }
        if let Some(category) = update.category {
            self.category = non_blank(Some(category));
        }
        if let Some(description) = update.description {
            self.description = non_blank(Some(description));
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Input for registering a vendor.
#[derive(Debug, Clone, Default)]
pub struct NewVendor {
    pub name: String,
    pub owner_name: Option<String>,
    pub website: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub status: VendorStatus,
    pub primary: ContactInput,
    /// Only stored when a name is given
    pub secondary: Option<ContactInput>,
}

impl NewVendor {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Vendor name is required");
        }
        validate_website(self.website.as_deref())?;
        self.primary.validate("Primary")?;
        if let Some(secondary) = &self.secondary {
            if !secondary.name.trim().is_empty() {
                secondary.validate("Secondary")?;
            }
        }
        Ok(())
    }
}

/// Partial update of a vendor; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct VendorUpdate {
    pub name: Option<String>,
    pub owner_name: Option<String>,
    pub website: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub status: Option<VendorStatus>,
}

impl VendorUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.owner_name.is_none()
            && self.website.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.status.is_none()
    }
}

fn validate_website(website: Option<&str>) -> Result<()> {
    if let Some(website) = website {
        url::Url::parse(website)
            .with_context(|| format!("Invalid website URL '{}'", website))?;
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
