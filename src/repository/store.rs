//! The store document and the queries over it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{AssessmentSnapshot, Question, Vendor, VendorStatus};
use crate::scoring::Rating;

/// Maximum number of vendors returned by a name search.
pub const SEARCH_LIMIT: usize = 15;

/// Maximum number of vendors returned by a search across all fields.
pub const FIND_LIMIT: usize = 20;

/// Current on-disk format version.
pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub assessments: Vec<AssessmentSnapshot>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

fn default_version() -> u32 {
    STORE_VERSION
}

impl Default for Store {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            vendors: Vec::new(),
            assessments: Vec::new(),
            questions: Vec::new(),
        }
    }
}

/// Filters for listing vendors; `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct VendorFilter {
    pub risk: Option<Rating>,
    pub status: Option<VendorStatus>,
    pub category: Option<String>,
    /// Only vendors that have never been assessed
    pub unrated: bool,
}

impl VendorFilter {
    pub fn matches(&self, vendor: &Vendor) -> bool {
        if let Some(risk) = self.risk {
            if vendor.risk_rating() != Some(risk) {
                return false;
            }
        }
        if self.unrated && vendor.current.is_some() {
            return false;
        }
        if let Some(status) = self.status {
            if vendor.status != status {
                return false;
            }
        }
        if let Some(category) = &self.category {
            let matches_category = vendor
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category));
            if !matches_category {
                return false;
            }
        }
        true
    }
}

impl Store {
    // =========================================================================
    // VENDORS
    // =========================================================================

    pub fn vendor(&self, id: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == id)
    }

    pub fn vendor_mut(&mut self, id: &str) -> Option<&mut Vendor> {
        self.vendors.iter_mut().find(|v| v.id == id)
    }

    /// Exact name match, ignoring surrounding whitespace.
    pub fn vendor_by_name(&self, name: &str) -> Option<&Vendor> {
        let name = name.trim();
        self.vendors.iter().find(|v| v.name == name)
    }

    /// Vendors matching `filter`, sorted by name.
    pub fn list_vendors(&self, filter: &VendorFilter) -> Vec<&Vendor> {
        let mut vendors: Vec<&Vendor> = self.vendors.iter().filter(|v| filter.matches(v)).collect();
        vendors.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        vendors
    }

    /// Case-insensitive substring search on vendor names, sorted ascending
    /// and capped at [`SEARCH_LIMIT`]. A blank query matches nothing.
    pub fn search_vendors(&self, query: &str) -> Vec<&Vendor> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<&Vendor> = self
            .vendors
            .iter()
            .filter(|v| v.name.to_lowercase().contains(&query))
            .collect();
        matches.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        matches.truncate(SEARCH_LIMIT);
        matches
    }

    /// Case-insensitive search across vendor name, owner, and contact names
    /// and emails, capped at [`FIND_LIMIT`].
    pub fn find_vendors(&self, term: &str) -> Vec<&Vendor> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        let hit = |value: &str| value.to_lowercase().contains(&term);

        let mut matches: Vec<&Vendor> = self
            .vendors
            .iter()
            .filter(|v| {
                hit(&v.name)
                    || v.owner_name.as_deref().is_some_and(hit)
                    || v.contacts.iter().any(|c| hit(&c.name) || hit(&c.email))
            })
            .collect();
        matches.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        matches.truncate(FIND_LIMIT);
        matches
    }

    /// Distinct vendor categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .vendors
            .iter()
            .filter_map(|v| v.category.as_deref())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    pub fn insert_vendor(&mut self, vendor: Vendor) -> Result<()> {
        if self.vendor(&vendor.id).is_some() {
            anyhow::bail!("Vendor {} already exists", vendor.id);
        }
        if self.vendor_by_name(&vendor.name).is_some() {
            anyhow::bail!("A vendor named '{}' already exists", vendor.name);
        }
        self.vendors.push(vendor);
        Ok(())
    }

    /// Remove a vendor and its assessment history.
    pub fn delete_vendor(&mut self, id: &str) -> Result<Vendor> {
        let index = self
            .vendors
            .iter()
            .position(|v| v.id == id)
            .with_context(|| format!("Vendor not found: {}", id))?;
        let vendor = self.vendors.remove(index);
        self.assessments.retain(|a| a.vendor_id != id);
        Ok(vendor)
    }

    pub fn vendor_ids(&self) -> impl Iterator<Item = &str> {
        self.vendors.iter().map(|v| v.id.as_str())
    }

    // =========================================================================
    // ASSESSMENTS
    // =========================================================================

    pub fn assessment(&self, id: &str) -> Option<&AssessmentSnapshot> {
        self.assessments.iter().find(|a| a.id == id)
    }

    pub fn assessment_mut(&mut self, id: &str) -> Option<&mut AssessmentSnapshot> {
        self.assessments.iter_mut().find(|a| a.id == id)
    }

    /// Assessment history of a vendor, newest first.
    pub fn assessments_for(&self, vendor_id: &str) -> Vec<&AssessmentSnapshot> {
        let mut history: Vec<&AssessmentSnapshot> = self
            .assessments
            .iter()
            .filter(|a| a.vendor_id == vendor_id)
            .collect();
        history.sort_by(|a, b| b.review_date.cmp(&a.review_date));
        history
    }

    pub fn assessment_ids(&self) -> impl Iterator<Item = &str> {
        self.assessments.iter().map(|a| a.id.as_str())
    }

    /// Append a snapshot and mirror its scores onto the vendor, inserting the
    /// vendor if it is new.
    pub fn record_assessment(&mut self, vendor: Vendor, snapshot: AssessmentSnapshot) -> Result<()> {
        if snapshot.vendor_id != vendor.id {
            anyhow::bail!(
                "Assessment {} belongs to vendor {}, not {}",
                snapshot.id,
                snapshot.vendor_id,
                vendor.id
            );
        }
        if self.assessment(&snapshot.id).is_some() {
            anyhow::bail!("Assessment {} already exists", snapshot.id);
        }

        let mut vendor = vendor;
        vendor.mirror(&snapshot);
        match self.vendor_mut(&vendor.id) {
            Some(existing) => *existing = vendor,
            None => self.insert_vendor(vendor)?,
        }
        self.assessments.push(snapshot);
        Ok(())
    }

    // =========================================================================
    // QUESTIONS
    // =========================================================================

    pub fn question_mut(&mut self, id: &str) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| q.id == id)
    }

    /// Active questions, newest first.
    pub fn active_questions(&self) -> Vec<&Question> {
        let mut questions: Vec<&Question> = self.questions.iter().filter(|q| q.active).collect();
        questions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        questions
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|q| q.id.as_str())
    }
}
