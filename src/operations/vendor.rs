//! Vendor registry operations.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{AssessmentSnapshot, NewVendor, Vendor, VendorUpdate};
use crate::id::{self, IdKind};
use crate::repository::{Store, VendorFilter, VendorRepository};

/// A vendor together with its assessment history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct VendorDetails {
    pub vendor: Vendor,
    pub assessments: Vec<AssessmentSnapshot>,
}

/// Register a vendor.
pub fn add_vendor<R: VendorRepository>(repo: &R, input: NewVendor, now: DateTime<Utc>) -> Result<Vendor> {
    input.validate()?;
    let vendor = repo.transaction(|store| {
        let vendor = Vendor::new(id::generate_id(IdKind::Vendor, store.vendor_ids()), input, now)?;
        store.insert_vendor(vendor.clone())?;
        Ok(vendor)
    })?;

    log::info!("Registered vendor {} ({})", vendor.name, vendor.id);
    Ok(vendor)
}

/// Apply a partial update to a vendor.
pub fn update_vendor<R: VendorRepository>(
    repo: &R,
    id_or_name: &str,
    update: VendorUpdate,
    now: DateTime<Utc>,
) -> Result<Vendor> {
    if update.is_empty() {
        anyhow::bail!("Nothing to update");
    }

    repo.transaction(|store| {
        let id = resolve_id(store, id_or_name)?;
        if let Some(name) = &update.name {
            if let Some(other) = store.vendor_by_name(name) {
                if other.id != id {
                    anyhow::bail!("A vendor named '{}' already exists", name.trim());
                }
            }
        }

        let vendor = store
            .vendor_mut(&id)
            .with_context(|| format!("Vendor not found: {}", id))?;
        vendor.apply(update, now)?;
        Ok(vendor.clone())
    })
}

/// Delete a vendor and its assessment history.
pub fn delete_vendor<R: VendorRepository>(repo: &R, id_or_name: &str) -> Result<Vendor> {
    let vendor = repo.transaction(|store| {
        let id = resolve_id(store, id_or_name)?;
        store.delete_vendor(&id)
    })?;

    log::info!("Deleted vendor {} ({})", vendor.name, vendor.id);
    Ok(vendor)
}

/// Look up a vendor by ID or exact name, with its assessment history.
pub fn get_vendor<R: VendorRepository>(repo: &R, id_or_name: &str) -> Result<VendorDetails> {
    let store = repo.load()?;
    let id = resolve_id(&store, id_or_name)?;
    let vendor = store
        .vendor(&id)
        .cloned()
        .with_context(|| format!("Vendor not found: {}", id))?;
    let assessments = store.assessments_for(&id).into_iter().cloned().collect();

    Ok(VendorDetails {
        vendor,
        assessments,
    })
}

pub fn list_vendors<R: VendorRepository>(repo: &R, filter: &VendorFilter) -> Result<Vec<Vendor>> {
    let store = repo.load()?;
    Ok(store.list_vendors(filter).into_iter().cloned().collect())
}

/// Name search, or a search across owner and contacts when `all_fields` is set.
pub fn search_vendors<R: VendorRepository>(repo: &R, query: &str, all_fields: bool) -> Result<Vec<Vendor>> {
    let store = repo.load()?;
    let matches = if all_fields {
        store.find_vendors(query)
    } else {
        store.search_vendors(query)
    };
    Ok(matches.into_iter().cloned().collect())
}

fn resolve_id(store: &Store, id_or_name: &str) -> Result<String> {
    if id::is_id_of(IdKind::Vendor, id_or_name) || store.vendor(id_or_name).is_some() {
        return Ok(id_or_name.to_string());
    }
    store
        .vendor_by_name(id_or_name)
        .map(|v| v.id.clone())
        .with_context(|| format!("Vendor not found: {}", id_or_name))
}
