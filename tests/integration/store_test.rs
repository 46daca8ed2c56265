//! File-backed store behavior under concurrent writers and failed transactions.

use chrono::Utc;
use std::sync::Arc;
use std::thread;

use vendor_risk::domain::{ContactInput, NewVendor};
use vendor_risk::operations;
use vendor_risk::repository::VendorRepository;

use crate::support::harness::LibraryProject;

fn vendor(name: &str) -> NewVendor {
    NewVendor {
        name: name.to_string(),
        primary: ContactInput {
            name: "Owner".to_string(),
            email: "owner@example.com".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_concurrent_writers_do_not_lose_updates() {
    let project = Arc::new(LibraryProject::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let project = Arc::clone(&project);
            thread::spawn(move || {
                operations::add_vendor(&project.repo, vendor(&format!("Vendor {}", i)), Utc::now())
                    .unwrap()
            })
        })
        .collect();
    let ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap().id).collect();

    let store = project.repo.load().unwrap();
    assert_eq!(store.vendors.len(), 8);
    for id in ids {
        assert!(store.vendor(&id).is_some());
    }
}

#[test]
fn test_failed_transaction_leaves_store_untouched() {
    let project = LibraryProject::new();
    operations::add_vendor(&project.repo, vendor("Acme"), Utc::now()).unwrap();
    let before = project.repo.load().unwrap();

    let result: anyhow::Result<()> = project.repo.transaction(|store| {
        store.vendors.clear();
        anyhow::bail!("abort")
    });
    assert!(result.is_err());
    assert_eq!(project.repo.load().unwrap(), before);
}

#[test]
fn test_duplicate_vendor_name_rejected_across_calls() {
    let project = LibraryProject::new();
    operations::add_vendor(&project.repo, vendor("Acme"), Utc::now()).unwrap();
    let err = operations::add_vendor(&project.repo, vendor("  Acme "), Utc::now()).unwrap_err();
    assert!(err.to_string().contains("already exists"));
}
