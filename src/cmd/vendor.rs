//! Vendor registry commands: add, list, show, search, update, delete.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use std::io::IsTerminal;

use vendor_risk::domain::{NewVendor, Vendor, VendorUpdate};
use vendor_risk::operations::{self, VendorDetails};
use vendor_risk::repository::{VendorFilter, VendorRepository};
use vendor_risk::ui::{self, colors, format};

use super::open_repository;

const NAME_WIDTH: usize = 32;

pub fn cmd_add(input: NewVendor) -> Result<()> {
    let repo = open_repository()?;
    let vendor = operations::add_vendor(&repo, input, Utc::now())?;

    if !ui::is_quiet() {
        println!(
            "{} Registered {} {}",
            "✓".green(),
            vendor.name.bold(),
            colors::identifier(&vendor.id)
        );
    } else {
        println!("{}", vendor.id);
    }
    Ok(())
}

pub fn cmd_list(filter: VendorFilter, json: bool) -> Result<()> {
    let repo = open_repository()?;
    let vendors = operations::list_vendors(&repo, &filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&vendors)?);
        return Ok(());
    }

    if vendors.is_empty() {
        if !ui::is_quiet() {
            println!("{}", "No vendors found.".yellow());
        }
        return Ok(());
    }

    print_vendor_table(&vendors);
    if !ui::is_quiet() {
        println!();
        println!("{}", colors::secondary(&format!("{} vendor(s)", vendors.len())));
    }
    Ok(())
}

pub fn cmd_show(id_or_name: &str, json: bool) -> Result<()> {
    let repo = open_repository()?;
    let details = operations::get_vendor(&repo, id_or_name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    print_details(&details);
    Ok(())
}

pub fn cmd_search(query: &str, all_fields: bool) -> Result<()> {
    let repo = open_repository()?;
    let vendors = operations::search_vendors(&repo, query, all_fields)?;

    if vendors.is_empty() {
        println!("{}", format!("No vendors match '{}'.", query).yellow());
        return Ok(());
    }
    print_vendor_table(&vendors);
    Ok(())
}

pub fn cmd_update(id_or_name: &str, update: VendorUpdate) -> Result<()> {
    let repo = open_repository()?;
    let vendor = operations::update_vendor(&repo, id_or_name, update, Utc::now())?;

    if !ui::is_quiet() {
        println!(
            "{} Updated {} {}",
            "✓".green(),
            vendor.name.bold(),
            colors::identifier(&vendor.id)
        );
    }
    Ok(())
}

pub fn cmd_delete(id_or_name: &str, yes: bool) -> Result<()> {
    let repo = open_repository()?;
    let details = operations::get_vendor(&repo, id_or_name)?;

    if !yes {
        if !std::io::stdin().is_terminal() {
            anyhow::bail!("Refusing to delete without confirmation. Pass --yes to proceed.");
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Delete {} and {} assessment(s)?",
                details.vendor.name,
                details.assessments.len()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
    }

    let vendor = operations::delete_vendor(&repo, &details.vendor.id)?;
    if !ui::is_quiet() {
        println!(
            "{} Deleted {} {}",
            "✓".green(),
            vendor.name.bold(),
            colors::identifier(&vendor.id)
        );
    }
    Ok(())
}

pub fn cmd_categories() -> Result<()> {
    let repo = open_repository()?;
    let store = repo.load()?;
    for category in store.categories() {
        println!("{}", category);
    }
    Ok(())
}

fn print_vendor_table(vendors: &[Vendor]) {
    println!(
        "  {:<24} {:<width$} {:<8} {:<10} {}",
        colors::heading("ID"),
        colors::heading("NAME"),
        colors::heading("RISK"),
        colors::heading("STATUS"),
        colors::heading("NEXT REVIEW"),
        width = NAME_WIDTH
    );
    for vendor in vendors {
        println!(
            "{} {:<24} {:<width$} {:<8} {:<10} {}",
            ui::vendor_status_icon(vendor.status),
            colors::identifier(&vendor.id),
            format::truncate(&vendor.name, NAME_WIDTH),
            ui::risk_badge(vendor.risk_rating()),
            vendor.status.as_str(),
            format::date(vendor.next_review_date),
            width = NAME_WIDTH
        );
    }
}

fn print_details(details: &VendorDetails) {
    let vendor = &details.vendor;
    println!("{} {}", vendor.name.bold(), colors::identifier(&vendor.id));
    println!("{}", format::separator(48));

    let field = |label: &str, value: Option<&str>| {
        if let Some(value) = value {
            println!("{:<14} {}", colors::secondary(label), value);
        }
    };
    println!(
        "{:<14} {} {}",
        colors::secondary("Status"),
        ui::vendor_status_icon(vendor.status),
        vendor.status
    );
    field("Owner", vendor.owner_name.as_deref());
    field("Website", vendor.website.as_deref());
    field("Category", vendor.category.as_deref());
    field("Description", vendor.description.as_deref());

    for contact in &vendor.contacts {
        let mut line = format!("{} <{}>", contact.name, contact.email);
        if let Some(phone) = &contact.phone {
            line.push_str(&format!(", {}", phone));
        }
        let label = match contact.contact_type {
            vendor_risk::domain::ContactType::Primary => "Primary",
            vendor_risk::domain::ContactType::Secondary => "Secondary",
        };
        field(label, Some(&line));
    }

    println!();
    match &vendor.current {
        Some(current) => {
            println!("{:<14} {}", colors::secondary("Risk"), ui::risk_badge(Some(current.risk)));
            println!(
                "{:<14} {} ({})",
                colors::secondary("Maturity"),
                ui::rating_badge(Some(current.maturity.rating), true),
                current.maturity.score
            );
            println!(
                "{:<14} {} ({})",
                colors::secondary("Impact"),
                ui::rating_badge(Some(current.impact.rating), false),
                current.impact.score
            );
        }
        None => println!("{:<14} {}", colors::secondary("Risk"), ui::risk_badge(None)),
    }
    println!("{:<14} {}", colors::secondary("Last review"), format::date(vendor.last_review_date));
    println!("{:<14} {}", colors::secondary("Next review"), format::date(vendor.next_review_date));

    if details.assessments.is_empty() {
        return;
    }
    println!();
    println!("{}", colors::heading("Assessments"));
    for snapshot in &details.assessments {
        let approval = snapshot
            .approved_by
            .as_deref()
            .map(|by| format!(" by {}", by))
            .unwrap_or_default();
        println!(
            "{} {} {} risk {} maturity {} impact {} {}{}",
            ui::review_status_icon(snapshot.status),
            colors::identifier(&snapshot.id),
            format::date(Some(snapshot.review_date)),
            ui::risk_badge(Some(snapshot.risk)),
            snapshot.maturity.score,
            snapshot.impact.score,
            snapshot.status,
            approval
        );
    }
}
