//! Review workflow and read-side reporting: approve, dashboard, matrix.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;

use vendor_risk::operations::{self, DashboardStats};
use vendor_risk::repository::VendorRepository;
use vendor_risk::score::risk_rating;
use vendor_risk::scoring::Rating;
use vendor_risk::ui::{self, colors, format};

use super::{load_config, open_repository};

pub fn cmd_approve(id: &str, by: Option<String>) -> Result<()> {
    let config = load_config()?;
    let Some(by) = by.or(config.organization.reviewer).filter(|b| !b.trim().is_empty()) else {
        anyhow::bail!("No approver given. Pass --by or set organization.reviewer in config.md");
    };

    let repo = open_repository()?;
    let snapshot = operations::approve_assessment(&repo, id, &by, Utc::now())?;

    if !ui::is_quiet() {
        println!(
            "{} Assessment {} approved by {}",
            "✓".green(),
            colors::identifier(&snapshot.id),
            by.trim().bold()
        );
    }
    Ok(())
}

pub fn cmd_dashboard(json: bool) -> Result<()> {
    let config = load_config()?;
    let repo = open_repository()?;
    let store = repo.load()?;
    let now = Utc::now();
    let stats = operations::dashboard_stats(&store.vendors, now, &config.review);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_dashboard(&stats, config.review.upcoming_window_days, now);
    Ok(())
}

fn print_dashboard(stats: &DashboardStats, window_days: u32, now: chrono::DateTime<Utc>) {
    println!("{}", colors::heading("Vendor risk overview"));
    println!("{}", format::separator(40));
    println!("{:<18} {}", "Vendors", stats.total_vendors);
    println!("{:<18} {}", "Assessed", stats.assessed);
    println!("{:<18} {}", "High risk", stats.high_risk.to_string().red().bold());
    println!("{:<18} {}", "Medium risk", stats.medium_risk.to_string().yellow());
    println!("{:<18} {}", "Low risk", stats.low_risk.to_string().green());
    println!("{:<18} {}", "Due this month", stats.due_this_month);

    println!();
    if stats.upcoming_reviews.is_empty() {
        println!(
            "{}",
            colors::secondary(&format!("No reviews due in the next {} days.", window_days))
        );
        return;
    }

    println!("{}", colors::heading("Upcoming reviews"));
    for review in &stats.upcoming_reviews {
        let when = format::days_until(review.next_review_date, now);
        let when = if review.overdue { when.red() } else { when.normal() };
        println!(
            "  {} {:<32} {:<8} {}",
            format::date(Some(review.next_review_date)),
            format::truncate(&review.name, 32),
            ui::risk_badge(review.risk),
            when
        );
    }
}

/// Print the impact x maturity decision table.
pub fn cmd_matrix() -> Result<()> {
    let rows = [Rating::Low, Rating::Medium, Rating::High];
    println!(
        "{:<20} {:<8} {:<8} {:<8}",
        colors::heading("Impact \\ Maturity"),
        "HIGH",
        "MEDIUM",
        "LOW"
    );
    for impact in rows {
        let cells: Vec<String> = Rating::ALL
            .iter()
            .map(|maturity| format!("{:<8}", ui::risk_badge(Some(risk_rating(impact, *maturity)))))
            .collect();
        println!("{:<20} {}", impact.as_str(), cells.join(" "));
    }
    Ok(())
}
