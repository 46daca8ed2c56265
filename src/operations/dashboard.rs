//! Dashboard statistics over persisted vendor ratings.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::config::ReviewConfig;
use crate::domain::Vendor;
use crate::scoring::Rating;

/// A vendor whose next review falls inside the upcoming window (or has passed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingReview {
    pub vendor_id: String,
    pub name: String,
    pub next_review_date: DateTime<Utc>,
    pub risk: Option<Rating>,
    pub overdue: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_vendors: usize,
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,
    /// Vendors with at least one scored assessment
    pub assessed: usize,
    /// Reviews scheduled in the current calendar month (UTC)
    pub due_this_month: usize,
    /// Soonest first
    pub upcoming_reviews: Vec<UpcomingReview>,
}

pub fn dashboard_stats(vendors: &[Vendor], now: DateTime<Utc>, review: &ReviewConfig) -> DashboardStats {
    let mut stats = DashboardStats {
        total_vendors: vendors.len(),
        ..Default::default()
    };

    let (month_start, month_end) = month_bounds(now);
    let horizon = now
        .checked_add_signed(Duration::days(i64::from(review.upcoming_window_days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    for vendor in vendors {
        match vendor.risk_rating() {
            Some(Rating::High) => stats.high_risk += 1,
            Some(Rating::Medium) => stats.medium_risk += 1,
            Some(Rating::Low) => stats.low_risk += 1,
            None => {}
        }
        if vendor.current.is_some() {
            stats.assessed += 1;
        }

        let Some(next) = vendor.next_review_date else {
            continue;
        };
        if month_start.is_some_and(|start| next >= start) && month_end.is_some_and(|end| next < end) {
            stats.due_this_month += 1;
        }
        if next < horizon {
            stats.upcoming_reviews.push(UpcomingReview {
                vendor_id: vendor.id.clone(),
                name: vendor.name.clone(),
                next_review_date: next,
                risk: vendor.risk_rating(),
                overdue: next < now,
            });
        }
    }

    stats
        .upcoming_reviews
        .sort_by(|a, b| a.next_review_date.cmp(&b.next_review_date).then_with(|| a.name.cmp(&b.name)));
    stats
}

/// Start of this month and start of the next, in UTC.
fn month_bounds(now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let start = NaiveDate::from_ymd_opt(now.year(), now.month(), 1);
    let next = if now.month() == 12 {
        NaiveDate::from_ymd_opt(now.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(now.year(), now.month() + 1, 1)
    };
    let to_utc = |date: NaiveDate| {
        date.and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
    };
    (start.and_then(to_utc), next.and_then(to_utc))
}
