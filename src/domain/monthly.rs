// src/domain/monthly.rs

use crate::domain::commission::CommissionCalculator;
use crate::domain::deal::{Deal, StatusKind};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Calendar month. Ordering is chronological (year, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// Zero-based, January = 0.
    pub month0: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    /// `YYYY-MM`
    pub fn sort_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month0 + 1)
    }

    /// Long month name and year, e.g. `March 2025`.
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| self.sort_key())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    pub key: MonthKey,
    pub label: String,
    pub total: f64,
    pub count: usize,
}

/// Buckets deals by the month of whatever date `date_selector` picks.
///
/// Deals rejected by `status_filter` or without a selected date are skipped.
/// The result is sorted by month, oldest first, one bucket per month.
pub fn aggregate_by_month<S, F>(
    deals: &[Deal],
    date_selector: S,
    status_filter: F,
    calc: &CommissionCalculator,
) -> Vec<MonthlyBucket>
where
    S: Fn(&Deal) -> Option<NaiveDate>,
    F: Fn(&Deal) -> bool,
{
    let mut months: BTreeMap<MonthKey, (f64, usize)> = BTreeMap::new();

    for deal in deals.iter().filter(|d| status_filter(*d)) {
        let Some(date) = date_selector(deal) else {
            continue;
        };
        let entry = months.entry(MonthKey::from_date(date)).or_insert((0.0, 0));
        entry.0 += deal.commission(calc);
        entry.1 += 1;
    }

    months
        .into_iter()
        .map(|(key, (total, count))| MonthlyBucket {
            label: key.label(),
            key,
            total,
            count,
        })
        .collect()
}

/// Largest bucket total, or zero for no buckets. Used to scale bar widths.
pub fn max_total(buckets: &[MonthlyBucket]) -> f64 {
    buckets.iter().map(|b| b.total).fold(0.0, f64::max)
}

/// The three month-by-month views on the analytics page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Deals not in a terminal stage, by estimated close date.
    Projected,
    /// Closed-won deals by actual close date, or the estimate when missing.
    ClosedWon,
    /// Paid deals by paid date.
    Paid,
}

impl Projection {
    pub const ALL: [Projection; 3] = [
        Projection::Projected,
        Projection::ClosedWon,
        Projection::Paid,
    ];

    pub fn select_date(self, deal: &Deal) -> Option<NaiveDate> {
        match self {
            Projection::Projected => deal.estimated_close_date,
            Projection::ClosedWon => deal
                .status
                .actual_close_date()
                .or(deal.estimated_close_date),
            Projection::Paid => deal.status.paid_date(),
        }
    }

    pub fn includes(self, deal: &Deal) -> bool {
        match self {
            Projection::Projected => !matches!(deal.status.kind(), Some(k) if k.is_terminal()),
            Projection::ClosedWon => deal.status.is(StatusKind::ClosedWon),
            Projection::Paid => deal.status.is(StatusKind::Paid),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Projection::Projected => "Monthly Projections",
            Projection::ClosedWon => "Closed Won",
            Projection::Paid => "Paid",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Projection::Projected => "Based on estimated close dates",
            Projection::ClosedWon => "Based on actual close dates",
            Projection::Paid => "Based on paid dates",
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            Projection::Projected => "No deals with projected dates found.",
            Projection::ClosedWon => "No closed deals yet.",
            Projection::Paid => "No paid deals yet.",
        }
    }
}

/// Buckets for one projection plus the figures the page needs around them.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSummary {
    pub projection: Projection,
    pub buckets: Vec<MonthlyBucket>,
    pub total: f64,
    pub count: usize,
    pub max_total: f64,
}

pub fn project(
    deals: &[Deal],
    projection: Projection,
    calc: &CommissionCalculator,
) -> ProjectionSummary {
    let buckets = aggregate_by_month(
        deals,
        |d| projection.select_date(d),
        |d| projection.includes(d),
        calc,
    );

    ProjectionSummary {
        projection,
        total: buckets.iter().map(|b| b.total).sum(),
        count: buckets.iter().map(|b| b.count).sum(),
        max_total: max_total(&buckets),
        buckets,
    }
}
