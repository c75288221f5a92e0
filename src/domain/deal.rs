// src/domain/deal.rs

use crate::domain::commission::CommissionCalculator;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of pipeline stages, in board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusKind {
    Listed,
    UnderContract,
    ClosedWon,
    Lost,
    Paid,
}

impl StatusKind {
    pub const ALL: [StatusKind; 5] = [
        StatusKind::Listed,
        StatusKind::UnderContract,
        StatusKind::ClosedWon,
        StatusKind::Lost,
        StatusKind::Paid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Listed => "listed",
            StatusKind::UnderContract => "under-contract",
            StatusKind::ClosedWon => "closed-won",
            StatusKind::Lost => "lost",
            StatusKind::Paid => "paid",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusKind::Listed => "Listed",
            StatusKind::UnderContract => "Under Contract",
            StatusKind::ClosedWon => "Closed Won",
            StatusKind::Lost => "Lost",
            StatusKind::Paid => "Paid",
        }
    }

    /// Accepts the current stage names plus the ones used by the first
    /// version of the board (`lead`, `qualification`, `closed-lost`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "listed" | "lead" | "qualification" => Some(StatusKind::Listed),
            "under-contract" => Some(StatusKind::UnderContract),
            "closed-won" => Some(StatusKind::ClosedWon),
            "lost" | "closed-lost" => Some(StatusKind::Lost),
            "paid" => Some(StatusKind::Paid),
            _ => None,
        }
    }

    /// Stages a deal is not expected to leave.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StatusKind::ClosedWon | StatusKind::Lost | StatusKind::Paid
        )
    }

    pub fn is_won(self) -> bool {
        matches!(self, StatusKind::ClosedWon | StatusKind::Paid)
    }
}

/// A deal's stage together with the dates that only make sense for it.
///
/// `Unrecognized` holds whatever status string storage handed back when it
/// is not one of ours; such deals are counted but never placed in a column.
#[derive(Debug, Clone, PartialEq)]
pub enum DealStatus {
    Listed,
    UnderContract,
    ClosedWon {
        actual_close_date: Option<NaiveDate>,
    },
    Lost,
    Paid {
        actual_close_date: Option<NaiveDate>,
        paid_date: Option<NaiveDate>,
    },
    Unrecognized(String),
}

impl DealStatus {
    /// Builds the variant for `kind`, keeping only the dates it can carry.
    pub fn from_kind(
        kind: StatusKind,
        actual_close_date: Option<NaiveDate>,
        paid_date: Option<NaiveDate>,
    ) -> Self {
        match kind {
            StatusKind::Listed => DealStatus::Listed,
            StatusKind::UnderContract => DealStatus::UnderContract,
            StatusKind::ClosedWon => DealStatus::ClosedWon { actual_close_date },
            StatusKind::Lost => DealStatus::Lost,
            StatusKind::Paid => DealStatus::Paid {
                actual_close_date,
                paid_date,
            },
        }
    }

    /// Decodes the flat stored columns.
    pub fn from_parts(
        raw: &str,
        actual_close_date: Option<NaiveDate>,
        paid_date: Option<NaiveDate>,
    ) -> Self {
        match StatusKind::parse(raw) {
            Some(kind) => Self::from_kind(kind, actual_close_date, paid_date),
            None => DealStatus::Unrecognized(raw.to_string()),
        }
    }

    pub fn kind(&self) -> Option<StatusKind> {
        match self {
            DealStatus::Listed => Some(StatusKind::Listed),
            DealStatus::UnderContract => Some(StatusKind::UnderContract),
            DealStatus::ClosedWon { .. } => Some(StatusKind::ClosedWon),
            DealStatus::Lost => Some(StatusKind::Lost),
            DealStatus::Paid { .. } => Some(StatusKind::Paid),
            DealStatus::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DealStatus::Unrecognized(raw) => raw.as_str(),
            other => other.kind().map(StatusKind::as_str).unwrap_or_default(),
        }
    }

    pub fn actual_close_date(&self) -> Option<NaiveDate> {
        match self {
            DealStatus::ClosedWon { actual_close_date }
            | DealStatus::Paid {
                actual_close_date, ..
            } => *actual_close_date,
            _ => None,
        }
    }

    pub fn paid_date(&self) -> Option<NaiveDate> {
        match self {
            DealStatus::Paid { paid_date, .. } => *paid_date,
            _ => None,
        }
    }

    pub fn is(&self, kind: StatusKind) -> bool {
        self.kind() == Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub id: String,
    pub owner_id: i64,
    pub address: String,
    pub listing_price: f64,
    pub commission_rate: f64,
    pub my_share: f64,
    pub status: DealStatus,
    pub estimated_close_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    pub fn commission(&self, calc: &CommissionCalculator) -> f64 {
        calc.calculate(self.listing_price, self.commission_rate, self.my_share)
    }

    pub fn close_urgency(&self, today: NaiveDate) -> Option<CloseUrgency> {
        self.estimated_close_date
            .map(|date| CloseUrgency::for_date(date, today))
    }

    /// Applies a partial update. `updated_at` is always refreshed.
    ///
    /// A status change rebuilds the variant from the patch's dates, falling
    /// back to the dates the deal already carried.
    pub fn apply(&mut self, patch: DealPatch, now: DateTime<Utc>) {
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(price) = patch.listing_price {
            self.listing_price = price;
        }
        if let Some(rate) = patch.commission_rate {
            self.commission_rate = rate;
        }
        if let Some(share) = patch.my_share {
            self.my_share = share;
        }
        if let Some(estimated) = patch.estimated_close_date {
            self.estimated_close_date = estimated;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }

        let actual = patch
            .actual_close_date
            .unwrap_or_else(|| self.status.actual_close_date());
        let paid = patch.paid_date.unwrap_or_else(|| self.status.paid_date());

        if let Some(kind) = patch.status.or_else(|| self.status.kind()) {
            self.status = DealStatus::from_kind(kind, actual, paid);
        }

        self.updated_at = now;
    }
}

/// Form data for a new deal. Owner, id and timestamps are assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct DealDraft {
    pub address: String,
    pub listing_price: f64,
    pub commission_rate: f64,
    pub my_share: f64,
    pub status: StatusKind,
    pub estimated_close_date: Option<NaiveDate>,
    pub actual_close_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Default for DealDraft {
    fn default() -> Self {
        Self {
            address: String::new(),
            listing_price: 0.0,
            commission_rate: 3.0,
            my_share: 40.0,
            status: StatusKind::Listed,
            estimated_close_date: None,
            actual_close_date: None,
            paid_date: None,
            notes: None,
        }
    }
}

impl DealDraft {
    pub fn into_deal(self, owner_id: i64, now: DateTime<Utc>) -> Deal {
        Deal {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            address: self.address,
            listing_price: self.listing_price,
            commission_rate: self.commission_rate,
            my_share: self.my_share,
            status: DealStatus::from_kind(self.status, self.actual_close_date, self.paid_date),
            estimated_close_date: self.estimated_close_date,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. `None` leaves a field alone; `Some(None)` clears an
/// optional one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealPatch {
    pub address: Option<String>,
    pub listing_price: Option<f64>,
    pub commission_rate: Option<f64>,
    pub my_share: Option<f64>,
    pub status: Option<StatusKind>,
    pub estimated_close_date: Option<Option<NaiveDate>>,
    pub actual_close_date: Option<Option<NaiveDate>>,
    pub paid_date: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
}

impl From<DealDraft> for DealPatch {
    fn from(d: DealDraft) -> Self {
        Self {
            address: Some(d.address),
            listing_price: Some(d.listing_price),
            commission_rate: Some(d.commission_rate),
            my_share: Some(d.my_share),
            status: Some(d.status),
            estimated_close_date: Some(d.estimated_close_date),
            actual_close_date: Some(d.actual_close_date),
            paid_date: Some(d.paid_date),
            notes: Some(d.notes),
        }
    }
}

/// Flat persisted shape of a deal: plain status string, ISO-8601 dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRecord {
    pub id: String,
    pub owner_id: i64,
    pub address: String,
    pub listing_price: f64,
    pub commission_rate: f64,
    pub my_share: f64,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_close_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_close_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Deal> for DealRecord {
    fn from(d: &Deal) -> Self {
        Self {
            id: d.id.clone(),
            owner_id: d.owner_id,
            address: d.address.clone(),
            listing_price: d.listing_price,
            commission_rate: d.commission_rate,
            my_share: d.my_share,
            status: d.status.as_str().to_string(),
            estimated_close_date: d.estimated_close_date,
            actual_close_date: d.status.actual_close_date(),
            paid_date: d.status.paid_date(),
            notes: d.notes.clone(),
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl From<DealRecord> for Deal {
    fn from(r: DealRecord) -> Self {
        Self {
            status: DealStatus::from_parts(&r.status, r.actual_close_date, r.paid_date),
            id: r.id,
            owner_id: r.owner_id,
            address: r.address,
            listing_price: r.listing_price,
            commission_rate: r.commission_rate,
            my_share: r.my_share,
            estimated_close_date: r.estimated_close_date,
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// The calendar date at `now` for an agent `offset` away from UTC. Urgency
/// and export names are reckoned against this, not the UTC date.
pub fn local_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// How close an open deal is to its estimated close date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseUrgency {
    Urgent,
    Soon,
    Normal,
}

impl CloseUrgency {
    /// Under a week is urgent, under a month is soon. Past dates are urgent.
    pub fn for_date(close_date: NaiveDate, today: NaiveDate) -> Self {
        let days = (close_date - today).num_days();
        if days < 7 {
            CloseUrgency::Urgent
        } else if days < 30 {
            CloseUrgency::Soon
        } else {
            CloseUrgency::Normal
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            CloseUrgency::Urgent => "urgency-urgent",
            CloseUrgency::Soon => "urgency-soon",
            CloseUrgency::Normal => "urgency-normal",
        }
    }
}
