//! Expirable business records.
//!
//! Contracts, invoices, and subscriptions are owned by other parts of
//! the application; this subsystem only reads them to compute lifecycle
//! urgency. Each record carries one date-only instant that drives the
//! expiration checks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status shared by all expirable record kinds.
///
/// `Expired` and `Cancelled` records are skipped by every checker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Pending,
    Expired,
    Cancelled,
}

impl RecordStatus {
    /// Whether a record in this status participates in expiration checks.
    pub fn is_checkable(&self) -> bool {
        !matches!(self, Self::Expired | Self::Cancelled)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            "expired" => Some(Self::Expired),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub end_date: Option<NaiveDate>,
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub number: String,
    pub due_date: Option<NaiveDate>,
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub next_billing_date: Option<NaiveDate>,
    pub status: RecordStatus,
}
