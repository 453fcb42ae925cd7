//! Notification domain model.
//!
//! A [`NotificationCandidate`] is the transient proposal produced by an
//! expiration checker; it becomes a persisted [`Notification`] only if
//! the deduplicator accepts it. This subsystem creates notifications but
//! never updates or deletes them — marking read happens in the UI layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Normal,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Normal => "normal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "urgent" => Some(Self::Urgent),
            "high" => Some(Self::High),
            "normal" => Some(Self::Normal),
            _ => None,
        }
    }
}

/// Notification type, one per expirable record kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    ContractExpiry,
    InvoiceOverdue,
    SubscriptionRenewal,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContractExpiry => "contract-expiry",
            Self::InvoiceOverdue => "invoice-overdue",
            Self::SubscriptionRenewal => "subscription-renewal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "contract-expiry" => Some(Self::ContractExpiry),
            "invoice-overdue" => Some(Self::InvoiceOverdue),
            "subscription-renewal" => Some(Self::SubscriptionRenewal),
            _ => None,
        }
    }
}

/// A proposed notification, pre-deduplication.
///
/// `(kind, record_id)` is the dedup key. `days_overdue` is set only for
/// overdue invoices and feeds the re-notification cadence check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCandidate {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub action_url: String,
    pub record_id: String,
    pub days_overdue: Option<i64>,
    /// Remaining urgency fields (days until/past the event, record label).
    pub metadata: serde_json::Value,
}

/// A persisted notification as read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub action_url: String,
    pub record_id: String,
    pub user_id: Option<String>,
    pub metadata: serde_json::Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
