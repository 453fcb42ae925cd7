//! Per-kind expiration checkers.
//!
//! Each check lists the active records of its kind, computes whole-day
//! differences against a caller-supplied `today`, classifies urgency,
//! and persists the candidates the deduplicator accepts. All date math
//! is date-only: the stores hand back `NaiveDate`s, so "3 days left"
//! means calendar days, not 72 hours.

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use vantage_core::error::VantageResult;
use vantage_core::models::notification::{NotificationCandidate, NotificationKind, Priority};
use vantage_core::models::record::{Contract, Invoice, Subscription};
use vantage_core::repository::{NotificationFilter, NotificationStore, RecordStore};

use crate::dedup;

/// Overdue invoices re-alert every this many days; other kinds alert
/// at most once per unread notification.
const INVOICE_RENOTIFY_CADENCE_DAYS: i64 = 7;

// ---------------------------------------------------------------------------
// Urgency classification (pure)
// ---------------------------------------------------------------------------

fn contract_priority(days_left: i64) -> Option<Priority> {
    match days_left {
        d if d <= 0 => Some(Priority::Urgent),
        1..=7 => Some(Priority::High),
        8..=30 => Some(Priority::Normal),
        _ => None,
    }
}

fn invoice_priority(days_overdue: i64) -> Option<Priority> {
    match days_overdue {
        d if d < 1 => None,
        d if d > 30 => Some(Priority::Urgent),
        15..=30 => Some(Priority::High),
        _ => Some(Priority::Normal),
    }
}

fn subscription_priority(days_until: i64) -> Option<Priority> {
    match days_until {
        0..=1 => Some(Priority::High),
        2..=7 => Some(Priority::Normal),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Candidate construction
// ---------------------------------------------------------------------------

fn contract_candidate(contract: &Contract, days_left: i64) -> Option<NotificationCandidate> {
    let priority = contract_priority(days_left)?;
    let message = match days_left {
        d if d < 0 => format!("Contract '{}' expired {} days ago", contract.title, -d),
        0 => format!("Contract '{}' expires today", contract.title),
        d => format!("Contract '{}' expires in {d} days", contract.title),
    };
    Some(NotificationCandidate {
        kind: NotificationKind::ContractExpiry,
        title: if days_left < 0 {
            "Contract expired".into()
        } else {
            "Contract expiring soon".into()
        },
        message,
        priority,
        action_url: "/contracts".into(),
        record_id: contract.id.to_string(),
        days_overdue: None,
        metadata: json!({ "days_until": days_left, "title": contract.title }),
    })
}

fn invoice_candidate(invoice: &Invoice, days_overdue: i64) -> Option<NotificationCandidate> {
    let priority = invoice_priority(days_overdue)?;
    Some(NotificationCandidate {
        kind: NotificationKind::InvoiceOverdue,
        title: "Invoice overdue".into(),
        message: format!(
            "Invoice {} is {days_overdue} days overdue",
            invoice.number
        ),
        priority,
        action_url: "/invoices".into(),
        record_id: invoice.id.to_string(),
        days_overdue: Some(days_overdue),
        metadata: json!({ "days_overdue": days_overdue, "number": invoice.number }),
    })
}

fn subscription_candidate(
    subscription: &Subscription,
    days_until: i64,
) -> Option<NotificationCandidate> {
    let priority = subscription_priority(days_until)?;
    let message = match days_until {
        0 => format!("Subscription '{}' renews today", subscription.name),
        1 => format!("Subscription '{}' renews tomorrow", subscription.name),
        d => format!("Subscription '{}' renews in {d} days", subscription.name),
    };
    Some(NotificationCandidate {
        kind: NotificationKind::SubscriptionRenewal,
        title: "Subscription renewal".into(),
        message,
        priority,
        action_url: "/subscriptions".into(),
        record_id: subscription.id.to_string(),
        days_overdue: None,
        metadata: json!({ "days_until": days_until, "name": subscription.name }),
    })
}

// ---------------------------------------------------------------------------
// Checker service
// ---------------------------------------------------------------------------

/// Scans one tenant's expirable records and persists accepted
/// notification candidates.
///
/// Generic over the store traits so the scan logic has no dependency on
/// the database crate.
pub struct ExpirationChecker<R: RecordStore, N: NotificationStore> {
    records: R,
    notifications: N,
}

impl<R: RecordStore, N: NotificationStore> ExpirationChecker<R, N> {
    pub fn new(records: R, notifications: N) -> Self {
        Self {
            records,
            notifications,
        }
    }

    /// Check all active contracts. Returns the number of notifications
    /// actually created, never the number of candidates proposed.
    pub async fn check_contracts(
        &self,
        tenant_id: Uuid,
        user_id: Option<&str>,
        today: NaiveDate,
    ) -> VantageResult<u32> {
        let mut created = 0;
        for contract in self.records.list_contracts(tenant_id).await? {
            if !contract.status.is_checkable() {
                continue;
            }
            let Some(end_date) = contract.end_date else {
                continue;
            };
            let days_left = (end_date - today).num_days();
            let Some(candidate) = contract_candidate(&contract, days_left) else {
                continue;
            };
            if self.persist_if_new(tenant_id, user_id, &candidate, None).await? {
                created += 1;
            }
        }
        Ok(created)
    }

    /// Check all unpaid invoices. Overdue invoices re-alert on a 7-day
    /// cadence even while an earlier notification is still unread.
    pub async fn check_invoices(
        &self,
        tenant_id: Uuid,
        user_id: Option<&str>,
        today: NaiveDate,
    ) -> VantageResult<u32> {
        let mut created = 0;
        for invoice in self.records.list_invoices(tenant_id).await? {
            if !invoice.status.is_checkable() {
                continue;
            }
            let Some(due_date) = invoice.due_date else {
                continue;
            };
            let days_overdue = (today - due_date).num_days();
            let Some(candidate) = invoice_candidate(&invoice, days_overdue) else {
                continue;
            };
            if self
                .persist_if_new(
                    tenant_id,
                    user_id,
                    &candidate,
                    Some(INVOICE_RENOTIFY_CADENCE_DAYS),
                )
                .await?
            {
                created += 1;
            }
        }
        Ok(created)
    }

    /// Check upcoming subscription renewals (future-only: a renewal
    /// date in the past is not a candidate).
    pub async fn check_subscriptions(
        &self,
        tenant_id: Uuid,
        user_id: Option<&str>,
        today: NaiveDate,
    ) -> VantageResult<u32> {
        let mut created = 0;
        for subscription in self.records.list_subscriptions(tenant_id).await? {
            if !subscription.status.is_checkable() {
                continue;
            }
            let Some(next_billing) = subscription.next_billing_date else {
                continue;
            };
            let days_until = (next_billing - today).num_days();
            let Some(candidate) = subscription_candidate(&subscription, days_until) else {
                continue;
            };
            if self.persist_if_new(tenant_id, user_id, &candidate, None).await? {
                created += 1;
            }
        }
        Ok(created)
    }

    /// Query existing unread notifications for the candidate's dedup
    /// key, consult the deduplicator, and create on acceptance.
    async fn persist_if_new(
        &self,
        tenant_id: Uuid,
        user_id: Option<&str>,
        candidate: &NotificationCandidate,
        re_notify_cadence_days: Option<i64>,
    ) -> VantageResult<bool> {
        let existing = self
            .notifications
            .query(
                tenant_id,
                NotificationFilter {
                    kind: Some(candidate.kind),
                    record_id: Some(candidate.record_id.clone()),
                    unread_only: true,
                },
            )
            .await?;

        if dedup::should_suppress(candidate, &existing, re_notify_cadence_days) {
            return Ok(false);
        }

        self.notifications.create(tenant_id, user_id, candidate).await?;
        Ok(true)
    }
}
