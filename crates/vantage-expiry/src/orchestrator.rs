//! Orchestration of the three expiration checkers.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;
use vantage_core::error::VantageResult;
use vantage_core::models::audit::{AuditEvent, AuditEventKind, AuditStatus};
use vantage_core::repository::{AuditStore, NotificationStore, RecordStore};
use vantage_core::sink::AuditSink;

use crate::checker::ExpirationChecker;

/// Session marker recorded on scheduler-initiated audit events.
const SCHEDULER_SESSION: &str = "expiry-scheduler";

/// Per-run notification counts, post-deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub contracts: u32,
    pub invoices: u32,
    pub subscriptions: u32,
    pub total: u32,
}

/// Runs all three checkers and aggregates their counts.
///
/// The checkers have no data dependency on each other; they run
/// sequentially as a simplicity choice, not a correctness requirement.
/// Two overlapping runs (UI-triggered and timer-triggered) can both see
/// "no existing notification" before either writes and produce a
/// duplicate — an accepted race, there is no distributed lock.
pub struct ExpirationOrchestrator<R, N, A>
where
    R: RecordStore,
    N: NotificationStore,
    A: AuditStore,
{
    checker: ExpirationChecker<R, N>,
    sink: AuditSink<A>,
}

impl<R, N, A> ExpirationOrchestrator<R, N, A>
where
    R: RecordStore,
    N: NotificationStore,
    A: AuditStore,
{
    pub fn new(records: R, notifications: N, audit_store: A) -> Self {
        Self {
            checker: ExpirationChecker::new(records, notifications),
            sink: AuditSink::new(audit_store),
        }
    }

    /// Run every checker against the current date.
    pub async fn run_all(&self, tenant_id: Uuid, user_id: Option<&str>) -> RunSummary {
        self.run_all_at(tenant_id, user_id, Utc::now().date_naive())
            .await
    }

    /// Run every checker against an explicit `today`.
    ///
    /// Never fails: a checker error is logged and contributes zero to
    /// that kind's count, so one failing check cannot block the others.
    pub async fn run_all_at(
        &self,
        tenant_id: Uuid,
        user_id: Option<&str>,
        today: NaiveDate,
    ) -> RunSummary {
        let contracts = count_or_zero(
            "contracts",
            self.checker.check_contracts(tenant_id, user_id, today).await,
        );
        let invoices = count_or_zero(
            "invoices",
            self.checker.check_invoices(tenant_id, user_id, today).await,
        );
        let subscriptions = count_or_zero(
            "subscriptions",
            self.checker
                .check_subscriptions(tenant_id, user_id, today)
                .await,
        );

        let summary = RunSummary {
            contracts,
            invoices,
            subscriptions,
            total: contracts + invoices + subscriptions,
        };

        self.sink
            .record(AuditEvent::new(
                AuditEventKind::ExpiryRunCompleted,
                AuditStatus::Success,
                json!({
                    "contracts": summary.contracts,
                    "invoices": summary.invoices,
                    "subscriptions": summary.subscriptions,
                    "total": summary.total,
                }),
                Some(tenant_id),
                user_id.map(ToString::to_string),
                SCHEDULER_SESSION.to_string(),
            ))
            .await;

        summary
    }
}

fn count_or_zero(kind: &str, result: VantageResult<u32>) -> u32 {
    result.unwrap_or_else(|e| {
        warn!(kind, error = %e, "expiration check failed; counting zero");
        0
    })
}
