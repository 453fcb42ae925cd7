//! Store trait definitions for data access abstraction.
//!
//! All store operations are async and tenant-scoped: every method takes
//! a `tenant_id` to enforce data isolation. The concrete SurrealDB
//! implementations live in `vantage-db`; tests substitute in-memory
//! fakes.

use uuid::Uuid;

use crate::error::VantageResult;
use crate::models::audit::AuditEvent;
use crate::models::notification::{Notification, NotificationCandidate, NotificationKind};
use crate::models::record::{Contract, Invoice, Subscription};

/// Query filter for notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    pub kind: Option<NotificationKind>,
    pub record_id: Option<String>,
    pub unread_only: bool,
}

/// Notification persistence used by the expiration checkers.
///
/// Only `query` and `create` exist here: the checkers never mark
/// notifications read and never delete them.
pub trait NotificationStore: Send + Sync {
    fn query(
        &self,
        tenant_id: Uuid,
        filter: NotificationFilter,
    ) -> impl Future<Output = VantageResult<Vec<Notification>>> + Send;

    /// Persist an accepted candidate; returns the new notification id.
    fn create(
        &self,
        tenant_id: Uuid,
        user_id: Option<&str>,
        candidate: &NotificationCandidate,
    ) -> impl Future<Output = VantageResult<Uuid>> + Send;
}

/// Read-only access to the expirable business records.
pub trait RecordStore: Send + Sync {
    fn list_contracts(
        &self,
        tenant_id: Uuid,
    ) -> impl Future<Output = VantageResult<Vec<Contract>>> + Send;

    fn list_invoices(
        &self,
        tenant_id: Uuid,
    ) -> impl Future<Output = VantageResult<Vec<Invoice>>> + Send;

    fn list_subscriptions(
        &self,
        tenant_id: Uuid,
    ) -> impl Future<Output = VantageResult<Vec<Subscription>>> + Send;
}

/// Append-only audit trail.
///
/// Implementations report write failures normally; the swallow-and-log
/// guarantee lives in [`crate::sink::AuditSink`], not here.
pub trait AuditStore: Send + Sync {
    fn append(&self, event: &AuditEvent) -> impl Future<Output = VantageResult<()>> + Send;
}
