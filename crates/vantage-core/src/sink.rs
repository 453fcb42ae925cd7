//! Fire-and-forget audit recording.

use tracing::warn;

use crate::models::audit::AuditEvent;
use crate::repository::AuditStore;

/// Wraps an [`AuditStore`] with swallow-on-failure semantics.
///
/// Authorization and notification decisions must stay correct even when
/// the audit trail temporarily fails to record them: fail-open on
/// logging, fail-closed on authorization. A failed append is logged and
/// dropped, never surfaced to the caller.
pub struct AuditSink<A: AuditStore> {
    store: A,
}

impl<A: AuditStore> AuditSink<A> {
    pub fn new(store: A) -> Self {
        Self { store }
    }

    /// Append `event`, discarding any store error after logging it.
    pub async fn record(&self, event: AuditEvent) {
        if let Err(e) = self.store.append(&event).await {
            warn!(
                event_type = %event.event_type,
                error = %e,
                "audit append failed; event dropped"
            );
        }
    }
}
