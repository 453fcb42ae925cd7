//! SurrealDB implementation of [`AuditStore`].
//!
//! Append-only by construction: no update or delete operations exist
//! on this store.

use surrealdb::{Connection, Surreal};
use uuid::Uuid;
use vantage_core::error::VantageResult;
use vantage_core::models::audit::AuditEvent;
use vantage_core::repository::AuditStore;

use crate::error::DbError;

/// SurrealDB implementation of the audit store.
#[derive(Clone)]
pub struct SurrealAuditStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAuditStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AuditStore for SurrealAuditStore<C> {
    async fn append(&self, event: &AuditEvent) -> VantageResult<()> {
        let id = Uuid::new_v4();

        self.db
            .query(
                "CREATE type::record('audit_event', $id) SET \
                 event_type = $event_type, \
                 category = $category, \
                 status = $status, \
                 details = $details, \
                 user_id = $user_id, \
                 tenant_id = $tenant_id, \
                 session_id = $session_id, \
                 timestamp = $timestamp",
            )
            .bind(("id", id.to_string()))
            .bind(("event_type", event.event_type.clone()))
            .bind(("category", event.category.clone()))
            .bind(("status", event.status.as_str()))
            .bind(("details", event.details.clone()))
            .bind(("user_id", event.user_id.clone()))
            .bind(("tenant_id", event.tenant_id.map(|t| t.to_string())))
            .bind(("session_id", event.session_id.clone()))
            .bind(("timestamp", event.timestamp))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        Ok(())
    }
}
