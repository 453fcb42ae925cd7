//! SurrealDB implementation of [`NotificationStore`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vantage_core::error::VantageResult;
use vantage_core::models::notification::{
    Notification, NotificationCandidate, NotificationKind, Priority,
};
use vantage_core::repository::{NotificationFilter, NotificationStore};

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct NotificationRow {
    tenant_id: String,
    kind: String,
    title: String,
    message: String,
    priority: String,
    action_url: String,
    record_id: String,
    user_id: Option<String>,
    metadata: serde_json::Value,
    read: bool,
    created_at: DateTime<Utc>,
}

/// Row struct including the row id via `meta::id(id)`.
///
/// Aliased `note_id` because `record_id` is already taken by the
/// business-record reference column.
#[derive(Debug, SurrealValue)]
struct NotificationRowWithId {
    note_id: String,
    tenant_id: String,
    kind: String,
    title: String,
    message: String,
    priority: String,
    action_url: String,
    record_id: String,
    user_id: Option<String>,
    metadata: serde_json::Value,
    read: bool,
    created_at: DateTime<Utc>,
}

impl NotificationRowWithId {
    fn try_into_notification(self) -> Result<Notification, DbError> {
        let id = Uuid::parse_str(&self.note_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        let kind = NotificationKind::parse(&self.kind)
            .ok_or_else(|| DbError::Migration(format!("invalid kind: {}", self.kind)))?;
        let priority = Priority::parse(&self.priority)
            .ok_or_else(|| DbError::Migration(format!("invalid priority: {}", self.priority)))?;
        Ok(Notification {
            id,
            tenant_id,
            kind,
            title: self.title,
            message: self.message,
            priority,
            action_url: self.action_url,
            record_id: self.record_id,
            user_id: self.user_id,
            metadata: self.metadata,
            read: self.read,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the notification store.
#[derive(Clone)]
pub struct SurrealNotificationStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealNotificationStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> NotificationStore for SurrealNotificationStore<C> {
    async fn query(
        &self,
        tenant_id: Uuid,
        filter: NotificationFilter,
    ) -> VantageResult<Vec<Notification>> {
        let mut conditions = vec!["tenant_id = $tenant_id"];
        if filter.kind.is_some() {
            conditions.push("kind = $kind");
        }
        if filter.record_id.is_some() {
            conditions.push("record_id = $record_id");
        }
        if filter.unread_only {
            conditions.push("read = false");
        }

        let query = format!(
            "SELECT meta::id(id) AS note_id, * FROM notification \
             WHERE {} ORDER BY created_at ASC",
            conditions.join(" AND ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("tenant_id", tenant_id.to_string()));
        if let Some(kind) = filter.kind {
            builder = builder.bind(("kind", kind.as_str()));
        }
        if let Some(record_id) = filter.record_id {
            builder = builder.bind(("record_id", record_id));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<NotificationRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_notification())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn create(
        &self,
        tenant_id: Uuid,
        user_id: Option<&str>,
        candidate: &NotificationCandidate,
    ) -> VantageResult<Uuid> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let metadata = match &candidate.metadata {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            other => other.clone(),
        };

        let result = self
            .db
            .query(
                "CREATE type::record('notification', $id) SET \
                 tenant_id = $tenant_id, \
                 kind = $kind, \
                 title = $title, \
                 message = $message, \
                 priority = $priority, \
                 action_url = $action_url, \
                 record_id = $record_id, \
                 user_id = $user_id, \
                 metadata = $metadata, \
                 read = false",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("kind", candidate.kind.as_str()))
            .bind(("title", candidate.title.clone()))
            .bind(("message", candidate.message.clone()))
            .bind(("priority", candidate.priority.as_str()))
            .bind(("action_url", candidate.action_url.clone()))
            .bind(("record_id", candidate.record_id.clone()))
            .bind(("user_id", user_id.map(ToString::to_string)))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<NotificationRow> = result.take(0).map_err(DbError::from)?;
        rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "notification".into(),
            id: id_str,
        })?;

        Ok(id)
    }
}
