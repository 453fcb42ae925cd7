//! Audit trail domain model.
//!
//! Audit events are append-only: created once, never mutated or deleted.
//! Event type and category are paired in a typed lookup table rather
//! than derived by splitting the type string at persistence time, so a
//! renamed event cannot silently land in the wrong category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Keys whose values are never allowed into persisted audit details.
const SENSITIVE_KEYS: &[&str] = &["password", "cardNumber", "cvv", "ssn", "apiKey", "token"];

const REDACTION_MARKER: &str = "[REDACTED]";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuditStatus {
    Success,
    Failure,
    Warning,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failure => "Failure",
            Self::Warning => "Warning",
        }
    }
}

/// Typed catalogue of audit event kinds.
///
/// Each kind carries its wire `event_type` string and its reporting
/// category as one pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuditEventKind {
    /// An AI command was denied by the access gateway.
    CommandBlocked,
    /// An AI command was allowed via override code rather than native
    /// scope membership.
    CommandGrantedViaCode,
    /// One full expiration-check run finished.
    ExpiryRunCompleted,
}

impl AuditEventKind {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CommandBlocked => "ai-command.blocked",
            Self::CommandGrantedViaCode => "ai-command.granted-via-code",
            Self::ExpiryRunCompleted => "expiry-check.completed",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::CommandBlocked | Self::CommandGrantedViaCode => "ai-command",
            Self::ExpiryRunCompleted => "expiry-check",
        }
    }
}

/// One append-only audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_type: String,
    pub category: String,
    pub status: AuditStatus,
    /// Arbitrary structured context, sanitized at construction.
    pub details: serde_json::Value,
    pub user_id: Option<String>,
    pub tenant_id: Option<Uuid>,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    /// Build an event from a typed kind, redacting sensitive keys in
    /// `details` before the event exists.
    pub fn new(
        kind: AuditEventKind,
        status: AuditStatus,
        details: serde_json::Value,
        tenant_id: Option<Uuid>,
        user_id: Option<String>,
        session_id: String,
    ) -> Self {
        Self {
            event_type: kind.event_type().to_string(),
            category: kind.category().to_string(),
            status,
            details: sanitize_details(details),
            user_id,
            tenant_id,
            session_id,
            timestamp: Utc::now(),
        }
    }
}

/// Replace the value of every denylisted key with a redaction marker.
///
/// Walks nested objects and arrays so a sensitive key cannot hide one
/// level down inside caller-supplied context.
pub fn sanitize_details(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let sanitized = map
                .into_iter()
                .map(|(key, val)| {
                    if SENSITIVE_KEYS.iter().any(|s| key.eq_ignore_ascii_case(s)) {
                        (key, serde_json::Value::String(REDACTION_MARKER.into()))
                    } else {
                        (key, sanitize_details(val))
                    }
                })
                .collect();
            serde_json::Value::Object(sanitized)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(sanitize_details).collect())
        }
        other => other,
    }
}
