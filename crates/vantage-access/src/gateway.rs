//! The access gateway — who may run an AI command against which data
//! scope.

use serde_json::json;
use vantage_core::error::{VantageError, VantageResult};
use vantage_core::models::audit::{AuditEvent, AuditEventKind, AuditStatus};
use vantage_core::models::policy::Policy;
use vantage_core::models::principal::Scope;
use vantage_core::repository::AuditStore;
use vantage_core::sink::AuditSink;

use crate::code::validate_access_code;
use crate::policy;

/// Longest query prefix allowed into audit details. Bounds log size and
/// keeps large payloads out of the trail.
const MAX_AUDIT_QUERY_CHARS: usize = 160;

/// A UI-initiated AI command asking for authorization.
#[derive(Debug, Clone)]
pub struct AccessRequest {
    /// Caller-supplied role string; unknown values fail safe to the
    /// employee entry.
    pub role: String,
    /// The data scope the command wants to read.
    pub scope: Scope,
    /// Optional override code.
    pub access_code: Option<String>,
    /// The natural-language command text (audited truncated).
    pub query: String,
    pub tenant_id: Option<uuid::Uuid>,
    pub user_id: Option<String>,
    pub session_id: String,
}

/// Outcome of an authorization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    /// True iff the allow was reached via access code rather than the
    /// role's native scope membership.
    pub elevated: bool,
    pub reason: Option<String>,
}

impl AccessDecision {
    fn allow(elevated: bool) -> Self {
        Self {
            allowed: true,
            elevated,
            reason: None,
        }
    }

    fn deny(reason: &str) -> Self {
        Self {
            allowed: false,
            elevated: false,
            reason: Some(reason.to_string()),
        }
    }

    /// Map a deny to [`VantageError::AuthorizationDenied`] for callers
    /// that prefer `?` over inspecting the flag.
    pub fn into_result(self) -> VantageResult<Self> {
        if self.allowed {
            Ok(self)
        } else {
            Err(VantageError::AuthorizationDenied {
                reason: self
                    .reason
                    .clone()
                    .unwrap_or_else(|| "access denied".to_string()),
            })
        }
    }
}

/// Scope-based authorization gateway.
///
/// Generic over the audit store so the decision logic has no dependency
/// on the database crate.
pub struct AccessGateway<A: AuditStore> {
    sink: AuditSink<A>,
}

impl<A: AuditStore> AccessGateway<A> {
    pub fn new(audit_store: A) -> Self {
        Self {
            sink: AuditSink::new(audit_store),
        }
    }

    /// Decide whether `request` may execute against its requested scope.
    ///
    /// This is a four-branch decision table, not a sequence of
    /// independent checks: code validity is consulted only when native
    /// access is insufficient or the scope explicitly mandates a code.
    /// A valid code never downgrades a native, non-code-required allow.
    ///
    /// Every deny and every code-elevated allow appends exactly one
    /// audit event; a plain native allow appends none. Audit failures
    /// are swallowed by the sink — this method cannot fail.
    pub async fn authorize(&self, request: &AccessRequest, policy: &Policy) -> AccessDecision {
        let has_native = policy::scopes_for(&request.role, policy).contains(&request.scope);
        let code_required = policy.require_code_for.contains(&request.scope);

        // Native access with no code mandate: the quiet common path.
        if has_native && !code_required {
            return AccessDecision::allow(false);
        }

        let code_valid = request
            .access_code
            .as_deref()
            .is_some_and(validate_access_code);

        if code_required && !code_valid {
            self.audit_blocked(request, "code-required").await;
            return AccessDecision::deny("access code required");
        }

        if !has_native {
            return if code_valid {
                self.audit_granted(request, "scope-override").await;
                AccessDecision::allow(true)
            } else {
                self.audit_blocked(request, "role-restriction").await;
                AccessDecision::deny("insufficient permissions")
            };
        }

        // has_native && code_required && code_valid.
        self.audit_granted(request, "required-code").await;
        AccessDecision::allow(true)
    }

    async fn audit_blocked(&self, request: &AccessRequest, reason: &str) {
        self.sink
            .record(self.event(
                request,
                AuditEventKind::CommandBlocked,
                AuditStatus::Failure,
                reason,
            ))
            .await;
    }

    async fn audit_granted(&self, request: &AccessRequest, reason: &str) {
        self.sink
            .record(self.event(
                request,
                AuditEventKind::CommandGrantedViaCode,
                AuditStatus::Success,
                reason,
            ))
            .await;
    }

    fn event(
        &self,
        request: &AccessRequest,
        kind: AuditEventKind,
        status: AuditStatus,
        reason: &str,
    ) -> AuditEvent {
        AuditEvent::new(
            kind,
            status,
            json!({
                "role": request.role,
                "scope": request.scope.as_str(),
                "reason": reason,
                "query": truncate_chars(&request.query, MAX_AUDIT_QUERY_CHARS),
            }),
            request.tenant_id,
            request.user_id.clone(),
            request.session_id.clone(),
        )
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
