//! Integration tests for the access gateway decision table.

use std::sync::{Arc, Mutex};

use vantage_access::gateway::{AccessGateway, AccessRequest};
use vantage_access::policy;
use vantage_core::error::{VantageError, VantageResult};
use vantage_core::models::audit::{AuditEvent, AuditStatus};
use vantage_core::models::principal::Scope;
use vantage_core::repository::AuditStore;

/// In-memory audit store that records every appended event.
#[derive(Clone, Default)]
struct MemAuditStore {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemAuditStore {
    fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AuditStore for MemAuditStore {
    async fn append(&self, event: &AuditEvent) -> VantageResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Audit store that always fails, for fail-open verification.
struct FailingAuditStore;

impl AuditStore for FailingAuditStore {
    async fn append(&self, _event: &AuditEvent) -> VantageResult<()> {
        Err(VantageError::Database("audit trail unavailable".into()))
    }
}

fn request(role: &str, scope: Scope, access_code: Option<&str>) -> AccessRequest {
    AccessRequest {
        role: role.into(),
        scope,
        access_code: access_code.map(Into::into),
        query: "summarize this month".into(),
        tenant_id: None,
        user_id: Some("user-1".into()),
        session_id: "sess-1".into(),
    }
}

#[tokio::test]
async fn native_allow_is_silent() {
    let store = MemAuditStore::default();
    let gateway = AccessGateway::new(store.clone());
    let policy = policy::resolve(None);

    let decision = gateway
        .authorize(&request("employee", Scope::Global, None), &policy)
        .await;

    assert!(decision.allowed);
    assert!(!decision.elevated);
    assert!(decision.reason.is_none());
    // Routine native use must not flood the audit log.
    assert!(store.events().is_empty());
}

#[tokio::test]
async fn employee_denied_financial_with_one_blocked_event() {
    let store = MemAuditStore::default();
    let gateway = AccessGateway::new(store.clone());
    let policy = policy::resolve(None);

    let decision = gateway
        .authorize(&request("employee", Scope::Financial, None), &policy)
        .await;

    assert!(!decision.allowed);
    assert_eq!(decision.reason.as_deref(), Some("insufficient permissions"));

    let events = store.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "ai-command.blocked");
    assert_eq!(events[0].category, "ai-command");
    assert_eq!(events[0].status, AuditStatus::Failure);
    assert_eq!(events[0].details["reason"], "role-restriction");
}

#[tokio::test]
async fn owner_scope_requires_code_even_for_owner() {
    let store = MemAuditStore::default();
    let gateway = AccessGateway::new(store.clone());
    let policy = policy::resolve(None);

    let decision = gateway
        .authorize(&request("owner", Scope::Owner, None), &policy)
        .await;

    assert!(!decision.allowed);
    assert_eq!(decision.reason.as_deref(), Some("access code required"));

    let events = store.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].details["reason"], "code-required");
}

#[tokio::test]
async fn owner_with_valid_code_gets_elevated_allow() {
    let store = MemAuditStore::default();
    let gateway = AccessGateway::new(store.clone());
    let policy = policy::resolve(None);

    let decision = gateway
        .authorize(&request("owner", Scope::Owner, Some("masterkey")), &policy)
        .await;

    assert!(decision.allowed);
    assert!(decision.elevated);

    let events = store.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "ai-command.granted-via-code");
    assert_eq!(events[0].status, AuditStatus::Success);
    assert_eq!(events[0].details["reason"], "required-code");
}

#[tokio::test]
async fn valid_code_elevates_past_role_restriction() {
    let store = MemAuditStore::default();
    let gateway = AccessGateway::new(store.clone());
    let policy = policy::resolve(None);

    let decision = gateway
        .authorize(
            &request("employee", Scope::Financial, Some("abcdef12")),
            &policy,
        )
        .await;

    assert!(decision.allowed);
    assert!(decision.elevated);

    let events = store.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "ai-command.granted-via-code");
    assert_eq!(events[0].details["reason"], "scope-override");
}

#[tokio::test]
async fn invalid_code_does_not_elevate() {
    let store = MemAuditStore::default();
    let gateway = AccessGateway::new(store.clone());
    let policy = policy::resolve(None);

    let decision = gateway
        .authorize(&request("employee", Scope::Financial, Some("short")), &policy)
        .await;

    assert!(!decision.allowed);
    assert_eq!(decision.reason.as_deref(), Some("insufficient permissions"));
    assert_eq!(store.events()[0].details["reason"], "role-restriction");
}

#[tokio::test]
async fn unknown_role_falls_back_to_employee_permissions() {
    let store = MemAuditStore::default();
    let gateway = AccessGateway::new(store.clone());
    let policy = policy::resolve(None);

    let allowed = gateway
        .authorize(&request("freelancer", Scope::Global, None), &policy)
        .await;
    assert!(allowed.allowed);

    let denied = gateway
        .authorize(&request("freelancer", Scope::Hr, None), &policy)
        .await;
    assert!(!denied.allowed);
}

#[tokio::test]
async fn audited_query_is_truncated() {
    let store = MemAuditStore::default();
    let gateway = AccessGateway::new(store.clone());
    let policy = policy::resolve(None);

    let mut req = request("employee", Scope::Financial, None);
    req.query = "x".repeat(500);
    gateway.authorize(&req, &policy).await;

    let events = store.events();
    let logged = events[0].details["query"].as_str().unwrap();
    assert_eq!(logged.chars().count(), 160);
}

#[tokio::test]
async fn audit_failure_does_not_change_the_decision() {
    let gateway = AccessGateway::new(FailingAuditStore);
    let policy = policy::resolve(None);

    let denied = gateway
        .authorize(&request("employee", Scope::Financial, None), &policy)
        .await;
    assert!(!denied.allowed);

    let allowed = gateway
        .authorize(&request("owner", Scope::Owner, Some("masterkey")), &policy)
        .await;
    assert!(allowed.allowed);
    assert!(allowed.elevated);
}

#[tokio::test]
async fn deny_converts_to_authorization_denied_error() {
    let gateway = AccessGateway::new(MemAuditStore::default());
    let policy = policy::resolve(None);

    let err = gateway
        .authorize(&request("contractor", Scope::Hr, None), &policy)
        .await
        .into_result()
        .unwrap_err();

    assert!(matches!(err, VantageError::AuthorizationDenied { .. }));
}
