//! Integration tests for the SurrealDB stores using the in-memory engine.

use chrono::{Days, Utc};
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vantage_core::models::audit::{AuditEvent, AuditEventKind, AuditStatus};
use vantage_core::models::notification::{NotificationCandidate, NotificationKind, Priority};
use vantage_core::models::record::RecordStatus;
use vantage_core::repository::{AuditStore, NotificationFilter, NotificationStore, RecordStore};
use vantage_db::repository::{SurrealAuditStore, SurrealNotificationStore, SurrealRecordStore};
use vantage_expiry::ExpirationOrchestrator;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vantage_db::run_migrations(&db).await.unwrap();
    db
}

fn candidate(kind: NotificationKind, record_id: &str) -> NotificationCandidate {
    NotificationCandidate {
        kind,
        title: "Invoice overdue".into(),
        message: "Invoice INV-7 is 14 days overdue".into(),
        priority: Priority::Normal,
        action_url: "/invoices".into(),
        record_id: record_id.into(),
        days_overdue: Some(14),
        metadata: json!({ "days_overdue": 14 }),
    }
}

/// Seed one expirable record row; dates are `YYYY-MM-DD` strings.
async fn seed_record(
    db: &Surreal<surrealdb::engine::local::Db>,
    table: &str,
    tenant_id: Uuid,
    label_field: &str,
    label: &str,
    date_field: &str,
    date: Option<String>,
    status: RecordStatus,
) -> Uuid {
    let id = Uuid::new_v4();
    let query = format!(
        "CREATE type::record('{table}', $id) SET \
         tenant_id = $tenant_id, {label_field} = $label, \
         {date_field} = $date, status = $status"
    );
    db.query(&query)
        .bind(("id", id.to_string()))
        .bind(("tenant_id", tenant_id.to_string()))
        .bind(("label", label.to_string()))
        .bind(("date", date))
        .bind(("status", status.as_str()))
        .await
        .unwrap()
        .check()
        .unwrap();
    id
}

fn date_string(days_from_now: i64) -> Option<String> {
    let today = Utc::now().date_naive();
    let date = if days_from_now >= 0 {
        today.checked_add_days(Days::new(days_from_now as u64)).unwrap()
    } else {
        today.checked_sub_days(Days::new(-days_from_now as u64)).unwrap()
    };
    Some(date.format("%Y-%m-%d").to_string())
}

// ---------------------------------------------------------------------------
// Migrations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = setup().await;
    // A second run must find version 1 applied and do nothing.
    vantage_db::run_migrations(&db).await.unwrap();
}

// ---------------------------------------------------------------------------
// Notification store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_query_notification() {
    let db = setup().await;
    let store = SurrealNotificationStore::new(db);
    let tenant_id = Uuid::new_v4();

    let id = store
        .create(
            tenant_id,
            Some("user-1"),
            &candidate(NotificationKind::InvoiceOverdue, "inv-7"),
        )
        .await
        .unwrap();

    let all = store
        .query(tenant_id, NotificationFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert_eq!(all[0].kind, NotificationKind::InvoiceOverdue);
    assert_eq!(all[0].record_id, "inv-7");
    assert_eq!(all[0].user_id.as_deref(), Some("user-1"));
    assert_eq!(all[0].metadata["days_overdue"], 14);
    assert!(!all[0].read);
}

#[tokio::test]
async fn query_filters_by_kind_record_and_read_state() {
    let db = setup().await;
    let store = SurrealNotificationStore::new(db.clone());
    let tenant_id = Uuid::new_v4();

    let inv = store
        .create(
            tenant_id,
            None,
            &candidate(NotificationKind::InvoiceOverdue, "inv-1"),
        )
        .await
        .unwrap();
    store
        .create(
            tenant_id,
            None,
            &candidate(NotificationKind::ContractExpiry, "con-1"),
        )
        .await
        .unwrap();

    let invoices = store
        .query(
            tenant_id,
            NotificationFilter {
                kind: Some(NotificationKind::InvoiceOverdue),
                record_id: Some("inv-1".into()),
                unread_only: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(invoices.len(), 1);

    // Mark the invoice notification read; the unread query goes quiet.
    db.query("UPDATE type::record('notification', $id) SET read = true")
        .bind(("id", inv.to_string()))
        .await
        .unwrap()
        .check()
        .unwrap();

    let unread = store
        .query(
            tenant_id,
            NotificationFilter {
                kind: Some(NotificationKind::InvoiceOverdue),
                record_id: Some("inv-1".into()),
                unread_only: true,
            },
        )
        .await
        .unwrap();
    assert!(unread.is_empty());
}

#[tokio::test]
async fn tenants_are_isolated() {
    let db = setup().await;
    let store = SurrealNotificationStore::new(db);
    let tenant_a = Uuid::new_v4();
    let tenant_b = Uuid::new_v4();

    store
        .create(
            tenant_a,
            None,
            &candidate(NotificationKind::InvoiceOverdue, "inv-1"),
        )
        .await
        .unwrap();

    let other = store
        .query(tenant_b, NotificationFilter::default())
        .await
        .unwrap();
    assert!(other.is_empty());
}

// ---------------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listed_records_round_trip() {
    let db = setup().await;
    let tenant_id = Uuid::new_v4();

    let contract_id = seed_record(
        &db,
        "contract",
        tenant_id,
        "title",
        "Office lease",
        "end_date",
        date_string(5),
        RecordStatus::Active,
    )
    .await;
    seed_record(
        &db,
        "invoice",
        tenant_id,
        "number",
        "INV-1",
        "due_date",
        date_string(-10),
        RecordStatus::Pending,
    )
    .await;
    seed_record(
        &db,
        "subscription",
        tenant_id,
        "name",
        "Payroll SaaS",
        "next_billing_date",
        None,
        RecordStatus::Cancelled,
    )
    .await;

    let store = SurrealRecordStore::new(db);

    let contracts = store.list_contracts(tenant_id).await.unwrap();
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0].id, contract_id);
    assert_eq!(contracts[0].title, "Office lease");
    assert_eq!(contracts[0].status, RecordStatus::Active);
    assert!(contracts[0].end_date.is_some());

    let invoices = store.list_invoices(tenant_id).await.unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].number, "INV-1");

    let subscriptions = store.list_subscriptions(tenant_id).await.unwrap();
    assert_eq!(subscriptions.len(), 1);
    assert!(subscriptions[0].next_billing_date.is_none());
    assert_eq!(subscriptions[0].status, RecordStatus::Cancelled);
}

// ---------------------------------------------------------------------------
// Audit store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn audit_events_are_appended() {
    let db = setup().await;
    let store = SurrealAuditStore::new(db.clone());
    let tenant_id = Uuid::new_v4();

    store
        .append(&AuditEvent::new(
            AuditEventKind::CommandBlocked,
            AuditStatus::Failure,
            json!({ "reason": "role-restriction", "password": "leak" }),
            Some(tenant_id),
            Some("user-1".into()),
            "sess-1".into(),
        ))
        .await
        .unwrap();

    #[derive(surrealdb_types::SurrealValue)]
    struct AuditRow {
        event_type: String,
        category: String,
        details: serde_json::Value,
    }

    let mut result = db
        .query("SELECT * FROM audit_event WHERE tenant_id = $tenant_id")
        .bind(("tenant_id", tenant_id.to_string()))
        .await
        .unwrap();
    let rows: Vec<AuditRow> = result.take(0).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event_type, "ai-command.blocked");
    assert_eq!(rows[0].category, "ai-command");
    // Sanitization happened at event construction, before persistence.
    assert_eq!(rows[0].details["password"], "[REDACTED]");
}

// ---------------------------------------------------------------------------
// End to end: orchestrator over the Surreal stores
// ---------------------------------------------------------------------------

#[tokio::test]
async fn orchestrator_runs_against_surreal_stores() {
    let db = setup().await;
    let tenant_id = Uuid::new_v4();

    seed_record(
        &db,
        "contract",
        tenant_id,
        "title",
        "Office lease",
        "end_date",
        date_string(-1),
        RecordStatus::Active,
    )
    .await;
    seed_record(
        &db,
        "invoice",
        tenant_id,
        "number",
        "INV-1",
        "due_date",
        date_string(-14),
        RecordStatus::Pending,
    )
    .await;
    seed_record(
        &db,
        "subscription",
        tenant_id,
        "name",
        "Payroll SaaS",
        "next_billing_date",
        date_string(7),
        RecordStatus::Active,
    )
    .await;

    let orchestrator = ExpirationOrchestrator::new(
        SurrealRecordStore::new(db.clone()),
        SurrealNotificationStore::new(db.clone()),
        SurrealAuditStore::new(db.clone()),
    );

    let first = orchestrator.run_all(tenant_id, Some("user-1")).await;
    assert_eq!(first.contracts, 1);
    assert_eq!(first.invoices, 1);
    assert_eq!(first.subscriptions, 1);
    assert_eq!(first.total, 3);

    // Immediate re-run with everything still unread: the contract and
    // subscription are suppressed, but the invoice sits on a cadence
    // multiple (14 days) and re-notifies.
    let second = orchestrator.run_all(tenant_id, Some("user-1")).await;
    assert_eq!(second.contracts, 0);
    assert_eq!(second.subscriptions, 0);
    assert_eq!(second.invoices, 1);
    assert_eq!(second.total, 1);
}
