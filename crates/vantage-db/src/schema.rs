//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. Business dates (contract end,
//! invoice due, next billing) are date-only and stored as `YYYY-MM-DD`
//! strings.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Notifications (tenant scope)
-- =======================================================================
DEFINE TABLE notification SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE notification TYPE string;
DEFINE FIELD kind ON TABLE notification TYPE string \
    ASSERT $value IN ['contract-expiry', 'invoice-overdue', \
    'subscription-renewal'];
DEFINE FIELD title ON TABLE notification TYPE string;
DEFINE FIELD message ON TABLE notification TYPE string;
DEFINE FIELD priority ON TABLE notification TYPE string \
    ASSERT $value IN ['urgent', 'high', 'normal'];
DEFINE FIELD action_url ON TABLE notification TYPE string;
DEFINE FIELD record_id ON TABLE notification TYPE string;
DEFINE FIELD user_id ON TABLE notification TYPE option<string>;
DEFINE FIELD metadata ON TABLE notification TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD read ON TABLE notification TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE notification TYPE datetime \
    DEFAULT time::now();
-- Non-unique: duplicates from concurrent runs are accepted, the index
-- only serves the dedup lookup.
DEFINE INDEX idx_notification_dedup ON TABLE notification \
    COLUMNS tenant_id, kind, record_id, read;

-- =======================================================================
-- Contracts (tenant scope, read-only input)
-- =======================================================================
DEFINE TABLE contract SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE contract TYPE string;
DEFINE FIELD title ON TABLE contract TYPE string;
DEFINE FIELD end_date ON TABLE contract TYPE option<string>;
DEFINE FIELD status ON TABLE contract TYPE string \
    ASSERT $value IN ['active', 'pending', 'expired', 'cancelled'];
DEFINE INDEX idx_contract_tenant ON TABLE contract COLUMNS tenant_id;

-- =======================================================================
-- Invoices (tenant scope, read-only input)
-- =======================================================================
DEFINE TABLE invoice SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE invoice TYPE string;
DEFINE FIELD number ON TABLE invoice TYPE string;
DEFINE FIELD due_date ON TABLE invoice TYPE option<string>;
DEFINE FIELD status ON TABLE invoice TYPE string \
    ASSERT $value IN ['active', 'pending', 'expired', 'cancelled'];
DEFINE INDEX idx_invoice_tenant ON TABLE invoice COLUMNS tenant_id;

-- =======================================================================
-- Subscriptions (tenant scope, read-only input)
-- =======================================================================
DEFINE TABLE subscription SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE subscription TYPE string;
DEFINE FIELD name ON TABLE subscription TYPE string;
DEFINE FIELD next_billing_date ON TABLE subscription TYPE option<string>;
DEFINE FIELD status ON TABLE subscription TYPE string \
    ASSERT $value IN ['active', 'pending', 'expired', 'cancelled'];
DEFINE INDEX idx_subscription_tenant ON TABLE subscription \
    COLUMNS tenant_id;

-- =======================================================================
-- Audit events (append-only)
-- =======================================================================
DEFINE TABLE audit_event SCHEMAFULL;
DEFINE FIELD event_type ON TABLE audit_event TYPE string;
DEFINE FIELD category ON TABLE audit_event TYPE string;
DEFINE FIELD status ON TABLE audit_event TYPE string \
    ASSERT $value IN ['Success', 'Failure', 'Warning'];
DEFINE FIELD details ON TABLE audit_event TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD user_id ON TABLE audit_event TYPE option<string>;
DEFINE FIELD tenant_id ON TABLE audit_event TYPE option<string>;
DEFINE FIELD session_id ON TABLE audit_event TYPE string;
DEFINE FIELD timestamp ON TABLE audit_event TYPE datetime;
DEFINE INDEX idx_audit_tenant_category ON TABLE audit_event \
    COLUMNS tenant_id, category;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Bring the database up to the latest schema version.
///
/// The `_migration` tracking table is created first (idempotent DDL),
/// then every migration above the recorded version is applied. Each
/// migration's DDL and its tracking record go through one multi-statement
/// query, so a failed apply leaves no version record behind.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(format!("migration table setup failed: {e}")))?;

    let applied = current_version(db).await?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > applied) {
        info!(
            version = migration.version,
            name = migration.name,
            "applying schema migration"
        );
        db.query(migration.sql)
            .query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "schema v{} ({}) failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;
    }

    Ok(())
}

async fn current_version<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let rows: Vec<MigrationRecord> = result.take(0)?;
    Ok(rows.first().map(|m| m.version).unwrap_or(0))
}
