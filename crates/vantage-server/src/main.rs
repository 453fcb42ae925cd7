//! Vantage server — runs the expiration scheduler against SurrealDB.

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use vantage_db::DbConfig;
use vantage_expiry::ExpirationOrchestrator;

use vantage_db::repository::{SurrealAuditStore, SurrealNotificationStore, SurrealRecordStore};

const DEFAULT_CHECK_INTERVAL_SECS: u64 = 3600;

/// Server configuration, read from the environment.
struct ServerConfig {
    db: DbConfig,
    tenant_id: Uuid,
    check_interval: Duration,
}

impl ServerConfig {
    fn from_env() -> Result<Self, String> {
        let db = DbConfig::from_env();

        let tenant_id = std::env::var("VANTAGE_TENANT_ID")
            .map_err(|_| "VANTAGE_TENANT_ID is required".to_string())
            .and_then(|raw| {
                Uuid::parse_str(&raw).map_err(|e| format!("invalid VANTAGE_TENANT_ID: {e}"))
            })?;

        let check_interval = match std::env::var("VANTAGE_CHECK_INTERVAL_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .map_err(|e| format!("invalid VANTAGE_CHECK_INTERVAL_SECS: {e}"))?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
        };

        Ok(Self {
            db,
            tenant_id,
            check_interval,
        })
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("vantage=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Vantage server...");

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(message) => {
            tracing::error!(%message, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let db = match config.db.connect().await {
        Ok(db) => db,
        Err(error) => {
            tracing::error!(%error, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(error) = vantage_db::run_migrations(&db).await {
        tracing::error!(%error, "Failed to run migrations");
        std::process::exit(1);
    }

    let orchestrator = ExpirationOrchestrator::new(
        SurrealRecordStore::new(db.clone()),
        SurrealNotificationStore::new(db.clone()),
        SurrealAuditStore::new(db),
    );

    tracing::info!(
        tenant_id = %config.tenant_id,
        interval_secs = config.check_interval.as_secs(),
        "Expiration scheduler running"
    );

    let mut ticker = tokio::time::interval(config.check_interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let summary = orchestrator.run_all(config.tenant_id, None).await;
                tracing::info!(
                    contracts = summary.contracts,
                    invoices = summary.invoices,
                    subscriptions = summary.subscriptions,
                    total = summary.total,
                    "Expiration check completed"
                );
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    tracing::info!("Vantage server stopped.");
}
