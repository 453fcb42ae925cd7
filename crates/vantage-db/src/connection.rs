//! SurrealDB connection setup.
//!
//! The scheduler is the only process that opens a remote connection, so
//! configuration is a flat struct of defaults overlaid with
//! `VANTAGE_DB_*` environment variables.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;

/// SurrealDB endpoint and credentials.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket address (host:port, no scheme).
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "vantage".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Defaults overlaid with any `VANTAGE_DB_URL`, `VANTAGE_DB_NS`,
    /// `VANTAGE_DB_NAME`, `VANTAGE_DB_USER`, and `VANTAGE_DB_PASS`
    /// variables present in the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        for (var, field) in [
            ("VANTAGE_DB_URL", &mut config.url),
            ("VANTAGE_DB_NS", &mut config.namespace),
            ("VANTAGE_DB_NAME", &mut config.database),
            ("VANTAGE_DB_USER", &mut config.username),
            ("VANTAGE_DB_PASS", &mut config.password),
        ] {
            if let Ok(value) = std::env::var(var) {
                *field = value;
            }
        }
        config
    }

    /// Open a WebSocket client, sign in as root, and select the
    /// configured namespace and database.
    pub async fn connect(&self) -> Result<Surreal<Client>, DbError> {
        info!(
            url = %self.url,
            namespace = %self.namespace,
            database = %self.database,
            "connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&self.url).await?;
        db.signin(Root {
            username: self.username.clone(),
            password: self.password.clone(),
        })
        .await?;
        db.use_ns(&self.namespace).use_db(&self.database).await?;

        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_local_instance() {
        let config = DbConfig::default();
        assert_eq!(config.url, "127.0.0.1:8000");
        assert_eq!(config.namespace, "vantage");
        assert_eq!(config.database, "main");
    }
}
