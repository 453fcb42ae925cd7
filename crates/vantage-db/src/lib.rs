//! Vantage Database — SurrealDB connection management, schema
//! migrations, and store trait implementations.

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::DbConfig;
pub use error::DbError;
pub use schema::run_migrations;
