//! Vantage Core — domain models, error types, and store trait
//! definitions shared across all crates.

pub mod error;
pub mod models;
pub mod repository;
pub mod sink;

pub use error::{VantageError, VantageResult};
pub use sink::AuditSink;
