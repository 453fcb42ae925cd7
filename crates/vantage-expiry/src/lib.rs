//! Vantage Expiry — periodic scans over contracts, invoices, and
//! subscriptions that emit at-most-once lifecycle notifications.

pub mod checker;
pub mod dedup;
pub mod orchestrator;

pub use checker::ExpirationChecker;
pub use dedup::should_suppress;
pub use orchestrator::{ExpirationOrchestrator, RunSummary};
