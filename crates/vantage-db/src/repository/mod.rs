//! SurrealDB implementations of the `vantage-core` store traits.

mod audit;
mod notification;
mod record;

pub use audit::SurrealAuditStore;
pub use notification::SurrealNotificationStore;
pub use record::SurrealRecordStore;
