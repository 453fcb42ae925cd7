//! Vantage Access — scope-based authorization for AI commands:
//! policy resolution, access-code validation, and the allow/deny
//! decision table with its audit trail.

pub mod code;
pub mod gateway;
pub mod policy;

pub use code::validate_access_code;
pub use gateway::{AccessDecision, AccessGateway, AccessRequest};
pub use policy::{default_scope, resolve, scopes_for};
