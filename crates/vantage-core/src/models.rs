//! Domain models for Vantage.
//!
//! These are the core types shared across all crates.

pub mod audit;
pub mod notification;
pub mod policy;
pub mod principal;
pub mod record;
