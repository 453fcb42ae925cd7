//! Principal and data-scope domain model.
//!
//! A [`Role`] is who is asking; a [`Scope`] is what the command wants to
//! read. The two are orthogonal: the policy matrix maps one to the other.

use serde::{Deserialize, Serialize};

/// Principal class of the caller, as supplied by the application layer.
///
/// Not stored by this subsystem. Caller-supplied role strings are parsed
/// case-insensitively; an unrecognized string is not an error — the
/// policy resolver falls back to the `Employee` entry (least privilege).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Manager,
    Employee,
    Contractor,
}

impl Role {
    /// Parse a caller-supplied role string, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "owner" => Some(Self::Owner),
            "manager" => Some(Self::Manager),
            "employee" => Some(Self::Employee),
            "contractor" => Some(Self::Contractor),
            _ => None,
        }
    }

}

/// Data-sensitivity class a command wants to access.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Global,
    Financial,
    Hr,
    Owner,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Financial => "financial",
            Self::Hr => "hr",
            Self::Owner => "owner",
        }
    }
}
