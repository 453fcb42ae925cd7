//! Role-to-scope permission policy.
//!
//! A [`Policy`] has no persistent identity: it is constructed per
//! authorization request by merging a tenant-supplied [`PolicyOverride`]
//! over the built-in default matrix (see `vantage-access::policy`).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::principal::{Role, Scope};

/// Resolved permission matrix consulted by the access gateway.
///
/// Invariant: every role maps to a non-empty, order-significant scope
/// list — the first entry is the default scope offered to that role.
/// Scopes in `require_code_for` demand a valid override code regardless
/// of role membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub role_scopes: HashMap<Role, Vec<Scope>>,
    pub require_code_for: HashSet<Scope>,
}

/// Tenant-supplied partial policy.
///
/// Role keys are arbitrary strings (normalized to lowercase during the
/// merge). A role present here fully replaces the default scope list for
/// that role; absent roles keep the default. `require_code_for` falls
/// back to the built-in default when `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyOverride {
    #[serde(default)]
    pub role_scopes: HashMap<String, Vec<Scope>>,
    #[serde(default)]
    pub require_code_for: Option<HashSet<Scope>>,
}
