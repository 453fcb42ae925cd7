//! Policy resolution — merging tenant overrides over the built-in
//! default role-to-scope matrix.

use std::collections::{HashMap, HashSet};

use tracing::warn;
use vantage_core::models::policy::{Policy, PolicyOverride};
use vantage_core::models::principal::{Role, Scope};

/// Built-in default matrix.
///
/// Every role gets `Global` first (its default scope); the `Owner`
/// scope is reachable only by the owner role and always behind an
/// access code.
fn default_role_scopes() -> HashMap<Role, Vec<Scope>> {
    HashMap::from([
        (
            Role::Owner,
            vec![Scope::Global, Scope::Financial, Scope::Hr, Scope::Owner],
        ),
        (Role::Manager, vec![Scope::Global, Scope::Financial, Scope::Hr]),
        (Role::Employee, vec![Scope::Global]),
        (Role::Contractor, vec![Scope::Global]),
    ])
}

/// Merge a tenant-supplied override over the built-in defaults.
///
/// A role present in the override fully replaces the default scope list
/// for that role; absent roles keep the default. Override keys are
/// matched case-insensitively; unknown keys and empty scope lists are
/// dropped (the non-empty-list invariant must hold for every role).
/// `require_code_for` defaults to `{Owner}` when the override does not
/// set it.
pub fn resolve(tenant_override: Option<&PolicyOverride>) -> Policy {
    let mut role_scopes = default_role_scopes();
    let mut require_code_for = HashSet::from([Scope::Owner]);

    if let Some(over) = tenant_override {
        for (key, scopes) in &over.role_scopes {
            let Some(role) = Role::parse(key) else {
                warn!(role = %key, "ignoring policy override for unknown role");
                continue;
            };
            if scopes.is_empty() {
                warn!(role = %key, "ignoring empty scope list in policy override");
                continue;
            }
            role_scopes.insert(role, scopes.clone());
        }
        if let Some(require) = &over.require_code_for {
            require_code_for = require.clone();
        }
    }

    Policy {
        role_scopes,
        require_code_for,
    }
}

/// Scopes granted to a caller-supplied role string.
///
/// Unknown roles are not an error: they resolve to the `Employee` entry,
/// failing safe to least privilege.
pub fn scopes_for<'a>(role: &str, policy: &'a Policy) -> &'a [Scope] {
    let role = Role::parse(role).unwrap_or(Role::Employee);
    policy
        .role_scopes
        .get(&role)
        .or_else(|| policy.role_scopes.get(&Role::Employee))
        .map(Vec::as_slice)
        .unwrap_or(&[Scope::Global])
}

/// The default scope offered to a role: first entry of its scope list.
pub fn default_scope(role: &str, policy: &Policy) -> Scope {
    scopes_for(role, policy)[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_role() {
        let policy = resolve(None);
        for role in ["owner", "manager", "employee", "contractor"] {
            assert!(!scopes_for(role, &policy).is_empty());
            assert_eq!(default_scope(role, &policy), Scope::Global);
        }
        assert!(policy.require_code_for.contains(&Scope::Owner));
    }

    #[test]
    fn unknown_role_falls_back_to_employee() {
        let policy = resolve(None);
        assert_eq!(scopes_for("intern", &policy), scopes_for("employee", &policy));
        assert_eq!(scopes_for("", &policy), &[Scope::Global]);
    }

    #[test]
    fn override_replaces_role_entry_entirely() {
        let over = PolicyOverride {
            role_scopes: HashMap::from([("Employee".to_string(), vec![Scope::Global, Scope::Hr])]),
            require_code_for: None,
        };
        let policy = resolve(Some(&over));
        assert_eq!(scopes_for("employee", &policy), &[Scope::Global, Scope::Hr]);
        // Other roles keep the defaults.
        assert_eq!(
            scopes_for("manager", &policy),
            &[Scope::Global, Scope::Financial, Scope::Hr]
        );
        // require_code_for falls back to the default.
        assert!(policy.require_code_for.contains(&Scope::Owner));
    }

    #[test]
    fn empty_and_unknown_override_entries_are_ignored() {
        let over = PolicyOverride {
            role_scopes: HashMap::from([
                ("employee".to_string(), vec![]),
                ("superuser".to_string(), vec![Scope::Owner]),
            ]),
            require_code_for: None,
        };
        let policy = resolve(Some(&over));
        assert_eq!(scopes_for("employee", &policy), &[Scope::Global]);
        assert_eq!(scopes_for("superuser", &policy), &[Scope::Global]);
    }

    #[test]
    fn override_can_widen_code_requirement() {
        let over = PolicyOverride {
            role_scopes: HashMap::new(),
            require_code_for: Some(HashSet::from([Scope::Owner, Scope::Financial])),
        };
        let policy = resolve(Some(&over));
        assert!(policy.require_code_for.contains(&Scope::Financial));
    }
}
