//! Access-code validation.
//!
//! The override code is a heuristic gate, not a credential: there is no
//! stored secret to compare against and nothing is persisted. It exists
//! to keep sensitive scopes behind a deliberate extra step.

/// Keywords that mark a code as an owner-issued override.
const OVERRIDE_KEYWORDS: &[&str] = &["owner", "master", "admin"];

/// Validate a caller-supplied override code.
///
/// Rules, applied to the trimmed input:
/// - length < 4 is always invalid, keywords included;
/// - a case-insensitive substring match of `owner`, `master`, or
///   `admin` is accepted outright;
/// - anything else needs length >= 8.
pub fn validate_access_code(code: &str) -> bool {
    let trimmed = code.trim();
    if trimmed.chars().count() < 4 {
        return false;
    }
    let lower = trimmed.to_lowercase();
    if OVERRIDE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return true;
    }
    trimmed.chars().count() >= 8
}
