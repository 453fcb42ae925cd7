//! Notification deduplication.
//!
//! Default rule: a candidate is suppressed iff an existing unread
//! notification already carries the same `(kind, record_id)` pair. The
//! re-notification cadence is a per-kind configuration value passed in
//! by the caller, not a special case inside the deduplicator.

use vantage_core::models::notification::{Notification, NotificationCandidate};

/// Decide whether `candidate` duplicates an existing unread alert.
///
/// With `re_notify_cadence_days = Some(c)` a duplicate is still allowed
/// through while the record is at most `c` days overdue, or exactly on
/// the cadence (`days_overdue % c == 0`). Without that escape hatch a
/// single unread notification would suppress all future escalation for
/// an invoice that stays unpaid for months.
pub fn should_suppress(
    candidate: &NotificationCandidate,
    existing_unread: &[Notification],
    re_notify_cadence_days: Option<i64>,
) -> bool {
    let duplicate = existing_unread
        .iter()
        .any(|n| n.kind == candidate.kind && n.record_id == candidate.record_id);
    if !duplicate {
        return false;
    }

    match (re_notify_cadence_days, candidate.days_overdue) {
        (Some(cadence), Some(days)) if days >= 1 && (days % cadence == 0 || days <= cadence) => {
            false
        }
        _ => true,
    }
}
