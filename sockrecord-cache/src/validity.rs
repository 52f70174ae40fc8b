//! Freshness check for cached handles.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Returns true if an entry established at `last_active_at` and trusted for
/// `valid_for` is still trusted at `now + required_freshness`.
///
/// A longer `required_freshness` makes the check harder to satisfy. An
/// entry whose deadline falls outside the representable range never
/// expires; a horizon outside the range is never met by a finite deadline.
pub fn is_valid(
    valid_for: Duration,
    required_freshness: Duration,
    last_active_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    match (
        shift(last_active_at, valid_for),
        shift(now, required_freshness),
    ) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(deadline), Some(expect_by)) => deadline >= expect_by,
    }
}

pub(crate) fn shift(at: DateTime<Utc>, by: Duration) -> Option<DateTime<Utc>> {
    TimeDelta::from_std(by)
        .ok()
        .and_then(|d| at.checked_add_signed(d))
}
