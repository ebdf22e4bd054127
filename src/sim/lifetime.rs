//! Target lifetimes
//!
//! Expiry is a two-phase affair: this module only marks expired targets.
//! The caller removes them once the whole position pass is done, so the live
//! set is never mutated while it is being iterated.

use super::state::{Target, TargetId};

/// Whether a target has outlived its lifetime at `now` (ms)
#[inline]
pub fn is_expired(target: &Target, now: f64) -> bool {
    target.age_ms(now) >= target.lifetime_ms
}

/// IDs of every expired target, oldest first
pub fn collect_expired(targets: &[Target], now: f64) -> Vec<TargetId> {
    targets
        .iter()
        .filter(|t| is_expired(t, now))
        .map(|t| t.id)
        .collect()
}

/// Restart a target's clock under a (possibly new) lifetime
pub fn reset_clock(target: &mut Target, now: f64, lifetime_ms: f64) {
    target.created_at = now;
    target.lifetime_ms = lifetime_ms;
}
