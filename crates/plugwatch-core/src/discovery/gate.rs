//! Rate gate for discovery rounds.

use std::time::{Duration, Instant};

/// Policy knobs for [`should_discover`].
#[derive(Debug, Clone)]
pub struct GatePolicy {
    /// Minimum time between completed rounds.
    pub min_interval: Duration,

    /// When true, refuse rounds while no consumer is registered.
    pub require_active_consumers: bool,
}

/// Decide whether a new discovery round may start.
///
/// Two independent guards, both must pass:
/// - time guard: a round is refused until `min_interval` has elapsed since
///   the last completed round. An unset `last_completed` always passes.
/// - demand guard: when `require_active_consumers` is set, a round is
///   refused while nothing is listening.
///
/// Pure predicate; no side effects.
pub fn should_discover(
    now: Instant,
    last_completed: Option<Instant>,
    policy: &GatePolicy,
    has_consumers: bool,
) -> bool {
    if policy.require_active_consumers && !has_consumers {
        return false;
    }

    match last_completed {
        Some(last) => now.duration_since(last) >= policy.min_interval,
        None => true,
    }
}
