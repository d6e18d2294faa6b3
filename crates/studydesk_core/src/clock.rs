//! Wall-clock helpers.
//!
//! Core logic takes `now_ms` as a parameter so tests can drive time
//! explicitly; only repositories and binaries read the system clock.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix time in epoch milliseconds.
///
/// Clamps to `0` when the system clock is set before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
