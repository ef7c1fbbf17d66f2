//! Wall-clock helpers. Timestamps are epoch milliseconds rendered as
//! strings, which keeps generated ids sortable without a date-time
//! dependency.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch; 0 if the system clock reads earlier
/// than the epoch.
pub fn now_epoch_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// `now_epoch_ms` rendered for timestamp fields.
pub fn now_stamp() -> String {
    now_epoch_ms().to_string()
}
