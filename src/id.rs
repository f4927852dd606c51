//! ID generation for posts.

use chrono::{DateTime, Utc};
use eyre::{Result, eyre};

/// Next post id: creation time in milliseconds, bumped past `last` if the
/// clock has not moved on (or moved backwards) since the previous post.
///
/// Fails once `last` is already `i64::MAX`.
pub fn next_post_id(last: Option<i64>, now: DateTime<Utc>) -> Result<i64> {
    let millis = now.timestamp_millis();
    match last {
        Some(last) if millis <= last => last
            .checked_add(1)
            .ok_or_else(|| eyre!("post id space exhausted after {}", last)),
        _ => Ok(millis),
    }
}

/// `now` truncated to millisecond precision.
pub fn post_timestamp(now: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
