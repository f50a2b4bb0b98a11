//! Write timestamps.
//!
//! Stored timestamps are `timestamptz` columns, which keep microseconds. Values
//! are truncated here so that what a store hands back equals what it reads
//! back later.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};

/// Current time at microsecond precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A write timestamp strictly later than `previous`.
///
/// Two writes inside the same microsecond (or a clock step backwards) would
/// otherwise leave the record's timestamp unchanged.
pub fn advance_past(previous: DateTime<Utc>) -> DateTime<Utc> {
    let candidate = now();
    if candidate > previous {
        candidate
    } else {
        previous + TimeDelta::microseconds(1)
    }
}
