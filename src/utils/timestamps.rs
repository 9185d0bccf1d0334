//! Helpers for zone-less timestamp columns.
//!
//! Timestamp columns carry no zone information. Values are always written in
//! UTC and interpreted as UTC when read back.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Interprets a naive timestamp as a UTC instant.
pub fn naive_as_utc(ts: NaiveDateTime) -> DateTime<Utc> {
    ts.and_utc()
}

/// Converts an instant into the naive UTC form stored in the database.
pub fn to_naive_utc(ts: DateTime<Utc>) -> NaiveDateTime {
    ts.naive_utc()
}
