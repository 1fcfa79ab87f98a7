//! Timestamp normalization for `since`/`before` style parameters.
//!
//! Callers may pass Unix seconds, Unix milliseconds, or a `DateTime<Utc>`.
//! The API only understands seconds. There is no tag telling seconds and
//! milliseconds apart, so the value is read as milliseconds and, if that
//! lands after 2003, divided down. This misclassifies second values past
//! roughly year 36000 and millisecond values before 2004; both are accepted
//! limitations and the threshold must stay exactly at 2003.
//!
//! The year is taken in UTC, not the host's local time zone, so the result
//! does not depend on where the client runs. Values within a day of the
//! 2003/2004 boundary are where a local-time reading would differ.

use chrono::{DateTime, Datelike, Utc};

/// Last calendar year still read as "already in seconds".
const SECONDS_CUTOFF_YEAR: i32 = 2003;

/// A timestamp as supplied by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Seconds or milliseconds since the epoch; which one is inferred.
    Epoch(i64),
    Date(DateTime<Utc>),
}

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Timestamp::Epoch(value)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp::Date(value)
    }
}

/// Coerce a timestamp to Unix seconds.
///
/// `None` and a zero epoch value yield `None` so the parameter is left out
/// of the request.
pub fn to_epoch_timestamp<T: Into<Timestamp>>(input: Option<T>) -> Option<i64> {
    let ts = match input?.into() {
        Timestamp::Epoch(0) => return None,
        Timestamp::Epoch(value) => value,
        Timestamp::Date(date) => date.timestamp_millis(),
    };

    let read_as_millis = DateTime::<Utc>::from_timestamp_millis(ts)
        .map(|date| date.year() > SECONDS_CUTOFF_YEAR)
        .unwrap_or(false);

    if read_as_millis {
        Some(ts.div_euclid(1000))
    } else {
        Some(ts)
    }
}
