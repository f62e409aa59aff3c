// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use crate::models::Weekday;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 with milliseconds and a `Z` suffix.
///
/// Fixed width, so stored session dates sort lexicographically.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time in the session `date` format.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Weekday of the current UTC date.
pub fn today_weekday() -> Weekday {
    Utc::now().weekday().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_has_millis_and_z() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2024-03-01T09:05:00.000Z");
    }
}
