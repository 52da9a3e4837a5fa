pub mod notification;
pub mod post;
pub mod project;
pub mod user;

use chrono::{DateTime, SecondsFormat, Utc};

/// Stored timestamps are fixed-width RFC 3339 UTC strings, so string order is time order.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamps_sort_chronologically() {
        let early = format_timestamp(Utc.with_ymd_and_hms(2024, 1, 9, 23, 0, 0).unwrap());
        let late = format_timestamp(Utc.with_ymd_and_hms(2024, 1, 10, 1, 0, 0).unwrap());
        assert_eq!(early, "2024-01-09T23:00:00.000Z");
        assert!(early < late);
    }
}
