//! Wire format for timestamps.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a timestamp as RFC 3339 with nanosecond precision, UTC (`Z`).
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}
