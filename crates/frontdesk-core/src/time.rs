use chrono::{DateTime, Utc};

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn parse_rfc3339(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.timestamp())
}
