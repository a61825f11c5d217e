pub mod extract;

use crate::time::parse_rfc3339;

/// One externally-sourced booking record: an opaque, shape-varying tree.
pub type RecordValue = serde_json::Value;

/// First string value found under any of the given keys.
pub fn record_str<'a>(record: &'a RecordValue, keys: &[&str]) -> Option<&'a str> {
    let map = record.as_object()?;
    keys.iter()
        .find_map(|key| map.get(*key).and_then(RecordValue::as_str))
}

pub fn booking_uid(record: &RecordValue) -> Option<String> {
    let map = record.as_object()?;
    for key in ["uid", "id", "bookingUid", "booking_uid"] {
        match map.get(key) {
            Some(RecordValue::String(value)) if !value.is_empty() => return Some(value.clone()),
            Some(RecordValue::Number(value)) => return Some(value.to_string()),
            _ => {}
        }
    }
    None
}

pub fn booking_title(record: &RecordValue) -> Option<&str> {
    record_str(record, &["title", "name"])
}

pub fn start_time_raw(record: &RecordValue) -> Option<&str> {
    record_str(record, &["startTime", "start_time", "start"])
}

pub fn start_timestamp(record: &RecordValue) -> Option<i64> {
    start_time_raw(record).and_then(parse_rfc3339)
}

pub fn updated_timestamp(record: &RecordValue) -> Option<i64> {
    record_str(record, &["updatedAt", "updated_at"]).and_then(parse_rfc3339)
}

pub fn created_timestamp(record: &RecordValue) -> Option<i64> {
    record_str(record, &["createdAt", "created_at"]).and_then(parse_rfc3339)
}

pub fn is_cancelled(record: &RecordValue) -> bool {
    record_str(record, &["status"]).is_some_and(|status| {
        status.eq_ignore_ascii_case("cancelled") || status.eq_ignore_ascii_case("canceled")
    })
}
