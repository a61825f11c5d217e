use frontdesk_core::CallerIdentity;
use serde_json::Value;

const NAME_ALIASES: &[&str] = &["full_name", "fullName", "name"];
const PHONE_ALIASES: &[&str] = &[
    "phone_number",
    "phoneNumber",
    "attendeePhoneNumber",
    "phone",
    "raw_phone",
    "rawPhone",
];
const DOB_ALIASES: &[&str] = &["date_of_birth", "dateOfBirth", "dob", "birth_date", "birthDate"];
const UID_ALIASES: &[&str] = &["booking_uid", "bookingUid", "uid", "booking_id", "bookingId"];
const NEW_START_ALIASES: &[&str] = &["new_start_time", "newStartTime", "new_start", "start"];
const REASON_ALIASES: &[&str] = &["reason", "cancellation_reason", "cancellationReason"];
const RAW_PHONE_ALIASES: &[&str] = &["raw_phone", "rawPhone", "phone", "phone_number", "phoneNumber"];

/// Alias lookup scopes, in order: the payload root, then its `args` value.
/// The voice platform sends several payload shapes for the same tool call.
fn scopes(body: &Value) -> Vec<&Value> {
    let mut scopes = vec![body];
    if let Some(args) = body.get("args") {
        scopes.push(args);
    }
    scopes
}

pub fn string_field(body: &Value, aliases: &[&str]) -> Option<String> {
    for scope in scopes(body) {
        let Some(map) = scope.as_object() else {
            continue;
        };
        for alias in aliases {
            match map.get(*alias) {
                Some(Value::String(value)) if !value.trim().is_empty() => {
                    return Some(value.clone())
                }
                Some(Value::Number(value)) => return Some(value.to_string()),
                _ => {}
            }
        }
    }
    None
}

/// Bare-array payloads (`["Emily Smith", "+1304…"]`) and array `args` carry
/// fields positionally.
fn positional(body: &Value, index: usize) -> Option<String> {
    for scope in scopes(body) {
        let Some(items) = scope.as_array() else {
            continue;
        };
        if let Some(Value::String(value)) = items.get(index) {
            if !value.trim().is_empty() {
                return Some(value.clone());
            }
        }
    }
    None
}

pub fn caller_identity(body: &Value) -> Option<CallerIdentity> {
    let full_name = string_field(body, NAME_ALIASES).or_else(|| positional(body, 0))?;
    let phone_raw = string_field(body, PHONE_ALIASES).or_else(|| positional(body, 1))?;
    let dob_raw = string_field(body, DOB_ALIASES).or_else(|| positional(body, 2));
    Some(CallerIdentity {
        full_name,
        phone_raw,
        dob_raw,
    })
}

pub fn booking_uid(body: &Value) -> Option<String> {
    string_field(body, UID_ALIASES).or_else(|| positional(body, 0))
}

pub fn new_start_time(body: &Value) -> Option<String> {
    string_field(body, NEW_START_ALIASES)
}

pub fn reason(body: &Value) -> Option<String> {
    string_field(body, REASON_ALIASES)
}

pub fn raw_phone(body: &Value) -> Option<String> {
    string_field(body, RAW_PHONE_ALIASES).or_else(|| positional(body, 0))
}
