use std::collections::HashSet;

use super::RecordValue;
use crate::identity::phone::digits_only;

const MAX_DEPTH: usize = 16;

/// Substructures where caller-identifying text usually lives; their leaves
/// are surfaced ahead of the full scan.
const PRIORITY_KEYS: &[&str] = &[
    "attendees",
    "responses",
    "customInputs",
    "custom_inputs",
    "metadata",
    "description",
    "additionalNotes",
    "notes",
];

const ATTENDEE_NAME_KEYS: &[&str] =
    &["name", "displayName", "display_name", "fullName", "full_name"];

/// Phone-shaped candidates: leaves under a phone-like key, then any leaf
/// whose digit-only form has at least 10 digits.
pub fn phone_candidates(record: &RecordValue) -> Vec<String> {
    let mut keyed = Vec::new();
    let mut fallback = Vec::new();
    let mut visited = HashSet::new();

    walk(record, None, 0, &mut visited, &mut |key, leaf| {
        let text = leaf_string(leaf);
        if key.is_some_and(|key| key.to_ascii_lowercase().contains("phone")) {
            keyed.push(text);
        } else if digits_only(&text).len() >= 10 {
            fallback.push(text);
        }
    });

    dedup_preserving(keyed.into_iter().chain(fallback))
}

/// Every leaf as a string, known substructures first.
pub fn text_candidates(record: &RecordValue) -> Vec<String> {
    let mut priority = Vec::new();
    if let Some(map) = record.as_object() {
        for key in PRIORITY_KEYS {
            if let Some(value) = map.get(*key) {
                let mut visited = HashSet::new();
                walk(value, Some(*key), 0, &mut visited, &mut |_, leaf| {
                    priority.push(leaf_string(leaf));
                });
            }
        }
    }

    let mut rest = Vec::new();
    let mut visited = HashSet::new();
    walk(record, None, 0, &mut visited, &mut |_, leaf| {
        rest.push(leaf_string(leaf));
    });

    dedup_preserving(priority.into_iter().chain(rest))
}

/// Display-name-like values inside any `attendees` sequence.
pub fn attendee_names(record: &RecordValue) -> Vec<String> {
    let mut names = Vec::new();
    let mut visited = HashSet::new();
    collect_attendee_names(record, 0, &mut visited, &mut names);
    dedup_preserving(names.into_iter())
}

fn collect_attendee_names(
    value: &RecordValue,
    depth: usize,
    visited: &mut HashSet<*const RecordValue>,
    out: &mut Vec<String>,
) {
    if depth > MAX_DEPTH || !mark_compound(value, visited) {
        return;
    }
    match value {
        RecordValue::Object(map) => {
            for (key, child) in map {
                if key == "attendees" {
                    if let Some(entries) = child.as_array() {
                        for entry in entries {
                            for name_key in ATTENDEE_NAME_KEYS {
                                if let Some(name) =
                                    entry.get(*name_key).and_then(RecordValue::as_str)
                                {
                                    out.push(name.to_string());
                                }
                            }
                        }
                    }
                }
                collect_attendee_names(child, depth + 1, visited, out);
            }
        }
        RecordValue::Array(items) => {
            for item in items {
                collect_attendee_names(item, depth + 1, visited, out);
            }
        }
        _ => {}
    }
}

fn walk<'a>(
    value: &'a RecordValue,
    key: Option<&str>,
    depth: usize,
    visited: &mut HashSet<*const RecordValue>,
    sink: &mut impl FnMut(Option<&str>, &'a RecordValue),
) {
    if depth > MAX_DEPTH || !mark_compound(value, visited) {
        return;
    }
    match value {
        RecordValue::Object(map) => {
            for (name, child) in map {
                walk(child, Some(name.as_str()), depth + 1, visited, sink);
            }
        }
        RecordValue::Array(items) => {
            for item in items {
                walk(item, key, depth + 1, visited, sink);
            }
        }
        RecordValue::Null => {}
        leaf => sink(key, leaf),
    }
}

fn mark_compound(value: &RecordValue, visited: &mut HashSet<*const RecordValue>) -> bool {
    match value {
        RecordValue::Object(_) | RecordValue::Array(_) => visited.insert(value as *const _),
        _ => true,
    }
}

fn leaf_string(value: &RecordValue) -> String {
    match value {
        RecordValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn dedup_preserving(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{attendee_names, phone_candidates, text_candidates};
    use serde_json::json;

    fn booking() -> serde_json::Value {
        json!({
            "uid": "bk_1",
            "title": "Consultation",
            "attendees": [
                {"name": "Emily R. Smith", "phoneNumber": "+13041111111"},
                {"name": "Dr. Jones", "email": "jones@clinic.test"},
            ],
            "responses": {"date_of_birth": "2/24/88"},
            "metadata": {"contactPhone": "304.111.1111", "room": 7},
            "description": "Follow-up visit",
        })
    }

    #[test]
    fn phone_candidates_unions_keyed_and_digit_heavy_leaves() {
        let record = json!({
            "attendees": [{"phoneNumber": "+13041111111"}],
            "notes": "alt contact 304-222-2222",
            "room": "12",
        });
        let candidates = phone_candidates(&record);
        assert!(candidates.contains(&"+13041111111".to_string()));
        assert!(candidates.contains(&"alt contact 304-222-2222".to_string()));
        assert!(!candidates.contains(&"12".to_string()));
    }

    #[test]
    fn phone_candidates_sees_nested_phone_keys() {
        let candidates = phone_candidates(&booking());
        assert!(candidates.contains(&"+13041111111".to_string()));
        assert!(candidates.contains(&"304.111.1111".to_string()));
    }

    #[test]
    fn text_candidates_surface_known_substructures_first() {
        let candidates = text_candidates(&booking());
        let dob_pos = candidates
            .iter()
            .position(|value| value == "2/24/88")
            .expect("dob candidate");
        let title_pos = candidates
            .iter()
            .position(|value| value == "Consultation")
            .expect("title candidate");
        assert!(dob_pos < title_pos);
    }

    #[test]
    fn text_candidates_still_cover_the_whole_record() {
        let candidates = text_candidates(&booking());
        assert!(candidates.contains(&"Consultation".to_string()));
        assert!(candidates.contains(&"bk_1".to_string()));
        assert!(candidates.contains(&"7".to_string()));
    }

    #[test]
    fn attendee_names_reads_any_name_alias() {
        let record = json!({
            "attendees": [
                {"name": "Emily R. Smith"},
                {"displayName": "Dr. Jones"},
            ],
            "nested": {"attendees": [{"fullName": "Pat Doe"}]},
        });
        let names = attendee_names(&record);
        assert_eq!(names, vec!["Emily R. Smith", "Dr. Jones", "Pat Doe"]);
    }

    #[test]
    fn traversal_is_deterministic() {
        let record = booking();
        assert_eq!(text_candidates(&record), text_candidates(&record));
        assert_eq!(phone_candidates(&record), phone_candidates(&record));
        assert_eq!(attendee_names(&record), attendee_names(&record));
    }

    #[test]
    fn traversal_stops_at_depth_bound() {
        let mut value = json!("leaf");
        for _ in 0..40 {
            value = json!({"next": value});
        }
        assert!(text_candidates(&value).is_empty());
    }

    #[test]
    fn null_leaves_are_skipped() {
        let record = json!({"phone": null, "note": "ok"});
        assert!(phone_candidates(&record).is_empty());
        assert_eq!(text_candidates(&record), vec!["ok"]);
    }
}
