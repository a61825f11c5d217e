pub mod select;

use crate::identity::{dob, name, phone, NormalizedIdentity};
use crate::record::{self, extract, RecordValue};
use select::{select, SelectOptions, SelectionResult};

/// Per-record match evidence, returned to the caller instead of being
/// logged.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub record: RecordValue,
    pub phone_matched: bool,
    pub dob_matched: bool,
    pub name_matched: bool,
}

impl MatchCandidate {
    /// A DOB present in the normalized identity always gates; callers that
    /// do not want DOB gating omit the DOB.
    pub fn is_match(&self, identity: &NormalizedIdentity) -> bool {
        self.phone_matched
            && self.name_matched
            && (identity.dob_canonical.is_none() || self.dob_matched)
    }
}

pub fn evaluate_record(record: &RecordValue, identity: &NormalizedIdentity) -> MatchCandidate {
    let phone_matched = extract::phone_candidates(record).iter().any(|candidate| {
        phone::last10(candidate).as_deref() == Some(identity.phone_last10.as_str())
    });

    let dob_matched = match identity.dob_canonical.as_deref() {
        Some(dob_canonical) => extract::text_candidates(record)
            .iter()
            .any(|candidate| text_contains_date(candidate, dob_canonical)),
        None => false,
    };

    let haystack = name_haystack(record);
    let name_matched = identity
        .name_tokens
        .iter()
        .all(|token| haystack.contains(token.as_str()));

    MatchCandidate {
        record: record.clone(),
        phone_matched,
        dob_matched,
        name_matched,
    }
}

pub fn match_and_select(
    identity: &NormalizedIdentity,
    records: &[RecordValue],
    now_utc: i64,
    options: SelectOptions,
) -> SelectionResult {
    let matches: Vec<MatchCandidate> = records
        .iter()
        .map(|record| evaluate_record(record, identity))
        .filter(|candidate| candidate.is_match(identity))
        .collect();
    select(matches, now_utc, options)
}

fn name_haystack(record: &RecordValue) -> String {
    let mut parts = Vec::new();
    if let Some(title) = record::booking_title(record) {
        parts.push(title.to_string());
    }
    parts.extend(extract::attendee_names(record));
    name::normalize_text(&parts.join(" "))
}

/// True when the text holds a date-like substring normalizing to the given
/// canonical form. Windows of up to three whitespace tokens cover phrasings
/// like "February 24, 1988".
fn text_contains_date(text: &str, dob_canonical: &str) -> bool {
    if normalizes_to(text, dob_canonical) {
        return true;
    }
    let tokens: Vec<&str> = text.split_whitespace().collect();
    for width in 1..=3usize.min(tokens.len()) {
        for window in tokens.windows(width) {
            if normalizes_to(&window.join(" "), dob_canonical) {
                return true;
            }
        }
    }
    false
}

fn normalizes_to(text: &str, dob_canonical: &str) -> bool {
    let trimmed = text.trim_matches(|ch: char| matches!(ch, ',' | '.' | ';' | ':' | '(' | ')'));
    dob::normalize_dob(trimmed).ok().as_deref() == Some(dob_canonical)
}
