use super::MatchCandidate;
use crate::record::{self, RecordValue};

pub const AMBIGUOUS_CAP: usize = 5;

/// Outcome of reducing zero/one/many matches to a single answer. `NotFound`
/// and `Ambiguous` are successful outcomes, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionResult {
    Found(RecordValue),
    NotFound,
    Ambiguous(Vec<RecordValue>),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectOptions {
    pub auto_resolve: bool,
}

/// Ranking, best first: non-cancelled status, then the earliest start at or
/// after `now_utc`, then the most recently updated (fallback created)
/// timestamp, then original fetch order. Deterministic, never random.
pub fn select(
    matches: Vec<MatchCandidate>,
    now_utc: i64,
    options: SelectOptions,
) -> SelectionResult {
    let mut records: Vec<RecordValue> = matches
        .into_iter()
        .map(|candidate| candidate.record)
        .collect();

    match records.len() {
        0 => return SelectionResult::NotFound,
        1 => return SelectionResult::Found(records.remove(0)),
        _ => {}
    }

    // Stable sort keeps fetch order on full ties.
    records.sort_by_key(|record| rank_key(record, now_utc));

    if options.auto_resolve {
        SelectionResult::Found(records.remove(0))
    } else {
        records.truncate(AMBIGUOUS_CAP);
        SelectionResult::Ambiguous(records)
    }
}

fn rank_key(record: &RecordValue, now_utc: i64) -> (u8, u8, i64) {
    let cancelled = u8::from(record::is_cancelled(record));
    match record::start_timestamp(record) {
        Some(start) if start >= now_utc => (cancelled, 0, start),
        _ => {
            let freshness = record::updated_timestamp(record)
                .or_else(|| record::created_timestamp(record))
                .unwrap_or(i64::MIN);
            (cancelled, 1, freshness.saturating_neg())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{select, SelectOptions, SelectionResult, AMBIGUOUS_CAP};
    use crate::matching::MatchCandidate;
    use serde_json::json;

    const NOW: i64 = 1_770_000_000;

    fn candidate(record: serde_json::Value) -> MatchCandidate {
        MatchCandidate {
            record,
            phone_matched: true,
            dob_matched: true,
            name_matched: true,
        }
    }

    fn auto() -> SelectOptions {
        SelectOptions { auto_resolve: true }
    }

    fn rfc3339(ts: i64) -> String {
        chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0)
            .expect("timestamp")
            .to_rfc3339()
    }

    #[test]
    fn zero_matches_is_not_found() {
        assert_eq!(select(Vec::new(), NOW, auto()), SelectionResult::NotFound);
    }

    #[test]
    fn single_match_is_found() {
        let record = json!({"uid": "only"});
        let result = select(vec![candidate(record.clone())], NOW, auto());
        assert_eq!(result, SelectionResult::Found(record));
    }

    #[test]
    fn non_cancelled_status_dominates_earlier_start() {
        let cancelled_tomorrow = json!({
            "uid": "a",
            "status": "cancelled",
            "startTime": rfc3339(NOW + 86_400),
        });
        let confirmed_next_week = json!({
            "uid": "b",
            "status": "confirmed",
            "startTime": rfc3339(NOW + 7 * 86_400),
        });
        let result = select(
            vec![candidate(cancelled_tomorrow), candidate(confirmed_next_week.clone())],
            NOW,
            auto(),
        );
        assert_eq!(result, SelectionResult::Found(confirmed_next_week));
    }

    #[test]
    fn earliest_upcoming_start_wins_within_tier() {
        let next_week = json!({"uid": "a", "startTime": rfc3339(NOW + 7 * 86_400)});
        let tomorrow = json!({"uid": "b", "startTime": rfc3339(NOW + 86_400)});
        let result = select(
            vec![candidate(next_week), candidate(tomorrow.clone())],
            NOW,
            auto(),
        );
        assert_eq!(result, SelectionResult::Found(tomorrow));
    }

    #[test]
    fn upcoming_beats_past_even_when_past_is_fresher() {
        let past_fresh = json!({
            "uid": "a",
            "startTime": rfc3339(NOW - 86_400),
            "updatedAt": rfc3339(NOW - 60),
        });
        let upcoming = json!({"uid": "b", "startTime": rfc3339(NOW + 3_600)});
        let result = select(
            vec![candidate(past_fresh), candidate(upcoming.clone())],
            NOW,
            auto(),
        );
        assert_eq!(result, SelectionResult::Found(upcoming));
    }

    #[test]
    fn without_upcoming_start_most_recently_updated_wins() {
        let stale = json!({
            "uid": "a",
            "startTime": rfc3339(NOW - 7 * 86_400),
            "updatedAt": rfc3339(NOW - 86_400),
        });
        let fresh = json!({
            "uid": "b",
            "startTime": rfc3339(NOW - 7 * 86_400),
            "createdAt": rfc3339(NOW - 3_600),
        });
        let result = select(vec![candidate(stale), candidate(fresh.clone())], NOW, auto());
        assert_eq!(result, SelectionResult::Found(fresh));
    }

    #[test]
    fn full_ties_keep_fetch_order() {
        let first = json!({"uid": "first"});
        let second = json!({"uid": "second"});
        let result = select(
            vec![candidate(first.clone()), candidate(second)],
            NOW,
            auto(),
        );
        assert_eq!(result, SelectionResult::Found(first));
    }

    #[test]
    fn ambiguous_is_capped_and_ranked() {
        let records: Vec<_> = (0..8)
            .map(|idx| {
                json!({
                    "uid": format!("bk_{idx}"),
                    "startTime": rfc3339(NOW + 86_400 * (8 - idx)),
                })
            })
            .collect();
        let result = select(
            records.iter().cloned().map(candidate).collect(),
            NOW,
            SelectOptions { auto_resolve: false },
        );
        let SelectionResult::Ambiguous(candidates) = result else {
            panic!("expected ambiguous");
        };
        assert_eq!(candidates.len(), AMBIGUOUS_CAP);
        // Latest-added records start soonest, so the order reverses.
        assert_eq!(candidates[0], records[7]);
        assert_eq!(candidates[4], records[3]);
    }
}
