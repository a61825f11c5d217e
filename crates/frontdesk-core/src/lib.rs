pub mod error;
pub mod identity;
pub mod matching;
pub mod record;
pub mod time;

pub use error::ValidationError;
pub use identity::{normalize_identity, CallerIdentity, IdentityOptions, NormalizedIdentity};
pub use matching::select::{SelectOptions, SelectionResult, AMBIGUOUS_CAP};
pub use matching::{evaluate_record, match_and_select, MatchCandidate};
pub use record::RecordValue;
pub use time::now_utc;
