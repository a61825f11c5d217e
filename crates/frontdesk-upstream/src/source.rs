use std::future::Future;

use crate::Result;
use frontdesk_core::RecordValue;

/// The record source the matching layer depends on. `fetch_all` is
/// all-or-nothing: a partial read is never returned.
pub trait BookingSource {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<RecordValue>>> + Send;
}
