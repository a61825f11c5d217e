pub mod bookings;
pub mod error;
pub mod source;

pub use bookings::{BookingApi, BookingApiOptions, CancelOutcome};
pub use error::{Result, UpstreamError};
pub use source::BookingSource;
