use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("could not normalize phone number from {0:?}")]
    InvalidPhone(String),
    #[error("could not normalize date of birth from {0:?}")]
    InvalidDate(String),
    #[error("full name must include at least a first and last name")]
    NameTooShort,
    #[error("date of birth is required")]
    MissingDob,
}
