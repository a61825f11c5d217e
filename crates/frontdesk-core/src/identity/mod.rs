pub mod dob;
pub mod name;
pub mod phone;

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Identity fields as the caller supplied them, built fresh per request from
/// an untrusted payload. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub full_name: String,
    pub phone_raw: String,
    pub dob_raw: Option<String>,
}

/// Fully-normalized identity. Construction fails rather than producing a
/// partially-normalized value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedIdentity {
    pub phone_e164: String,
    pub phone_last10: String,
    pub dob_canonical: Option<String>,
    pub name_tokens: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityOptions {
    pub require_dob: bool,
}

pub fn normalize_identity(
    identity: &CallerIdentity,
    options: IdentityOptions,
) -> Result<NormalizedIdentity, ValidationError> {
    let phone_e164 = match phone::normalize_phone(&identity.phone_raw) {
        Ok(value) => value,
        Err(_) => phone::normalize_spoken_phone(&identity.phone_raw)?,
    };
    let phone_last10 = phone::last10(&phone_e164)
        .ok_or_else(|| ValidationError::InvalidPhone(identity.phone_raw.trim().to_string()))?;

    let dob_canonical = match identity.dob_raw.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(dob::normalize_dob(raw)?),
        _ if options.require_dob => return Err(ValidationError::MissingDob),
        _ => None,
    };

    let name_tokens = name::name_tokens(&identity.full_name)?;

    Ok(NormalizedIdentity {
        phone_e164,
        phone_last10,
        dob_canonical,
        name_tokens,
    })
}
