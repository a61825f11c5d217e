use crate::error::ValidationError;

/// Collapses whitespace runs and lowercases; the shared comparison form for
/// free-text name search.
pub fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Splits a display name into lowercase tokens. A first and last name are
/// mandatory for reliable matching, so fewer than two tokens is an error.
pub fn name_tokens(value: &str) -> Result<Vec<String>, ValidationError> {
    let tokens: Vec<String> = value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if tokens.len() < 2 {
        return Err(ValidationError::NameTooShort);
    }
    Ok(tokens)
}
