use crate::error::ValidationError;

const WORD_DIGITS: &[(&str, char)] = &[
    ("zero", '0'),
    ("oh", '0'),
    ("o", '0'),
    ("one", '1'),
    ("two", '2'),
    ("three", '3'),
    ("four", '4'),
    ("for", '4'),
    ("five", '5'),
    ("six", '6'),
    ("seven", '7'),
    ("eight", '8'),
    ("ate", '8'),
    ("nine", '9'),
];

pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Normalizes US phone input to E.164. Ten digits are assumed to be a US
/// number; eleven digits starting with 1 already carry the country code.
pub fn normalize_phone(value: &str) -> Result<String, ValidationError> {
    let digits = digits_only(value);

    if digits.len() == 10 {
        return Ok(format!("+1{digits}"));
    }
    if digits.len() == 11 && digits.starts_with('1') {
        return Ok(format!("+{digits}"));
    }
    if value.trim().starts_with('+') && digits.len() >= 11 {
        return Ok(format!("+{digits}"));
    }

    Err(ValidationError::InvalidPhone(value.trim().to_string()))
}

/// Concatenates spoken number words into a digit string. `double`/`triple`
/// repeat the following digit run; unrecognized tokens are dropped.
pub fn words_to_digits(value: &str) -> String {
    let mut out = String::new();
    let mut repeat = 1usize;

    for token in value
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
    {
        let lower = token.to_ascii_lowercase();

        if lower.chars().all(|ch| ch.is_ascii_digit()) {
            for _ in 0..repeat {
                out.push_str(&lower);
            }
            repeat = 1;
            continue;
        }

        match lower.as_str() {
            "double" => {
                repeat = 2;
                continue;
            }
            "triple" => {
                repeat = 3;
                continue;
            }
            _ => {}
        }

        if let Some((_, digit)) = WORD_DIGITS.iter().find(|(word, _)| *word == lower) {
            for _ in 0..repeat {
                out.push(*digit);
            }
            repeat = 1;
        }
    }

    out
}

pub fn normalize_spoken_phone(value: &str) -> Result<String, ValidationError> {
    let digits = words_to_digits(value);
    if digits.is_empty() {
        return Err(ValidationError::InvalidPhone(value.trim().to_string()));
    }
    normalize_phone(&digits).map_err(|_| ValidationError::InvalidPhone(value.trim().to_string()))
}

/// Rightmost 10 digits of any digit string. The sole comparison key used for
/// matching, so country-code presence does not matter.
pub fn last10(value: &str) -> Option<String> {
    let digits = digits_only(value);
    if digits.len() < 10 {
        return None;
    }
    Some(digits[digits.len() - 10..].to_string())
}

/// `XXX-XXX-XXXX` read-back form for the voice agent.
pub fn pretty10(digits: &str) -> Option<String> {
    if digits.len() != 10 || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    Some(format!(
        "{}-{}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..]
    ))
}

pub fn last4(digits: &str) -> Option<String> {
    if digits.len() < 4 {
        return None;
    }
    Some(digits[digits.len() - 4..].to_string())
}
