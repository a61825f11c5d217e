use crate::error::ValidationError;

const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

/// Normalizes a date of birth to the canonical `MM/DD/YY` form.
///
/// Accepts ISO `YYYY-MM-DD`, month-name phrasings ("February 24, 1988"),
/// and numeric month/day/year groupings ("2/24/88", "02-24-1988").
pub fn normalize_dob(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidDate(value.to_string()));
    }

    if let Some(canonical) = from_iso(trimmed) {
        return Ok(canonical);
    }

    let numbers = numeric_tokens(trimmed);
    if let Some(month) = find_month_name(trimmed) {
        if let Some(canonical) = from_month_name(month, &numbers) {
            return Ok(canonical);
        }
    } else if numbers.len() == 3 {
        if let Some(canonical) = from_positional(&numbers) {
            return Ok(canonical);
        }
    }

    Err(ValidationError::InvalidDate(trimmed.to_string()))
}

fn from_iso(value: &str) -> Option<String> {
    let mut parts = value.split('-');
    let year = parts.next()?;
    let month = parts.next()?;
    let day = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    let year: u32 = year[2..].parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some(format!("{month:02}/{day:02}/{year:02}"))
}

fn numeric_tokens(value: &str) -> Vec<String> {
    value
        .split(|ch: char| !ch.is_ascii_digit())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn find_month_name(value: &str) -> Option<u32> {
    value
        .split(|ch: char| !ch.is_ascii_alphabetic())
        .filter(|token| !token.is_empty())
        .find_map(|token| {
            let lower = token.to_ascii_lowercase();
            MONTHS
                .iter()
                .find(|(name, _)| *name == lower)
                .map(|(_, month)| *month)
        })
}

fn from_month_name(month: u32, numbers: &[String]) -> Option<String> {
    let year_idx = numbers.iter().position(|token| token.len() == 4);
    let mut year = match year_idx {
        Some(idx) => numbers[idx][2..].parse::<u32>().ok(),
        None => None,
    };

    let mut day: Option<u32> = None;
    for (idx, token) in numbers.iter().enumerate() {
        if Some(idx) == year_idx {
            continue;
        }
        let Ok(value) = token.parse::<u32>() else {
            continue;
        };
        if day.is_none() && (1..=31).contains(&value) {
            day = Some(value);
            continue;
        }
        if year.is_none() && token.len() <= 2 {
            year = Some(value);
        }
    }

    Some(format!("{:02}/{:02}/{:02}", month, day?, year?))
}

fn from_positional(numbers: &[String]) -> Option<String> {
    let month: u32 = numbers[0].parse().ok()?;
    let day: u32 = numbers[1].parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let year_token = &numbers[2];
    let year: u32 = if year_token.len() == 4 {
        year_token[2..].parse().ok()?
    } else if year_token.len() <= 2 {
        year_token.parse().ok()?
    } else {
        return None;
    };

    Some(format!("{month:02}/{day:02}/{year:02}"))
}
