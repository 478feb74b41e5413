//! Timestamp parsing for export fields.
//!
//! Exports write `YYYY-MM-DD HH:MM:SS` in UTC, but some rows carry time
//! components that lost their leading zero (`2023-04-05 9:3:7`). Those are
//! padded back before parsing.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::TimestampError;

const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Zero-pads single-digit `HH:MM:SS` components to two digits.
///
/// Input that does not look like `<date> <time>`, or whose time has an empty
/// or non-numeric component, is returned trimmed but otherwise untouched,
/// leaving the rejection to [`parse_timestamp`].
pub fn normalize_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    let Some((date, time)) = raw.split_once(' ') else {
        return raw.to_string();
    };

    let parts: Vec<&str> = time.trim().split(':').collect();
    if parts
        .iter()
        .any(|part| part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()))
    {
        return raw.to_string();
    }

    let time = parts
        .iter()
        .map(|part| {
            if part.len() == 1 {
                format!("0{part}")
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(":");

    format!("{date} {time}")
}

/// Parses an export timestamp as a UTC instant.
///
/// # Errors
///
/// Returns an error if the normalized string does not match
/// `%Y-%m-%d %H:%M:%S`.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let normalized = normalize_timestamp(raw);
    NaiveDateTime::parse_from_str(&normalized, FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| TimestampError {
            raw: raw.to_string(),
            reason: e.to_string(),
        })
}
