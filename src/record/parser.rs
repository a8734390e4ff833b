// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Raw text to typed value, and the inverse for plain values.
//!
//! Every parser accepts any input. Sentinels and garbage map to the
//! type's empty value so that a degraded sacct line still reconciles.

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::types::{Bound, Value};

/// Timestamp layout used by sacct/sstat/squeue
pub const STAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Binary unit suffixes, index = power of 1024
const SIZE_SUFFIXES: [&str; 7] = ["", "K", "M", "G", "T", "P", "E"];

/// `[[days-]hours:]minutes:seconds[.fraction]`
static DURATION_RE: OnceLock<Regex> = OnceLock::new();

fn duration_re() -> &'static Regex {
    DURATION_RE.get_or_init(|| {
        Regex::new(r"^(?:(?:(\d+)-)?(\d+):)?(\d+):(\d+(?:\.\d+)?)$")
            .expect("duration pattern is valid")
    })
}

/// Parse a duration, `None` if the text does not follow the pattern.
pub fn try_parse_duration(text: &str) -> Option<f64> {
    let caps = duration_re().captures(text.trim())?;
    let group = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    Some(group(1) * 86400.0 + group(2) * 3600.0 + group(3) * 60.0 + group(4))
}

/// Parse a duration in seconds; unparseable text (`UNLIMITED`, `INVALID`, ...) is 0.
pub fn parse_duration(text: &str) -> f64 {
    try_parse_duration(text).unwrap_or(0.0)
}

/// Format seconds as `[D-]HH:MM:SS`, or `--` for zero.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.round().max(0.0) as u64;
    if total == 0 {
        return "--".to_string();
    }
    let days = total / 86400;
    let hours = total % 86400 / 3600;
    let minutes = total % 3600 / 60;
    let secs = total % 60;
    if days > 0 {
        format!("{}-{:02}:{:02}:{:02}", days, hours, minutes, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    }
}

/// Parse a size like `1234`, `500K` or `3.5G` into bytes.
///
/// `16?` is a malformed sample sstat is known to emit and maps to 0.
pub fn parse_byte_size(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() || text == "16?" {
        return 0.0;
    }

    let (number, exponent) = match text.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => {
            let suffix = c.to_ascii_uppercase().to_string();
            match SIZE_SUFFIXES.iter().position(|s| *s == suffix) {
                Some(exponent) => (&text[..i], exponent),
                None => return 0.0,
            }
        }
        _ => (text, 0),
    };

    number
        .parse::<f64>()
        .map(|n| n * 1024f64.powi(exponent as i32))
        .unwrap_or(0.0)
}

/// Format bytes with the largest binary unit, two decimals (`3.00G`).
pub fn format_byte_size(bytes: f64) -> String {
    let mut value = bytes;
    let mut unit = 0;
    while value.abs() >= 1024.0 && unit < SIZE_SUFFIXES.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2}{}", value, SIZE_SUFFIXES[unit])
}

/// Split a comma-joined list at the top level, leaving `a[1,2]` intact.
pub fn split_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                tokens.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    tokens.push(&text[start..]);

    tokens
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn parse_text(text: &str) -> Value {
    Value::Text(text.trim().to_string())
}

pub fn parse_count(text: &str) -> Value {
    Value::Count(text.trim().parse().unwrap_or(0))
}

pub fn parse_bytes(text: &str) -> Value {
    Value::Bytes(parse_byte_size(text))
}

pub fn parse_seconds(text: &str) -> Value {
    Value::Seconds(parse_duration(text))
}

/// Time limit: a duration, `UNLIMITED`, or absent
pub fn parse_limit(text: &str) -> Value {
    let text = text.trim();
    if text.eq_ignore_ascii_case("UNLIMITED") {
        return Value::Limit(Bound::Unlimited);
    }
    if text == "Unknown" {
        return Value::Limit(Bound::Unknown);
    }
    match try_parse_duration(text) {
        Some(seconds) => Value::Limit(Bound::At(seconds)),
        None => Value::Limit(Bound::Absent),
    }
}

/// Timestamp; `None`, `INVALID` and empty are absent, `Unknown` is kept
pub fn parse_stamp(text: &str) -> Value {
    let text = text.trim();
    if text == "Unknown" {
        return Value::Stamp(Bound::Unknown);
    }
    match NaiveDateTime::parse_from_str(text, STAMP_FORMAT) {
        Ok(stamp) => Value::Stamp(Bound::At(stamp)),
        Err(_) => Value::Stamp(Bound::Absent),
    }
}

/// Context-free rendering of any value.
pub fn format_plain(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        Value::Count(n) => n.to_string(),
        Value::Bytes(b) => format_byte_size(*b),
        Value::Seconds(s) => format_duration(*s),
        Value::Limit(Bound::At(s)) => format_duration(*s),
        Value::Limit(Bound::Unlimited) | Value::Stamp(Bound::Unlimited) => "UNLIMITED".to_string(),
        Value::Limit(Bound::Absent) => "--".to_string(),
        Value::Stamp(Bound::At(t)) => t.format(STAMP_FORMAT).to_string(),
        Value::Stamp(Bound::Absent) | Value::Limit(Bound::Unknown) | Value::Stamp(Bound::Unknown) => {
            "Unknown".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_forms() {
        assert_eq!(parse_duration("00:30"), 30.0);
        assert_eq!(parse_duration("12:34.5"), 754.5);
        assert_eq!(parse_duration("01:00:00"), 3600.0);
        assert_eq!(parse_duration("2-03:04:05"), 2.0 * 86400.0 + 3.0 * 3600.0 + 4.0 * 60.0 + 5.0);
    }

    #[test]
    fn test_parse_duration_sentinels_are_zero() {
        for text in ["", "UNLIMITED", "INVALID", "Unknown", "--", "1-2"] {
            assert_eq!(parse_duration(text), 0.0, "{text:?}");
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "--");
        assert_eq!(format_duration(0.4), "--");
        assert_eq!(format_duration(59.0), "00:00:59");
        assert_eq!(format_duration(3600.0), "01:00:00");
        assert_eq!(format_duration(90061.0), "1-01:01:01");
    }

    #[test]
    fn test_duration_round_trip() {
        for seconds in [1.0, 61.0, 3599.0, 86400.0, 12.0 * 86400.0 + 7.0] {
            assert_eq!(parse_duration(&format_duration(seconds)), seconds);
        }
    }

    #[test]
    fn test_parse_byte_size_units() {
        assert_eq!(parse_byte_size("512"), 512.0);
        assert_eq!(parse_byte_size("500K"), 500.0 * 1024.0);
        assert_eq!(parse_byte_size("1.5M"), 1.5 * 1024.0 * 1024.0);
        assert_eq!(parse_byte_size("2G"), 2.0 * 1024f64.powi(3));
        assert_eq!(parse_byte_size("1E"), 1024f64.powi(6));
    }

    #[test]
    fn test_parse_byte_size_tolerates_garbage() {
        assert_eq!(parse_byte_size(""), 0.0);
        assert_eq!(parse_byte_size("16?"), 0.0);
        assert_eq!(parse_byte_size("lots"), 0.0);
        assert_eq!(parse_byte_size("12Q"), 0.0);
    }

    #[test]
    fn test_format_byte_size() {
        assert_eq!(format_byte_size(0.0), "0.00");
        assert_eq!(format_byte_size(1536.0), "1.50K");
        assert_eq!(format_byte_size(3.0 * 1024f64.powi(3)), "3.00G");
    }

    #[test]
    fn test_byte_size_round_trip_on_power_multiples() {
        for exponent in 0..=6 {
            for mantissa in [1.0, 3.0, 512.0] {
                let bytes = mantissa * 1024f64.powi(exponent);
                assert_eq!(parse_byte_size(&format_byte_size(bytes)), bytes);
            }
        }
    }

    #[test]
    fn test_split_tokens_respects_brackets() {
        assert_eq!(split_tokens("a[1,3],b2, ,c"), vec!["a[1,3]", "b2", "c"]);
        assert!(split_tokens("").is_empty());
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("UNLIMITED"), Value::Limit(Bound::Unlimited));
        assert_eq!(parse_limit("INVALID"), Value::Limit(Bound::Absent));
        assert_eq!(parse_limit(""), Value::Limit(Bound::Absent));
        assert_eq!(parse_limit("Unknown"), Value::Limit(Bound::Unknown));
        assert_eq!(parse_limit("1-00:00:00"), Value::Limit(Bound::At(86400.0)));
    }

    #[test]
    fn test_parse_stamp() {
        assert_eq!(parse_stamp("Unknown"), Value::Stamp(Bound::Unknown));
        assert_eq!(parse_stamp("None"), Value::Stamp(Bound::Absent));
        assert_eq!(parse_stamp("INVALID"), Value::Stamp(Bound::Absent));
        assert_eq!(format_plain(&parse_stamp("Unknown")), "Unknown");
        let value = parse_stamp("2024-01-01T10:00:00");
        assert_eq!(format_plain(&value), "2024-01-01T10:00:00");
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("4"), Value::Count(4));
        assert_eq!(parse_count(""), Value::Count(0));
        assert_eq!(parse_count("n/a"), Value::Count(0));
    }
}
