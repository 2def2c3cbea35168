//! Built-in format checkers (§4.A). Each takes the string value and returns
//! whether it conforms.

use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

pub type FormatFn = fn(&str) -> bool;

pub fn default_formats() -> HashMap<String, FormatFn> {
    let mut map: HashMap<String, FormatFn> = HashMap::new();
    map.insert("date".to_string(), is_date);
    map.insert("time".to_string(), is_time);
    map.insert("date-time".to_string(), is_date_time);
    map.insert("email".to_string(), is_email);
    map.insert("semver".to_string(), is_semver);
    map.insert("regex".to_string(), is_regex);
    map.insert("hostname".to_string(), is_hostname);
    map.insert("ipv4".to_string(), is_ipv4);
    map.insert("ipv6".to_string(), is_ipv6);
    map.insert("uri".to_string(), is_uri);
    map.insert("uri-reference".to_string(), is_uri);
    map
}

fn digits(text: &str, width: usize) -> Option<i64> {
    if text.len() != width || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn is_valid_ymd(year: i64, month: i64, day: i64) -> bool {
    (1..=12).contains(&month) && day >= 1 && day <= days_in_month(year, month)
}

pub fn is_date(text: &str) -> bool {
    let parts: Vec<&str> = text.split('-').collect();
    if parts.len() != 3 {
        return false;
    }
    let (Some(year), Some(month), Some(day)) = (
        digits(parts[0], 4),
        digits(parts[1], 2),
        digits(parts[2], 2),
    ) else {
        return false;
    };
    is_valid_ymd(year, month, day)
}

fn is_valid_hms_fraction(text: &str) -> bool {
    let parts: Vec<&str> = text.splitn(2, '.').collect();
    if parts.len() != 2 || parts[1].is_empty() || !parts[1].bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let hms: Vec<&str> = parts[0].split(':').collect();
    if hms.len() != 3 {
        return false;
    }
    let (Some(hour), Some(minute), Some(second)) =
        (digits(hms[0], 2), digits(hms[1], 2), digits(hms[2], 2))
    else {
        return false;
    };
    hour < 24 && minute < 60 && second < 60
}

pub fn is_time(text: &str) -> bool {
    is_valid_hms_fraction(text)
}

pub fn is_date_time(text: &str) -> bool {
    let Some((date_part, time_part)) = text.split_once('T') else {
        return false;
    };
    is_date(date_part) && is_valid_hms_fraction(time_part)
}

/// Per §4.A: presence of `@` not at the edges of the string.
pub fn is_email(text: &str) -> bool {
    match text.find('@') {
        Some(0) => false,
        Some(index) => index < text.len() - 1,
        None => false,
    }
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

pub fn is_hostname(text: &str) -> bool {
    if text.len() > 255 {
        return false;
    }
    let text = text.strip_suffix('.').unwrap_or(text);
    text.split('.').all(is_valid_label)
}

pub fn is_semver(text: &str) -> bool {
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return false;
    }
    parts
        .iter()
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

pub fn is_ipv4(text: &str) -> bool {
    Ipv4Addr::from_str(text).is_ok()
}

pub fn is_ipv6(text: &str) -> bool {
    Ipv6Addr::from_str(text).is_ok()
}

pub fn is_regex(text: &str) -> bool {
    regex::Regex::new(text).is_ok()
}

/// Always accepted: there is no reliable general-purpose URI check.
pub fn is_uri(_text: &str) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semver_accepts_two_or_three_parts() {
        assert!(is_semver("1.2"));
        assert!(is_semver("1.2.3"));
        assert!(!is_semver("1"));
        assert!(!is_semver("1.2.3.4"));
        assert!(!is_semver("a.b.c"));
    }

    #[test]
    fn hostname_rejects_leading_trailing_hyphen_labels() {
        assert!(is_hostname("foo.bar"));
        assert!(is_hostname("foo.bar."));
        assert!(!is_hostname("-foo.bar"));
        assert!(!is_hostname("foo-.bar"));
    }

    #[test]
    fn email_checks_at_sign_not_at_edges() {
        assert!(is_email("a@b"));
        assert!(!is_email("@b"));
        assert!(!is_email("a@"));
        assert!(!is_email("ab"));
    }

    #[test]
    fn date_validates_calendar_ranges() {
        assert!(is_date("2024-02-29"));
        assert!(!is_date("2023-02-29"));
        assert!(!is_date("2024-13-01"));
    }
}
