//! Timestamp layouts and the canonical `YYYYMMDDHHMMSS` encoding.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use super::model::ConversionError;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun",
    "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Textual timestamp layouts a field may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampLayout {
    /// `DD/Mon/YYYY:HH:MM:SS[.fff][ +HHMM]`, optionally preceded by a
    /// syslog `Mon DD HH:MM:SS` prefix
    Apache,
    /// `YYYY-MM-DD[T ]HH:MM:SS[.fff][Z|+HH:MM]`
    Iso8601,
    /// `Mon DD HH:MM:SS`; syslog omits the year so the layout carries it
    Syslog { year: i32 },
}

impl TimestampLayout {
    /// Parse `token` into a wall-clock date-time. Fractional seconds and
    /// UTC offsets are accepted but discarded.
    pub fn parse(&self, token: &str) -> Result<NaiveDateTime, ConversionError> {
        match self {
            TimestampLayout::Apache => parse_apache(token),
            TimestampLayout::Iso8601 => parse_iso8601(token),
            TimestampLayout::Syslog { year } => parse_syslog(token, *year),
        }
    }

    /// Parse `token` and encode it as `YYYYMMDDHHMMSS`.
    pub fn canonical(&self, token: &str) -> Result<u64, ConversionError> {
        let dt = self.parse(token)?;
        canonical(&dt).ok_or_else(|| ConversionError::InvalidDate(token.to_string()))
    }
}

/// Encode a date-time as the fixed-width integer `YYYYMMDDHHMMSS`.
///
/// Returns `None` for years outside `1..=9999`, which do not fit the
/// four-digit year slot.
pub fn canonical(dt: &NaiveDateTime) -> Option<u64> {
    let year = u64::try_from(dt.year()).ok().filter(|y| (1..=9999).contains(y))?;
    let date = year * 10_000 + (dt.month() as u64) * 100 + dt.day() as u64;
    let time = (dt.hour() as u64) * 10_000 + (dt.minute() as u64) * 100 + dt.second() as u64;
    Some(date * 1_000_000 + time)
}

fn unrecognized(token: &str) -> ConversionError {
    ConversionError::UnrecognizedTimestamp(token.to_string())
}

fn parse_apache(token: &str) -> Result<NaiveDateTime, ConversionError> {
    let mut rest = token.trim();

    // "Feb  6 12:14:14 06/Feb/2009:..." -> skip the syslog prefix
    if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        for _ in 0..3 {
            let end = rest.find(char::is_whitespace).ok_or_else(|| unrecognized(token))?;
            rest = rest[end..].trim_start();
        }
    }

    let stamp = match rest.split_once(char::is_whitespace) {
        Some((stamp, offset)) => {
            if !is_numeric_offset(offset.trim()) {
                return Err(unrecognized(token));
            }
            stamp
        }
        None => rest,
    };

    let stamp = match stamp.split_once('.') {
        Some((whole, fraction)) => {
            if !all_digits(fraction) {
                return Err(unrecognized(token));
            }
            whole
        }
        None => stamp,
    };

    // 06/Feb/2009:12:14:14
    let (date, time) = stamp.split_once(':').ok_or_else(|| unrecognized(token))?;

    let mut date_parts = date.split('/');
    let (day, month, year) = match (date_parts.next(), date_parts.next(), date_parts.next(), date_parts.next()) {
        (Some(d), Some(m), Some(y), None) => (d, m, y),
        _ => return Err(unrecognized(token)),
    };

    let day = two_digits(day).ok_or_else(|| unrecognized(token))?;
    let month = month_number(month).ok_or_else(|| unrecognized(token))?;
    let year = match year.len() {
        4 if all_digits(year) => year.parse::<i32>().map_err(|_| unrecognized(token))?,
        2 => 2000 + two_digits(year).ok_or_else(|| unrecognized(token))? as i32,
        _ => return Err(unrecognized(token)),
    };

    let time = parse_hms(time).ok_or_else(|| unrecognized(token))?;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ConversionError::InvalidDate(token.to_string()))?;

    Ok(date.and_time(time))
}

fn parse_iso8601(token: &str) -> Result<NaiveDateTime, ConversionError> {
    let token = token.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Ok(dt.naive_local());
    }

    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(token, layout) {
            return Ok(dt);
        }
    }

    if looks_like_iso_date(token) {
        Err(ConversionError::InvalidDate(token.to_string()))
    } else {
        Err(unrecognized(token))
    }
}

fn parse_syslog(token: &str, year: i32) -> Result<NaiveDateTime, ConversionError> {
    // "Feb  6 12:14:14": collapse the padding before handing it to chrono
    let parts: Vec<&str> = token.split_whitespace().collect();
    if parts.len() != 3 || month_number(parts[0]).is_none() {
        return Err(unrecognized(token));
    }
    let time = parse_hms(parts[2]).ok_or_else(|| unrecognized(token))?;

    let with_year = format!("{} {} {}", year, parts[0], parts[1]);
    NaiveDate::parse_from_str(&with_year, "%Y %b %d")
        .map(|date| date.and_time(time))
        .map_err(|_| ConversionError::InvalidDate(token.to_string()))
}

fn parse_hms(s: &str) -> Option<NaiveTime> {
    let mut parts = s.split(':');
    let (h, m, sec) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), Some(sec), None) => (h, m, sec),
        _ => return None,
    };
    NaiveTime::from_hms_opt(two_digits(h)?, two_digits(m)?, two_digits(sec)?)
}

fn month_number(name: &str) -> Option<u32> {
    if name.len() != 3 {
        return None;
    }
    let lower = name.to_ascii_lowercase();
    MONTHS.iter().position(|m| *m == lower).map(|i| i as u32 + 1)
}

fn two_digits(s: &str) -> Option<u32> {
    if s.len() == 2 && all_digits(s) {
        s.parse().ok()
    } else {
        None
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `+0100` / `-0700`
fn is_numeric_offset(s: &str) -> bool {
    s.len() == 5 && (s.starts_with('+') || s.starts_with('-')) && all_digits(&s[1..])
}

fn looks_like_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[7] == b'-'
}
