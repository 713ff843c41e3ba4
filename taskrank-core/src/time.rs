//! Time utilities: due-date parsing and timezone-aware "today".

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::OnceLock;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn basic_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<y>\d{4})(?P<m>\d{2})(?P<d>\d{2})$").expect("basic date pattern is valid")
    })
}

/// Parse a due date. Accepts an ISO-8601 calendar date (`2026-02-20`),
/// an ISO/RFC 3339 datetime (date part kept), or the basic `20260220` form.
///
/// Anything else yields `None`: a missing or unreadable due date means
/// "no date", not an error.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.date());
        }
    }

    let caps = basic_date_re().captures(s)?;
    NaiveDate::from_ymd_opt(
        caps["y"].parse().ok()?,
        caps["m"].parse().ok()?,
        caps["d"].parse().ok()?,
    )
}

/// Current calendar date in an IANA timezone like "America/Chicago".
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(date_in(Utc::now(), tz))
}

/// Calendar date of a UTC instant as seen in `tz`.
pub fn date_in(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Whole calendar days from `today` until `due` (negative when overdue).
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}
