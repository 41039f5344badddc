//! Day-key derivation for smart75.
//!
//! Every daily log is keyed by the local calendar date formatted as
//! `YYYY-MM-DD`. Day arithmetic is calendar-date subtraction, not
//! elapsed-hours division, so DST transitions never shift a day count.

use chrono::{Days, Local, NaiveDate};

/// Format used for all day keys.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Return today's day key in the local time zone.
pub fn today_key() -> String {
    Local::now().date_naive().format(DAY_KEY_FORMAT).to_string()
}

/// Parse a day key into a date.
///
/// Returns `None` for malformed keys; callers treat an unparseable date
/// the same as an unset one.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()
}

/// Check that a string is a well-formed day key.
pub fn is_valid_day_key(key: &str) -> bool {
    parse_day_key(key).is_some()
}

/// Return the day key `n` days after `key` (negative `n` for days before).
///
/// Returns `None` if `key` is malformed or the result overflows the
/// calendar range.
pub fn day_offset(key: &str, n: i64) -> Option<String> {
    let date = parse_day_key(key)?;
    let shifted = if n >= 0 {
        date.checked_add_days(Days::new(n as u64))?
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))?
    };
    Some(shifted.format(DAY_KEY_FORMAT).to_string())
}

/// Whole-day difference `b - a`.
///
/// `days_between(start, today) + 1` gives a 1-indexed day count. Returns
/// `None` if either key is malformed.
pub fn days_between(a: &str, b: &str) -> Option<i64> {
    let a = parse_day_key(a)?;
    let b = parse_day_key(b)?;
    Some((b - a).num_days())
}
