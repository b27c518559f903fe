//! Per-cell cleanup: counts, dates, quoted values.

use chrono::{Local, NaiveDate};

/// Display format for dates, matching the `vi-VN` short form (`5/1/2025`).
pub const DATE_FORMAT: &str = "%-d/%-m/%Y";

/// Parse a locale-formatted count such as `12.500` or `1,200`.
///
/// Commas and periods are thousands separators, never decimal points. All
/// other non-digit characters are dropped too. An empty or digit-free cell,
/// or a value too large for `u64`, yields `fallback`.
pub fn parse_count(cell: &str, fallback: u64) -> u64 {
    let digits: String = cell.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(fallback)
}

/// The date part of a date cell: everything before the first space.
///
/// Returns `None` for a blank cell.
pub fn date_prefix(cell: &str) -> Option<&str> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.split(' ').next()
}

/// Strip one layer of surrounding double quotes.
pub fn unquote(cell: &str) -> &str {
    if cell.len() >= 2 && cell.starts_with('"') && cell.ends_with('"') {
        &cell[1..cell.len() - 1]
    } else {
        cell
    }
}

/// Format a date the way the feed writes it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's local date in feed format.
pub fn today_string() -> String {
    format_date(Local::now().date_naive())
}

/// Read a `day/month/year` string back into a date.
///
/// The `/`-separated parts are reversed into year, month, day; a two-part
/// `month/year` value means the first of that month. A value without `/` is
/// tried as ISO `yyyy-mm-dd`. Anything else is invalid.
pub fn parse_day_month_year(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if !value.contains('/') {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d").ok();
    }

    let parts: Vec<&str> = value.split('/').map(str::trim).collect();
    let (day, month, year): (u32, u32, i32) = match parts.as_slice() {
        [day, month, year] => (day.parse().ok()?, month.parse().ok()?, year.parse().ok()?),
        [month, year] => (1, month.parse().ok()?, year.parse().ok()?),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}
