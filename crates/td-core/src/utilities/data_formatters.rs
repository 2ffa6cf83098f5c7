//! Date formatting helpers, the inverse of
//! [`data_parsers`](crate::utilities::data_parsers).

/// Join `(year, month, day)` into a `yyyymmdd` integer.
pub fn compact(year: u16, month: u8, day: u8) -> i64 {
    year as i64 * 10_000 + month as i64 * 100 + day as i64
}

/// Format `(year, month, day)` as `"yyyymmdd"`.
pub fn format_compact(year: u16, month: u8, day: u8) -> String {
    format!("{year:04}{month:02}{day:02}")
}

/// Format `(year, month, day)` as `"yyyy-mm-dd"`.
pub fn format_iso(year: u16, month: u8, day: u8) -> String {
    format!("{year:04}-{month:02}-{day:02}")
}
