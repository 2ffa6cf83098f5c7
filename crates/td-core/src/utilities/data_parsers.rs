//! Date parsing helpers.
//!
//! Raw dates reach the library as `yyyymmdd` integers or as strings in
//! either the compact (`"20250103"`) or ISO (`"2025-01-03"`) form.  These
//! helpers split them into `(year, month, day)` without checking the day
//! against the month's length: a day set is keyed by these numbers, so
//! snapping from `2025-02-30` is meaningful.

/// Split a `yyyymmdd` integer into `(year, month, day)`.
///
/// Returns `None` unless `year >= 1`, `1 <= month <= 12` and
/// `1 <= day <= 31`.
pub fn split_compact(value: i64) -> Option<(u16, u8, u8)> {
    if !(1_01_01..=9999_12_31).contains(&value) {
        return None;
    }
    let year = u16::try_from(value / 10_000).ok()?;
    let month = ((value / 100) % 100) as u8;
    let day = (value % 100) as u8;
    checked(year, month, day)
}

/// Parse a compact `yyyymmdd` string.
pub fn parse_compact_date(s: &str) -> Option<(u16, u8, u8)> {
    let s = s.trim();
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    split_compact(s.parse().ok()?)
}

/// Parse a date string in ISO 8601 format (`YYYY-MM-DD`).
pub fn parse_iso_date(s: &str) -> Option<(u16, u8, u8)> {
    let s = s.trim();
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    let year: u16 = parts[0].parse().ok()?;
    let month: u8 = parts[1].parse().ok()?;
    let day: u8 = parts[2].parse().ok()?;
    checked(year, month, day)
}

/// Parse either the compact or the ISO form.
pub fn parse_date(s: &str) -> Option<(u16, u8, u8)> {
    parse_compact_date(s).or_else(|| parse_iso_date(s))
}

fn checked(year: u16, month: u8, day: u8) -> Option<(u16, u8, u8)> {
    if year == 0 || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some((year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_compact() {
        assert_eq!(split_compact(20250103), Some((2025, 1, 3)));
        assert_eq!(split_compact(10101), Some((1, 1, 1)));
        assert_eq!(split_compact(20251301), None);
        assert_eq!(split_compact(20250100), None);
        assert_eq!(split_compact(-20250101), None);
        assert_eq!(split_compact(2025), None);
    }

    #[test]
    fn test_parse_compact_date() {
        assert_eq!(parse_compact_date("20250103"), Some((2025, 1, 3)));
        assert_eq!(parse_compact_date(" 20250103 "), Some((2025, 1, 3)));
        assert_eq!(parse_compact_date("2025013"), None);
        assert_eq!(parse_compact_date("+2025010"), None);
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2023-06-15"), Some((2023, 6, 15)));
        assert_eq!(parse_iso_date("2023-13-15"), None);
        assert_eq!(parse_iso_date("bad"), None);
    }

    #[test]
    fn test_parse_date_either_form() {
        assert_eq!(parse_date("2025-02-30"), Some((2025, 2, 30)));
        assert_eq!(parse_date("20250230"), Some((2025, 2, 30)));
        assert_eq!(parse_date("30/02/2025"), None);
    }
}
