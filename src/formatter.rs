// Formatting helpers for the values sent to /api/search

use chrono::NaiveDate;

// Calendar date format accepted by the flight offers endpoint
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Renders a passenger count as a non-negative base-10 integer.
///
/// The value is truncated toward zero and its sign dropped, so `-3` becomes
/// `"3"` and `2.9` becomes `"2"`. Negative input is not rejected.
pub fn format_number(number: f64) -> String {
    format!("{}", number.trunc().abs() as u64)
}

/// [`format_number`] for raw form text.
///
/// Reads the leading integer of the trimmed text (an optional sign followed by
/// digits) and ignores anything after it, so `"2.9"` gives `"2"` and `"-3"`
/// gives `"3"`. Returns `None` when the text doesn't start with a number.
pub fn format_number_input(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));

    let digits_len = trimmed[sign_len..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return None;
    }

    trimmed[..sign_len + digits_len]
        .parse::<f64>()
        .ok()
        .map(format_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(format_date(date), "2025-06-01");

        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(format_date(date), "2024-12-31");
    }

    #[test_case(-3.0, "3"; "negative becomes positive")]
    #[test_case(2.9, "2"; "fraction is truncated")]
    #[test_case(0.0, "0"; "zero")]
    #[test_case(-0.5, "0"; "small negative fraction")]
    #[test_case(9.0, "9"; "whole number")]
    fn test_format_number(input: f64, expected: &str) {
        assert_eq!(format_number(input), expected);
    }

    #[test_case("1", Some("1"); "plain")]
    #[test_case("-3", Some("3"); "negative")]
    #[test_case("2.9", Some("2"); "decimal")]
    #[test_case(" 4 ", Some("4"); "padded")]
    #[test_case("007", Some("7"); "leading zeros")]
    #[test_case("0", Some("0"); "zero")]
    #[test_case("+5", Some("5"); "explicit plus")]
    #[test_case("12abc", Some("12"); "trailing garbage")]
    #[test_case("", None; "empty")]
    #[test_case("abc", None; "not a number")]
    #[test_case("-", None; "sign only")]
    #[test_case("-0", Some("0"); "negative zero")]
    fn test_format_number_input(input: &str, expected: Option<&str>) {
        assert_eq!(format_number_input(input).as_deref(), expected);
    }
}
