//! Statement date display.

use chrono::NaiveDate;

/// Formats a date as `DD-Mon-YY`, e.g. `05-Nov-24`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%b-%y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2024, 11, 5, "05-Nov-24")]
    #[case(2025, 1, 31, "31-Jan-25")]
    #[case(2000, 12, 1, "01-Dec-00")]
    fn test_format_date(#[case] y: i32, #[case] m: u32, #[case] d: u32, #[case] expected: &str) {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(format_date(date), expected);
    }
}
