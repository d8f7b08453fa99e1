use crate::error::{AppError, AppResult};
use chrono::NaiveDate;

/// Date format used by the season calendar CSV files.
pub const CSV_DATE_FORMAT: &str = "%d/%m/%Y";

/// ISO format used on the wire (channel manager, JSON payloads).
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `dd/MM/yyyy` string as found in the season calendar.
pub fn parse_csv_date(text: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), CSV_DATE_FORMAT).map_err(|_| {
        AppError::ValidationError(format!("Invalid date '{}', expected dd/MM/yyyy", text.trim()))
    })
}

/// Format a date back to the `dd/MM/yyyy` display form.
pub fn format_csv_date(date: NaiveDate) -> String {
    date.format(CSV_DATE_FORMAT).to_string()
}

/// Format a date as ISO `yyyy-MM-dd` for outbound payloads.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_date() {
        let d = parse_csv_date("01/07/2026").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 7, 1).unwrap());

        // surrounding whitespace is tolerated
        assert!(parse_csv_date(" 31/12/2026 ").is_ok());

        assert!(parse_csv_date("2026-07-01").is_err());
        assert!(parse_csv_date("32/01/2026").is_err());
        assert!(parse_csv_date("").is_err());
    }

    #[test]
    fn test_csv_iso_round_trip() {
        // dd/MM/yyyy -> ISO -> dd/MM/yyyy must be lossless for valid rows
        for original in ["01/07/2026", "29/02/2024", "31/08/2026", "05/01/2027"] {
            let date = parse_csv_date(original).unwrap();
            let iso = format_iso_date(date);
            let back = NaiveDate::parse_from_str(&iso, ISO_DATE_FORMAT).unwrap();
            assert_eq!(format_csv_date(back), original);
        }
    }

    #[test]
    fn test_format_iso_date() {
        let d = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        assert_eq!(format_iso_date(d), "2026-07-01");
        assert_eq!(format_csv_date(d), "01/07/2026");
    }
}
