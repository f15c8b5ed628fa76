//! Date helpers
//!
//! Wire dates are `YYYY-MM-DD` strings; parsing to `NaiveDate` happens at
//! the handler layer, repositories only see validated strings.

use chrono::{Datelike, Months, NaiveDate};

use super::{AppError, AppResult};

/// Parse a wire date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Data inválida: {date} (use YYYY-MM-DD)")))
}

/// Add whole months to a date, clamping the day to the target month's end
/// (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: i64) -> NaiveDate {
    if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
            .unwrap_or(date)
    } else {
        date.checked_sub_months(Months::new((-months) as u32))
            .unwrap_or(date)
    }
}

/// Format back to the wire form
pub fn format_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_non_iso() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date("29/02/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn add_months_clamps_day() {
        let d = parse_date("2024-01-31").unwrap();
        assert_eq!(format_date(add_months(d, 1)), "2024-02-29");
        let d = parse_date("2024-03-15").unwrap();
        assert_eq!(format_date(add_months(d, 3)), "2024-06-15");
    }
}
