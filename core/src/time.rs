use chrono::{Local, NaiveDate};

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Strict `YYYY-MM-DD` parsing. chrono accepts unpadded months/days for
/// `%m`/`%d`, so the length check keeps "2025-1-5" out the same way the
/// strict parse in the original store did.
pub fn parse_due_date(input: &str) -> Option<NaiveDate> {
    if input.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(input, DUE_DATE_FORMAT).ok()
}

pub fn format_due_date(date: NaiveDate) -> String {
    date.format(DUE_DATE_FORMAT).to_string()
}

/// The user's local calendar day. Due-date rules compare at day
/// granularity, never at clock granularity.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn is_before_today(date: NaiveDate) -> bool {
    date < today()
}
