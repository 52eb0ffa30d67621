//! Brazilian Portuguese date formatting
//!
//! Matches what `toLocaleDateString('pt-BR')` / `toLocaleString('pt-BR')`
//! print in the browser, so forms look the same as the rest of the dashboard.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// `dd/mm/yyyy`
pub fn format_date_br(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%d/%m/%Y").to_string()
}

/// `dd/mm/yyyy` for a calendar date
pub fn format_day_br(date: &NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `dd/mm/yyyy, HH:MM:SS`
pub fn format_timestamp_br(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// Current local wall-clock time, truncated to whole seconds
pub fn now_local() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
