use chrono::{Local, NaiveDate};

/// Window start used when a request names none.
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Fills in a missing window bound: 2024-01-01 for the start, today for the end.
pub fn resolve_window(start: Option<NaiveDate>, end: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    (
        start.unwrap_or_else(default_start_date),
        end.unwrap_or_else(|| Local::now().date_naive()),
    )
}
