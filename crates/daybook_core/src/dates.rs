//! Calendar key derivation and small display formatters.
//!
//! # Responsibility
//! - Derive the natural key dates for daily/weekly/monthly journal entries.
//! - Resolve the Monday-start week used by weekly habit sums.
//!
//! # Invariants
//! - Journal weeks start on Sunday; habit weeks start on Monday. The two
//!   calendars are independent and must not share helpers.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Key date for a daily entry: the day itself.
pub fn daily_key(today: NaiveDate) -> NaiveDate {
    today
}

/// Key date for a weekly entry: the Sunday on or before `today`.
pub fn weekly_key(today: NaiveDate) -> NaiveDate {
    let offset = i64::from(today.weekday().num_days_from_sunday());
    today - Duration::days(offset)
}

/// Key date for a monthly entry: the first day of `today`'s month.
pub fn monthly_key(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

/// Gate for showing the weekly reflection prompt.
pub fn is_sunday(today: NaiveDate) -> bool {
    today.weekday() == Weekday::Sun
}

/// Gate for showing the monthly summary prompt.
pub fn is_last_day_of_month(today: NaiveDate) -> bool {
    match today.succ_opt() {
        Some(tomorrow) => tomorrow.month() != today.month(),
        None => true,
    }
}

/// Monday-start week containing `date`, as inclusive `(start, end)` bounds.
pub fn monday_week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = i64::from(date.weekday().num_days_from_monday());
    let start = date - Duration::days(offset);
    (start, start + Duration::days(6))
}

/// Formats a fractional hour as a 12-hour clock label ("9:15 AM").
pub fn format_clock(hour: f64) -> String {
    let whole = hour.floor() as u32;
    let minutes = ((hour - hour.floor()) * 60.0).round() as u32;
    let period = if whole >= 12 { "PM" } else { "AM" };
    let display = match whole {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{display}:{minutes:02} {period}")
}

/// Formats a minute total as "2h 15m", dropping the hour part below 60.
pub fn format_minutes(total: u32) -> String {
    let hours = total / 60;
    let minutes = total % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::{
        daily_key, format_clock, format_minutes, is_last_day_of_month, is_sunday,
        monday_week_bounds, monthly_key, weekly_key,
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("test date should be valid")
    }

    #[test]
    fn weekly_key_is_sunday_on_or_before() {
        // 2024-06-12 is a Wednesday.
        assert_eq!(weekly_key(date(2024, 6, 12)), date(2024, 6, 9));
        // A Sunday keys to itself.
        assert_eq!(weekly_key(date(2024, 6, 9)), date(2024, 6, 9));
        // Week keys can cross a month boundary.
        assert_eq!(weekly_key(date(2024, 7, 1)), date(2024, 6, 30));
    }

    #[test]
    fn monthly_key_is_first_of_month() {
        assert_eq!(monthly_key(date(2024, 2, 29)), date(2024, 2, 1));
        assert_eq!(daily_key(date(2024, 2, 29)), date(2024, 2, 29));
    }

    #[test]
    fn prompt_gates() {
        assert!(is_sunday(date(2024, 6, 9)));
        assert!(!is_sunday(date(2024, 6, 10)));
        assert!(is_last_day_of_month(date(2024, 2, 29)));
        assert!(!is_last_day_of_month(date(2024, 2, 28)));
        assert!(is_last_day_of_month(date(2024, 12, 31)));
    }

    #[test]
    fn habit_weeks_start_on_monday() {
        // 2024-06-12 is a Wednesday; its habit week is Mon 10th..Sun 16th.
        let (start, end) = monday_week_bounds(date(2024, 6, 12));
        assert_eq!(start, date(2024, 6, 10));
        assert_eq!(end, date(2024, 6, 16));

        // A Monday starts its own week.
        let (start, _) = monday_week_bounds(date(2024, 6, 10));
        assert_eq!(start, date(2024, 6, 10));
    }

    #[test]
    fn clock_labels_use_twelve_hour_time() {
        assert_eq!(format_clock(0.0), "12:00 AM");
        assert_eq!(format_clock(9.25), "9:15 AM");
        assert_eq!(format_clock(12.0), "12:00 PM");
        assert_eq!(format_clock(13.75), "1:45 PM");
        assert_eq!(format_clock(24.0), "12:00 PM");
    }

    #[test]
    fn minute_labels_split_hours() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(135), "2h 15m");
        assert_eq!(format_minutes(120), "2h 0m");
    }
}
