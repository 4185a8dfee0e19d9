//! Calendar domain logic for the stock register.
//!
//! Day counts, weekdays and display names for the register's months. The
//! ledger engine relies on this module to decide how many rows a month has and
//! which weekday each row falls on.

use chrono::{Datelike, NaiveDate};

/// Calendar service that handles all calendar-related business logic
#[derive(Clone, Default)]
pub struct CalendarService;

impl CalendarService {
    pub fn new() -> Self {
        Self
    }

    /// Get the number of days in a given month (1-12) and year
    pub fn days_in_month(&self, month: u32, year: i32) -> u32 {
        match month {
            2 => if self.is_leap_year(year) { 29 } else { 28 },
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Check if a year is a leap year
    pub fn is_leap_year(&self, year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Day of week for a date (0 = Sunday, 1 = Monday, etc.)
    pub fn day_of_week(&self, date: NaiveDate) -> u32 {
        date.weekday().num_days_from_sunday()
    }

    /// Get the first day of month (0 = Sunday, 1 = Monday, etc.)
    pub fn first_day_of_month(&self, month: u32, year: i32) -> Option<u32> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|date| self.day_of_week(date))
    }

    /// Every date of the month in order. Empty for a month outside 1-12.
    pub fn month_dates(&self, month: u32, year: i32) -> Vec<NaiveDate> {
        (1..=self.days_in_month(month, year))
            .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
            .collect()
    }

    /// Get the human-readable name for a month number
    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January", 2 => "February", 3 => "March", 4 => "April",
            5 => "May", 6 => "June", 7 => "July", 8 => "August",
            9 => "September", 10 => "October", 11 => "November", 12 => "December",
            _ => "Invalid Month",
        }
    }

    pub fn weekday_name(&self, day_of_week: u32) -> &'static str {
        match day_of_week {
            0 => "Sunday",
            1 => "Monday",
            2 => "Tuesday",
            3 => "Wednesday",
            4 => "Thursday",
            5 => "Friday",
            6 => "Saturday",
            _ => "Invalid",
        }
    }

    /// Format a date for human-readable display
    pub fn format_date_for_display(&self, date: NaiveDate) -> String {
        format!("{} {}, {}", self.month_name(date.month()), date.day(), date.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        let service = CalendarService::new();

        assert_eq!(service.days_in_month(1, 2025), 31); // January
        assert_eq!(service.days_in_month(4, 2025), 30); // April
        assert_eq!(service.days_in_month(2, 2025), 28); // February (non-leap)
        assert_eq!(service.days_in_month(2, 2024), 29); // February (leap year)
    }

    #[test]
    fn test_is_leap_year() {
        let service = CalendarService::new();

        assert!(!service.is_leap_year(2025));
        assert!(service.is_leap_year(2024));
        assert!(!service.is_leap_year(1900)); // Divisible by 100 but not 400
        assert!(service.is_leap_year(2000));
    }

    #[test]
    fn test_day_of_week_counts_from_sunday() {
        let service = CalendarService::new();

        // 2025-06-01 was a Sunday, 2025-06-02 a Monday
        assert_eq!(service.day_of_week(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()), 0);
        assert_eq!(service.day_of_week(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()), 1);
        assert_eq!(service.day_of_week(NaiveDate::from_ymd_opt(2025, 6, 7).unwrap()), 6);
        assert_eq!(service.first_day_of_month(9, 2025), Some(1));
        assert_eq!(service.first_day_of_month(13, 2025), None);
    }

    #[test]
    fn test_month_dates() {
        let service = CalendarService::new();

        let dates = service.month_dates(2, 2024);
        assert_eq!(dates.len(), 29);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(dates[28], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        assert!(service.month_dates(0, 2024).is_empty());
        assert!(service.month_dates(13, 2024).is_empty());
    }

    #[test]
    fn test_names() {
        let service = CalendarService::new();

        assert_eq!(service.month_name(1), "January");
        assert_eq!(service.month_name(12), "December");
        assert_eq!(service.month_name(13), "Invalid Month");
        assert_eq!(service.weekday_name(0), "Sunday");
        assert_eq!(service.weekday_name(9), "Invalid");
        assert_eq!(
            service.format_date_for_display(NaiveDate::from_ymd_opt(2025, 6, 13).unwrap()),
            "June 13, 2025"
        );
    }
}
