use anyhow::{anyhow, Result};
use chrono::{Datelike, Days, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the rolling window used by the dashboard stats.
pub const ROLLING_WINDOW_DAYS: u32 = 30;

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|e| anyhow!("Bad date '{}': {}", s, e))
}

/// Parse a `yyyy-MM` month into (year, month).
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), DATE_FORMAT)
        .map_err(|e| anyhow!("Bad month '{}': {}", s, e))?;
    Ok((first.year(), first.month()))
}

pub fn days_back(date: NaiveDate, n: u32) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(n as u64))
}

/// `days` consecutive dates ending at `end` inclusive, oldest first.
pub fn trailing_days(end: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .filter_map(|i| days_back(end, i))
        .collect()
}

/// Every date of the calendar month, in order. Empty for an invalid month.
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| d.month() == month)
        .collect()
}

/// The day range a rate series covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRange {
    Trailing { days: u32 },
    Month { year: i32, month: u32 },
}

impl DayRange {
    pub fn dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        match *self {
            DayRange::Trailing { days } => trailing_days(today, days),
            DayRange::Month { year, month } => month_days(year, month),
        }
    }
}

impl Default for DayRange {
    fn default() -> Self {
        DayRange::Trailing {
            days: ROLLING_WINDOW_DAYS,
        }
    }
}

/// `round(done / total * 100)` rounding half up; 0 when `total` is 0.
pub fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let done = done.min(total) as u64;
    let total = total as u64;
    ((done * 200 + total) / (total * 2)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn percent_rounds_half_up_and_guards_zero() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(3, 4), 75);
        assert_eq!(percent(1, 8), 13); // 12.5
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(5, 5), 100);
    }

    #[test]
    fn trailing_days_end_at_reference_date() {
        let days = trailing_days(d("2024-03-02"), 3);
        assert_eq!(days, vec![d("2024-02-29"), d("2024-03-01"), d("2024-03-02")]);
        assert_eq!(trailing_days(d("2024-03-02"), 30).len(), 30);
        assert!(trailing_days(d("2024-03-02"), 0).is_empty());
    }

    #[test]
    fn month_days_cover_the_whole_month() {
        assert_eq!(month_days(2024, 2).len(), 29);
        assert_eq!(month_days(2023, 2).len(), 28);
        assert_eq!(month_days(2024, 12).len(), 31);
        assert_eq!(month_days(2024, 12).last().copied(), Some(d("2024-12-31")));
        assert!(month_days(2024, 13).is_empty());
    }

    #[test]
    fn month_and_date_parsing() {
        assert_eq!(parse_month("2024-02").unwrap(), (2024, 2));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_date("2024/02/01").is_err());
        assert_eq!(format_date(d("2024-02-01")), "2024-02-01");
    }
}
