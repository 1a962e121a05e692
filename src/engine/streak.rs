use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::{CompletionRecord, LedgerEntry};

/// Anything that marks a calendar day as completed or not.
pub trait DayMark {
    fn day(&self) -> NaiveDate;
    fn completed(&self) -> bool;
}

impl DayMark for CompletionRecord {
    fn day(&self) -> NaiveDate {
        self.date
    }
    fn completed(&self) -> bool {
        self.completed
    }
}

impl DayMark for LedgerEntry {
    fn day(&self) -> NaiveDate {
        self.date
    }
    fn completed(&self) -> bool {
        self.completed
    }
}

impl DayMark for (NaiveDate, bool) {
    fn day(&self) -> NaiveDate {
        self.0
    }
    fn completed(&self) -> bool {
        self.1
    }
}

/// Consecutive completed days for one habit, walking back from `today`.
///
/// A missing record for today leaves yesterday's run intact, but an explicit
/// not-completed record for today ends the streak at 0. When several records
/// share a date, the first one in `records` decides that day.
pub fn current_streak<'a, M, I>(records: I, today: NaiveDate) -> u32
where
    M: DayMark + 'a,
    I: IntoIterator<Item = &'a M>,
{
    let mut by_day: HashMap<NaiveDate, bool> = HashMap::new();
    for record in records {
        by_day.entry(record.day()).or_insert(record.completed());
    }
    if by_day.is_empty() {
        return 0;
    }

    let mut streak = 0u32;
    match by_day.get(&today) {
        Some(false) => return 0,
        Some(true) => streak = 1,
        None => {}
    }

    let mut check = today.pred_opt();
    while let Some(day) = check {
        if by_day.get(&day) != Some(&true) {
            break;
        }
        streak += 1;
        check = day.pred_opt();
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::dates::{days_back, parse_date};

    fn today() -> NaiveDate {
        parse_date("2024-05-10").unwrap()
    }

    fn mark(back: u32, completed: bool) -> (NaiveDate, bool) {
        (days_back(today(), back).unwrap(), completed)
    }

    #[test]
    fn empty_ledger_has_no_streak() {
        let none: Vec<(NaiveDate, bool)> = vec![];
        assert_eq!(current_streak(&none, today()), 0);
    }

    #[test]
    fn counts_today_and_stops_at_first_incomplete_day() {
        let records = vec![mark(0, true), mark(1, true), mark(2, false), mark(3, true)];
        assert_eq!(current_streak(&records, today()), 2);
    }

    #[test]
    fn incomplete_today_breaks_streak_despite_history() {
        let records = vec![mark(0, false), mark(1, true), mark(2, true)];
        assert_eq!(current_streak(&records, today()), 0);
    }

    #[test]
    fn missing_today_keeps_yesterdays_run() {
        let records = vec![mark(1, true), mark(2, true)];
        assert_eq!(current_streak(&records, today()), 2);
    }

    #[test]
    fn gap_stops_the_walk() {
        let records = vec![mark(0, true), mark(2, true), mark(3, true)];
        assert_eq!(current_streak(&records, today()), 1);
    }

    #[test]
    fn order_of_records_does_not_matter() {
        let records = vec![mark(3, true), mark(1, true), mark(0, true), mark(2, true)];
        assert_eq!(current_streak(&records, today()), 4);
    }

    #[test]
    fn first_record_wins_for_duplicate_dates() {
        let records = vec![mark(1, false), mark(1, true), mark(2, true)];
        assert_eq!(current_streak(&records, today()), 0);

        let records = vec![mark(1, true), mark(1, false), mark(2, true)];
        assert_eq!(current_streak(&records, today()), 2);
    }

    #[test]
    fn future_records_are_ignored() {
        let tomorrow = (today().succ_opt().unwrap(), true);
        let records = vec![tomorrow, mark(1, true)];
        assert_eq!(current_streak(&records, today()), 1);
    }

    #[test]
    fn works_on_completion_records() {
        let records: Vec<CompletionRecord> = (0..5)
            .map(|i| CompletionRecord {
                id: i as i64 + 1,
                habit_id: 7,
                date: days_back(today(), i).unwrap(),
                completed: true,
            })
            .collect();
        assert_eq!(current_streak(&records, today()), 5);
    }
}
