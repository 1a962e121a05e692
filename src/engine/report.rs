use chrono::NaiveDate;
use std::collections::HashMap;

use crate::engine::dates::{days_back, percent, trailing_days, DayRange};
use crate::models::{
    CategoryCompletion, ChartsReport, DailyProgress, HabitStat, HabitWithStats, LedgerEntry,
    RatePoint, StatisticsReport, StatsSummary, StreakPoint,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DayTally {
    done: usize,
    total: usize,
}

impl DayTally {
    fn add(&mut self, completed: bool) {
        self.total += 1;
        if completed {
            self.done += 1;
        }
    }

    /// At least one record and none of them incomplete.
    fn is_clean(&self) -> bool {
        self.total > 0 && self.done == self.total
    }

    fn rate(&self) -> u32 {
        percent(self.done, self.total)
    }
}

/// Flatten joined habits into ledger entries, in habit then record order.
pub fn ledger(habits: &[HabitWithStats]) -> Vec<LedgerEntry> {
    habits
        .iter()
        .flat_map(|h| {
            h.completions.iter().map(move |c| LedgerEntry {
                habit_id: h.habit.id,
                category: h.habit.category,
                date: c.date,
                completed: c.completed,
            })
        })
        .collect()
}

/// Read-only view over a ledger snapshot, indexed by day.
pub struct Reporter<'a> {
    entries: &'a [LedgerEntry],
    by_day: HashMap<NaiveDate, DayTally>,
    window_days: u32,
}

impl<'a> Reporter<'a> {
    pub fn new(entries: &'a [LedgerEntry], window_days: u32) -> Self {
        let mut by_day: HashMap<NaiveDate, DayTally> = HashMap::new();
        for e in entries {
            by_day.entry(e.date).or_default().add(e.completed);
        }
        Self {
            entries,
            by_day,
            window_days,
        }
    }

    fn tally(&self, day: NaiveDate) -> DayTally {
        self.by_day.get(&day).copied().unwrap_or_default()
    }

    /// Clean days in a row, walking back from `start` inclusive, at most
    /// `window_days` of them.
    fn clean_run_from(&self, start: NaiveDate) -> u32 {
        let mut run = 0u32;
        for i in 0..self.window_days {
            match days_back(start, i) {
                Some(day) if self.tally(day).is_clean() => run += 1,
                _ => break,
            }
        }
        run
    }

    /// Cross-habit streak: consecutive days before today on which every
    /// recorded completion was successful. Today is never counted.
    pub fn rolling_streak(&self, today: NaiveDate) -> u32 {
        match today.pred_opt() {
            Some(yesterday) => self.clean_run_from(yesterday),
            None => 0,
        }
    }

    /// Share of records dated in `[today - window, today]` that are completed.
    pub fn completion_rate(&self, today: NaiveDate) -> u32 {
        let start = days_back(today, self.window_days).unwrap_or(NaiveDate::MIN);
        let mut tally = DayTally::default();
        for e in self.entries.iter().filter(|e| e.date >= start && e.date <= today) {
            tally.add(e.completed);
        }
        tally.rate()
    }

    pub fn overall_rate(&self) -> u32 {
        let mut tally = DayTally::default();
        for e in self.entries {
            tally.add(e.completed);
        }
        tally.rate()
    }

    /// One point per day of `range`, days without records included at 0.
    pub fn daily_series(&self, range: DayRange, today: NaiveDate) -> Vec<(NaiveDate, u32)> {
        range
            .dates(today)
            .into_iter()
            .map(|day| (day, self.tally(day).rate()))
            .collect()
    }

    /// Cross-habit streak ending on each of the trailing days.
    pub fn streak_history(&self, today: NaiveDate, days: u32) -> Vec<(NaiveDate, u32)> {
        trailing_days(today, days)
            .into_iter()
            .map(|day| (day, self.clean_run_from(day)))
            .collect()
    }

    /// Completion rate and habit count per category, in order of the first
    /// habit carrying each category. Categories without habits are absent.
    pub fn categories(&self, habits: &[HabitWithStats]) -> Vec<CategoryCompletion> {
        let mut groups: Vec<(crate::models::Category, u32, DayTally)> = Vec::new();
        for h in habits {
            let category = h.habit.category;
            match groups.iter_mut().find(|(c, _, _)| *c == category) {
                Some((_, count, _)) => *count += 1,
                None => groups.push((category, 1, DayTally::default())),
            }
        }
        for e in self.entries {
            if let Some((_, _, tally)) = groups.iter_mut().find(|(c, _, _)| *c == e.category) {
                tally.add(e.completed);
            }
        }
        groups
            .into_iter()
            .map(|(category, count, tally)| CategoryCompletion {
                category,
                completion_rate: tally.rate(),
                count,
            })
            .collect()
    }
}

pub fn summary(habits: &[HabitWithStats], today: NaiveDate, window_days: u32) -> StatsSummary {
    let entries = ledger(habits);
    let reporter = Reporter::new(&entries, window_days);
    let current_streak = reporter.rolling_streak(today);
    StatsSummary {
        current_streak,
        completion_rate: reporter.completion_rate(today),
        total_habits: habits.len() as u32,
        // No historical maximum is kept, the best run is the current one.
        best_streak: current_streak,
    }
}

pub fn charts(
    habits: &[HabitWithStats],
    today: NaiveDate,
    range: DayRange,
    window_days: u32,
) -> ChartsReport {
    let entries = ledger(habits);
    let reporter = Reporter::new(&entries, window_days);
    ChartsReport {
        category_completions: reporter.categories(habits),
        monthly_progress: reporter
            .daily_series(range, today)
            .into_iter()
            .map(|(date, completion_rate)| DailyProgress {
                date,
                completion_rate,
            })
            .collect(),
        overall_completion_rate: reporter.overall_rate(),
    }
}

pub fn statistics(habits: &[HabitWithStats], today: NaiveDate, window_days: u32) -> StatisticsReport {
    let entries = ledger(habits);
    let reporter = Reporter::new(&entries, window_days);
    let history = DayRange::Trailing { days: window_days };

    StatisticsReport {
        habits: habits.iter().map(habit_stat).collect(),
        category_data: reporter.categories(habits),
        streak_history: reporter
            .streak_history(today, window_days)
            .into_iter()
            .map(|(date, streak)| StreakPoint { date, streak })
            .collect(),
        completion_history: reporter
            .daily_series(history, today)
            .into_iter()
            .map(|(date, rate)| RatePoint { date, rate })
            .collect(),
    }
}

pub fn habit_stat(h: &HabitWithStats) -> HabitStat {
    let done = h.completions.iter().filter(|c| c.completed).count();
    HabitStat {
        id: h.habit.id,
        name: h.habit.name.clone(),
        category: h.habit.category,
        frequency: h.habit.frequency,
        streak: h.streak,
        completion_rate: percent(done, h.completions.len()),
    }
}
