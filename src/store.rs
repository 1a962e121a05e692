//! Habit store: owns the connection and joins habits with their ledger.
//!
//! The store is the only writer. Every write statement has finished before
//! the next read begins, so reports always see a complete snapshot.

use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};
use rusqlite::Connection;
use std::collections::HashMap;

use crate::db::migrations::run_migrations;
use crate::db::repository::{clear_all, CompletionRepo, HabitRepo, SettingsRepo};
use crate::engine::dates::DayRange;
use crate::engine::{current_streak, report};
use crate::error::{Result, StoreError};
use crate::models::habit::parse_time_of_day;
use crate::models::{
    ChartsReport, CompletionRecord, ExportBundle, Habit, HabitPatch, HabitWithStats,
    NewCompletion, NewHabit, Settings, SettingsPatch, StatisticsReport, StatsSummary,
};

pub struct HabitStore {
    conn: Connection,
    window_days: u32,
}

impl HabitStore {
    /// Wrap an already-migrated connection.
    pub fn new(conn: Connection, window_days: u32) -> Self {
        Self { conn, window_days }
    }

    /// Fresh store on an in-memory database.
    pub fn in_memory(window_days: u32) -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self::new(conn, window_days))
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    fn join(habit: Habit, completions: Vec<CompletionRecord>, today: NaiveDate) -> HabitWithStats {
        let streak = current_streak(&completions, today);
        HabitWithStats {
            habit,
            completions,
            streak,
        }
    }

    // ─── Habits ──────────────────────────────────────────────────────────────

    pub fn get_habits(&self, today: NaiveDate) -> Result<Vec<HabitWithStats>> {
        let habits = HabitRepo::list(&self.conn)?;
        let mut by_habit: HashMap<i64, Vec<CompletionRecord>> = HashMap::new();
        for c in CompletionRepo::list_all(&self.conn)? {
            by_habit.entry(c.habit_id).or_default().push(c);
        }

        Ok(habits
            .into_iter()
            .map(|h| {
                let completions = by_habit.remove(&h.id).unwrap_or_default();
                Self::join(h, completions, today)
            })
            .collect())
    }

    pub fn get_habit(&self, id: i64, today: NaiveDate) -> Result<Option<HabitWithStats>> {
        match HabitRepo::get(&self.conn, id)? {
            None => Ok(None),
            Some(habit) => {
                let completions = CompletionRepo::list_for_habit(&self.conn, id)?;
                Ok(Some(Self::join(habit, completions, today)))
            }
        }
    }

    pub fn create_habit(&self, new: NewHabit, now: NaiveDateTime) -> Result<HabitWithStats> {
        let new = validate_new_habit(new)?;
        let id = HabitRepo::insert(&self.conn, &new, now)?;
        debug!("created habit {} ({})", id, new.name);

        let habit = HabitRepo::get(&self.conn, id)?.ok_or(StoreError::HabitNotFound(id))?;
        Ok(HabitWithStats {
            habit,
            completions: Vec::new(),
            streak: 0,
        })
    }

    pub fn update_habit(
        &self,
        id: i64,
        patch: &HabitPatch,
        today: NaiveDate,
    ) -> Result<Option<HabitWithStats>> {
        validate_patch(patch)?;
        let Some(mut habit) = HabitRepo::get(&self.conn, id)? else {
            return Ok(None);
        };
        patch.apply(&mut habit);
        HabitRepo::update(&self.conn, &habit)?;
        debug!("updated habit {}", id);

        let completions = CompletionRepo::list_for_habit(&self.conn, id)?;
        Ok(Some(Self::join(habit, completions, today)))
    }

    pub fn delete_habit(&self, id: i64) -> Result<bool> {
        let deleted = HabitRepo::delete(&self.conn, id)?;
        if deleted {
            debug!("deleted habit {} and its completions", id);
        }
        Ok(deleted)
    }

    // ─── Completions ─────────────────────────────────────────────────────────

    pub fn create_completion(&self, new: &NewCompletion) -> Result<CompletionRecord> {
        if HabitRepo::get(&self.conn, new.habit_id)?.is_none() {
            return Err(StoreError::HabitNotFound(new.habit_id));
        }
        let id = CompletionRepo::insert(&self.conn, new)?;
        debug!(
            "created completion {} for habit {} on {} ({})",
            id, new.habit_id, new.date, new.completed
        );
        CompletionRepo::get(&self.conn, id)?.ok_or(StoreError::CompletionNotFound(id))
    }

    pub fn update_completion(&self, id: i64, completed: bool) -> Result<Option<CompletionRecord>> {
        if !CompletionRepo::set_completed(&self.conn, id, completed)? {
            return Ok(None);
        }
        debug!("completion {} set to {}", id, completed);
        CompletionRepo::get(&self.conn, id)
    }

    /// Set the habit's state for `date`, updating the day's record or
    /// creating the first one.
    pub fn set_completion(
        &self,
        habit_id: i64,
        date: NaiveDate,
        completed: bool,
        today: NaiveDate,
    ) -> Result<CompletionRecord> {
        if date > today {
            return Err(StoreError::Invalid(format!(
                "{} is in the future",
                date
            )));
        }
        match CompletionRepo::find_for_day(&self.conn, habit_id, date)? {
            Some(existing) => self
                .update_completion(existing.id, completed)?
                .ok_or(StoreError::CompletionNotFound(existing.id)),
            None => self.create_completion(&NewCompletion {
                habit_id,
                date,
                completed,
            }),
        }
    }

    /// Flip the day's record, or mark the day done when it has none.
    pub fn toggle_completion(
        &self,
        habit_id: i64,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<CompletionRecord> {
        let next = match CompletionRepo::find_for_day(&self.conn, habit_id, date)? {
            Some(existing) => !existing.completed,
            None => true,
        };
        self.set_completion(habit_id, date, next, today)
    }

    // ─── Settings ────────────────────────────────────────────────────────────

    pub fn settings(&self) -> Result<Settings> {
        SettingsRepo::get(&self.conn)
    }

    pub fn update_settings(&self, patch: &SettingsPatch, now: NaiveDateTime) -> Result<Settings> {
        if let Some(t) = &patch.reminder_time {
            parse_time_of_day(t).map_err(|e| StoreError::Invalid(e.to_string()))?;
        }
        let merged = patch.merge(&self.settings()?, now);
        SettingsRepo::save(&self.conn, &merged)?;
        debug!("settings updated");
        Ok(merged)
    }

    /// Drop every habit and completion and restore default settings.
    pub fn reset(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        clear_all(&tx)?;
        SettingsRepo::save(&tx, &Settings::default())?;
        tx.commit()?;
        info!("all habit data reset");
        Ok(())
    }

    // ─── Reports ─────────────────────────────────────────────────────────────

    pub fn stats(&self, today: NaiveDate) -> Result<StatsSummary> {
        let habits = self.get_habits(today)?;
        Ok(report::summary(&habits, today, self.window_days))
    }

    pub fn charts(&self, today: NaiveDate, range: DayRange) -> Result<ChartsReport> {
        let habits = self.get_habits(today)?;
        Ok(report::charts(&habits, today, range, self.window_days))
    }

    pub fn statistics(&self, today: NaiveDate) -> Result<StatisticsReport> {
        let habits = self.get_habits(today)?;
        Ok(report::statistics(&habits, today, self.window_days))
    }

    pub fn export(&self, today: NaiveDate) -> Result<ExportBundle> {
        Ok(ExportBundle {
            habits: self.get_habits(today)?,
            settings: self.settings()?,
        })
    }
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::Invalid("habit name must not be empty".to_string()));
    }
    Ok(())
}

fn validate_reminder(reminder: Option<&str>) -> Result<()> {
    if let Some(r) = reminder {
        parse_time_of_day(r).map_err(|e| StoreError::Invalid(e.to_string()))?;
    }
    Ok(())
}

fn validate_new_habit(new: NewHabit) -> Result<NewHabit> {
    validate_name(&new.name)?;
    let reminder = clean_optional(new.reminder);
    validate_reminder(reminder.as_deref())?;
    Ok(NewHabit {
        name: new.name.trim().to_string(),
        goal: clean_optional(new.goal),
        reminder,
        ..new
    })
}

fn validate_patch(patch: &HabitPatch) -> Result<()> {
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }
    if let Some(reminder) = &patch.reminder {
        validate_reminder(reminder.as_deref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::dates::{days_back, parse_date};
    use crate::models::{Category, Frequency, Theme};

    fn today() -> NaiveDate {
        parse_date("2024-05-10").unwrap()
    }

    fn now() -> NaiveDateTime {
        today().and_hms_opt(9, 30, 0).unwrap()
    }

    fn store() -> HabitStore {
        HabitStore::in_memory(30).unwrap()
    }

    fn new_habit(name: &str, category: Category) -> NewHabit {
        NewHabit {
            name: name.to_string(),
            category,
            ..Default::default()
        }
    }

    #[test]
    fn create_and_list_habits() {
        let store = store();
        let created = store.create_habit(new_habit("  Run ", Category::Fitness), now()).unwrap();
        assert_eq!(created.habit.id, 1);
        assert_eq!(created.habit.name, "Run");
        assert_eq!(created.habit.frequency, Frequency::Daily);
        assert_eq!(created.habit.created_at, now());
        assert_eq!(created.streak, 0);
        assert!(created.completions.is_empty());

        store.create_habit(new_habit("Read", Category::Education), now()).unwrap();
        let habits = store.get_habits(today()).unwrap();
        assert_eq!(habits.len(), 2);
        assert_eq!(habits[1].habit.name, "Read");
    }

    #[test]
    fn rejects_invalid_habits() {
        let store = store();
        assert!(matches!(
            store.create_habit(new_habit("   ", Category::Work), now()),
            Err(StoreError::Invalid(_))
        ));
        let bad_reminder = NewHabit {
            reminder: Some("half past".to_string()),
            ..new_habit("Stretch", Category::Wellness)
        };
        assert!(matches!(
            store.create_habit(bad_reminder, now()),
            Err(StoreError::Invalid(_))
        ));
        assert!(store.get_habits(today()).unwrap().is_empty());
    }

    #[test]
    fn habit_carries_streak_and_completions() {
        let store = store();
        let id = store.create_habit(new_habit("Run", Category::Fitness), now()).unwrap().habit.id;
        for back in 0..3 {
            store
                .set_completion(id, days_back(today(), back).unwrap(), true, today())
                .unwrap();
        }
        let habit = store.get_habit(id, today()).unwrap().unwrap();
        assert_eq!(habit.completions.len(), 3);
        assert_eq!(habit.streak, 3);
        assert!(store.get_habit(99, today()).unwrap().is_none());
    }

    #[test]
    fn update_habit_applies_patch() {
        let store = store();
        let id = store.create_habit(new_habit("Run", Category::Fitness), now()).unwrap().habit.id;
        let patch = HabitPatch {
            name: Some("Morning run".to_string()),
            frequency: Some(Frequency::Weekly),
            reminder: Some(Some("06:45".to_string())),
            ..Default::default()
        };
        let updated = store.update_habit(id, &patch, today()).unwrap().unwrap();
        assert_eq!(updated.habit.name, "Morning run");
        assert_eq!(updated.habit.frequency, Frequency::Weekly);
        assert_eq!(updated.habit.category, Category::Fitness);
        assert_eq!(updated.habit.reminder.as_deref(), Some("06:45"));

        assert!(store.update_habit(42, &patch, today()).unwrap().is_none());
    }

    #[test]
    fn delete_cascades_completions() {
        let store = store();
        let id = store.create_habit(new_habit("Run", Category::Fitness), now()).unwrap().habit.id;
        let other = store.create_habit(new_habit("Read", Category::Education), now()).unwrap().habit.id;
        store.set_completion(id, today(), true, today()).unwrap();
        store.set_completion(other, today(), true, today()).unwrap();

        assert!(store.delete_habit(id).unwrap());
        assert!(!store.delete_habit(id).unwrap());

        let all = CompletionRepo::list_all(&store.conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].habit_id, other);
    }

    #[test]
    fn completion_for_missing_habit_is_an_error() {
        let store = store();
        let res = store.create_completion(&NewCompletion {
            habit_id: 7,
            date: today(),
            completed: true,
        });
        assert!(matches!(res, Err(StoreError::HabitNotFound(7))));
        assert!(store.update_completion(7, true).unwrap().is_none());
    }

    #[test]
    fn toggle_creates_then_flips_one_record() {
        let store = store();
        let id = store.create_habit(new_habit("Run", Category::Fitness), now()).unwrap().habit.id;

        let first = store.toggle_completion(id, today(), today()).unwrap();
        assert!(first.completed);
        let second = store.toggle_completion(id, today(), today()).unwrap();
        assert_eq!(second.id, first.id);
        assert!(!second.completed);

        let habit = store.get_habit(id, today()).unwrap().unwrap();
        assert_eq!(habit.completions.len(), 1);
        assert_eq!(habit.streak, 0);
    }

    #[test]
    fn future_days_cannot_be_marked() {
        let store = store();
        let id = store.create_habit(new_habit("Run", Category::Fitness), now()).unwrap().habit.id;
        let tomorrow = today().succ_opt().unwrap();
        assert!(matches!(
            store.toggle_completion(id, tomorrow, today()),
            Err(StoreError::Invalid(_))
        ));
    }

    #[test]
    fn settings_patch_merges_and_stamps_sync_date() {
        let store = store();
        assert_eq!(store.settings().unwrap(), Settings::default());

        let patch = SettingsPatch {
            theme: Some(Theme::Dark),
            reminder_time: Some("21:15".to_string()),
            ..Default::default()
        };
        let updated = store.update_settings(&patch, now()).unwrap();
        assert_eq!(updated.theme, Theme::Dark);
        assert_eq!(updated.reminder_time, "21:15");
        assert!(updated.sync_data);
        assert_eq!(updated.last_sync_date, Some(now()));
        assert_eq!(store.settings().unwrap(), updated);

        let bad = SettingsPatch {
            reminder_time: Some("9".to_string()),
            ..Default::default()
        };
        assert!(matches!(store.update_settings(&bad, now()), Err(StoreError::Invalid(_))));
    }

    #[test]
    fn reset_clears_data_and_restarts_ids() {
        let store = store();
        let id = store.create_habit(new_habit("Run", Category::Fitness), now()).unwrap().habit.id;
        store.set_completion(id, today(), true, today()).unwrap();
        store
            .update_settings(&SettingsPatch { theme: Some(Theme::Dark), ..Default::default() }, now())
            .unwrap();

        store.reset().unwrap();
        assert!(store.get_habits(today()).unwrap().is_empty());
        assert_eq!(store.settings().unwrap(), Settings::default());

        let again = store.create_habit(new_habit("Read", Category::Education), now()).unwrap();
        assert_eq!(again.habit.id, 1);
        let c = store.set_completion(again.habit.id, today(), true, today()).unwrap();
        assert_eq!(c.id, 1);
    }

    #[test]
    fn reports_follow_writes() {
        let store = store();
        let a = store.create_habit(new_habit("Run", Category::Health), now()).unwrap().habit.id;
        let b = store.create_habit(new_habit("Swim", Category::Health), now()).unwrap().habit.id;
        store.set_completion(a, days_back(today(), 1).unwrap(), true, today()).unwrap();
        store.set_completion(a, days_back(today(), 2).unwrap(), false, today()).unwrap();
        store.set_completion(b, days_back(today(), 1).unwrap(), true, today()).unwrap();
        store.set_completion(b, days_back(today(), 2).unwrap(), false, today()).unwrap();

        let stats = store.stats(today()).unwrap();
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.completion_rate, 50);
        assert_eq!(stats.total_habits, 2);

        let charts = store.charts(today(), DayRange::default()).unwrap();
        assert_eq!(charts.category_completions.len(), 1);
        assert_eq!(charts.category_completions[0].completion_rate, 50);
        assert_eq!(charts.category_completions[0].count, 2);

        let export = store.export(today()).unwrap();
        assert_eq!(export.habits.len(), 2);
        assert_eq!(export.settings, Settings::default());
    }
}
