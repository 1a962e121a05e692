use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

use crate::engine::dates::{format_date, DATE_FORMAT};
use crate::error::{Result, StoreError};
use crate::models::{
    Category, CompletionRecord, Frequency, Habit, NewCompletion, NewHabit, Settings, Theme,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| StoreError::Corrupt(format!("bad date '{}': {}", s, e)))
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp '{}': {}", s, e)))
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

// ─── Habit repo ──────────────────────────────────────────────────────────────

type HabitRow = (i64, String, String, String, Option<String>, Option<String>, String);

const HABIT_COLUMNS: &str = "id, name, frequency, category, goal, reminder, created_at";

fn habit_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<HabitRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn habit_from_row(raw: HabitRow) -> Result<Habit> {
    let (id, name, frequency, category, goal, reminder, created_at) = raw;
    Ok(Habit {
        id,
        name,
        frequency: Frequency::from_str(&frequency)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        category: Category::from_str(&category)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        goal,
        reminder,
        created_at: parse_timestamp(&created_at)?,
    })
}

pub struct HabitRepo;

impl HabitRepo {
    pub fn list(conn: &Connection) -> Result<Vec<Habit>> {
        let mut stmt = conn.prepare(&format!("SELECT {} FROM habits ORDER BY id", HABIT_COLUMNS))?;
        let rows = stmt.query_map([], habit_row)?;

        let mut result = Vec::new();
        for r in rows {
            result.push(habit_from_row(r?)?);
        }
        Ok(result)
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<Habit>> {
        let raw = conn
            .query_row(
                &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
                params![id],
                habit_row,
            )
            .optional()?;
        raw.map(habit_from_row).transpose()
    }

    pub fn insert(conn: &Connection, habit: &NewHabit, created_at: NaiveDateTime) -> Result<i64> {
        conn.execute(
            "INSERT INTO habits (name, frequency, category, goal, reminder, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                habit.name,
                habit.frequency.as_str(),
                habit.category.as_str(),
                habit.goal,
                habit.reminder,
                format_timestamp(created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(conn: &Connection, habit: &Habit) -> Result<()> {
        conn.execute(
            "UPDATE habits SET name = ?1, frequency = ?2, category = ?3, goal = ?4, reminder = ?5
             WHERE id = ?6",
            params![
                habit.name,
                habit.frequency.as_str(),
                habit.category.as_str(),
                habit.goal,
                habit.reminder,
                habit.id,
            ],
        )?;
        Ok(())
    }

    /// Returns false when no habit had this id. Completions cascade.
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let n = conn.execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }
}

// ─── Completion repo ─────────────────────────────────────────────────────────

type CompletionRow = (i64, i64, String, i32);

const COMPLETION_COLUMNS: &str = "id, habit_id, date, completed";

fn completion_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CompletionRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn completion_from_row(raw: CompletionRow) -> Result<CompletionRecord> {
    let (id, habit_id, date, completed) = raw;
    Ok(CompletionRecord {
        id,
        habit_id,
        date: parse_day(&date)?,
        completed: completed != 0,
    })
}

pub struct CompletionRepo;

impl CompletionRepo {
    /// Every record, in insertion order.
    pub fn list_all(conn: &Connection) -> Result<Vec<CompletionRecord>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM completions ORDER BY id",
            COMPLETION_COLUMNS
        ))?;
        let rows = stmt.query_map([], completion_row)?;

        let mut result = Vec::new();
        for r in rows {
            result.push(completion_from_row(r?)?);
        }
        Ok(result)
    }

    pub fn list_for_habit(conn: &Connection, habit_id: i64) -> Result<Vec<CompletionRecord>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM completions WHERE habit_id = ?1 ORDER BY id",
            COMPLETION_COLUMNS
        ))?;
        let rows = stmt.query_map(params![habit_id], completion_row)?;

        let mut result = Vec::new();
        for r in rows {
            result.push(completion_from_row(r?)?);
        }
        Ok(result)
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<CompletionRecord>> {
        let raw = conn
            .query_row(
                &format!("SELECT {} FROM completions WHERE id = ?1", COMPLETION_COLUMNS),
                params![id],
                completion_row,
            )
            .optional()?;
        raw.map(completion_from_row).transpose()
    }

    /// The earliest-inserted record for (habit, date), if any.
    pub fn find_for_day(
        conn: &Connection,
        habit_id: i64,
        date: NaiveDate,
    ) -> Result<Option<CompletionRecord>> {
        let raw = conn
            .query_row(
                &format!(
                    "SELECT {} FROM completions WHERE habit_id = ?1 AND date = ?2
                     ORDER BY id LIMIT 1",
                    COMPLETION_COLUMNS
                ),
                params![habit_id, format_date(date)],
                completion_row,
            )
            .optional()?;
        raw.map(completion_from_row).transpose()
    }

    pub fn insert(conn: &Connection, completion: &NewCompletion) -> Result<i64> {
        conn.execute(
            "INSERT INTO completions (habit_id, date, completed) VALUES (?1, ?2, ?3)",
            params![
                completion.habit_id,
                format_date(completion.date),
                completion.completed as i32
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn set_completed(conn: &Connection, id: i64, completed: bool) -> Result<bool> {
        let n = conn.execute(
            "UPDATE completions SET completed = ?1 WHERE id = ?2",
            params![completed as i32, id],
        )?;
        Ok(n > 0)
    }
}

// ─── Settings repo ───────────────────────────────────────────────────────────

pub struct SettingsRepo;

impl SettingsRepo {
    pub fn get(conn: &Connection) -> Result<Settings> {
        let raw = conn
            .query_row(
                "SELECT theme, notifications_enabled, reminder_time, sync_data, last_sync_date
                 FROM settings WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i32>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i32>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;

        match raw {
            None => Ok(Settings::default()),
            Some((theme, notifications, reminder_time, sync, last_sync)) => Ok(Settings {
                theme: Theme::from_str(&theme).map_err(|e| StoreError::Corrupt(e.to_string()))?,
                notifications_enabled: notifications != 0,
                reminder_time,
                sync_data: sync != 0,
                last_sync_date: last_sync.as_deref().map(parse_timestamp).transpose()?,
            }),
        }
    }

    pub fn save(conn: &Connection, settings: &Settings) -> Result<()> {
        conn.execute(
            "INSERT INTO settings (id, theme, notifications_enabled, reminder_time, sync_data, last_sync_date)
             VALUES (1, ?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                theme = ?1, notifications_enabled = ?2, reminder_time = ?3,
                sync_data = ?4, last_sync_date = ?5",
            params![
                settings.theme.as_str(),
                settings.notifications_enabled as i32,
                settings.reminder_time,
                settings.sync_data as i32,
                settings.last_sync_date.map(format_timestamp),
            ],
        )?;
        Ok(())
    }
}

// ─── Reset ───────────────────────────────────────────────────────────────────

/// Wipe habits and completions and restart both id sequences at 1.
pub fn clear_all(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "DELETE FROM completions;
         DELETE FROM habits;
         DELETE FROM sqlite_sequence WHERE name IN ('habits', 'completions');",
    )?;
    Ok(())
}
