use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::cli::args::{CompletionCommands, ConfigCommands, HabitCommands, HabitFields, SettingsCommands};
use crate::config::AppConfig;
use crate::engine::dates::{format_date, parse_date, parse_month, DayRange};
use crate::models::{
    Category, Frequency, HabitPatch, HabitWithStats, NewCompletion, NewHabit, SettingsPatch,
    Theme,
};
use crate::store::HabitStore;
use crate::utils::format::{fit_width, format_streak, rate_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const TEAL: &str = "\x1b[38;2;72;166;152m";

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn day_icon(habit: &HabitWithStats, day: NaiveDate) -> String {
    match habit.completions.iter().find(|c| c.date == day) {
        Some(c) if c.completed => format!("{}●\x1b[0m", GREEN),
        Some(_) => format!("{}✗\x1b[0m", RED),
        None => format!("{}○\x1b[0m", DIM),
    }
}

// ─── Habits ──────────────────────────────────────────────────────────────────

fn parse_frequency(s: Option<&str>) -> Result<Option<Frequency>> {
    s.map(Frequency::from_str).transpose()
}

fn parse_category(s: Option<&str>) -> Result<Option<Category>> {
    s.map(Category::from_str).transpose()
}

/// An empty string clears the field.
fn clearable(value: &Option<String>) -> Option<Option<String>> {
    value.as_ref().map(|v| {
        let v = v.trim();
        if v.is_empty() { None } else { Some(v.to_string()) }
    })
}

pub fn handle_habit(
    store: &HabitStore,
    action: &HabitCommands,
    today: NaiveDate,
    now: NaiveDateTime,
) -> Result<()> {
    match action {
        HabitCommands::List { json } => {
            let habits = store.get_habits(today)?;
            if *json {
                return print_json(&habits);
            }
            println!();
            if habits.is_empty() {
                println_colored!(DIM, "  No habits yet. Add one with `habittrack habit add <name>`");
                println!();
                return Ok(());
            }
            println_colored!(TEAL, "  Habits — {}", format_date(today));
            println!();
            for h in &habits {
                println!(
                    "  {:>3}  {}  {}  {:<9}  {}",
                    h.habit.id,
                    day_icon(h, today),
                    fit_width(&h.habit.name, 24),
                    h.habit.category.as_str(),
                    format_streak(h.streak),
                );
            }
            println!();
        }
        HabitCommands::Show { id, json } => {
            let habit = store
                .get_habit(*id, today)?
                .ok_or_else(|| anyhow!("Habit {} not found", id))?;
            if *json {
                return print_json(&habit);
            }
            print_habit(&habit, today);
        }
        HabitCommands::Add { name, fields } => {
            let new = NewHabit {
                name: name.clone(),
                frequency: parse_frequency(fields.frequency.as_deref())?.unwrap_or_default(),
                category: parse_category(fields.category.as_deref())?.unwrap_or_default(),
                goal: fields.goal.clone(),
                reminder: fields.reminder.clone(),
            };
            let created = store.create_habit(new, now)?;
            println_colored!(
                GREEN,
                "  ✓ Added habit {} — {} ({})",
                created.habit.id,
                created.habit.name,
                created.habit.category
            );
        }
        HabitCommands::Edit { id, name, fields } => {
            let patch = habit_patch(name.clone(), fields)?;
            if patch.is_empty() {
                bail!("Nothing to change. Pass --name, --frequency, --category, --goal or --reminder");
            }
            let updated = store
                .update_habit(*id, &patch, today)?
                .ok_or_else(|| anyhow!("Habit {} not found", id))?;
            println_colored!(GREEN, "  ✓ Updated habit {} — {}", updated.habit.id, updated.habit.name);
        }
        HabitCommands::Delete { id } => {
            if !store.delete_habit(*id)? {
                bail!("Habit {} not found", id);
            }
            println_colored!(AMBER, "  Deleted habit {} and its completions", id);
        }
    }
    Ok(())
}

fn habit_patch(name: Option<String>, fields: &HabitFields) -> Result<HabitPatch> {
    Ok(HabitPatch {
        name,
        frequency: parse_frequency(fields.frequency.as_deref())?,
        category: parse_category(fields.category.as_deref())?,
        goal: clearable(&fields.goal),
        reminder: clearable(&fields.reminder),
    })
}

fn print_habit(h: &HabitWithStats, today: NaiveDate) {
    println!();
    println_colored!(BOLD, "  {}  ({})", h.habit.name, h.habit.id);
    println!();
    println!("  Category:   {}", h.habit.category.display_name());
    println!("  Frequency:  {}", h.habit.frequency);
    if let Some(goal) = &h.habit.goal {
        println!("  Goal:       {}", goal);
    }
    if let Some(reminder) = &h.habit.reminder {
        println!("  Reminder:   {}", reminder);
    }
    println!("  Created:    {}", h.habit.created_at.format("%Y-%m-%d %H:%M"));
    println_colored!(GREEN, "  Streak:     {}", format_streak(h.streak));
    println!();

    print!("  Last 7 days  ");
    for day in crate::engine::dates::trailing_days(today, 7) {
        print!("{} ", day_icon(h, day));
    }
    println!();
    println!();
}

// ─── Completions ─────────────────────────────────────────────────────────────

fn resolve_date(date: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match date {
        Some(s) => parse_date(s),
        None => Ok(today),
    }
}

pub fn handle_mark(
    store: &HabitStore,
    id: i64,
    date: Option<&str>,
    undo: bool,
    done: bool,
    today: NaiveDate,
) -> Result<()> {
    let day = resolve_date(date, today)?;
    let habit = store
        .get_habit(id, today)?
        .ok_or_else(|| anyhow!("Habit {} not found", id))?;

    let record = if undo || done {
        store.set_completion(id, day, done, today)?
    } else {
        store.toggle_completion(id, day, today)?
    };

    if record.completed {
        println_colored!(GREEN, "  ✓ {} — done for {}", habit.habit.name, format_date(day));
    } else {
        println_colored!(DIM, "  ○ {} — not done for {}", habit.habit.name, format_date(day));
    }
    Ok(())
}

pub fn handle_completion(store: &HabitStore, action: &CompletionCommands) -> Result<()> {
    match action {
        CompletionCommands::Add { habit_id, date, done } => {
            let record = store.create_completion(&NewCompletion {
                habit_id: *habit_id,
                date: parse_date(date)?,
                completed: *done,
            })?;
            print_json(&record)?;
        }
        CompletionCommands::Set { id, done, .. } => {
            let record = store
                .update_completion(*id, *done)?
                .ok_or_else(|| anyhow!("Completion {} not found", id))?;
            print_json(&record)?;
        }
    }
    Ok(())
}

// ─── Reports ─────────────────────────────────────────────────────────────────

pub fn handle_stats(store: &HabitStore, json: bool, today: NaiveDate) -> Result<()> {
    let stats = store.stats(today)?;
    if json {
        return print_json(&stats);
    }

    println!();
    println_colored!(TEAL, "  Statistics");
    println!();
    println_colored!(
        BOLD,
        "  Streak:      {} current  |  {} best",
        format_streak(stats.current_streak),
        format_streak(stats.best_streak)
    );
    println!(
        "  Completion:  {:>3}%  {}  (last {} days)",
        stats.completion_rate,
        rate_bar(stats.completion_rate, 20),
        store.window_days()
    );
    println!("  Habits:      {}", stats.total_habits);
    println!();
    Ok(())
}

pub fn handle_charts(
    store: &HabitStore,
    month: Option<&str>,
    json: bool,
    today: NaiveDate,
) -> Result<()> {
    let range = match month {
        Some(m) => {
            let (year, month) = parse_month(m)?;
            DayRange::Month { year, month }
        }
        None => DayRange::default(),
    };
    let charts = store.charts(today, range)?;
    if json {
        return print_json(&charts);
    }

    println!();
    println_colored!(TEAL, "  Categories");
    println!();
    if charts.category_completions.is_empty() {
        println_colored!(DIM, "  No habits yet");
    }
    for c in &charts.category_completions {
        println!(
            "  {:<10} {:>3}%  {}  {} habit{}",
            c.category.display_name(),
            c.completion_rate,
            rate_bar(c.completion_rate, 20),
            c.count,
            if c.count == 1 { "" } else { "s" }
        );
    }
    println!();
    println_colored!(TEAL, "  Daily progress");
    println!();
    for p in &charts.monthly_progress {
        println!(
            "  {}  {}  {:>3}%",
            format_date(p.date),
            rate_bar(p.completion_rate, 20),
            p.completion_rate
        );
    }
    println!();
    println_colored!(BOLD, "  Overall: {}%", charts.overall_completion_rate);
    println!();
    Ok(())
}

pub fn handle_statistics(store: &HabitStore, json: bool, today: NaiveDate) -> Result<()> {
    let report = store.statistics(today)?;
    if json {
        return print_json(&report);
    }

    println!();
    println_colored!(TEAL, "  Habits");
    println!();
    for h in &report.habits {
        println!(
            "  {:>3}  {}  {:<9}  {:<7}  {:>3}%  {}",
            h.id,
            fit_width(&h.name, 24),
            h.category.as_str(),
            h.frequency.as_str(),
            h.completion_rate,
            format_streak(h.streak)
        );
    }
    println!();
    println_colored!(TEAL, "  Streak history");
    println!();
    print!("  ");
    for p in &report.streak_history {
        let icon = match p.streak {
            0 => format!("{}·\x1b[0m", DIM),
            1..=2 => format!("{}◑\x1b[0m", AMBER),
            _ => format!("{}●\x1b[0m", GREEN),
        };
        print!("{}", icon);
    }
    println!();
    println!();
    Ok(())
}

// ─── Settings ────────────────────────────────────────────────────────────────

pub fn handle_settings(
    store: &HabitStore,
    action: &SettingsCommands,
    now: NaiveDateTime,
) -> Result<()> {
    match action {
        SettingsCommands::Show => print_json(&store.settings()?),
        SettingsCommands::Set {
            theme,
            notifications,
            reminder_time,
            sync,
        } => {
            let patch = SettingsPatch {
                theme: theme.as_deref().map(Theme::from_str).transpose()?,
                notifications_enabled: *notifications,
                reminder_time: reminder_time.clone(),
                sync_data: *sync,
            };
            let updated = store.update_settings(&patch, now)?;
            print_json(&updated)
        }
    }
}

// ─── Export / reset ──────────────────────────────────────────────────────────

pub fn export_file_name(today: NaiveDate) -> String {
    format!("habittrack-export-{}.json", format_date(today))
}

pub fn handle_export(store: &HabitStore, output: Option<&Path>, today: NaiveDate) -> Result<()> {
    let bundle = store.export(today)?;
    let body = serde_json::to_string_pretty(&bundle)?;

    let path = match output {
        Some(p) if p == Path::new("-") => {
            println!("{}", body);
            return Ok(());
        }
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(export_file_name(today)),
    };
    std::fs::write(&path, body).with_context(|| format!("Writing {:?}", path))?;
    println_colored!(
        GREEN,
        "  ✓ Exported {} habits to {}",
        bundle.habits.len(),
        path.display()
    );
    Ok(())
}

pub fn handle_reset(store: &HabitStore, yes: bool) -> Result<()> {
    if !yes {
        bail!("This deletes every habit and completion. Re-run with --yes to confirm");
    }
    store.reset()?;
    println_colored!(AMBER, "  All habits, completions and settings were reset");
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(action: &ConfigCommands) -> Result<()> {
    let path = AppConfig::config_path()?;
    match action {
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                bail!("{:?} already exists. Use --force to overwrite", path);
            }
            AppConfig::default().save()?;
            debug!("wrote default config to {:?}", path);
            println_colored!(GREEN, "  ✓ Wrote {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_name_uses_the_date() {
        let day = parse_date("2024-05-10").unwrap();
        assert_eq!(export_file_name(day), "habittrack-export-2024-05-10.json");
    }

    #[test]
    fn empty_flag_clears_optional_fields() {
        let fields = HabitFields {
            goal: Some("  ".to_string()),
            reminder: Some("07:00".to_string()),
            category: Some("Work".to_string()),
            ..Default::default()
        };
        let patch = habit_patch(None, &fields).unwrap();
        assert_eq!(patch.goal, Some(None));
        assert_eq!(patch.reminder, Some(Some("07:00".to_string())));
        assert_eq!(patch.category, Some(Category::Work));
        assert_eq!(patch.frequency, None);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let fields = HabitFields {
            category: Some("hobby".to_string()),
            ..Default::default()
        };
        assert!(habit_patch(None, &fields).is_err());
    }

    #[test]
    fn export_writes_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = HabitStore::in_memory(30).unwrap();
        let today = parse_date("2024-05-10").unwrap();
        store
            .create_habit(
                NewHabit {
                    name: "Run".to_string(),
                    ..Default::default()
                },
                today.and_hms_opt(8, 0, 0).unwrap(),
            )
            .unwrap();

        let path = dir.path().join("out.json");
        handle_export(&store, Some(&path), today).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["habits"][0]["name"], "Run");
        assert_eq!(value["settings"]["theme"], "light");
    }

    #[test]
    fn reset_requires_confirmation() {
        let store = HabitStore::in_memory(30).unwrap();
        assert!(handle_reset(&store, false).is_err());
        assert!(handle_reset(&store, true).is_ok());
    }
}
