use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "habittrack", version, author, about = "A terminal habit tracker with streaks and completion statistics")]
pub struct Cli {
    /// Database file (overrides storage.db_path in config.toml)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Treat this date (yyyy-MM-dd) as today
    #[arg(long, global = true)]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage habits
    Habit {
        #[command(subcommand)]
        action: HabitCommands,
    },
    /// Toggle a habit for today (or --date)
    Mark {
        /// Habit id
        id: i64,
        /// Day to mark (yyyy-MM-dd), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Record the day as not done instead of toggling
        #[arg(long, conflicts_with = "done")]
        undo: bool,
        /// Record the day as done instead of toggling
        #[arg(long)]
        done: bool,
    },
    /// Raw completion records
    Completion {
        #[command(subcommand)]
        action: CompletionCommands,
    },
    /// Current streak, 30-day completion rate, habit count
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Category breakdown and daily progress series
    Charts {
        /// Calendar month (yyyy-MM) instead of the trailing 30 days
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Per-habit statistics with streak and completion history
    Statistics {
        #[arg(long)]
        json: bool,
    },
    /// App settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
    /// Write all habits and settings as JSON
    Export {
        /// Output file; defaults to habittrack-export-<date>.json, `-` for stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Delete every habit and completion and restore default settings
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Config file helpers
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Args, Debug, Default)]
pub struct HabitFields {
    /// daily, weekly or custom
    #[arg(long)]
    pub frequency: Option<String>,
    /// health, fitness, education, wellness, work or personal
    #[arg(long)]
    pub category: Option<String>,
    /// Free-form goal text (empty to clear)
    #[arg(long)]
    pub goal: Option<String>,
    /// Reminder time HH:MM (empty to clear)
    #[arg(long)]
    pub reminder: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum HabitCommands {
    /// List habits with today's state and streak
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one habit with its completions
    Show {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Add a habit
    Add {
        name: String,
        #[command(flatten)]
        fields: HabitFields,
    },
    /// Edit a habit
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: HabitFields,
    },
    /// Delete a habit and its completions
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum CompletionCommands {
    /// Append a completion record
    Add {
        /// Habit id
        habit_id: i64,
        /// Day (yyyy-MM-dd)
        date: String,
        /// Mark the record as completed
        #[arg(long)]
        done: bool,
    },
    /// Change a record's completed flag
    Set {
        /// Completion id
        id: i64,
        #[arg(long, conflicts_with = "not_done", required_unless_present = "not_done")]
        done: bool,
        #[arg(long)]
        not_done: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Print current settings
    Show,
    /// Update settings
    Set {
        /// light, dark or system
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        notifications: Option<bool>,
        /// Default reminder time HH:MM
        #[arg(long)]
        reminder_time: Option<String>,
        #[arg(long)]
        sync: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the config file location
    Path,
    /// Write a config.toml with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["habittrack", "stats", "--json", "--today", "2024-05-10"])
            .unwrap();
        assert_eq!(cli.today.as_deref(), Some("2024-05-10"));
        assert!(matches!(cli.command, Some(Commands::Stats { json: true })));
    }

    #[test]
    fn completion_set_needs_a_state() {
        assert!(Cli::try_parse_from(["habittrack", "completion", "set", "3"]).is_err());
        assert!(Cli::try_parse_from(["habittrack", "completion", "set", "3", "--not-done"]).is_ok());
    }
}
