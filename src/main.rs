mod cli;
mod config;
mod db;
mod engine;
mod error;
mod models;
mod store;
mod tui;
mod utils;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::debug;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;
use engine::dates::parse_date;
use store::HabitStore;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // Config helpers never touch the database
    if let Some(Commands::Config { action }) = &cli.command {
        return handlers::handle_config(action);
    }

    let mut config = AppConfig::load().context("Loading config")?;
    if let Some(db) = &cli.db {
        config.storage.db_path = Some(db.clone());
    }

    let db_path = config.ensure_db_dir()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // Enable WAL mode for better concurrent access
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;
    debug!("database ready at {:?}", db_path);

    let store = HabitStore::new(conn, config.stats.window_days);

    let fixed_today = cli
        .today
        .as_deref()
        .map(parse_date)
        .transpose()
        .context("Parsing --today")?;
    let today = fixed_today.unwrap_or_else(|| Local::now().date_naive());
    let now = Local::now().naive_local();

    match cli.command {
        Some(Commands::Habit { action }) => {
            handlers::handle_habit(&store, &action, today, now)?;
        }
        Some(Commands::Mark { id, date, undo, done }) => {
            handlers::handle_mark(&store, id, date.as_deref(), undo, done, today)?;
        }
        Some(Commands::Completion { action }) => {
            handlers::handle_completion(&store, &action)?;
        }
        Some(Commands::Stats { json }) => {
            handlers::handle_stats(&store, json, today)?;
        }
        Some(Commands::Charts { month, json }) => {
            handlers::handle_charts(&store, month.as_deref(), json, today)?;
        }
        Some(Commands::Statistics { json }) => {
            handlers::handle_statistics(&store, json, today)?;
        }
        Some(Commands::Settings { action }) => {
            handlers::handle_settings(&store, &action, now)?;
        }
        Some(Commands::Export { output }) => {
            handlers::handle_export(&store, output.as_deref(), today)?;
        }
        Some(Commands::Reset { yes }) => {
            handlers::handle_reset(&store, yes)?;
        }
        Some(Commands::Config { .. }) => unreachable!(),

        // No subcommand → launch TUI
        None => {
            tui::app::run(&store, &config, fixed_today)?;
        }
    }

    Ok(())
}
