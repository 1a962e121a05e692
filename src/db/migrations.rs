use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS habits (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            frequency   TEXT NOT NULL DEFAULT 'daily'
                        CHECK(frequency IN ('daily','weekly','custom')),
            category    TEXT NOT NULL DEFAULT 'personal'
                        CHECK(category IN ('health','fitness','education','wellness','work','personal')),
            goal        TEXT,
            reminder    TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now','localtime'))
        );

        CREATE TABLE IF NOT EXISTS completions (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id   INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
            date       TEXT NOT NULL,
            completed  INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_completions_habit_date ON completions(habit_id, date);

        CREATE TABLE IF NOT EXISTS settings (
            id                     INTEGER PRIMARY KEY CHECK(id = 1),
            theme                  TEXT NOT NULL DEFAULT 'light'
                                   CHECK(theme IN ('light','dark','system')),
            notifications_enabled  INTEGER NOT NULL DEFAULT 0,
            reminder_time          TEXT NOT NULL DEFAULT '08:00',
            sync_data              INTEGER NOT NULL DEFAULT 1,
            last_sync_date         TEXT
        );
    ")?;

    seed_settings(conn)?;
    Ok(())
}

fn seed_settings(conn: &Connection) -> Result<()> {
    conn.execute("INSERT OR IGNORE INTO settings (id) VALUES (1)", [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent_and_seed_one_settings_row() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let res = conn.execute(
            "INSERT INTO completions (habit_id, date, completed) VALUES (42, '2024-01-01', 1)",
            [],
        );
        assert!(res.is_err());
    }
}
