//! Database schema definitions.

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Tables whose rows carry a `position` column holding store order.
pub const ORDERED_TABLES: [&str; 3] = ["demands", "clients", "team_members"];

/// The complete SQL schema for the demands database.
///
/// `demands` references clients and team members by name; the tables have
/// no foreign keys.
pub const SCHEMA_SQL: &str = r"
    CREATE TABLE IF NOT EXISTS demands (
        id INTEGER PRIMARY KEY,
        team_member TEXT NOT NULL DEFAULT '',
        client TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        priority TEXT NOT NULL DEFAULT 'Medium'
            CHECK(priority IN ('Low', 'Medium', 'High')),
        status TEXT NOT NULL DEFAULT 'Not Started'
            CHECK(status IN ('Not Started', 'In Progress', 'Completed')),
        created_at TEXT,
        position INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS clients (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        position INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS team_members (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        position INTEGER NOT NULL DEFAULT 0
    );
";

/// Apply the schema to the database.
///
/// Idempotent: every statement uses `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    add_position_columns(conn)?;

    // Journal mode is reported back as a row; `memory` for in-memory databases.
    let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;

    Ok(())
}

/// Version 1 databases ordered rows by id; seed `position` from it.
fn add_position_columns(conn: &Connection) -> Result<()> {
    for table in ORDERED_TABLES {
        if !has_column(conn, table, "position")? {
            conn.execute_batch(&format!(
                "ALTER TABLE {table} ADD COLUMN position INTEGER NOT NULL DEFAULT 0;
                 UPDATE {table} SET position = id;"
            ))?;
        }
    }
    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM pragma_table_info(?1) WHERE name = ?2",
        [table, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Read the stamped schema version.
///
/// # Errors
///
/// Returns an error if the pragma cannot be read.
pub fn schema_version(conn: &Connection) -> Result<i32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}
