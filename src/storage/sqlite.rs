//! `SQLite` storage implementation.

use super::{Backend, Change, RecordStore};
use crate::error::{DemandError, Result};
use crate::model::{Client, Demand, Priority, Records, Status, TeamMember};
use crate::storage::schema::apply_schema;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Transaction};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// SQLite-based storage backend.
///
/// Rows come back in store order, kept in a `position` column: `save`
/// numbers rows in slice order and inserts append after the last row.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema application fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        apply_schema(&conn)?;
        debug!(path = %path.display(), "Opened SQLite store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// Run `f` inside an immediate transaction. Nothing is committed if it fails.
    ///
    /// # Errors
    ///
    /// Returns the first error from `f` or from the commit.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        let result = f(&tx)?;
        tx.commit()?;
        trace!(op, "Committed transaction");
        Ok(result)
    }

    /// Count rows in the demands table.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_demands(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT count(*) FROM demands", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn load_demands(&self) -> Result<Vec<Demand>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, team_member, client, description, priority, status, created_at
             FROM demands ORDER BY position, id",
        )?;
        let demands = stmt
            .query_map([], demand_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(demands)
    }

    fn load_names(&self, table: &str) -> Result<Vec<(i64, String)>> {
        let sql = format!("SELECT id, name FROM {table} ORDER BY position, id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl RecordStore for SqliteStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    fn location(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string())
    }

    fn load(&self) -> Result<Records> {
        let records = Records {
            demands: self.load_demands()?,
            clients: self
                .load_names("clients")?
                .into_iter()
                .map(|(id, name)| Client { id, name })
                .collect(),
            team_members: self
                .load_names("team_members")?
                .into_iter()
                .map(|(id, name)| TeamMember { id, name })
                .collect(),
        };
        debug!(demands = records.demands.len(), "Loaded SQLite store");
        Ok(records)
    }

    fn save(&mut self, records: &Records) -> Result<()> {
        self.mutate("save", |tx| {
            tx.execute("DELETE FROM demands", [])?;
            tx.execute("DELETE FROM clients", [])?;
            tx.execute("DELETE FROM team_members", [])?;
            for (position, demand) in (1..).zip(&records.demands) {
                insert_demand(tx, demand, position)?;
            }
            for (position, client) in (1..).zip(&records.clients) {
                insert_name(tx, "clients", "Client", (client.id, &client.name), position)?;
            }
            for (position, member) in (1..).zip(&records.team_members) {
                let row = (member.id, member.name.as_str());
                insert_name(tx, "team_members", "Team member", row, position)?;
            }
            Ok(())
        })?;
        debug!(demands = records.demands.len(), "Saved SQLite store");
        Ok(())
    }

    fn apply(&mut self, change: &Change<'_>, _after: &Records) -> Result<()> {
        let change = *change;
        self.mutate(change.op_name(), |tx| match change {
            Change::InsertDemand(demand) => {
                insert_demand(tx, demand, next_position(tx, "demands")?)
            }
            Change::UpdateDemand(demand) => {
                let rows = tx.execute(
                    "UPDATE demands
                     SET team_member = ?, client = ?, description = ?, priority = ?, status = ?
                     WHERE id = ?",
                    rusqlite::params![
                        demand.team_member,
                        demand.client,
                        demand.description,
                        demand.priority.as_str(),
                        demand.status.as_str(),
                        demand.id,
                    ],
                )?;
                if rows == 0 {
                    return Err(DemandError::DemandNotFound { id: demand.id });
                }
                Ok(())
            }
            Change::DeleteDemand(id) => {
                let rows = tx.execute("DELETE FROM demands WHERE id = ?", [id])?;
                if rows == 0 {
                    return Err(DemandError::DemandNotFound { id });
                }
                Ok(())
            }
            Change::InsertClient(client) => {
                let position = next_position(tx, "clients")?;
                insert_name(tx, "clients", "Client", (client.id, &client.name), position)
            }
            Change::InsertTeamMember(member) => {
                let position = next_position(tx, "team_members")?;
                let row = (member.id, member.name.as_str());
                insert_name(tx, "team_members", "Team member", row, position)
            }
        })
    }
}

/// Position just after the last row, so appended rows load last.
fn next_position(tx: &Transaction<'_>, table: &str) -> Result<i64> {
    let sql = format!("SELECT coalesce(max(position), 0) + 1 FROM {table}");
    Ok(tx.query_row(&sql, [], |row| row.get(0))?)
}

fn insert_demand(tx: &Transaction<'_>, demand: &Demand, position: i64) -> Result<()> {
    tx.execute(
        "INSERT INTO demands
             (id, team_member, client, description, priority, status, created_at, position)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            demand.id,
            demand.team_member,
            demand.client,
            demand.description,
            demand.priority.as_str(),
            demand.status.as_str(),
            demand.created_at.map(|t| t.to_rfc3339()),
            position,
        ],
    )?;
    Ok(())
}

fn insert_name(
    tx: &Transaction<'_>,
    table: &str,
    entity: &'static str,
    (id, name): (i64, &str),
    position: i64,
) -> Result<()> {
    let sql = format!("INSERT INTO {table} (id, name, position) VALUES (?, ?, ?)");
    tx.execute(&sql, rusqlite::params![id, name, position])
        .map_err(|err| {
            if is_unique_violation(&err) {
                DemandError::Duplicate {
                    entity,
                    name: name.to_string(),
                }
            } else {
                DemandError::Database(err)
            }
        })?;
    Ok(())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => matches!(
            e.extended_code,
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        ),
        _ => false,
    }
}

fn demand_from_row(row: &rusqlite::Row) -> rusqlite::Result<Demand> {
    let priority: String = row.get(4)?;
    let status: String = row.get(5)?;
    let created_at: Option<String> = row.get(6)?;
    Ok(Demand {
        id: row.get(0)?,
        team_member: row.get(1)?,
        client: row.get(2)?,
        description: row.get(3)?,
        priority: priority
            .parse::<Priority>()
            .map_err(|e| conversion_error(4, e))?,
        status: status.parse::<Status>().map_err(|e| conversion_error(5, e))?,
        created_at: created_at
            .as_deref()
            .map(DateTime::parse_from_rfc3339)
            .transpose()
            .map_err(|e| conversion_error(6, e))?
            .map(|t| t.with_timezone(&Utc)),
    })
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}
