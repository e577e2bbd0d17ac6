//! Persistence layer for `demand_tracker`.
//!
//! Every backend implements [`RecordStore`]: load the whole record set,
//! save the whole record set, and persist one repository mutation. Stores
//! assume a single writer; callers serialize access.
//!
//! # Submodules
//!
//! - [`memory`] - Process-local snapshot, nothing survives a restart
//! - [`csv`] - Directory of CSV files
//! - [`json`] - Single JSON document
//! - [`schema`] - `SQLite` schema definitions
//! - [`sqlite`] - `SQLite` database with row-level writes

pub mod csv;
pub mod json;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use self::csv::CsvStore;
pub use self::json::JsonStore;
pub use self::memory::MemoryStore;
pub use self::sqlite::SqliteStore;

use crate::error::{DemandError, Result};
use crate::model::{Client, Demand, Records, TeamMember};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Available storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Memory,
    Csv,
    Json,
    Sqlite,
}

impl Backend {
    pub const ALL: [Self; 4] = [Self::Memory, Self::Csv, Self::Json, Self::Sqlite];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }

    /// Default data location relative to the `.demands` directory.
    /// `None` means the directory itself (CSV) or no location (memory).
    #[must_use]
    pub const fn default_file_name(self) -> Option<&'static str> {
        match self {
            Self::Memory | Self::Csv => None,
            Self::Json => Some("demands.json"),
            Self::Sqlite => Some("demands.db"),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = DemandError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "sqlite" | "sqlite3" | "db" => Ok(Self::Sqlite),
            other => Err(DemandError::Config(format!(
                "unknown backend '{other}' (expected memory, csv, json or sqlite)"
            ))),
        }
    }
}

/// A single repository mutation, handed to the store after validation.
#[derive(Debug, Clone, Copy)]
pub enum Change<'a> {
    InsertDemand(&'a Demand),
    UpdateDemand(&'a Demand),
    DeleteDemand(i64),
    InsertClient(&'a Client),
    InsertTeamMember(&'a TeamMember),
}

impl Change<'_> {
    #[must_use]
    pub const fn op_name(&self) -> &'static str {
        match self {
            Self::InsertDemand(_) => "insert_demand",
            Self::UpdateDemand(_) => "update_demand",
            Self::DeleteDemand(_) => "delete_demand",
            Self::InsertClient(_) => "insert_client",
            Self::InsertTeamMember(_) => "insert_team_member",
        }
    }
}

/// Durable backend behind the repository.
pub trait RecordStore: fmt::Debug {
    fn backend(&self) -> Backend;

    /// Human-readable location (path or `:memory:`).
    fn location(&self) -> String;

    /// Read the full record set. A location that does not exist yet yields
    /// empty records.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing data cannot be read or parsed.
    fn load(&self) -> Result<Records>;

    /// Replace the persisted record set with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails; the previous data is left intact.
    fn save(&mut self, records: &Records) -> Result<()>;

    /// Persist one mutation. `after` is the full record set with the change
    /// applied. Whole-snapshot backends just save it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn apply(&mut self, change: &Change<'_>, after: &Records) -> Result<()> {
        tracing::trace!(op = change.op_name(), backend = %self.backend(), "Saving snapshot");
        self.save(after)
    }
}

/// Write a file atomically: write a `.tmp` sibling, fsync it, then rename
/// it over `path`. The temp file is removed if writing fails.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or any write fails.
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file_name = path
        .file_name()
        .ok_or_else(|| DemandError::Config(format!("Invalid output path: {}", path.display())))?;
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = parent.join(temp_name);

    let result = (|| -> Result<()> {
        let mut writer = BufWriter::new(File::create(&temp_path)?);
        write(&mut writer)?;
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| DemandError::Io(e.into_error()))?
            .sync_all()?;
        Ok(())
    })();

    if let Err(err) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn backend_parses_aliases() {
        assert_eq!("SQLite".parse::<Backend>().unwrap(), Backend::Sqlite);
        assert_eq!("mem".parse::<Backend>().unwrap(), Backend::Memory);
        for backend in Backend::ALL {
            assert_eq!(backend.as_str().parse::<Backend>().unwrap(), backend);
        }
        assert!(matches!(
            "postgres".parse::<Backend>(),
            Err(DemandError::Config(_))
        ));
    }

    #[test]
    fn write_atomic_replaces_target_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.txt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "old").unwrap();

        write_atomic(&path, |w| {
            w.write_all(b"new")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!path.with_file_name("out.txt.tmp").exists());
    }

    #[test]
    fn write_atomic_failure_keeps_old_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old").unwrap();

        let result = write_atomic(&path, |w| {
            w.write_all(b"partial")?;
            Err(DemandError::validation("test", "boom"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert!(!dir.path().join("out.txt.tmp").exists());
    }
}
