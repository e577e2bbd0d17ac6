//! JSON document store: `{ "demands": [...], "clients": [...], "team_members": [...] }`.

use super::{Backend, RecordStore, write_atomic};
use crate::error::{DemandError, Result};
use crate::model::Records;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonStore {
    fn backend(&self) -> Backend {
        Backend::Json
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Records> {
        if !self.path.exists() {
            return Ok(Records::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Records::default());
        }
        let records: Records =
            serde_json::from_str(&contents).map_err(|e| DemandError::Corrupt {
                path: self.path.clone(),
                line: e.line(),
                reason: e.to_string(),
            })?;
        debug!(path = %self.path.display(), demands = records.demands.len(), "Loaded JSON store");
        Ok(records)
    }

    fn save(&mut self, records: &Records) -> Result<()> {
        write_atomic(&self.path, |w| {
            serde_json::to_writer_pretty(&mut *w, records)?;
            writeln!(w)?;
            Ok(())
        })?;
        debug!(path = %self.path.display(), demands = records.demands.len(), "Saved JSON store");
        Ok(())
    }
}
