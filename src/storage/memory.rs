//! In-memory store. Holds a snapshot for the lifetime of the process.

use super::{Backend, RecordStore};
use crate::error::Result;
use crate::model::Records;

#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Records,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing record set.
    #[must_use]
    pub const fn with_records(records: Records) -> Self {
        Self { snapshot: records }
    }
}

impl RecordStore for MemoryStore {
    fn backend(&self) -> Backend {
        Backend::Memory
    }

    fn location(&self) -> String {
        ":memory:".to_string()
    }

    fn load(&self) -> Result<Records> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, records: &Records) -> Result<()> {
        self.snapshot.clone_from(records);
        Ok(())
    }
}
