use super::{Bucket, DataStore, DbStats};
use crate::error::{NestError, Result};
use chrono::{DateTime, Utc};

/// In-memory store for testing.
///
/// Updates run against a clone of the root, so a failing closure or a
/// simulated write error leaves the tree unchanged.
#[derive(Default)]
pub struct InMemoryStore {
    root: Bucket,
    modified: Option<DateTime<Utc>>,
    simulate_write_error: bool,
    read_only: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl DataStore for InMemoryStore {
    fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Bucket) -> Result<T>,
    {
        f(&self.root)
    }

    fn update<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Bucket) -> Result<T>,
    {
        if self.read_only {
            return Err(NestError::ReadOnly);
        }
        let mut root = self.root.clone();
        let out = f(&mut root)?;
        if self.simulate_write_error {
            return Err(NestError::Store("Simulated write error".to_string()));
        }
        self.root = root;
        self.modified = Some(Utc::now());
        Ok(out)
    }

    fn db_stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            path: "memory://".to_string(),
            file_size: serde_json::to_vec(&self.root)?.len() as u64,
            modified: self.modified,
            root: self.root.stats(),
        })
    }
}
