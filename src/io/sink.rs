//! Where rendered units go.
//!
//! [`FsSink`] writes files; [`MemorySink`] keeps them in memory for tests and
//! dry runs.

use crate::errors::{FsOp, Result, SplitError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Receives rendered compilation units.
///
/// Implementations must be thread-safe: units are written from a worker pool.
pub trait UnitSink: Send + Sync {
    /// Store `content` at `path`, replacing anything already there.
    fn write_unit(&self, path: &Path, content: &str) -> Result<()>;
}

/// Writes units to the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSink;

impl FsSink {
    pub fn new() -> Self {
        Self
    }
}

impl UnitSink for FsSink {
    fn write_unit(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).map_err(|e| SplitError::filesystem(FsOp::Write, path, e))
    }
}

/// Collects units in memory, keyed by path.
#[derive(Debug, Default)]
pub struct MemorySink {
    units: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, sorted by path.
    pub fn units(&self) -> BTreeMap<PathBuf, String> {
        match self.units.lock() {
            Ok(units) => units.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.units().remove(path)
    }
}

impl UnitSink for MemorySink {
    fn write_unit(&self, path: &Path, content: &str) -> Result<()> {
        let mut units = match self.units.lock() {
            Ok(units) => units,
            Err(poisoned) => poisoned.into_inner(),
        };
        units.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}
