use crate::errors::{FsOp, Result, SplitError};
use std::fs;
use std::path::{Path, PathBuf};

/// Remove every regular file directly inside `dir`.
///
/// Entries are matched with the glob `dir/*`; directories are left alone. A
/// missing `dir` has nothing to flush.
pub fn flush_destination(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let pattern = format!("{}/*", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut removed = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            SplitError::filesystem(FsOp::List, path, e.into_error())
        })?;
        if !path.is_file() {
            continue;
        }
        fs::remove_file(&path).map_err(|e| SplitError::filesystem(FsOp::Remove, &path, e))?;
        tracing::debug!("Removed {}", path.display());
        removed.push(path);
    }

    Ok(removed)
}

/// Create `dir` and its parents if absent.
pub fn ensure_destination(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        fs::create_dir_all(dir).map_err(|e| SplitError::filesystem(FsOp::Create, dir, e))?;
        tracing::debug!("Created {}", dir.display());
    }
    Ok(())
}
