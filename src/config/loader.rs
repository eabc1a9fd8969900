use std::fs;
use std::path::{Path, PathBuf};

use super::core::PartialConfig;
use crate::errors::{Result, SplitError};

pub const CONFIG_FILE_NAME: &str = ".declsplit.toml";

/// Parse config file contents.
pub fn parse_config(contents: &str) -> std::result::Result<PartialConfig, String> {
    toml::from_str::<PartialConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
}

/// Load an explicitly requested config file. Any failure is an error.
pub fn load_config_from(path: &Path) -> Result<PartialConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        SplitError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config = parse_config(&contents)
        .map_err(|e| SplitError::config(format!("{} ({})", e, path.display())))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try a discovered config path; unreadable or invalid files fall back to
/// defaults with a warning.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<PartialConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// A missing file is not worth reporting.
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        tracing::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` and its ancestors, at most `max_depth` directories.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find and load the nearest `.declsplit.toml` above `start`.
pub fn discover_config(start: PathBuf) -> PartialConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using defaults.",
                MAX_TRAVERSAL_DEPTH
            );
            PartialConfig::default()
        })
}

/// Load the config file layer: the explicit path if given, otherwise the
/// nearest discovered file from the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<PartialConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }
    match std::env::current_dir() {
        Ok(dir) => Ok(discover_config(dir)),
        Err(e) => {
            tracing::warn!("Failed to get current directory: {}. Using defaults.", e);
            Ok(PartialConfig::default())
        }
    }
}
