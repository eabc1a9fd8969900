//! Run configuration.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! the nearest `.declsplit.toml` (or `--config PATH`), and command-line
//! flags. Layers are [`PartialConfig`] values merged field by field and then
//! resolved into a [`SplitConfig`].

mod core;
mod loader;
pub mod validation;

pub use self::core::{
    build_constraint_suffix, Formatter, PartialConfig, SplitConfig, DEFAULT_DESTINATION,
    DEFAULT_EXTENSION, DEFAULT_MAX_CONCURRENCY, DEFAULT_PACKAGE, DEFAULT_SOURCE_DIR,
};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from, parse_config,
    CONFIG_FILE_NAME,
};
pub use validation::{is_go_identifier, validate_config};

use crate::errors::Result;
use std::path::Path;

/// Load the file layer, overlay `overrides`, resolve and validate.
pub fn build_config(explicit: Option<&Path>, overrides: PartialConfig) -> Result<SplitConfig> {
    let config = load_config(explicit)?.merge(overrides).resolve();
    validate_config(&config)?;
    Ok(config)
}
