//! Ingestion of Go source files into declaration records.
//!
//! Each file is parsed with tree-sitter once; files are parsed in parallel
//! with one parser per rayon worker. Output keeps the input file order so
//! downstream classification stays deterministic.
//!
//! # Usage
//!
//! ```rust,ignore
//! use declsplit::extraction::GoExtractor;
//! use std::path::Path;
//!
//! let mut extractor = GoExtractor::new()?;
//! let file = extractor.extract(Path::new("pb/widget.pb.go"), &content)?;
//! println!("package {} has {} declarations", file.package, file.declaration_count());
//! ```

pub mod go;

pub use go::{ExtractedFile, GoExtractor};

use crate::errors::{FsOp, Result, SplitError};
use crate::observability::set_current_file;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Contents of one source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SplitError::filesystem(FsOp::Read, path, e))?;
        Ok(Self::new(path, content))
    }
}

/// Read every path, in order.
pub fn read_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    paths.iter().map(|p| SourceFile::read(p)).collect()
}

/// Extract declarations from every source, preserving input order.
///
/// The first malformed declaration or parse failure aborts the whole batch.
pub fn extract_sources(sources: &[SourceFile]) -> Result<Vec<ExtractedFile>> {
    // Surface grammar problems once, before spawning workers.
    GoExtractor::new()?;

    sources
        .par_iter()
        .map_init(
            || GoExtractor::new().ok(),
            |extractor, source| {
                let extractor = extractor.as_mut().ok_or_else(|| {
                    SplitError::Language("grammar unavailable on worker thread".to_string())
                })?;
                let _file = set_current_file(&source.path);
                extractor.extract(&source.path, &source.content)
            },
        )
        .collect()
}
