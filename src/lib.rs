// Export modules for library usage
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod emit;
pub mod errors;
pub mod extraction;
pub mod format;
pub mod io;
pub mod observability;
pub mod partition;

// Re-export commonly used types
pub use crate::core::{
    Bucket, DeclKind, DeclNode, Declaration, Extracted, ImportSpec, ImportTable, Origin,
    COMMON_BUCKET,
};

pub use crate::classify::{classify, visitation_order, Claim};

pub use crate::config::{Formatter, PartialConfig, SplitConfig};

pub use crate::emit::{build_units, emit_units, CompilationUnit};

pub use crate::errors::{Result, SplitError};

pub use crate::extraction::{extract_sources, ExtractedFile, GoExtractor, SourceFile};

pub use crate::partition::{partition, Partition, PartitionStats, Partitioner};
