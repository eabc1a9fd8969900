//! Error types for declsplit operations.
//!
//! Every failure is fatal to the run: nothing is retried and nothing is
//! downgraded to a warning once a source file has been accepted for
//! extraction. The variants below categorize what went wrong so the binary
//! can print a useful diagnostic before exiting non-zero.
//!
//! # Example
//!
//! ```rust
//! use declsplit::errors::SplitError;
//!
//! let err = SplitError::malformed("pb/widget.pb.go", 12, "var", "empty declaration group");
//! assert!(err.is_user_fixable());
//! assert!(err.to_string().contains("pb/widget.pb.go:12"));
//! ```

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, SplitError>;

/// Filesystem operation that failed, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    Read,
    List,
    Remove,
    Create,
    Write,
}

impl std::fmt::Display for FsOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::List => write!(f, "list"),
            Self::Remove => write!(f, "remove"),
            Self::Create => write!(f, "create"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Main error type for declsplit operations
#[derive(Debug, Error)]
pub enum SplitError {
    /// A declaration shape no extraction rule recognizes
    #[error("malformed {kind} declaration at {}:{line}: {detail}", .path.display())]
    MalformedDeclaration {
        path: PathBuf,
        line: usize,
        kind: String,
        detail: String,
    },

    /// The source file does not parse cleanly
    #[error("parse error in {}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Failure to list, remove, create or write destination entries
    #[error("failed to {op} {}: {source}", .path.display())]
    Filesystem {
        op: FsOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid configuration value or unreadable config file
    #[error("configuration error: {0}")]
    Config(String),

    /// The external formatter could not be run or rejected the output
    #[error("formatter {tool} failed: {message}")]
    Formatter { tool: String, message: String },

    /// The tree-sitter grammar could not be loaded
    #[error("failed to load Go grammar: {0}")]
    Language(String),

    /// Glob pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

impl SplitError {
    /// Create a malformed declaration error with source position.
    pub fn malformed(
        path: impl AsRef<Path>,
        line: usize,
        kind: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::MalformedDeclaration {
            path: path.as_ref().to_path_buf(),
            line,
            kind: kind.into(),
            detail: detail.into(),
        }
    }

    /// Create a parse error with source position.
    pub fn parse(path: impl AsRef<Path>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            line,
            message: message.into(),
        }
    }

    /// Wrap an I/O error with the operation and path that produced it.
    pub fn filesystem(op: FsOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            op,
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a formatter error.
    pub fn formatter(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Formatter {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Whether the user can fix this by changing input or configuration.
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            Self::MalformedDeclaration { .. } | Self::Parse { .. } | Self::Config(_) | Self::Pattern(_)
        )
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::MalformedDeclaration { path, .. }
            | Self::Parse { path, .. }
            | Self::Filesystem { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filesystem_error_display() {
        let err = SplitError::filesystem(
            FsOp::Write,
            "out/Widget.go",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "failed to write out/Widget.go: denied");
        assert!(!err.is_user_fixable());
        assert_eq!(err.path(), Some(Path::new("out/Widget.go")));
    }

    #[test]
    fn test_parse_error_is_user_fixable() {
        let err = SplitError::parse("a.go", 3, "unexpected token");
        assert!(err.is_user_fixable());
        assert_eq!(err.to_string(), "parse error in a.go:3: unexpected token");
    }

    #[test]
    fn test_config_error_has_no_path() {
        let err = SplitError::config("jobs must be greater than zero");
        assert!(err.path().is_none());
    }
}
