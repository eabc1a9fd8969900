//! Package-level declarations and their classification metadata.
//!
//! A [`Declaration`] owns its [`DeclNode`]. Nodes are neither `Clone` nor
//! `Copy`, so once a declaration has been moved into a bucket it cannot also
//! appear in another one.

use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of a package-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Type,
    Var,
    Const,
    Func,
    Import,
}

impl DeclKind {
    /// Go keyword introducing the declaration.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Var => "var",
            Self::Const => "const",
            Self::Func => "func",
            Self::Import => "import",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Where a declaration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub file: PathBuf,
    /// 1-based line of the declaration keyword.
    pub line: usize,
}

impl Origin {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

/// Verbatim source of one declaration, including attached comments.
///
/// This is the opaque syntax handle carried through partitioning. It is
/// relocated, never duplicated or edited.
#[derive(Debug, PartialEq, Eq)]
pub struct DeclNode {
    text: String,
    origin: Origin,
}

impl DeclNode {
    pub fn new(text: impl Into<String>, origin: Origin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn file(&self) -> &Path {
        &self.origin.file
    }
}

/// One non-import package-level declaration.
#[derive(Debug, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclKind,
    /// Type name, first var/const name, or function name.
    pub name: String,
    /// For var/const, the annotated or literal type name. Empty if unknown.
    pub declared_type: String,
    /// For methods, the receiver's base type name. Empty for functions.
    pub receiver_type: String,
    pub node: DeclNode,
}

impl Declaration {
    pub fn type_decl(name: impl Into<String>, node: DeclNode) -> Self {
        Self::new(DeclKind::Type, name, node)
    }

    pub fn var(name: impl Into<String>, declared_type: impl Into<String>, node: DeclNode) -> Self {
        Self::new(DeclKind::Var, name, node).with_declared_type(declared_type)
    }

    pub fn constant(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        node: DeclNode,
    ) -> Self {
        Self::new(DeclKind::Const, name, node).with_declared_type(declared_type)
    }

    pub fn func(name: impl Into<String>, receiver_type: impl Into<String>, node: DeclNode) -> Self {
        Self {
            receiver_type: receiver_type.into(),
            ..Self::new(DeclKind::Func, name, node)
        }
    }

    fn new(kind: DeclKind, name: impl Into<String>, node: DeclNode) -> Self {
        Self {
            kind,
            name: name.into(),
            declared_type: String::new(),
            receiver_type: String::new(),
            node,
        }
    }

    fn with_declared_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = declared_type.into();
        self
    }

    pub fn is_method(&self) -> bool {
        self.kind == DeclKind::Func && !self.receiver_type.is_empty()
    }
}

/// One imported path, with its local alias if any.
///
/// Imports are the only declarations replicated across output units, so
/// unlike [`Declaration`] they are plain values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportSpec {
    /// Explicit alias (`_`, `.` or an identifier).
    pub alias: Option<String>,
    /// Import path as a double-quoted literal. Raw string paths are
    /// rewritten to this form so both spellings compare equal.
    pub path: String,
}

impl ImportSpec {
    pub fn new(alias: Option<&str>, path: impl AsRef<str>) -> Self {
        let unquoted = path.as_ref().trim_matches(|c| c == '"' || c == '`');
        Self {
            alias: alias.filter(|a| !a.is_empty()).map(str::to_string),
            path: format!("\"{}\"", unquoted),
        }
    }

    /// Path with surrounding quotes or backticks removed.
    pub fn unquoted_path(&self) -> &str {
        self.path.trim_matches(|c| c == '"' || c == '`')
    }

    /// Render as a Go import spec without the `import` keyword.
    pub fn to_source(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} \"{}\"", alias, self.unquoted_path()),
            None => format!("\"{}\"", self.unquoted_path()),
        }
    }
}

/// Everything the ingestion step produces for one declaration.
#[derive(Debug, PartialEq, Eq)]
pub enum Extracted {
    Decl(Declaration),
    Import(ImportSpec),
}

impl Extracted {
    pub fn kind(&self) -> DeclKind {
        match self {
            Self::Decl(decl) => decl.kind,
            Self::Import(_) => DeclKind::Import,
        }
    }
}
