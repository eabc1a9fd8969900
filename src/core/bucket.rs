use super::decl::{Declaration, ImportSpec};

/// Reserved name of the fallback bucket.
pub const COMMON_BUCKET: &str = "common";

/// An output compilation unit being filled.
///
/// Imports are kept apart from the classified declarations; both keep the
/// order in which they were appended.
#[derive(Debug)]
pub struct Bucket {
    name: String,
    imports: Vec<ImportSpec>,
    decls: Vec<Declaration>,
}

impl Bucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            imports: Vec::new(),
            decls: Vec::new(),
        }
    }

    pub fn common() -> Self {
        Self::new(COMMON_BUCKET)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_common(&self) -> bool {
        self.name == COMMON_BUCKET
    }

    /// Add an import unless this bucket already carries the exact pair.
    pub fn add_import(&mut self, spec: &ImportSpec) -> bool {
        if self.imports.contains(spec) {
            return false;
        }
        self.imports.push(spec.clone());
        true
    }

    /// Take ownership of a classified declaration.
    pub fn push(&mut self, decl: Declaration) {
        self.decls.push(decl);
    }

    pub fn extend(&mut self, decls: impl IntoIterator<Item = Declaration>) {
        self.decls.extend(decls);
    }

    pub fn imports(&self) -> &[ImportSpec] {
        &self.imports
    }

    pub fn decls(&self) -> &[Declaration] {
        &self.decls
    }

    /// Whether the bucket holds anything at all, imports included.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.decls.is_empty()
    }

    pub(crate) fn into_parts(self) -> (String, Vec<ImportSpec>, Vec<Declaration>) {
        (self.name, self.imports, self.decls)
    }
}
