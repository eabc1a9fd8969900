use super::decl::ImportSpec;
use std::collections::HashSet;

/// Imports collected from every source file, deduplicated by alias and path.
///
/// Entries keep first-seen order.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    entries: Vec<ImportSpec>,
    seen: HashSet<ImportSpec>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an import. Returns `false` if the exact (alias, path) pair is
    /// already present.
    pub fn insert(&mut self, spec: ImportSpec) -> bool {
        if self.seen.contains(&spec) {
            return false;
        }
        self.seen.insert(spec.clone());
        self.entries.push(spec);
        true
    }

    pub fn entries(&self) -> &[ImportSpec] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ImportSpec> for ImportTable {
    fn from_iter<I: IntoIterator<Item = ImportSpec>>(iter: I) -> Self {
        let mut table = Self::new();
        for spec in iter {
            table.insert(spec);
        }
        table
    }
}
