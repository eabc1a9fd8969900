//! Bucket seeding, import fan-out and classification of a whole package.
//!
//! Declarations live in an unassigned arena until they are moved into
//! exactly one bucket. Classification therefore cannot place a declaration
//! twice, and anything left in the arena after the sweep goes to `common`.

use crate::classify::{classify, visitation_order};
use crate::core::{
    Bucket, DeclKind, Declaration, Extracted, ImportSpec, ImportTable, COMMON_BUCKET,
};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Counters describing a finished partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionStats {
    /// Non-import declarations in the input.
    pub declarations: usize,
    /// Distinct (alias, path) imports in the input.
    pub imports: usize,
    /// Buckets created, `common` included.
    pub buckets: usize,
    /// Declarations no type bucket claimed.
    pub fallback: usize,
}

impl PartitionStats {
    /// Number of entries across all buckets when every import is replicated
    /// into every bucket.
    pub fn expected_entries(&self) -> usize {
        self.declarations + self.imports * self.buckets
    }
}

/// Buckets in seeding order: `common` first, then type buckets in the order
/// their types were first declared.
#[derive(Debug)]
pub struct Partition {
    buckets: Vec<Bucket>,
    stats: PartitionStats,
}

impl Partition {
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.name() == name)
    }

    pub fn common(&self) -> &Bucket {
        &self.buckets[0]
    }

    pub fn stats(&self) -> PartitionStats {
        self.stats
    }

    /// Names of the buckets a declaration name ended up in.
    pub fn locate(&self, decl_name: &str) -> Vec<&str> {
        self.buckets
            .iter()
            .filter(|b| b.decls().iter().any(|d| d.name == decl_name))
            .map(|b| b.name())
            .collect()
    }

    /// Total entries across buckets, imports counted per bucket.
    pub fn entry_count(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| b.imports().len() + b.decls().len())
            .sum()
    }

    pub fn into_buckets(self) -> Vec<Bucket> {
        self.buckets
    }
}

/// Collects extracted declarations and partitions them into buckets.
#[derive(Debug, Default)]
pub struct Partitioner {
    imports: ImportTable,
    pending: Vec<Declaration>,
}

impl Partitioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: Extracted) {
        match item {
            Extracted::Import(spec) => self.add_import(spec),
            Extracted::Decl(decl) => self.pending.push(decl),
        }
    }

    pub fn add_import(&mut self, spec: ImportSpec) {
        if !self.imports.insert(spec) {
            trace!("duplicate import ignored");
        }
    }

    pub fn pending(&self) -> &[Declaration] {
        &self.pending
    }

    pub fn imports(&self) -> &ImportTable {
        &self.imports
    }

    /// Seed buckets, fan out imports and classify every pending declaration.
    pub fn partition(self) -> Partition {
        let Self { imports, pending } = self;

        let (names, index) = seed_names(&pending);
        let mut buckets: Vec<Bucket> = names.iter().map(Bucket::new).collect();

        for bucket in &mut buckets {
            for spec in imports.entries() {
                if bucket.add_import(spec) {
                    trace!("add import {} to {}", spec.to_source(), bucket.name());
                }
            }
        }

        let order = visitation_order(names.iter().map(String::as_str));
        let declarations = pending.len();
        let mut leftovers = Vec::new();

        for decl in pending {
            match classify(&decl, &order) {
                Some(claim) => {
                    debug!(
                        "{} {} -> {} (rule: {})",
                        decl.kind, decl.name, claim.bucket, claim.rule.id
                    );
                    buckets[index[claim.bucket]].push(decl);
                }
                None => {
                    debug!("{} {} -> {}", decl.kind, decl.name, COMMON_BUCKET);
                    leftovers.push(decl);
                }
            }
        }

        let fallback = leftovers.len();
        buckets[0].extend(leftovers);

        let stats = PartitionStats {
            declarations,
            imports: imports.len(),
            buckets: buckets.len(),
            fallback,
        };
        Partition { buckets, stats }
    }
}

/// `common` followed by every distinct type name in first-seen order, with
/// each name's position in that list.
fn seed_names(decls: &[Declaration]) -> (Vec<String>, HashMap<String, usize>) {
    let mut names = vec![COMMON_BUCKET.to_string()];
    let mut index = HashMap::from([(COMMON_BUCKET.to_string(), 0)]);
    for decl in decls.iter().filter(|d| d.kind == DeclKind::Type) {
        if !index.contains_key(&decl.name) {
            index.insert(decl.name.clone(), names.len());
            names.push(decl.name.clone());
        }
    }
    (names, index)
}

/// Partition a stream of extracted declarations in one call.
pub fn partition(items: impl IntoIterator<Item = Extracted>) -> Partition {
    let mut partitioner = Partitioner::new();
    for item in items {
        partitioner.add(item);
    }
    partitioner.partition()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeclNode, Origin};

    fn node(name: &str) -> DeclNode {
        DeclNode::new(name, Origin::new("x.go", 1))
    }

    fn ty(name: &str) -> Extracted {
        Extracted::Decl(Declaration::type_decl(name, node(name)))
    }

    fn func(name: &str, receiver: &str) -> Extracted {
        Extracted::Decl(Declaration::func(name, receiver, node(name)))
    }

    fn constant(name: &str, declared: &str) -> Extracted {
        Extracted::Decl(Declaration::constant(name, declared, node(name)))
    }

    fn import(path: &str) -> Extracted {
        Extracted::Import(ImportSpec::new(None, path))
    }

    fn names(bucket: &Bucket) -> Vec<&str> {
        bucket.decls().iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_seed_names_are_common_plus_distinct_types() {
        let partition = partition(vec![
            ty("Widget"),
            func("Helper", ""),
            ty("Gadget"),
            ty("Widget"),
        ]);
        let seeded: Vec<_> = partition.buckets().iter().map(|b| b.name()).collect();
        assert_eq!(seeded, vec!["common", "Widget", "Gadget"]);
    }

    #[test]
    fn test_widget_scenario() {
        let partition = partition(vec![
            ty("Widget"),
            func("String", "Widget"),
            constant("DefaultWidget", ""),
        ]);
        let widget = partition.bucket("Widget").map(names);
        assert_eq!(widget, Some(vec!["Widget", "String"]));
        assert_eq!(names(partition.common()), vec!["DefaultWidget"]);
        assert_eq!(partition.stats().fallback, 1);
    }

    #[test]
    fn test_only_imports_produce_single_common_unit() {
        let partition = partition(vec![import("\"fmt\"")]);
        assert_eq!(partition.buckets().len(), 1);
        let common = partition.common();
        assert_eq!(common.imports(), &[ImportSpec::new(None, "\"fmt\"")]);
        assert!(common.decls().is_empty());
    }

    #[test]
    fn test_register_handler_claimed_by_server_bucket() {
        let partition = partition(vec![ty("WidgetServer"), func("RegisterWidgetHandler", "")]);
        assert_eq!(partition.locate("RegisterWidgetHandler"), vec!["WidgetServer"]);
    }

    #[test]
    fn test_nested_type_names_prefer_longer_bucket() {
        let partition = partition(vec![ty("A"), ty("AB"), func("Reset", "AB")]);
        assert_eq!(partition.locate("Reset"), vec!["AB"]);
        // "AB" is a type name starting with "A", but its own bucket is tried first.
        assert_eq!(partition.locate("AB"), vec!["AB"]);
        assert_eq!(partition.locate("A"), vec!["A"]);
    }

    #[test]
    fn test_imports_fan_out_once_per_bucket() {
        let partition = partition(vec![
            import("\"fmt\""),
            ty("Widget"),
            import("\"fmt\""),
            import("\"io\""),
            ty("Gadget"),
        ]);
        for bucket in partition.buckets() {
            assert_eq!(bucket.imports().len(), 2, "bucket {}", bucket.name());
        }
        let stats = partition.stats();
        assert_eq!(stats.imports, 2);
        assert_eq!(partition.entry_count(), stats.expected_entries());
    }

    #[test]
    fn test_raw_string_import_is_not_duplicated() {
        let partition = partition(vec![import("\"fmt\""), import("`fmt`"), ty("A")]);
        for bucket in partition.buckets() {
            assert_eq!(bucket.imports(), &[ImportSpec::new(None, "\"fmt\"")]);
        }
        assert_eq!(partition.stats().imports, 1);
    }

    #[test]
    fn test_seed_index_matches_bucket_positions() {
        let items = [ty("Widget"), ty("Gadget"), ty("Widget"), ty("common")];
        let decls: Vec<Declaration> = items
            .into_iter()
            .filter_map(|item| match item {
                Extracted::Decl(decl) => Some(decl),
                Extracted::Import(_) => None,
            })
            .collect();
        let (names, index) = seed_names(&decls);
        assert_eq!(names, vec!["common", "Widget", "Gadget"]);
        for (i, name) in names.iter().enumerate() {
            assert_eq!(index[name], i);
        }
    }

    #[test]
    fn test_type_named_common_does_not_create_second_bucket() {
        let partition = partition(vec![ty("common"), func("Helper", "")]);
        assert_eq!(partition.buckets().len(), 1);
        assert_eq!(names(partition.common()), vec!["common", "Helper"]);
    }

    #[test]
    fn test_bucket_order_follows_original_declaration_order() {
        let partition = partition(vec![
            func("NewWidget", ""),
            ty("Widget"),
            func("Reset", "Widget"),
            constant("WidgetMax", ""),
        ]);
        let widget = partition.bucket("Widget").map(names);
        assert_eq!(widget, Some(vec!["NewWidget", "Widget", "Reset", "WidgetMax"]));
    }
}
