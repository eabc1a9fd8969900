//! Bucket classification for package-level declarations.
//!
//! Classification is a pure function of a declaration and an ordered list of
//! bucket keys: the first bucket with a matching [`rules::PrefixRule`] wins.
//! The order is fixed by [`visitation_order`], longest name first, so a
//! declaration that two nested names could claim (`AB` vs `A`) always goes to
//! the more specific bucket.

pub mod rules;

pub use rules::{matching_rule, strip_server, BucketKey, PrefixRule, Stem, Subject, RULES};

use crate::core::{Declaration, COMMON_BUCKET};

/// Result of a successful classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim<'a> {
    pub bucket: &'a str,
    pub rule: &'static PrefixRule,
}

/// Order in which buckets are tried: longest name first, then by name.
///
/// The fallback bucket never takes part in classification.
pub fn visitation_order<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<BucketKey<'a>> {
    let mut keys: Vec<BucketKey<'a>> = names
        .into_iter()
        .filter(|name| *name != COMMON_BUCKET)
        .map(BucketKey::new)
        .collect();
    keys.sort_by(|a, b| b.name.len().cmp(&a.name.len()).then_with(|| a.name.cmp(b.name)));
    keys.dedup();
    keys
}

/// Find the bucket that claims `decl`, or `None` if it belongs in `common`.
pub fn classify<'a>(decl: &Declaration, order: &[BucketKey<'a>]) -> Option<Claim<'a>> {
    order.iter().find_map(|key| {
        matching_rule(decl, key).map(|rule| Claim {
            bucket: key.name,
            rule,
        })
    })
}
