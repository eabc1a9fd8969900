//! Declaration model shared by extraction, classification and emission.

pub mod bucket;
pub mod decl;
pub mod imports;

pub use bucket::{Bucket, COMMON_BUCKET};
pub use decl::{DeclKind, DeclNode, Declaration, Extracted, ImportSpec, Origin};
pub use imports::ImportTable;
