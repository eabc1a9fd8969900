//! Command implementations for the `declsplit` binary.

pub mod split;

pub use split::{print_report, run_split, run_split_with_sink, PlannedUnit, SplitReport};
