//! Thread-local run context for crash reports.
//!
//! Each thread records the phase it is in and the file or output unit it is
//! working on. Emission runs on rayon workers, so unit progress is kept in
//! global atomics instead.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static UNITS_WRITTEN: AtomicUsize = AtomicUsize::new(0);
static UNITS_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<SplitContext> = const { RefCell::new(SplitContext::new()) };
}

/// Snapshot of what the current thread was doing.
#[derive(Debug, Clone, Default)]
pub struct SplitContext {
    pub phase: Option<SplitPhase>,
    /// Source file being read or parsed
    pub current_file: Option<PathBuf>,
    /// Output unit being rendered or written
    pub current_unit: Option<String>,
}

impl SplitContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
            current_unit: None,
        }
    }
}

/// Stages of a split run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPhase {
    /// Listing source files
    Discovery,
    /// Parsing files and extracting declarations
    Parsing,
    /// Seeding buckets and classifying declarations
    Partitioning,
    /// Clearing the destination directory
    Flushing,
    /// Rendering and writing output units
    Emission,
    /// Running the external formatter
    Formatting,
}

impl std::fmt::Display for SplitPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discovery => write!(f, "discovery"),
            Self::Parsing => write!(f, "parsing"),
            Self::Partitioning => write!(f, "partitioning"),
            Self::Flushing => write!(f, "flushing"),
            Self::Emission => write!(f, "emission"),
            Self::Formatting => write!(f, "formatting"),
        }
    }
}

/// Restores the previous context when dropped.
pub struct ContextGuard {
    previous: SplitContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(apply: impl FnOnce(&mut SplitContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

/// Set the current phase until the guard drops.
#[must_use]
pub fn set_phase(phase: SplitPhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

/// Set the current source file until the guard drops.
///
/// # Example
///
/// ```ignore
/// for path in &paths {
///     let _file = set_current_file(path);
///     extractor.extract(path, &content)?;
/// }
/// ```
#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update(|ctx| ctx.current_file = Some(path))
}

/// Set the current output unit until the guard drops.
#[must_use]
pub fn set_current_unit(name: impl Into<String>) -> ContextGuard {
    let name = name.into();
    update(|ctx| ctx.current_unit = Some(name))
}

pub fn set_unit_progress(written: usize, total: usize) {
    UNITS_WRITTEN.store(written, Ordering::Relaxed);
    UNITS_TOTAL.store(total, Ordering::Relaxed);
}

/// Thread-safe; called from emission workers.
pub fn increment_units_written() {
    UNITS_WRITTEN.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> SplitContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (written, total) output units.
#[must_use]
pub fn get_unit_progress() -> (usize, usize) {
    (
        UNITS_WRITTEN.load(Ordering::Relaxed),
        UNITS_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = SplitContext::new();
    });
}
