//! Logging and crash-report context.
//!
//! - **Logging**: `tracing` subscriber on stderr, level from `-v` or `RUST_LOG`
//! - **Context tracking**: thread-local phase, source file and output unit
//! - **Panic hook**: crash report built from the tracked context
//!
//! ```ignore
//! use declsplit::observability::{install_panic_hook, set_phase, SplitPhase};
//!
//! install_panic_hook();
//! let _phase = set_phase(SplitPhase::Parsing);
//! ```

pub mod context;
pub mod logging;
pub mod panic_hook;

pub use context::{
    get_current_context, get_unit_progress, increment_units_written, set_current_file,
    set_current_unit, set_phase, set_unit_progress, ContextGuard, SplitContext, SplitPhase,
};
pub use logging::init_logging;
pub use panic_hook::install_panic_hook;
