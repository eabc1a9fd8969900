pub mod destination;
pub mod sink;
pub mod walker;

pub use destination::{ensure_destination, flush_destination};
pub use sink::{FsSink, MemorySink, UnitSink};
pub use walker::{find_source_files, SourceWalker};
