//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a stderr subscriber. `RUST_LOG`, when set, wins over `-v`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(9), "trace");
    }
}
