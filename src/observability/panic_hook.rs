//! Panic hook printing a crash report with the run context.
//!
//! The report names the phase, source file and output unit that were
//! active on the panicking thread, plus how many units had been written.

use super::context::{get_current_context, get_unit_progress, SplitContext};
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const RULE: &str = "════════════════════════════════════════════════════════════════";

/// Install the crash report hook. Call once, early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();
    let (written, total) = get_unit_progress();

    eprintln!();
    eprintln!("{}", RULE);
    eprintln!("declsplit crash report");
    eprintln!("  version:  {}", VERSION);
    eprintln!("  platform: {}", std::env::consts::OS);
    eprintln!("  time:     {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    eprintln!("{}", RULE);
    eprintln!("  panic:    {}", panic_message(info));
    if let Some(location) = info.location() {
        eprintln!(
            "  location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        );
    }
    for line in context_lines(&context, written, total) {
        eprintln!("  {}", line);
    }
    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!("{}", std::backtrace::Backtrace::capture());
    } else {
        eprintln!("  run with RUST_BACKTRACE=1 for a stack trace");
    }
    eprintln!("{}", RULE);
}

fn context_lines(context: &SplitContext, written: usize, total: usize) -> Vec<String> {
    let mut lines = Vec::new();
    match &context.phase {
        Some(phase) => lines.push(format!("phase:    {}", phase)),
        None => lines.push("phase:    (not started)".to_string()),
    }
    if let Some(file) = &context.current_file {
        lines.push(format!("file:     {}", file.display()));
    }
    if let Some(unit) = &context.current_unit {
        lines.push(format!("unit:     {}", unit));
    }
    if total > 0 {
        lines.push(format!("progress: {} / {} units written", written, total));
    }
    lines
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::context::SplitPhase;

    #[test]
    fn test_context_lines_without_phase() {
        let lines = context_lines(&SplitContext::new(), 0, 0);
        assert_eq!(lines, vec!["phase:    (not started)".to_string()]);
    }

    #[test]
    fn test_context_lines_with_unit_and_progress() {
        let context = SplitContext {
            phase: Some(SplitPhase::Emission),
            current_file: None,
            current_unit: Some("WidgetServer".to_string()),
        };
        let lines = context_lines(&context, 3, 7);
        assert_eq!(
            lines,
            vec![
                "phase:    emission".to_string(),
                "unit:     WidgetServer".to_string(),
                "progress: 3 / 7 units written".to_string(),
            ]
        );
    }
}
