//! Post-processing of written units with `gofmt` or `goimports`.

use crate::config::Formatter;
use crate::errors::{Result, SplitError};
use std::path::PathBuf;
use std::process::Command;

/// Run `formatter` in place over `paths`. [`Formatter::None`] does nothing.
pub fn run_formatter(formatter: Formatter, paths: &[PathBuf]) -> Result<()> {
    let Some(tool) = formatter.binary() else {
        return Ok(());
    };
    if paths.is_empty() {
        return Ok(());
    }

    let binary = which::which(tool)
        .map_err(|e| SplitError::formatter(tool, format!("not found on PATH: {}", e)))?;
    tracing::debug!("Running {} on {} files", binary.display(), paths.len());

    let output = Command::new(&binary)
        .arg("-w")
        .args(paths)
        .output()
        .map_err(|e| SplitError::formatter(tool, e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SplitError::formatter(
            tool,
            format!("exited with {}: {}", output.status, stderr.trim()),
        ));
    }

    tracing::info!("Formatted {} files with {}", paths.len(), tool);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_formatter_is_noop() {
        assert!(run_formatter(Formatter::None, &[PathBuf::from("missing.go")]).is_ok());
    }

    #[test]
    fn test_no_paths_is_noop() {
        assert!(run_formatter(Formatter::Gofmt, &[]).is_ok());
    }
}
