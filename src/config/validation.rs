//! Validation of a resolved [`SplitConfig`].
//!
//! All problems are collected before reporting so a user sees every invalid
//! setting in one run.

use super::core::SplitConfig;
use crate::errors::{Result, SplitError};
use std::path::Path;

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range", "return",
    "select", "struct", "switch", "type", "var",
];

/// Whether `name` can be used as a Go package name.
pub fn is_go_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
        && name != "_"
        && !GO_KEYWORDS.contains(&name)
}

fn has_separator(value: &str) -> bool {
    value.contains('/') || value.contains('\\')
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Every problem found in `config`, empty if it is valid.
pub fn collect_errors(config: &SplitConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if !is_go_identifier(&config.package) {
        errors.push(format!(
            "package: {:?} is not a valid Go package name",
            config.package
        ));
    }
    if config.max_concurrency == 0 {
        errors.push("max_concurrency: must be greater than zero".to_string());
    }
    if config.extension.is_empty() || config.extension.starts_with('.') {
        errors.push(format!(
            "extension: expected a non-empty extension without a leading dot, got {:?}",
            config.extension
        ));
    } else if has_separator(&config.extension) {
        errors.push("extension: must not contain path separators".to_string());
    }
    if has_separator(&config.suffix) {
        errors.push("suffix: must not contain path separators".to_string());
    }
    for pattern in &config.exclude {
        if let Err(e) = glob::Pattern::new(pattern) {
            errors.push(format!("exclude: invalid pattern {:?}: {}", pattern, e));
        }
    }
    if config.flush && same_directory(&config.source, &config.destination) {
        errors.push(format!(
            "destination: flushing {} would delete the source files",
            config.destination.display()
        ));
    }

    errors
}

pub fn validate_config(config: &SplitConfig) -> Result<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SplitError::config(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartialConfig;
    use std::path::PathBuf;

    #[test]
    fn test_go_identifiers() {
        assert!(is_go_identifier("pb"));
        assert!(is_go_identifier("api_v1"));
        assert!(is_go_identifier("_internal"));
        assert!(!is_go_identifier(""));
        assert!(!is_go_identifier("_"));
        assert!(!is_go_identifier("1pb"));
        assert!(!is_go_identifier("my-pkg"));
        assert!(!is_go_identifier("type"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SplitConfig::default()).is_ok());
    }

    #[test]
    fn test_errors_are_accumulated() {
        let config = PartialConfig {
            package: Some("my-pkg".into()),
            max_concurrency: Some(0),
            extension: Some(".go".into()),
            suffix: Some("a/b".into()),
            ..Default::default()
        }
        .resolve();
        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 4, "{:?}", errors);
    }

    #[test]
    fn test_flush_into_source_is_rejected() {
        let config = PartialConfig {
            source: Some(PathBuf::from("pb")),
            destination: Some(PathBuf::from("pb")),
            flush: Some(true),
            ..Default::default()
        }
        .resolve();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("would delete the source files"));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let config = PartialConfig {
            exclude: Some(vec!["[".into()]),
            ..Default::default()
        }
        .resolve();
        assert_eq!(collect_errors(&config).len(), 1);
    }
}
