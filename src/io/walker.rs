use crate::errors::{FsOp, Result, SplitError};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

const TEST_FILE_SUFFIX: &str = "_test.go";

/// Lists the source files of one package directory.
///
/// Only the directory itself is read, the way the Go toolchain treats a
/// package. Results are sorted by path.
pub struct SourceWalker {
    root: PathBuf,
    extension: String,
    include_tests: bool,
    exclude_patterns: Vec<glob::Pattern>,
}

impl SourceWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extension: "go".to_string(),
            include_tests: false,
            exclude_patterns: vec![],
        }
    }

    pub fn with_include_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }

    /// Glob patterns matched against file names.
    pub fn with_exclude_patterns(mut self, patterns: &[String]) -> Result<Self> {
        self.exclude_patterns = patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<_, _>>()?;
        Ok(self)
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(SplitError::filesystem(
                FsOp::List,
                &self.root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .max_depth(Some(1))
            .build();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let err = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                SplitError::filesystem(FsOp::List, &self.root, err)
            })?;
            let path = entry.path();

            if entry.file_type().is_some_and(|t| t.is_file()) && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
            return false;
        }

        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        if !self.include_tests && name.ends_with(TEST_FILE_SUFFIX) {
            tracing::debug!("Skipping test file {}", path.display());
            return false;
        }

        !self.exclude_patterns.iter().any(|p| p.matches(&name))
    }
}

pub fn find_source_files(
    root: &Path,
    include_tests: bool,
    exclude: &[String],
) -> Result<Vec<PathBuf>> {
    SourceWalker::new(root.to_path_buf())
        .with_include_tests(include_tests)
        .with_exclude_patterns(exclude)?
        .walk()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn package_dir() -> TempDir {
        let temp = TempDir::new().unwrap();
        for name in [
            "widget.pb.go",
            "gadget.pb.go",
            "widget_grpc.pb.go",
            "widget_test.go",
            "README.md",
        ] {
            fs::write(temp.path().join(name), "package pb\n").unwrap();
        }
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/inner.go"), "package inner\n").unwrap();
        temp
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_walk_lists_package_files_sorted() {
        let temp = package_dir();
        let files = find_source_files(temp.path(), false, &[]).unwrap();
        assert_eq!(
            names(&files),
            vec!["gadget.pb.go", "widget.pb.go", "widget_grpc.pb.go"]
        );
    }

    #[test]
    fn test_walk_includes_tests_when_asked() {
        let temp = package_dir();
        let files = find_source_files(temp.path(), true, &[]).unwrap();
        assert!(names(&files).contains(&"widget_test.go".to_string()));
    }

    #[test]
    fn test_walk_applies_exclude_patterns() {
        let temp = package_dir();
        let files = find_source_files(temp.path(), false, &["*_grpc.pb.go".to_string()]).unwrap();
        assert_eq!(names(&files), vec!["gadget.pb.go", "widget.pb.go"]);
    }

    #[test]
    fn test_walk_missing_directory() {
        let temp = TempDir::new().unwrap();
        let err = find_source_files(&temp.path().join("missing"), false, &[]).unwrap_err();
        assert!(matches!(err, SplitError::Filesystem { op: FsOp::List, .. }));
    }
}
