use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SOURCE_DIR: &str = "pb";
pub const DEFAULT_PACKAGE: &str = "pb";
pub const DEFAULT_DESTINATION: &str = "pb_Sep";
pub const DEFAULT_EXTENSION: &str = "go";
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

/// The `_test`, `_GOOS` or `_GOARCH` suffix that makes the go tool treat a
/// file with this stem as test-only or build-constrained.
pub fn build_constraint_suffix(stem: &str) -> Option<&str> {
    if stem.ends_with("_test") {
        return Some(&stem[stem.len() - "_test".len()..]);
    }
    let (_, rest) = stem.split_once('_')?;
    let last = rest.rsplit('_').next()?;
    (KNOWN_OS.contains(&last) || KNOWN_ARCH.contains(&last))
        .then(|| &stem[stem.len() - last.len() - 1..])
}

/// External tool run over the written units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Formatter {
    /// Leave the output as rendered
    #[default]
    None,
    /// Run `gofmt -w`
    Gofmt,
    /// Run `goimports -w`, which also prunes unused imports
    Goimports,
}

impl Formatter {
    pub fn binary(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Gofmt => Some("gofmt"),
            Self::Goimports => Some("goimports"),
        }
    }
}

/// Settings as written in `.declsplit.toml` or given on the command line.
///
/// Every field is optional so layers can be merged; see
/// [`PartialConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    /// Directory holding the package to split
    pub source: Option<PathBuf>,
    /// Package name written into every output unit
    pub package: Option<String>,
    /// Directory receiving the output units
    pub destination: Option<PathBuf>,
    /// Appended to every unit name before the extension
    pub suffix: Option<String>,
    /// Remove existing files in the destination before writing
    pub flush: Option<bool>,
    /// Output file extension, without the dot
    pub extension: Option<String>,
    /// Maximum number of units written at once
    pub max_concurrency: Option<usize>,
    /// Also split `_test.go` files
    pub include_tests: Option<bool>,
    /// Glob patterns on file names to leave out
    pub exclude: Option<Vec<String>>,
    pub formatter: Option<Formatter>,
    /// Comment text placed above the package clause
    pub header: Option<String>,
}

impl PartialConfig {
    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: PartialConfig) -> PartialConfig {
        PartialConfig {
            source: other.source.or(self.source),
            package: other.package.or(self.package),
            destination: other.destination.or(self.destination),
            suffix: other.suffix.or(self.suffix),
            flush: other.flush.or(self.flush),
            extension: other.extension.or(self.extension),
            max_concurrency: other.max_concurrency.or(self.max_concurrency),
            include_tests: other.include_tests.or(self.include_tests),
            exclude: other.exclude.or(self.exclude),
            formatter: other.formatter.or(self.formatter),
            header: other.header.or(self.header),
        }
    }

    /// Fill unset fields with defaults.
    pub fn resolve(self) -> SplitConfig {
        SplitConfig {
            source: self.source.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR)),
            package: self.package.unwrap_or_else(|| DEFAULT_PACKAGE.to_string()),
            destination: self.destination.unwrap_or_else(|| PathBuf::from(DEFAULT_DESTINATION)),
            suffix: self.suffix.unwrap_or_default(),
            flush: self.flush.unwrap_or(false),
            extension: self.extension.unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            max_concurrency: self.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY),
            include_tests: self.include_tests.unwrap_or(false),
            exclude: self.exclude.unwrap_or_default(),
            formatter: self.formatter.unwrap_or_default(),
            header: self.header.filter(|h| !h.trim().is_empty()),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitConfig {
    pub source: PathBuf,
    pub package: String,
    pub destination: PathBuf,
    pub suffix: String,
    pub flush: bool,
    pub extension: String,
    pub max_concurrency: usize,
    pub include_tests: bool,
    pub exclude: Vec<String>,
    pub formatter: Formatter,
    pub header: Option<String>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        PartialConfig::default().resolve()
    }
}

impl SplitConfig {
    /// File name of the unit for `bucket`.
    pub fn unit_file_name(&self, bucket: &str) -> String {
        format!("{}{}.{}", bucket, self.suffix, self.extension)
    }

    pub fn unit_path(&self, bucket: &str) -> PathBuf {
        self.destination.join(self.unit_file_name(bucket))
    }

    /// Build-constraint suffix the unit file for `bucket` would carry, if any.
    /// Only `.go` output is affected.
    pub fn unit_constraint(&self, bucket: &str) -> Option<String> {
        if self.extension != DEFAULT_EXTENSION {
            return None;
        }
        let stem = format!("{}{}", bucket, self.suffix);
        build_constraint_suffix(&stem).map(str::to_string)
    }
}
