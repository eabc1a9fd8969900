use crate::config::{Formatter, PartialConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "declsplit")]
#[command(
    about = "Split a Go package into one file per type plus common",
    long_about = None
)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub split: SplitArgs,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the version and exit
    Version,
}

#[derive(Args, Debug, Default)]
pub struct SplitArgs {
    /// Directory holding the package to split [default: pb]
    #[arg(long = "src", value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Package name written into every output file [default: pb]
    #[arg(long = "pkg", value_name = "NAME")]
    pub package: Option<String>,

    /// Directory receiving the output files [default: pb_Sep]
    #[arg(long = "dst", value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Appended to every output file name before the extension
    #[arg(long)]
    pub suffix: Option<String>,

    /// Remove existing files in the destination before writing
    #[arg(long, overrides_with = "no_flush")]
    pub flush: bool,

    /// Keep existing files in the destination, even if the config file flushes
    #[arg(long, overrides_with = "flush")]
    pub no_flush: bool,

    /// Output file extension [default: go]
    #[arg(long = "ext", value_name = "EXT")]
    pub extension: Option<String>,

    /// Maximum number of files written at once [default: 10]
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Also split `_test.go` files
    #[arg(long, overrides_with = "no_include_tests")]
    pub include_tests: bool,

    /// Leave `_test.go` files out, even if the config file includes them
    #[arg(long, overrides_with = "include_tests")]
    pub no_include_tests: bool,

    /// Formatter run over the written files
    #[arg(long, value_enum)]
    pub formatter: Option<Formatter>,

    /// Comment placed above the package clause of every output file
    #[arg(long)]
    pub header: Option<String>,

    /// Glob pattern on file names to leave out (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Config file to use instead of the nearest .declsplit.toml
    #[arg(long, value_name = "PATH", env = "DECLSPLIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the planned output files without touching the destination
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl SplitArgs {
    /// The command-line layer of the configuration. Switches left off on the
    /// command line do not override the config file.
    pub fn overrides(&self) -> PartialConfig {
        PartialConfig {
            source: self.source.clone(),
            package: self.package.clone(),
            destination: self.destination.clone(),
            suffix: self.suffix.clone(),
            flush: switch(self.flush, self.no_flush),
            extension: self.extension.clone(),
            max_concurrency: self.jobs,
            include_tests: switch(self.include_tests, self.no_include_tests),
            exclude: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
            formatter: self.formatter,
            header: self.header.clone(),
        }
    }
}

/// `--x` / `--no-x` pair as a config layer value. Neither given means unset.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
