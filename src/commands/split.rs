use crate::config::SplitConfig;
use crate::emit::{build_units, emit_units, CompilationUnit};
use crate::errors::SplitError;
use crate::extraction::{extract_sources, read_sources, ExtractedFile};
use crate::format::run_formatter;
use crate::io::{ensure_destination, find_source_files, flush_destination, FsSink, UnitSink};
use crate::observability::{set_phase, SplitPhase};
use crate::partition::{PartitionStats, Partitioner};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// An output file the run produces (or would produce, for a dry run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUnit {
    pub path: PathBuf,
    pub declarations: usize,
    pub imports: usize,
}

/// What a split run did.
#[derive(Debug, Default)]
pub struct SplitReport {
    /// Source package name as read from the package clauses.
    pub package: String,
    /// Files whose declarations were split.
    pub files: Vec<PathBuf>,
    /// Files left out because they belong to another package.
    pub skipped: Vec<PathBuf>,
    pub stats: PartitionStats,
    pub units: Vec<PlannedUnit>,
    /// Files removed by the flush.
    pub removed: Vec<PathBuf>,
    /// Files written, empty for a dry run.
    pub written: Vec<PathBuf>,
}

/// Split the package described by `config` and write the result to disk.
pub fn run_split(config: &SplitConfig, dry_run: bool) -> Result<SplitReport> {
    run_split_with_sink(config, dry_run, &FsSink::new())
}

pub fn run_split_with_sink(
    config: &SplitConfig,
    dry_run: bool,
    sink: &dyn UnitSink,
) -> Result<SplitReport> {
    let paths = {
        let _phase = set_phase(SplitPhase::Discovery);
        find_source_files(&config.source, config.include_tests, &config.exclude)
            .with_context(|| format!("Failed to list sources in {}", config.source.display()))?
    };
    if paths.is_empty() {
        return Err(SplitError::config(format!(
            "no Go source files found in {}",
            config.source.display()
        ))
        .into());
    }
    info!("Found {} source files in {}", paths.len(), config.source.display());

    let extracted = {
        let _phase = set_phase(SplitPhase::Parsing);
        let sources = read_sources(&paths)?;
        extract_sources(&sources)?
    };
    let selection = select_package(extracted);

    let mut report = SplitReport {
        package: selection.package,
        skipped: selection.skipped,
        ..Default::default()
    };

    let units = {
        let _phase = set_phase(SplitPhase::Partitioning);
        let mut partitioner = Partitioner::new();
        for file in selection.files {
            report.files.push(file.path);
            for item in file.items {
                partitioner.add(item);
            }
        }
        let partition = partitioner.partition();
        report.stats = partition.stats();
        build_units(partition.into_buckets(), config)
    };
    report.units = plan(&units, config);
    info!(
        "Partitioned {} declarations into {} units ({} in common)",
        report.stats.declarations,
        units.len(),
        report.stats.fallback
    );

    if dry_run {
        return Ok(report);
    }

    {
        let _phase = set_phase(SplitPhase::Flushing);
        if config.flush {
            report.removed = flush_destination(&config.destination)?;
            info!(
                "Removed {} files from {}",
                report.removed.len(),
                config.destination.display()
            );
        }
        ensure_destination(&config.destination)?;
    }

    report.written = emit_units(&units, sink, config)
        .with_context(|| format!("Failed to write units to {}", config.destination.display()))?;

    {
        let _phase = set_phase(SplitPhase::Formatting);
        run_formatter(config.formatter, &report.written)?;
    }

    Ok(report)
}

struct PackageSelection {
    package: String,
    files: Vec<ExtractedFile>,
    skipped: Vec<PathBuf>,
}

/// Keep the files of the first package seen; others are skipped.
fn select_package(extracted: Vec<ExtractedFile>) -> PackageSelection {
    let package = extracted
        .first()
        .map(|f| f.package.clone())
        .unwrap_or_default();
    let (files, others): (Vec<_>, Vec<_>) =
        extracted.into_iter().partition(|f| f.package == package);

    let skipped = others
        .into_iter()
        .map(|f| {
            warn!(
                "Skipping {}: package {} differs from {}",
                f.path.display(),
                f.package,
                package
            );
            f.path
        })
        .collect();

    PackageSelection {
        package,
        files,
        skipped,
    }
}

fn plan(units: &[CompilationUnit], config: &SplitConfig) -> Vec<PlannedUnit> {
    units
        .iter()
        .map(|unit| {
            let path = config.unit_path(&unit.name);
            if let Some(suffix) = config.unit_constraint(&unit.name) {
                warn!(
                    "{} ends in {}; the go tool will treat it as test-only or build-constrained",
                    path.display(),
                    suffix
                );
            }
            PlannedUnit {
                path,
                declarations: unit.decls.len(),
                imports: unit.imports.len(),
            }
        })
        .collect()
}

/// Print the outcome of a run to stdout.
pub fn print_report(report: &SplitReport, dry_run: bool) {
    if dry_run {
        for unit in &report.units {
            println!(
                "{}\t{} declarations, {} imports",
                unit.path.display(),
                unit.declarations,
                unit.imports
            );
        }
        return;
    }

    println!(
        "Split {} declarations of package {} from {} files into {} files",
        report.stats.declarations,
        report.package,
        report.files.len(),
        report.written.len()
    );
    if !report.skipped.is_empty() {
        println!("Skipped {} files from other packages", report.skipped.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySink;
    use std::fs;
    use tempfile::TempDir;

    fn source_dir(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("pb")).unwrap();
        for (name, content) in files {
            fs::write(temp.path().join("pb").join(name), content).unwrap();
        }
        temp
    }

    fn config_for(temp: &TempDir) -> SplitConfig {
        SplitConfig {
            source: temp.path().join("pb"),
            destination: temp.path().join("out"),
            ..Default::default()
        }
    }

    #[test]
    fn test_dry_run_plans_without_writing() {
        let temp = source_dir(&[(
            "widget.go",
            "package pb\n\ntype Widget struct{}\n\nfunc Helper() {}\n",
        )]);
        let config = config_for(&temp);
        let sink = MemorySink::new();

        let report = run_split_with_sink(&config, true, &sink).unwrap();

        assert_eq!(report.units.len(), 2);
        assert!(report.written.is_empty());
        assert!(sink.units().is_empty());
        assert!(!config.destination.exists());
    }

    #[test]
    fn test_other_packages_are_skipped() {
        let temp = source_dir(&[
            ("a.go", "package pb\n\ntype A struct{}\n"),
            ("b.go", "package other\n\ntype B struct{}\n"),
        ]);
        let config = config_for(&temp);
        let sink = MemorySink::new();

        let report = run_split_with_sink(&config, false, &sink).unwrap();

        assert_eq!(report.package, "pb");
        assert_eq!(report.skipped, vec![temp.path().join("pb/b.go")]);
        assert_eq!(report.stats.declarations, 1);
    }

    #[test]
    fn test_empty_source_dir_is_config_error() {
        let temp = source_dir(&[]);
        let err = run_split_with_sink(&config_for(&temp), false, &MemorySink::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SplitError>(),
            Some(SplitError::Config(_))
        ));
    }
}
