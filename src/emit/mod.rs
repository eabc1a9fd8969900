//! Rendering and writing of output compilation units.
//!
//! A [`CompilationUnit`] is the finished content of one bucket: package
//! clause, import block and declarations, in that order. Units are
//! independent of each other and are written from a bounded rayon pool.

use crate::config::SplitConfig;
use crate::core::{Bucket, DeclNode, ImportSpec};
use crate::errors::{Result, SplitError};
use crate::io::UnitSink;
use crate::observability::{
    increment_units_written, set_current_unit, set_phase, set_unit_progress, SplitPhase,
};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// One output file worth of Go source.
#[derive(Debug)]
pub struct CompilationUnit {
    pub name: String,
    pub package: String,
    pub header: Option<String>,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<DeclNode>,
}

impl CompilationUnit {
    pub fn from_bucket(bucket: Bucket, package: &str, header: Option<&str>) -> Self {
        let (name, imports, decls) = bucket.into_parts();
        Self {
            name,
            package: package.to_string(),
            header: header.map(str::to_string),
            imports,
            decls: decls.into_iter().map(|decl| decl.node).collect(),
        }
    }

    /// Render the unit as gofmt-shaped Go source.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(header) = &self.header {
            for line in header.lines() {
                if line.trim().is_empty() {
                    out.push_str("//\n");
                } else {
                    out.push_str("// ");
                    out.push_str(line.trim_end());
                    out.push('\n');
                }
            }
            out.push('\n');
        }

        out.push_str("package ");
        out.push_str(&self.package);
        out.push('\n');

        let mut imports: Vec<&ImportSpec> = self.imports.iter().collect();
        imports.sort_by(|a, b| {
            a.unquoted_path()
                .cmp(b.unquoted_path())
                .then_with(|| a.alias.cmp(&b.alias))
        });
        match imports.as_slice() {
            [] => {}
            [single] => {
                out.push_str("\nimport ");
                out.push_str(&single.to_source());
                out.push('\n');
            }
            many => {
                out.push_str("\nimport (\n");
                for spec in many {
                    out.push('\t');
                    out.push_str(&spec.to_source());
                    out.push('\n');
                }
                out.push_str(")\n");
            }
        }

        for decl in &self.decls {
            out.push('\n');
            out.push_str(decl.text().trim_end());
            out.push('\n');
        }

        out
    }
}

/// Turn partitioned buckets into units, dropping buckets with nothing in them.
pub fn build_units(buckets: Vec<Bucket>, config: &SplitConfig) -> Vec<CompilationUnit> {
    buckets
        .into_iter()
        .filter(|bucket| {
            if bucket.is_empty() {
                debug!("Bucket {} is empty, no unit written", bucket.name());
                return false;
            }
            true
        })
        .map(|bucket| {
            CompilationUnit::from_bucket(bucket, &config.package, config.header.as_deref())
        })
        .collect()
}

/// Render and write every unit through `sink` with at most
/// `config.max_concurrency` writes in flight.
///
/// The first failure stops new writes from being scheduled and is returned;
/// writes already running are allowed to finish. Returns the written paths
/// in unit order.
pub fn emit_units(
    units: &[CompilationUnit],
    sink: &dyn UnitSink,
    config: &SplitConfig,
) -> Result<Vec<PathBuf>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.max_concurrency.max(1))
        .thread_name(|i| format!("declsplit-emit-{}", i))
        .build()
        .map_err(|e| SplitError::config(format!("cannot start emission workers: {}", e)))?;

    set_unit_progress(0, units.len());

    pool.install(|| {
        units
            .par_iter()
            .map(|unit| -> Result<PathBuf> {
                let _phase = set_phase(SplitPhase::Emission);
                let _unit = set_current_unit(&unit.name);
                let path = config.unit_path(&unit.name);
                sink.write_unit(&path, &unit.render())?;
                increment_units_written();
                info!(
                    "Wrote {} ({} declarations, {} imports)",
                    path.display(),
                    unit.decls.len(),
                    unit.imports.len()
                );
                Ok(path)
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Declaration, Origin};
    use crate::io::MemorySink;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn decl(text: &str) -> Declaration {
        Declaration::type_decl("Widget", DeclNode::new(text, Origin::new("w.go", 1)))
    }

    fn widget_bucket(imports: &[ImportSpec]) -> Bucket {
        let mut bucket = Bucket::new("Widget");
        for spec in imports {
            bucket.add_import(spec);
        }
        bucket.push(decl("type Widget struct {\n\tID int\n}"));
        bucket.push(Declaration::func(
            "String",
            "Widget",
            DeclNode::new(
                "func (w *Widget) String() string { return \"\" }\n\n",
                Origin::new("w.go", 5),
            ),
        ));
        bucket
    }

    #[test]
    fn test_render_single_import() {
        let unit = CompilationUnit::from_bucket(
            widget_bucket(&[ImportSpec::new(None, "\"fmt\"")]),
            "pb",
            None,
        );
        assert_eq!(
            unit.render(),
            indoc! {r#"
                package pb

                import "fmt"

                type Widget struct {
                	ID int
                }

                func (w *Widget) String() string { return "" }
            "#}
        );
    }

    #[test]
    fn test_render_sorts_import_block() {
        let unit = CompilationUnit::from_bucket(
            widget_bucket(&[
                ImportSpec::new(Some("proto"), "\"google.golang.org/protobuf/proto\""),
                ImportSpec::new(None, "\"fmt\""),
                ImportSpec::new(Some("_"), "\"embed\""),
            ]),
            "pb",
            None,
        );
        let rendered = unit.render();
        assert!(rendered.contains(indoc! {r#"
            import (
            	_ "embed"
            	"fmt"
            	proto "google.golang.org/protobuf/proto"
            )
        "#}));
    }

    #[test]
    fn test_render_header_and_empty_unit() {
        let unit = CompilationUnit {
            name: "common".into(),
            package: "pb".into(),
            header: Some("Code generated by declsplit. DO NOT EDIT.\n\nSource: pb".into()),
            imports: vec![],
            decls: vec![],
        };
        assert_eq!(
            unit.render(),
            "// Code generated by declsplit. DO NOT EDIT.\n//\n// Source: pb\n\npackage pb\n"
        );
    }

    #[test]
    fn test_build_units_skips_empty_buckets() {
        let config = SplitConfig::default();
        let units = build_units(vec![Bucket::common(), widget_bucket(&[])], &config);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].name, "Widget");
        assert_eq!(units[0].package, "pb");
    }

    #[test]
    fn test_emit_units_writes_every_unit() {
        let config = SplitConfig {
            destination: PathBuf::from("out"),
            suffix: ".pb".into(),
            max_concurrency: 2,
            ..Default::default()
        };
        let mut common = Bucket::common();
        common.add_import(&ImportSpec::new(None, "\"fmt\""));
        let units = build_units(vec![common, widget_bucket(&[])], &config);
        let sink = MemorySink::new();

        let written = emit_units(&units, &sink, &config).unwrap();

        assert_eq!(
            written,
            vec![PathBuf::from("out/common.pb.go"), PathBuf::from("out/Widget.pb.go")]
        );
        assert_eq!(
            sink.get(&PathBuf::from("out/common.pb.go")).as_deref(),
            Some("package pb\n\nimport \"fmt\"\n")
        );
    }

    #[derive(Default)]
    struct PeakTrackingSink {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        writes: AtomicUsize,
    }

    impl UnitSink for PeakTrackingSink {
        fn write_unit(&self, _path: &std::path::Path, _content: &str) -> Result<()> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_emit_units_respects_max_concurrency() {
        let config = SplitConfig {
            max_concurrency: 2,
            ..Default::default()
        };
        let buckets = (0..10)
            .map(|i| {
                let mut bucket = Bucket::new(format!("Widget{}", i));
                bucket.push(decl("type Widget struct{}"));
                bucket
            })
            .collect();
        let units = build_units(buckets, &config);
        let sink = PeakTrackingSink::default();

        emit_units(&units, &sink, &config).unwrap();

        assert_eq!(sink.writes.load(Ordering::SeqCst), 10);
        let peak = sink.peak.load(Ordering::SeqCst);
        assert!((1..=2).contains(&peak), "peak concurrency {}", peak);
    }

    struct FailingSink;

    impl UnitSink for FailingSink {
        fn write_unit(&self, path: &std::path::Path, _content: &str) -> Result<()> {
            Err(SplitError::filesystem(
                crate::errors::FsOp::Write,
                path,
                std::io::Error::other("disk full"),
            ))
        }
    }

    #[test]
    fn test_emit_units_reports_write_failure() {
        let config = SplitConfig::default();
        let units = build_units(vec![widget_bucket(&[])], &config);
        let err = emit_units(&units, &FailingSink, &config).unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }
}
