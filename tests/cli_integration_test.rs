//! Integration tests for the `declsplit` binary.

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

fn declsplit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("declsplit").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG").env_remove("DECLSPLIT_CONFIG");
    cmd
}

fn package(dir: &TempDir, name: &str, source: &str) {
    let src = dir.path().join("pb");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join(name), source).unwrap();
}

#[test]
fn test_version_subcommand() {
    let temp = TempDir::new().unwrap();
    let output = declsplit(&temp).arg("version").output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("declsplit {}\n", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn test_default_layout_is_split() {
    let temp = TempDir::new().unwrap();
    package(&temp, "a.go", "package pb\n\ntype A struct{}\n\nfunc (a A) M() {}\n");

    declsplit(&temp).assert().success();

    let unit = fs::read_to_string(temp.path().join("pb_Sep/A.go")).unwrap();
    assert_eq!(unit, "package pb\n\ntype A struct{}\n\nfunc (a A) M() {}\n");
    assert!(!temp.path().join("pb_Sep/common.go").exists());
}

#[test]
fn test_flags_override_config_file() {
    let temp = TempDir::new().unwrap();
    package(&temp, "a.go", "package pb\n\nimport \"fmt\"\n\nvar x = fmt.Sprint()\n");
    fs::write(
        temp.path().join(".declsplit.toml"),
        "destination = \"from_file\"\npackage = \"filepkg\"\n",
    )
    .unwrap();

    declsplit(&temp).args(["--pkg", "flagpkg"]).assert().success();

    let unit = fs::read_to_string(temp.path().join("from_file/common.go")).unwrap();
    assert!(unit.starts_with("package flagpkg\n"));
    assert!(unit.contains("import \"fmt\""));
}

#[test]
fn test_dry_run_prints_plan() {
    let temp = TempDir::new().unwrap();
    package(&temp, "a.go", "package pb\n\ntype A struct{}\n");

    let output = declsplit(&temp)
        .args(["--dry-run", "--dst", "out"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("A.go\t1 declarations, 0 imports"), "{stdout}");
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_malformed_declaration_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    package(&temp, "a.go", "package pb\n\nvar ()\n");

    let output = declsplit(&temp).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed var declaration"), "{stderr}");
    assert!(!temp.path().join("pb_Sep").exists());
}

#[test]
fn test_invalid_package_name_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    package(&temp, "a.go", "package pb\n");

    let output = declsplit(&temp).args(["--pkg", "not-valid"]).output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration error"));
}

#[test]
fn test_missing_source_dir_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    declsplit(&temp).args(["--src", "nope"]).assert().failure();
}
