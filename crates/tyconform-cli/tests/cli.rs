//! End-to-end runs of the `tyconform` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::tempdir;

fn tyconform(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tyconform"))
        .args(args)
        .current_dir(cwd)
        .env_remove("TYCONFORM_LOG")
        .output()
        .unwrap()
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

const DECLS: &str = "interface ClusterSettings { cwd?: string; serialization?: \"json\" | \"advanced\"; }\n\
                     interface Cluster { setupPrimary(settings?: ClusterSettings): void; isPrimary: boolean; }\n\
                     declare const cluster: Cluster;\n";

#[test]
fn test_bundled_project_passes() {
    let output = tyconform(&["check"], &workspace_root());
    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
    assert!(stdout(&output).contains("checked 2 files: all checks passed"));
}

#[test]
fn test_files_on_command_line() {
    let root = workspace_root();
    let output = tyconform(
        &["check", "--decl", "fixtures/cluster.d.ts", "fixtures/cluster.ts", "--no-color"],
        &root,
    );
    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
}

#[test]
fn test_failures_exit_with_one() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("cluster.d.ts"), DECLS).unwrap();
    fs::write(
        dir.path().join("settings.ts"),
        "cluster.setupPrimary({ serialization: \"xml\" });\ncluster.setupPrimary({ colour: 1 });\n",
    )
    .unwrap();

    let output = tyconform(&["check", "cluster.d.ts", "settings.ts"], dir.path());
    assert_eq!(output.status.code(), Some(1));

    let text = stdout(&output);
    assert!(text.contains("settings.ts:1:39: error:"), "{text}");
    assert!(text.contains("[TC2001 TypeMismatch]"), "{text}");
    assert!(text.contains("settings.ts:2:24: error: 'colour' does not exist in type 'ClusterSettings'"), "{text}");
    assert!(text.contains("checked 2 files: 2 errors"), "{text}");
}

#[test]
fn test_json_report() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("cluster.d.ts"), DECLS).unwrap();
    fs::write(
        dir.path().join("expect.ts"),
        "// $ExpectType string\ncluster.isPrimary;\n",
    )
    .unwrap();

    let output = tyconform(&["check", "--format", "json", "cluster.d.ts", "expect.ts"], dir.path());
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["passed"], false);
    assert_eq!(json["errors"], 1);
    let record = &json["diagnostics"][0];
    assert_eq!(record["file"], "expect.ts");
    assert_eq!(record["line"], 2);
    assert_eq!(record["code"], "TC2002");
    assert_eq!(record["kind"], "ExpectationMismatch");
}

#[test]
fn test_config_file_and_overrides() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("types")).unwrap();
    fs::write(dir.path().join("types/cluster.d.ts"), DECLS).unwrap();
    fs::write(dir.path().join("colour.ts"), "cluster.setupPrimary({ colour: 1 });\n").unwrap();
    fs::write(
        dir.path().join("project.toml"),
        "declarations = [\"types/cluster.d.ts\"]\nfixtures = [\"colour.ts\"]\n",
    )
    .unwrap();

    let config = dir.path().join("project.toml");
    let config = config.to_str().unwrap();

    let output = tyconform(&["check", "--config", config], Path::new("/"));
    assert_eq!(output.status.code(), Some(1), "{}", stdout(&output));

    let output = tyconform(&["check", "--config", config, "--no-excess-property-checks"], Path::new("/"));
    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
}

#[test]
fn test_unreadable_input_exits_with_two() {
    let dir = tempdir().unwrap();
    let output = tyconform(&["check", "missing.ts"], dir.path());
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read missing.ts"), "{stderr}");

    let output = tyconform(&["check"], dir.path());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_parse_command() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("cluster.d.ts"), DECLS).unwrap();
    fs::write(dir.path().join("broken.ts"), "cluster.fork(;\n").unwrap();

    let output = tyconform(&["parse", "cluster.d.ts"], dir.path());
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Interface"));

    let output = tyconform(&["parse", "broken.ts"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[TC0002 ParserError]"));
}
