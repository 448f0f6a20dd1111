//! Runs the `dcl` binary against recorded resolution results.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use crate::common::{ScriptRecorder, text};

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("temp dir"),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("write fixture");
        path
    }

    fn run(&self, config: &Path, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_dcl"))
            .env_remove("DCL_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(config)
            .args(args)
            .output()
            .expect("run dcl")
    }
}

fn recorded_script() -> String {
    let mut script = ScriptRecorder::new();
    let application = script.software_type("application");
    let library = script.software_type("library");
    script.assign(application, "version", text("1.0"));
    script.add(library, "implementation");
    serde_json::to_string_pretty(&script.finish()).expect("serialize")
}

#[test]
fn check_prints_summary_per_software_type() {
    let workspace = Workspace::new();
    let config = workspace.write("config.toml", "");
    let input = workspace.write("build.json", &recorded_script());

    let output = workspace.run(&config, &["check", input.to_str().expect("utf-8 path")]);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "application: 1 assignment(s), 0 addition(s)\n\
         library: 0 assignment(s), 1 addition(s)\n"
    );
    assert!(
        output.stderr.is_empty(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn list_records_flag_prints_each_record() {
    let workspace = Workspace::new();
    let config = workspace.write("config.toml", "");
    let input = workspace.write("build.json", &recorded_script());

    let output = workspace.run(
        &config,
        &["check", input.to_str().expect("utf-8 path"), "--list-records"],
    );

    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "application: 1 assignment(s), 0 addition(s)\n  \
         version = \"1.0\"\n\
         library: 0 assignment(s), 1 addition(s)\n  \
         + implementation()\n"
    );
}

#[test]
fn configured_log_file_receives_logs_instead_of_stderr() {
    let workspace = Workspace::new();
    let log_path = workspace.dir.path().join("logs").join("dcl.log");
    let config = workspace.write(
        "config.toml",
        &format!("[log]\nfile = {:?}\n", log_path.display().to_string()),
    );
    let input = workspace.write("build.json", &recorded_script());

    let output = workspace.run(&config, &["check", input.to_str().expect("utf-8 path")]);

    assert!(output.status.success(), "{output:?}");
    assert!(output.stderr.is_empty(), "{output:?}");
    let log = fs::read_to_string(&log_path).expect("log file written");
    assert!(log.contains("Resolved conventions"), "{log}");
}

#[test]
fn config_can_turn_on_record_listing() {
    let workspace = Workspace::new();
    let config = workspace.write("config.toml", "[report]\nlist_records = true\n");
    let input = workspace.write("build.json", &recorded_script());

    let output = workspace.run(&config, &["check", input.to_str().expect("utf-8 path")]);

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("  version = \"1.0\"\n"), "{stdout}");
    assert!(stdout.contains("  + implementation()\n"), "{stdout}");
}

#[test]
fn unclassifiable_record_fails_with_its_provenance() {
    let workspace = Workspace::new();
    let config = workspace.write("config.toml", "");
    let mut script = ScriptRecorder::new();
    let top = script.top();
    let conventions = script.block(top, "conventions");
    script.assign(conventions, "version", text("1.0"));
    let json = serde_json::to_string(&script.finish()).expect("serialize");
    let input = workspace.write("build.json", &json);

    let output = workspace.run(&config, &["check", input.to_str().expect("utf-8 path")]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr
            .matches("assignment 0 to 'version' is not inside a software type block")
            .count(),
        1,
        "{stderr}"
    );
    assert_eq!(stderr.lines().count(), 1, "{stderr}");
    assert!(stderr.starts_with("error: failed to resolve conventions in "), "{stderr}");
    assert!(stderr.contains("<top-level> > conventions"), "{stderr}");
}

#[test]
fn malformed_input_is_reported() {
    let workspace = Workspace::new();
    let config = workspace.write("config.toml", "");
    let input = workspace.write(
        "build.json",
        r#"{"provenance": {"nodes": [{"kind": "implicit_self", "resolved_to": 4}]}}"#,
    );

    let output = workspace.run(&config, &["check", input.to_str().expect("utf-8 path")]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load resolution result"), "{stderr}");
    assert!(stderr.contains("not an earlier node"), "{stderr}");
}

#[test]
fn invalid_config_stops_before_processing() {
    let workspace = Workspace::new();
    let config = workspace.write("config.toml", "[report\n");
    let input = workspace.write("build.json", &recorded_script());

    let output = workspace.run(&config, &["check", input.to_str().expect("utf-8 path")]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("failed to parse config"),
        "{output:?}"
    );
}
