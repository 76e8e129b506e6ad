//! Command line behavior of the doccop binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const VOID_WITH_RETURNS: &str = "\
public class Widget
{
    /// <summary>Starts it.</summary>
    /// <returns>nothing</returns>
    public void Start() { }
}
";

const FIXED: &str = "\
public class Widget
{
    /// <summary>Starts it.</summary>
    public void Start() { }
}
";

fn doccop(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_doccop"))
        .current_dir(dir)
        .arg("--no-config")
        .args(args)
        .output()
        .unwrap()
}

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("src")).unwrap();
    fs::write(temp.path().join("src/Widget.cs"), VOID_WITH_RETURNS).unwrap();
    fs::write(
        temp.path().join("src/Clean.cs"),
        "class C\n{\n    /// <returns>1</returns>\n    int M() => 1;\n}\n",
    )
    .unwrap();
    fs::write(temp.path().join("src/notes.txt"), "/// <returns/>\nvoid M();\n").unwrap();
    temp
}

#[test]
fn check_mode_reports_and_exits_two() {
    let temp = project();
    let output = doccop(temp.path(), &["src"]);

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("4:9"));
    assert!(stdout.contains("SA1617"));
    assert!(stdout.contains("Void return value must not be documented"));
    assert_eq!(
        fs::read_to_string(temp.path().join("src/Widget.cs")).unwrap(),
        VOID_WITH_RETURNS
    );
}

#[test]
fn fix_mode_rewrites_files() {
    let temp = project();
    let output = doccop(temp.path(), &["--fix", "src"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read_to_string(temp.path().join("src/Widget.cs")).unwrap(), FIXED);

    let again = doccop(temp.path(), &["src"]);
    assert_eq!(again.status.code(), Some(0));
}

#[test]
fn json_output() {
    let temp = project();
    let output = doccop(temp.path(), &["--json", "src"]);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["files_processed"], 2);
    assert_eq!(json["summary"]["total_diagnostics"], 1);

    let files = json["files"].as_array().unwrap();
    let widget = files
        .iter()
        .find(|f| f["path"].as_str().unwrap().ends_with("Widget.cs"))
        .unwrap();
    assert_eq!(widget["diagnostics"][0]["rule"], "SA1617");
    assert_eq!(widget["diagnostics"][0]["line"], 4);
    assert_eq!(widget["diagnostics"][0]["column"], 9);
}

#[test]
fn github_output() {
    let temp = project();
    let output = doccop(temp.path(), &["--format", "github", "src/Widget.cs"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        "::warning file=src/Widget.cs,line=4,col=9,title=SA1617::Void return value must not be documented"
    );
}

#[test]
fn diff_output() {
    let temp = project();
    let output = doccop(temp.path(), &["--format", "diff", "src/Widget.cs"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("--- a/src/Widget.cs\n+++ b/src/Widget.cs\n"));
    assert!(stdout.contains("-    /// <returns>nothing</returns>\n"));
}

#[test]
fn config_excludes_and_disables() {
    let temp = project();
    fs::write(
        temp.path().join(".doccop.toml"),
        "[paths]\nexclude = [\"Widget.cs\"]\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_doccop"))
        .current_dir(temp.path())
        .arg("src")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    fs::write(
        temp.path().join(".doccop.toml"),
        "[rules]\ndisabled = [\"SA1617\"]\n",
    )
    .unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_doccop"))
        .current_dir(temp.path())
        .arg("src")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No rules enabled"));
}

#[test]
fn unknown_rule_is_rejected() {
    let temp = project();
    let output = doccop(temp.path(), &["--rule", "SA9999", "src"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown rule 'SA9999'"));
}

#[test]
fn list_rules() {
    let temp = TempDir::new().unwrap();
    let output = doccop(temp.path(), &["--list-rules"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SA1617"));
    assert!(stdout.contains("void_return_value"));
}

#[test]
fn log_file_records_the_run() {
    let temp = project();
    let log = temp.path().join("run.log");
    let output = doccop(
        temp.path(),
        &["--log-file", log.to_str().unwrap(), "src"],
    );
    assert_eq!(output.status.code(), Some(2));

    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.contains("RUN SETTINGS"));
    assert!(contents.contains("Mode: check"));
    assert!(contents.contains("1 diagnostic(s)"));
    assert!(contents.contains("Diagnostics found: 1"));
}
