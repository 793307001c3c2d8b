//! Integration tests for the kiln binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_workflow(name: &str, content: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(name), content).unwrap();
    temp
}

fn kiln(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("kiln"));
    cmd.current_dir(temp.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

const SCAFFOLD: &str = r#"
meta:
  name: starter
  version: "0.3.0"
config:
  variables:
    project_name: demo
workflow:
  phases:
    - title: Scaffold
      steps:
        - title: Source folder
          type: directory
          paths: ["{{project_name}}/src"]
          validate:
            test: exists
            path: "{{project_name}}/src"
"#;

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("kiln"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("kiln"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_config_argument() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("kiln"));
    cmd.assert().failure();
    Ok(())
}

#[test]
fn cli_missing_config_exits_1() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    kiln(&temp)
        .arg("absent.yml")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
    Ok(())
}

#[test]
fn cli_malformed_config_exits_1() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_workflow("broken.yml", "workflow: [unclosed\n");
    kiln(&temp)
        .arg("broken.yml")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config"));
    Ok(())
}

#[test]
fn cli_creates_project_directory() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_workflow("kiln.yml", SCAFFOLD);
    kiln(&temp)
        .arg("kiln.yml")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo is ready!"));
    assert!(temp.path().join("demo/src").is_dir());
    Ok(())
}

#[test]
fn cli_runs_in_cwd_option() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_workflow("kiln.yml", SCAFFOLD);
    fs::create_dir(temp.path().join("out"))?;
    kiln(&temp)
        .args(["kiln.yml", "--cwd", "out"])
        .assert()
        .success();
    assert!(temp.path().join("out/demo/src").is_dir());
    assert!(!temp.path().join("demo").exists());
    Ok(())
}

#[test]
fn cli_dry_run_changes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_workflow("kiln.yml", SCAFFOLD);
    kiln(&temp)
        .args(["kiln.yml", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would create directory"));
    assert!(!temp.path().join("demo").exists());
    Ok(())
}

#[test]
fn cli_prompt_answered_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_workflow(
        "kiln.yml",
        r##"
config:
  prompts:
    - name: project_name
      message: Project name?
workflow:
  phases:
    - title: Scaffold
      steps:
        - title: Readme
          type: file
          action: create
          path: "{{project_name}}/README.md"
          content: "# {{project_name}}"
"##,
    );
    kiln(&temp)
        .arg("kiln.yml")
        .arg("--non-interactive")
        .env("KILN_PROMPT_PROJECT_NAME", "envapp")
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(temp.path().join("envapp/README.md"))?,
        "# envapp"
    );
    Ok(())
}

#[test]
fn cli_prompt_without_answer_fails_before_steps() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_workflow(
        "kiln.yml",
        r#"
config:
  prompts:
    - name: project_name
      message: Project name?
workflow:
  phases:
    - title: Scaffold
      steps:
        - title: Marker
          type: directory
          paths: [marker]
"#,
    );
    kiln(&temp)
        .args(["kiln.yml", "--non-interactive"])
        .env_remove("KILN_PROMPT_PROJECT_NAME")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("KILN_PROMPT_PROJECT_NAME"));
    assert!(!temp.path().join("marker").exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn cli_failing_command_exits_1() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_workflow(
        "kiln.yml",
        r#"
workflow:
  phases:
    - title: Build
      steps:
        - title: Broken build
          type: command
          cmd: exit 3
        - title: Never runs
          type: directory
          paths: [after]
"#,
    );
    kiln(&temp)
        .arg("kiln.yml")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("✗"))
        .stderr(predicate::str::contains("Broken build"))
        .stderr(predicate::str::contains("exit code 3"));
    assert!(!temp.path().join("after").exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn cli_interactive_command_is_answered() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_workflow(
        "kiln.yml",
        r#"
workflow:
  phases:
    - title: Init
      steps:
        - title: Ask
          type: command
          cmd: "printf 'Package name: '; read answer; echo \"$answer\" > answer.txt"
          haveInteraction: true
          interactions:
            - question: "Package name"
              answer: widget
          validate:
            test: contains
            path: answer.txt
            text: widget
"#,
    );
    kiln(&temp).arg("kiln.yml").write_stdin("").assert().success();
    Ok(())
}

#[test]
fn cli_unsupported_step_type_exits_1() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_workflow(
        "kiln.yml",
        r#"
workflow:
  phases:
    - title: One
      steps:
        - title: Odd
          type: teleport
"#,
    );
    kiln(&temp)
        .arg("kiln.yml")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported step type: teleport"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn cli_plain_command_after_interactive_reads_stdin() -> Result<(), Box<dyn std::error::Error>> {
    use std::io::Write;
    use std::process::Stdio;
    use std::thread;
    use std::time::Duration;

    let temp = setup_workflow(
        "kiln.yml",
        r#"
workflow:
  phases:
    - title: Init
      steps:
        - title: Interactive
          type: command
          cmd: "true"
          haveInteraction: true
        - title: Reads stdin
          type: command
          cmd: 'sleep 1; read x; echo "[$x]" > out.txt'
"#,
    );

    let mut child = std::process::Command::new(cargo_bin("kiln"))
        .arg("kiln.yml")
        .current_dir(temp.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let mut stdin = child.stdin.take().ok_or("stdin not piped")?;
    thread::sleep(Duration::from_millis(400));
    writeln!(stdin, "hello")?;
    drop(stdin);

    assert!(child.wait()?.success());
    assert_eq!(fs::read_to_string(temp.path().join("out.txt"))?, "[hello]\n");
    Ok(())
}
