use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Runs the binary against an isolated, nonexistent config file so the
/// user's own settings never leak into assertions.
struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_docktui"))
            .args(args)
            .arg("--config")
            .arg(self.config_path())
            .env_remove("DOCKTUI_LOG")
            .output()
            .expect("failed to run docktui")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn help_lists_subcommands() {
    let env = TestEnv::new();
    let output = env.run(&["--help"]);

    assert!(output.status.success());
    let text = stdout(&output);
    for command in ["list", "start", "stop", "logs", "inspect", "images", "ui"] {
        assert!(text.contains(command), "help is missing {command}: {text}");
    }
}

#[test]
fn no_arguments_prints_usage() {
    let env = TestEnv::new();
    let output = env.run(&[]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage:"));
}

#[test]
fn commands_without_id_print_hint() {
    let env = TestEnv::new();

    for command in ["start", "stop", "logs", "inspect"] {
        let output = env.run(&[command]);
        assert!(output.status.success(), "{command} exited with {:?}", output.status);
        assert_eq!(stdout(&output).trim(), "Please provide a container ID.");
    }
}

#[test]
fn invalid_tail_is_rejected() {
    let env = TestEnv::new();
    let output = env.run(&["logs", "abc", "--tail", "lots"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid tail"));
}

#[test]
fn version_includes_build_timestamp() {
    let env = TestEnv::new();
    let output = env.run(&["--version"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
    assert!(text.contains("built:"));
}
