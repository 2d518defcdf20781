use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn keel(workspace: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("keel").unwrap();
    cmd.current_dir(workspace.path()).env("KEEL_LOG_CONSOLE", "none");
    cmd
}

#[test]
fn test_version_command() {
    let mut cmd = Command::cargo_bin("keel").unwrap();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("keel"));
}

#[test]
fn test_help_lists_task_commands() {
    let mut cmd = Command::cargo_bin("keel").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("TASK COMMANDS"))
        .stdout(predicate::str::contains("last-revision"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn test_export_help() {
    let mut cmd = Command::cargo_bin("keel").unwrap();
    cmd.arg("export").arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--to-dir"));
}

#[test]
fn test_unknown_sink_type_is_a_configuration_error() {
    let workspace = TempDir::new().unwrap();
    let mut cmd = keel(&workspace);
    cmd.args(["-D", "sink.type=syslog", "run", "info"]);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Unable to configure build log sink"));
}

#[test]
fn test_malformed_definition_is_rejected() {
    let workspace = TempDir::new().unwrap();
    let mut cmd = keel(&workspace);
    cmd.args(["-D", "sink.type", "run", "info"]);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("expected key=value"));
}

#[test]
fn test_missing_client_fails_the_build() {
    let workspace = TempDir::new().unwrap();
    let missing = workspace.path().join("no-such-svn");
    let mut cmd = keel(&workspace);
    cmd.args(["-D", "sink.name=build.log", "run", "info", "--executable"])
        .arg(&missing);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("not available"));

    let log = fs::read_to_string(workspace.path().join("build.log")).unwrap();
    assert!(log.contains("keel [info] Starting build with buildfile: "));
    assert!(log.contains("Build failed. [reason: "));
}

#[test]
fn test_working_copy_without_metadata_fails() {
    let workspace = TempDir::new().unwrap();
    let checkout = workspace.path().join("checkout");
    fs::create_dir(&checkout).unwrap();
    let mut cmd = keel(&workspace);
    cmd.args(["-D", "sink.type=null", "last-revision", "--executable", "/bin/sh"])
        .arg("--working-copy")
        .arg(&checkout);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("doesn't seem to be a working copy"));
}

#[cfg(unix)]
mod fake_client {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("svn");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn test_last_revision_prints_property() {
        let workspace = TempDir::new().unwrap();
        let svn = write_script(
            workspace.path(),
            "echo \"Path: trunk\"\necho \"Revision: 77\"\necho \"Last Changed Rev: 70\"",
        );
        let mut cmd = keel(&workspace);
        cmd.args(["-D", "sink.type=null", "last-revision"])
            .args(["--repository-url", "http://svn.example.org/repo", "--executable"])
            .arg(&svn);
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("svn.lastrevision=77"));
    }

    #[test]
    fn test_last_changed_revision_with_custom_property() {
        let workspace = TempDir::new().unwrap();
        let svn = write_script(workspace.path(), "echo \"Revision: 77\"\necho \"Last Changed Rev: 70\"");
        let mut cmd = keel(&workspace);
        cmd.args(["-D", "sink.type=null", "last-revision", "--last-changed"])
            .args(["--property", "build.revision", "--executable"])
            .arg(&svn);
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("build.revision=70"));
    }

    #[test]
    fn test_client_stderr_becomes_failure_reason() {
        let workspace = TempDir::new().unwrap();
        let svn = write_script(workspace.path(), "echo \"E170013: Unable to connect\" >&2\nexit 1");
        let mut cmd = keel(&workspace);
        cmd.args(["-D", "sink.name=build.log", "run", "update", "--executable"])
            .arg(&svn);
        cmd.assert().code(1);

        let log = fs::read_to_string(workspace.path().join("build.log")).unwrap();
        assert!(log.contains(
            "Build failed. [reason: Failed to run the 'svn update' command: E170013: Unable to connect]"
        ));
    }

    #[test]
    fn test_run_logs_output_lines_with_task_prefix() {
        let workspace = TempDir::new().unwrap();
        let svn = write_script(workspace.path(), "echo \"mode=$1 args=$2 $3\"");
        let mut cmd = keel(&workspace);
        cmd.args([
            "-D",
            "sink.name=build.log",
            "--project",
            "site",
            "run",
            "--repository-url",
            "http://x",
            "--executable",
        ])
        .arg(&svn)
        .args(["status", "--", "-v"]);
        cmd.assert().success();

        let log = fs::read_to_string(workspace.path().join("build.log")).unwrap();
        assert!(log.contains("site [info]      [svn] mode=status args=http://x -v"));
        assert!(log.contains("Finished successful build."));
    }
}
