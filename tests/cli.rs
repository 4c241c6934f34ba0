use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn waysketch_cmd() -> Command {
    Command::cargo_bin("waysketch").expect("binary exists")
}

#[test]
fn waysketch_help_prints_usage() {
    waysketch_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Building silhouette sketcher for Wayland compositors",
        ));
}

#[test]
fn editor_requires_wayland_env() {
    waysketch_cmd()
        .env_remove("WAYLAND_DISPLAY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wayland environment required"));
}

#[test]
fn print_config_path_works_without_wayland() {
    let temp = TempDir::new().unwrap();

    waysketch_cmd()
        .env_remove("WAYLAND_DISPLAY")
        .env_remove("XDG_CONFIG_HOME")
        .env("HOME", temp.path())
        .arg("--print-config-path")
        .assert()
        .success()
        .stdout(predicate::str::contains("waysketch"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn rejects_unsupported_canvas_size() {
    waysketch_cmd()
        .env_remove("WAYLAND_DISPLAY")
        .args(["--canvas", "1024x512"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported canvas size"));
}

#[test]
fn rejects_malformed_canvas_spec() {
    waysketch_cmd()
        .env_remove("WAYLAND_DISPLAY")
        .args(["--canvas", "wide"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid canvas spec"));
}
