//! End-to-end runs of the binary against a scripted stand-in for the docker CLI.
#![cfg(unix)]

use std::fs;
use std::net::TcpListener;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

const FAKE_DOCKER: &str = r#"#!/bin/sh
printf '%s\n' "$*" >> "$FAKE_DOCKER_LOG"
if [ "$1" = "$FAKE_DOCKER_SIGINT_ON" ]; then kill -INT "$PPID"; fi
case "$1" in
  --version) echo "Docker version 27.3.1, build fake"; exit 0 ;;
  info) exit 0 ;;
  ps)
    if [ -n "$FAKE_DOCKER_CONTAINER" ]; then echo "openclaw-gateway"; fi
    exit 0 ;;
  inspect)
    if [ -z "$FAKE_DOCKER_CONTAINER" ]; then echo "Error: No such object" >&2; exit 1; fi
    case "$3" in
      *Health*) echo "${FAKE_DOCKER_HEALTH:-healthy}" ;;
      *) echo running ;;
    esac
    exit 0 ;;
  compose)
    if [ "$2" = "version" ]; then echo "Docker Compose version v2.29.7"; exit 0; fi
    for word in "$@"; do
      if [ "$word" = "$FAKE_DOCKER_FAIL" ]; then echo "simulated $word failure" >&2; exit 1; fi
    done
    exit 0 ;;
esac
exit 0
"#;

struct Fixture {
    _root: TempDir,
    home: PathBuf,
    project: PathBuf,
    config: PathBuf,
    docker: PathBuf,
    docker_log: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        let home = root.path().join("home");
        let project = root.path().join("project");
        fs::create_dir_all(&home).expect("create home");
        fs::create_dir_all(&project).expect("create project");

        for file in ["Dockerfile", "docker-compose.yml", ".env.example"] {
            fs::write(project.join(file), "").expect("write project file");
        }

        let config = root.path().join("deploy.yml");
        fs::write(
            &config,
            format!(
                "gateway_port: {}\nrequired_disk_gb: 0\nhealth_poll_interval_secs: 1\nhealth_wait_timeout_secs: 5\n",
                free_port()
            ),
        )
        .expect("write config");

        let docker = root.path().join("docker");
        fs::write(&docker, FAKE_DOCKER).expect("write fake docker");
        fs::set_permissions(&docker, fs::Permissions::from_mode(0o755))
            .expect("make fake docker executable");

        let docker_log = root.path().join("docker.log");

        Self {
            _root: root,
            home,
            project,
            config,
            docker,
            docker_log,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("openclaw-deploy");
        cmd.env("HOME", &self.home)
            .env("OPENCLAW_DOCKER_BIN", &self.docker)
            .env("FAKE_DOCKER_LOG", &self.docker_log)
            .env("OPENCLAW_DEPLOY_NO_TTY", "1")
            .env_remove("FAKE_DOCKER_CONTAINER")
            .env_remove("FAKE_DOCKER_FAIL")
            .env_remove("FAKE_DOCKER_HEALTH")
            .env_remove("FAKE_DOCKER_SIGINT_ON")
            .env_remove("RUST_LOG")
            .arg("-C")
            .arg(&self.project)
            .arg("--config")
            .arg(&self.config);
        cmd
    }

    fn env_file(&self) -> PathBuf {
        self.project.join(".env")
    }

    fn docker_calls(&self) -> Vec<String> {
        fs::read_to_string(&self.docker_log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn compose_calls(&self, subcommand: &str) -> Vec<String> {
        self.docker_calls()
            .into_iter()
            .filter(|call| call.starts_with("compose -f") && call.contains(subcommand))
            .collect()
    }
}

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}

#[test]
fn version_flag_prints_version() {
    assert_cmd::cargo::cargo_bin_cmd!("openclaw-deploy")
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("openclaw-deploy"));
}

#[test]
fn help_lists_commands() {
    assert_cmd::cargo::cargo_bin_cmd!("openclaw-deploy")
        .arg("--help")
        .assert()
        .success()
        .stdout(
            contains("deploy")
                .and(contains("status"))
                .and(contains("cleanup"))
                .and(contains("update"))
                .and(contains("logs")),
        );
}

#[test]
fn deploy_writes_env_file_and_starts_services() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .args(["deploy", "--no-interactive", "--skip-health-check"])
        .assert()
        .success()
        .stdout(contains("Deployment completed successfully").and(contains("?token=")));

    let env = read(&fixture.env_file());
    assert!(env.contains("OPENCLAW_GATEWAY_TOKEN="));
    assert!(fixture.home.join(".openclaw").is_dir());
    assert!(fixture.home.join("openclaw").join("workspace").is_dir());
    assert_eq!(fixture.compose_calls(" build").len(), 1);
    assert_eq!(fixture.compose_calls(" up").len(), 1);
    assert!(fixture.compose_calls(" down").is_empty());
}

#[test]
fn deploy_uses_given_gateway_token() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .args([
            "deploy",
            "--no-interactive",
            "--skip-health-check",
            "--gateway-token",
            "given-token",
        ])
        .assert()
        .success()
        .stdout(contains("Token:   given-token"));

    assert!(read(&fixture.env_file()).contains("OPENCLAW_GATEWAY_TOKEN=given-token"));
}

#[test]
fn deploy_waits_for_healthy_gateway() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .env("FAKE_DOCKER_CONTAINER", "1")
        .args(["deploy", "--no-interactive"])
        .assert()
        .success();

    assert!(
        fixture
            .docker_calls()
            .iter()
            .any(|call| call.contains("{{.State.Health.Status}}"))
    );
}

#[test]
fn failed_build_rolls_back_env_file() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .env("FAKE_DOCKER_FAIL", "build")
        .args(["deploy", "--no-interactive"])
        .assert()
        .code(1)
        .stderr(
            contains("error: deployment failed")
                .and(contains("caused by: command failed"))
                .and(contains("simulated build failure"))
                .and(contains("✓ Remove .env file"))
                .and(contains("Rollback completed successfully")),
        );

    assert!(!fixture.env_file().exists());
    assert!(fixture.compose_calls(" down").is_empty());
}

#[test]
fn failed_build_restores_previous_env_file() {
    let fixture = Fixture::new();
    let previous = "OPENCLAW_GATEWAY_TOKEN=previous-token\n";
    fs::write(fixture.env_file(), previous).expect("write previous env file");

    fixture
        .cmd()
        .env("FAKE_DOCKER_FAIL", "build")
        .args(["deploy", "--no-interactive"])
        .assert()
        .code(1)
        .stderr(contains("✓ Restore previous .env file"));

    assert_eq!(read(&fixture.env_file()), previous);
}

#[test]
fn unhealthy_gateway_unwinds_in_reverse_order() {
    let fixture = Fixture::new();

    let output = fixture
        .cmd()
        .env("FAKE_DOCKER_CONTAINER", "1")
        .env("FAKE_DOCKER_HEALTH", "unhealthy")
        .args(["deploy", "--no-interactive"])
        .assert()
        .code(1)
        .stderr(contains("health check failed"))
        .get_output()
        .stderr
        .clone();

    let stderr = String::from_utf8_lossy(&output);
    let stop = stderr.find("✓ Stop services").expect("stop services undone");
    let env = stderr.find("✓ Remove .env file").expect("env file undone");
    assert!(stop < env);
    assert_eq!(fixture.compose_calls(" down").len(), 1);
    assert!(!fixture.env_file().exists());
}

#[test]
fn ctrl_c_during_health_wait_still_stops_services() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .env("FAKE_DOCKER_CONTAINER", "1")
        .env("FAKE_DOCKER_HEALTH", "starting")
        .env("FAKE_DOCKER_SIGINT_ON", "inspect")
        .args(["deploy", "--no-interactive"])
        .assert()
        .code(130)
        .stderr(contains("✓ Stop services").and(contains("✓ Remove .env file")));

    assert_eq!(fixture.compose_calls(" down").len(), 1);
    assert!(!fixture.env_file().exists());
}

#[test]
fn disabled_rollback_leaves_partial_state() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .env("FAKE_DOCKER_FAIL", "build")
        .args(["deploy", "--no-interactive", "--no-rollback"])
        .assert()
        .code(1)
        .stderr(
            contains("Rollback is disabled")
                .and(contains("openclaw-deploy cleanup"))
                .and(contains("docker compose down")),
        );

    assert!(fixture.env_file().exists());
}

#[test]
fn failed_validation_changes_nothing() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.project.join("Dockerfile")).expect("remove Dockerfile");

    fixture
        .cmd()
        .args(["deploy", "--no-interactive"])
        .assert()
        .code(1)
        .stderr(contains("prerequisite validation failed").and(contains("Nothing to roll back")));

    assert!(!fixture.env_file().exists());
    assert!(fixture.compose_calls(" build").is_empty());
}

#[test]
fn status_of_missing_deployment_fails() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .arg("status")
        .assert()
        .code(1)
        .stdout(contains("Container Exists:  ✗ No").and(contains("NOT HEALTHY")))
        .stderr(contains("error: deployment is not healthy"));
}

#[test]
fn status_of_healthy_deployment_succeeds() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .env("FAKE_DOCKER_CONTAINER", "1")
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Container Running: ✓ Yes").and(contains("Status: ✓ HEALTHY")));
}

#[test]
fn logs_passes_tail_and_follow() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .args(["logs", "--tail", "10", "-f"])
        .assert()
        .success();

    let calls = fixture.compose_calls(" logs");
    assert_eq!(calls.len(), 1);
    assert!(calls[0].ends_with("logs --tail 10 -f openclaw-gateway"));
}

#[test]
fn cleanup_without_deployment_is_a_no_op() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .args(["cleanup", "--no-interactive"])
        .assert()
        .success()
        .stdout(contains("Nothing to clean up"));

    assert!(fixture.compose_calls(" down").is_empty());
}

#[test]
fn cleanup_all_removes_env_file() {
    let fixture = Fixture::new();
    fs::write(fixture.env_file(), "OPENCLAW_GATEWAY_TOKEN=abc\n").expect("write env file");

    fixture
        .cmd()
        .env("FAKE_DOCKER_CONTAINER", "1")
        .args(["cleanup", "--all", "--no-interactive"])
        .assert()
        .success()
        .stdout(contains("Cleanup completed").and(contains("rm -rf")));

    assert!(!fixture.env_file().exists());
    assert_eq!(fixture.compose_calls(" down -v").len(), 1);
    let calls = fixture.docker_calls();
    assert!(calls.iter().any(|call| call == "volume rm -f openclaw-home"));
    assert!(calls.iter().any(|call| call == "rmi -f openclaw:local"));
}

#[test]
fn update_without_deployment_fails() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .arg("update")
        .assert()
        .code(1)
        .stderr(contains("does not exist").and(contains("openclaw-deploy deploy")));

    assert!(fixture.compose_calls(" build").is_empty());
}

#[test]
fn failed_update_restarts_previous_services() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .env("FAKE_DOCKER_CONTAINER", "1")
        .env("FAKE_DOCKER_FAIL", "build")
        .arg("update")
        .assert()
        .code(1)
        .stderr(contains("error: update failed").and(contains("✓ Start previous services")));

    assert_eq!(fixture.compose_calls(" down").len(), 1);
    assert_eq!(fixture.compose_calls(" up").len(), 1);
    assert_eq!(fixture.compose_calls(" build --no-cache").len(), 1);
}
