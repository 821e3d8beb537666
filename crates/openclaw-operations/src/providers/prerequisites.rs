use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::path::Path;
use std::time::Duration;

use openclaw_docker::{CommandSpec, Docker, DockerError};
use tracing::debug;

use crate::traits::{CheckOutcome, PrerequisiteChecker};

const PORT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);
const DF_TIMEOUT: Duration = Duration::from_secs(10);
const KIB_PER_GIB: f64 = 1024.0 * 1024.0;

/// Probes the local host and Docker installation.
pub struct SystemPrerequisites {
    docker: Docker,
}

impl SystemPrerequisites {
    #[must_use]
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }
}

impl PrerequisiteChecker for SystemPrerequisites {
    fn docker_installed(&self) -> CheckOutcome {
        match self.docker.version() {
            Ok(version) => CheckOutcome::pass(format!("Docker found: {version}")),
            Err(err) if err.is_not_found() => CheckOutcome::fail(
                "Docker is not installed. Install from https://docs.docker.com/get-docker/",
            ),
            Err(err) => CheckOutcome::fail(format!("Docker command failed: {err}")),
        }
    }

    fn docker_compose(&self) -> CheckOutcome {
        match self.docker.compose_version() {
            Ok(version) => CheckOutcome::pass(format!("Docker Compose found: {version}")),
            Err(err) => {
                debug!(%err, "compose version probe failed");
                CheckOutcome::fail(
                    "Docker Compose V2 not available. Update Docker or install the compose plugin.",
                )
            }
        }
    }

    fn docker_running(&self) -> CheckOutcome {
        match self.docker.info() {
            Ok(()) => CheckOutcome::pass("Docker daemon is running"),
            Err(DockerError::TimedOut { .. }) => {
                CheckOutcome::fail("Docker daemon check timed out")
            }
            Err(err) => {
                debug!(%err, "docker info failed");
                CheckOutcome::fail("Docker daemon is not running. Start Docker and try again.")
            }
        }
    }

    fn docker_permissions(&self) -> CheckOutcome {
        match self.docker.ps() {
            Ok(output) if output.success() => CheckOutcome::pass("Docker permissions OK"),
            Ok(output) if output.stderr.to_lowercase().contains("permission denied") => {
                CheckOutcome::fail("Permission denied. Add user to docker group or run with sudo.")
            }
            Ok(output) => CheckOutcome::fail(format!(
                "Docker permissions check failed: {}",
                output.diagnostic()
            )),
            Err(err) => CheckOutcome::fail(format!("Error checking Docker permissions: {err}")),
        }
    }

    fn port_available(&self, port: u16) -> CheckOutcome {
        let address = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        match TcpStream::connect_timeout(&address, PORT_PROBE_TIMEOUT) {
            Ok(_) => CheckOutcome::fail(format!("Port {port} is already in use")),
            Err(_) => CheckOutcome::pass(format!("Port {port} is available")),
        }
    }

    fn disk_space(&self, path: &Path, required_gb: f64) -> CheckOutcome {
        if required_gb <= 0.0 {
            return CheckOutcome::pass("Disk space check skipped");
        }

        let spec = CommandSpec::new("df")
            .args(["-Pk".to_string(), path.display().to_string()])
            .timeout(DF_TIMEOUT);
        let output = match self.docker.runner().run(&spec) {
            Ok(output) => output,
            Err(err) => return CheckOutcome::fail(format!("Error checking disk space: {err}")),
        };

        let Some(available_kib) = parse_df_available_kib(&output.stdout) else {
            return CheckOutcome::fail("Error checking disk space: unexpected df output");
        };

        #[allow(clippy::cast_precision_loss)]
        let available_gb = available_kib as f64 / KIB_PER_GIB;
        if available_gb >= required_gb {
            CheckOutcome::pass(format!("Disk space OK: {available_gb:.2} GB available"))
        } else {
            CheckOutcome::fail(format!(
                "Insufficient disk space: {available_gb:.2} GB available, {required_gb} GB required"
            ))
        }
    }

    fn required_files(&self, project_dir: &Path, compose_file: &Path) -> CheckOutcome {
        let required = [Path::new("Dockerfile"), compose_file, Path::new(".env.example")];
        let missing: Vec<String> = required
            .iter()
            .filter(|file| !project_dir.join(file).exists())
            .map(|file| file.display().to_string())
            .collect();

        if missing.is_empty() {
            CheckOutcome::pass("All required files present")
        } else {
            CheckOutcome::fail(format!("Missing required files: {}", missing.join(", ")))
        }
    }
}

/// Available KiB from POSIX `df -Pk` output.
fn parse_df_available_kib(stdout: &str) -> Option<u64> {
    stdout
        .lines()
        .nth(1)?
        .split_whitespace()
        .nth(3)?
        .parse()
        .ok()
}
