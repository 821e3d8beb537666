use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    CommandOutput, CommandRunner, CommandSpec, Compose, ComposeProject, ContainerStatus,
    HealthStatus, Result,
};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const DAEMON_TIMEOUT: Duration = Duration::from_secs(10);
const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper around the docker CLI.
#[derive(Debug, Clone)]
pub struct Docker {
    binary: String,
    runner: CommandRunner,
}

impl Docker {
    #[must_use]
    pub fn new(binary: impl Into<String>, runner: CommandRunner) -> Self {
        Self {
            binary: binary.into(),
            runner,
        }
    }

    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    #[must_use]
    pub fn runner(&self) -> &CommandRunner {
        &self.runner
    }

    /// A command for this docker binary with `args` appended.
    #[must_use]
    pub fn command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new(self.binary.as_str()).args(args)
    }

    /// # Errors
    ///
    /// Returns an error if `docker` cannot be run or `run` fails.
    pub fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.runner.run(spec)
    }

    /// Output of `docker --version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary is missing or exits unsuccessfully.
    pub fn version(&self) -> Result<String> {
        let output = self.run(&self.command(["--version"]).timeout(PROBE_TIMEOUT))?;
        Ok(output.stdout.trim().to_string())
    }

    /// Output of `docker compose version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the compose plugin is unavailable.
    pub fn compose_version(&self) -> Result<String> {
        let output = self.run(&self.command(["compose", "version"]).timeout(PROBE_TIMEOUT))?;
        Ok(output.stdout.trim().to_string())
    }

    /// # Errors
    ///
    /// Returns an error if the daemon cannot be reached.
    pub fn info(&self) -> Result<()> {
        self.run(&self.command(["info"]).timeout(DAEMON_TIMEOUT))?;
        Ok(())
    }

    /// Run `docker ps` without checking the exit status, so callers can
    /// inspect stderr for permission problems.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be run at all.
    pub fn ps(&self) -> Result<CommandOutput> {
        self.run(&self.command(["ps"]).timeout(DAEMON_TIMEOUT).unchecked())
    }

    /// # Errors
    ///
    /// Returns an error if `docker ps` cannot be run.
    pub fn container_exists(&self, name: &str) -> Result<bool> {
        self.list_contains(name, true)
    }

    /// # Errors
    ///
    /// Returns an error if `docker ps` cannot be run.
    pub fn container_running(&self, name: &str) -> Result<bool> {
        self.list_contains(name, false)
    }

    fn list_contains(&self, name: &str, include_stopped: bool) -> Result<bool> {
        let mut args = vec!["ps"];
        if include_stopped {
            args.push("-a");
        }
        let filter = format!("name={name}");
        args.extend(["--filter", filter.as_str(), "--format", "{{.Names}}"]);

        let output = self.run(&self.command(args).timeout(QUERY_TIMEOUT).unchecked())?;
        Ok(output.stdout.lines().any(|line| line.trim() == name))
    }

    /// `None` when the container does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if `docker inspect` cannot be run.
    pub fn container_status(&self, name: &str) -> Result<Option<ContainerStatus>> {
        Ok(self
            .inspect(name, "{{.State.Status}}")?
            .map(|raw| ContainerStatus::parse(&raw)))
    }

    /// `None` when the container does not exist or has no health check.
    ///
    /// # Errors
    ///
    /// Returns an error if `docker inspect` cannot be run.
    pub fn container_health(&self, name: &str) -> Result<Option<HealthStatus>> {
        Ok(self
            .inspect(name, "{{.State.Health.Status}}")?
            .and_then(|raw| HealthStatus::parse(&raw)))
    }

    fn inspect(&self, name: &str, format: &str) -> Result<Option<String>> {
        let output = self.run(
            &self
                .command(["inspect", "--format", format, name])
                .timeout(QUERY_TIMEOUT)
                .unchecked(),
        )?;
        if output.success() {
            Ok(Some(output.stdout.trim().to_string()))
        } else {
            debug!(container = name, format, "inspect returned no value");
            Ok(None)
        }
    }

    /// Remove a container if it exists. Returns whether it was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if docker cannot be run.
    pub fn remove_container(&self, name: &str, force: bool) -> Result<bool> {
        if !self.container_exists(name)? {
            debug!(container = name, "container absent, nothing to remove");
            return Ok(false);
        }

        info!(container = name, "removing container");
        let output = self.run(&self.command(removal_args(&["rm"], force, name)).unchecked())?;
        if output.success() {
            info!(container = name, "✓ container removed");
        } else {
            warn!(container = name, error = output.diagnostic(), "could not remove container");
        }
        Ok(output.success())
    }

    /// Returns whether the image was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if docker cannot be run.
    pub fn remove_image(&self, name: &str, force: bool) -> Result<bool> {
        info!(image = name, "removing image");
        let output = self.run(&self.command(removal_args(&["rmi"], force, name)).unchecked())?;
        if output.success() {
            info!(image = name, "✓ image removed");
        } else {
            warn!(image = name, error = output.diagnostic(), "could not remove image");
        }
        Ok(output.success())
    }

    /// Returns whether the volume was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if docker cannot be run.
    pub fn remove_volume(&self, name: &str, force: bool) -> Result<bool> {
        info!(volume = name, "removing volume");
        let output = self.run(
            &self
                .command(removal_args(&["volume", "rm"], force, name))
                .unchecked(),
        )?;
        if output.success() {
            info!(volume = name, "✓ volume removed");
        } else {
            warn!(volume = name, error = output.diagnostic(), "could not remove volume");
        }
        Ok(output.success())
    }

    #[must_use]
    pub fn compose<'a>(&'a self, project: &'a ComposeProject) -> Compose<'a> {
        Compose::new(self, project)
    }
}

fn removal_args<'a>(subcommand: &[&'a str], force: bool, name: &'a str) -> Vec<&'a str> {
    let mut args = subcommand.to_vec();
    if force {
        args.push("-f");
    }
    args.push(name);
    args
}
