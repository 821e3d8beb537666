use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use tracing::info;

use crate::{CommandOutput, CommandSpec, Docker, Result};

const BUILD_TIMEOUT: Duration = Duration::from_secs(1200);
const UP_TIMEOUT: Duration = Duration::from_secs(120);
const DOWN_TIMEOUT: Duration = Duration::from_secs(60);
const RESTART_TIMEOUT: Duration = Duration::from_secs(120);

/// A compose project: where it lives, which file describes it, and the
/// variables its services are started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeProject {
    project_dir: PathBuf,
    compose_file: PathBuf,
    env: IndexMap<String, String>,
}

impl ComposeProject {
    /// `compose_file` is resolved against `project_dir` when relative.
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>, compose_file: impl AsRef<Path>) -> Self {
        let project_dir = project_dir.into();
        let compose_file = project_dir.join(compose_file);
        Self {
            project_dir,
            compose_file,
            env: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_env(mut self, env: IndexMap<String, String>) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    #[must_use]
    pub fn compose_file(&self) -> &Path {
        &self.compose_file
    }

    #[must_use]
    pub fn env(&self) -> &IndexMap<String, String> {
        &self.env
    }
}

/// `docker compose` subcommands bound to one project.
#[derive(Debug, Clone, Copy)]
pub struct Compose<'a> {
    docker: &'a Docker,
    project: &'a ComposeProject,
}

impl<'a> Compose<'a> {
    #[must_use]
    pub fn new(docker: &'a Docker, project: &'a ComposeProject) -> Self {
        Self { docker, project }
    }

    /// The base `docker compose -f <file> <subcommand...>` invocation.
    #[must_use]
    pub fn command<I, S>(&self, subcommand: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.docker
            .command(["compose", "-f"])
            .arg(self.project.compose_file.display().to_string())
            .args(subcommand)
            .current_dir(&self.project.project_dir)
            .envs(
                self.project
                    .env
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            )
    }

    /// # Errors
    ///
    /// Returns an error if the build fails or exceeds its time limit.
    pub fn build(&self, no_cache: bool) -> Result<()> {
        let mut args = vec!["build"];
        if no_cache {
            args.push("--no-cache");
        }
        info!(no_cache, "building images");
        self.docker
            .run(&self.command(args).timeout(BUILD_TIMEOUT))?;
        Ok(())
    }

    /// Start services detached.
    ///
    /// # Errors
    ///
    /// Returns an error if `compose up` fails.
    pub fn up(&self) -> Result<()> {
        info!("starting services");
        self.docker
            .run(&self.command(["up", "-d"]).timeout(UP_TIMEOUT))?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if `compose down` fails.
    pub fn down(&self, remove_volumes: bool) -> Result<()> {
        let mut args = vec!["down"];
        if remove_volumes {
            args.push("-v");
        }
        info!(remove_volumes, "stopping services");
        self.docker
            .run(&self.command(args).timeout(DOWN_TIMEOUT))?;
        Ok(())
    }

    /// Restart one service, or every service when `service` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if `compose restart` fails.
    pub fn restart(&self, service: Option<&str>) -> Result<()> {
        let mut args = vec!["restart"];
        args.extend(service);
        info!(service, "restarting services");
        self.docker
            .run(&self.command(args).timeout(RESTART_TIMEOUT))?;
        Ok(())
    }

    /// Stream service logs to the terminal. The exit status is returned, not
    /// checked.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started or is interrupted.
    pub fn logs(&self, tail: usize, follow: bool, service: &str) -> Result<CommandOutput> {
        let tail = tail.to_string();
        let mut args = vec!["logs", "--tail", tail.as_str()];
        if follow {
            args.push("-f");
        }
        args.push(service);
        self.docker
            .run(&self.command(args).inherit_output().unchecked())
    }
}
