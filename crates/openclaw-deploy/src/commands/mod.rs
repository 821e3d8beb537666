mod cleanup;
mod deploy;
mod logs;
mod status;
mod update;

use std::path::PathBuf;

use clap::Subcommand;
use openclaw_config::{ConfigOverrides, DeploymentConfig, load_config};
use openclaw_docker::{CommandRunner, Docker, InterruptSignal};

use crate::environment;
use crate::error::Result;

pub(crate) use cleanup::CleanupArgs;
pub(crate) use deploy::DeployArgs;
pub(crate) use logs::LogsArgs;
pub(crate) use update::UpdateArgs;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Deploy the OpenClaw gateway with Docker Compose
    Deploy(DeployArgs),
    /// Show the state of the deployment
    Status,
    /// Remove the deployment
    Cleanup(CleanupArgs),
    /// Rebuild the image and restart the gateway
    Update(UpdateArgs),
    /// Show gateway logs
    Logs(LogsArgs),
}

/// Global options shared by every command.
pub(crate) struct Context {
    pub project_dir: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub verbose: bool,
    pub interrupt: InterruptSignal,
}

impl Context {
    pub(crate) fn load_config(&self, overrides: ConfigOverrides) -> Result<DeploymentConfig> {
        let overrides = ConfigOverrides {
            project_dir: self.project_dir.clone(),
            ..overrides
        };
        Ok(load_config(self.config_file.as_deref(), &overrides)?)
    }

    pub(crate) fn docker(&self) -> Docker {
        Docker::new(
            environment::docker_binary(),
            CommandRunner::new(self.interrupt.clone()),
        )
    }
}

impl Commands {
    pub(crate) fn execute(self, ctx: &Context) -> Result<()> {
        match self {
            Self::Deploy(args) => deploy::run(ctx, args),
            Self::Status => status::run(ctx),
            Self::Cleanup(args) => cleanup::run(ctx, args),
            Self::Update(args) => update::run(ctx, args),
            Self::Logs(args) => logs::run(ctx, args),
        }
    }
}
