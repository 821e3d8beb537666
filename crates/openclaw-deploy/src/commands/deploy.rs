use clap::Args;
use openclaw_config::ConfigOverrides;
use openclaw_operations::operations::{DeployInput, DeployOperation};
use openclaw_operations::providers::{DockerEngine, FileSystemHost, SystemPrerequisites};

use super::Context;
use crate::environment;
use crate::error::Result;
use crate::interaction::TerminalConfirmation;
use crate::output::render_deploy_summary;

#[derive(Args)]
pub(crate) struct DeployArgs {
    /// Gateway token (generated when not set)
    #[arg(long)]
    gateway_token: Option<String>,

    /// Anthropic API key, used when the configuration has none
    #[arg(long)]
    api_key: Option<String>,

    /// Build the image without the Docker build cache
    #[arg(long)]
    no_cache: bool,

    /// Do not wait for the gateway to become healthy
    #[arg(long)]
    skip_health_check: bool,

    /// Never prompt
    #[arg(long)]
    no_interactive: bool,

    /// Leave partial state in place when a step fails
    #[arg(long)]
    no_rollback: bool,
}

pub(crate) fn run(ctx: &Context, args: DeployArgs) -> Result<()> {
    let config = ctx.load_config(ConfigOverrides {
        gateway_token: args.gateway_token,
        api_key: args.api_key,
        ..ConfigOverrides::default()
    })?;

    let docker = ctx.docker();
    let operation = DeployOperation::new(
        DockerEngine::new(docker.clone()),
        FileSystemHost::new(),
        SystemPrerequisites::new(docker),
        TerminalConfirmation::new(),
        ctx.interrupt.clone(),
    );

    let output = operation.execute(DeployInput {
        config,
        no_cache: args.no_cache,
        skip_health_check: args.skip_health_check,
        interactive: !args.no_interactive && environment::is_interactive(),
        rollback: !args.no_rollback,
    })?;

    print!("{}", render_deploy_summary(&output));
    Ok(())
}
