use clap::Args;
use openclaw_config::ConfigOverrides;
use openclaw_operations::operations::{UpdateInput, UpdateOperation};
use openclaw_operations::providers::{DockerEngine, SystemPrerequisites};

use super::Context;
use crate::error::Result;
use crate::output::render_update_summary;

#[derive(Args)]
pub(crate) struct UpdateArgs {
    /// Use the Docker build cache (disabled by default)
    #[arg(long)]
    cache: bool,

    /// Do not wait for the gateway to become healthy
    #[arg(long)]
    skip_health_check: bool,

    /// Leave partial state in place when a step fails
    #[arg(long)]
    no_rollback: bool,
}

pub(crate) fn run(ctx: &Context, args: UpdateArgs) -> Result<()> {
    let config = ctx.load_config(ConfigOverrides::default())?;

    let docker = ctx.docker();
    let operation = UpdateOperation::new(
        DockerEngine::new(docker.clone()),
        SystemPrerequisites::new(docker),
        ctx.interrupt.clone(),
    );

    let output = operation.execute(UpdateInput {
        config,
        no_cache: !args.cache,
        skip_health_check: args.skip_health_check,
        rollback: !args.no_rollback,
    })?;

    print!("{}", render_update_summary(&output.config));
    Ok(())
}
