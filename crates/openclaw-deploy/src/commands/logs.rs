use clap::Args;
use openclaw_config::ConfigOverrides;
use openclaw_operations::operations::{DEFAULT_TAIL, LogsInput, LogsOperation};
use openclaw_operations::providers::DockerEngine;

use super::Context;
use crate::error::Result;

#[derive(Args)]
pub(crate) struct LogsArgs {
    /// Number of lines to show from the end of the logs
    #[arg(long, default_value_t = DEFAULT_TAIL)]
    tail: usize,

    /// Follow log output
    #[arg(short, long)]
    follow: bool,
}

pub(crate) fn run(ctx: &Context, args: LogsArgs) -> Result<()> {
    let config = ctx.load_config(ConfigOverrides::default())?;

    LogsOperation::new(DockerEngine::new(ctx.docker())).execute(
        &config,
        LogsInput {
            tail: args.tail,
            follow: args.follow,
        },
    )?;
    Ok(())
}
