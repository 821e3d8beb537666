use openclaw_config::ConfigOverrides;
use openclaw_operations::operations::StatusOperation;
use openclaw_operations::providers::DockerEngine;

use super::Context;
use crate::error::{CliError, Result};
use crate::output::render_status;

pub(crate) fn run(ctx: &Context) -> Result<()> {
    let config = ctx.load_config(ConfigOverrides::default())?;

    let operation = StatusOperation::new(DockerEngine::new(ctx.docker()));
    let report = operation.execute(&config)?;

    print!("{}", render_status(&report, &config, ctx.verbose));

    if report.is_healthy() {
        Ok(())
    } else {
        Err(CliError::Unhealthy)
    }
}
