use clap::Args;
use openclaw_config::ConfigOverrides;
use openclaw_operations::operations::{CleanupInput, CleanupOperation, CleanupOutcome};
use openclaw_operations::providers::{DockerEngine, FileSystemHost};

use super::Context;
use crate::environment;
use crate::error::{CliError, Result};
use crate::interaction::TerminalConfirmation;
use crate::output::render_cleanup_summary;

#[derive(Args)]
pub(crate) struct CleanupArgs {
    /// Also remove the home volume
    #[arg(long)]
    volumes: bool,

    /// Also remove the Docker image
    #[arg(long)]
    image: bool,

    /// Also remove the .env file
    #[arg(long = "config")]
    remove_config: bool,

    /// Remove everything: volumes, image and .env file
    #[arg(long)]
    all: bool,

    /// Do not ask for confirmation
    #[arg(long)]
    no_interactive: bool,
}

pub(crate) fn run(ctx: &Context, args: CleanupArgs) -> Result<()> {
    let config = ctx.load_config(ConfigOverrides::default())?;

    let input = CleanupInput {
        config,
        remove_volumes: args.volumes || args.all,
        remove_image: args.image || args.all,
        remove_config: args.remove_config || args.all,
        interactive: !args.no_interactive && environment::is_interactive(),
    };

    let operation = CleanupOperation::new(
        DockerEngine::new(ctx.docker()),
        FileSystemHost::new(),
        TerminalConfirmation::new(),
    );

    match operation.execute(&input)? {
        CleanupOutcome::NothingToClean => {
            println!("Nothing to clean up.");
            Ok(())
        }
        CleanupOutcome::Cancelled => Err(CliError::Cancelled),
        CleanupOutcome::Completed(summary) => {
            print!("{}", render_cleanup_summary(&summary));
            Ok(())
        }
    }
}
