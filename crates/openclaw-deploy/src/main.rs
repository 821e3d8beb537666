mod commands;
mod environment;
mod error;
mod interaction;
mod logging;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use openclaw_docker::InterruptSignal;
use tracing::{debug, warn};

use crate::commands::{Commands, Context};
use crate::error::CliError;

/// Exit status of a process stopped by SIGINT.
const INTERRUPTED_EXIT_CODE: u8 = 130;

#[derive(Parser)]
#[command(name = "openclaw-deploy")]
#[command(version = env!("OPENCLAW_DEPLOY_VERSION"))]
#[command(about = "Deploy and manage the OpenClaw gateway with Docker Compose", long_about = None)]
struct Cli {
    /// Enable debug output on the console
    #[arg(short, long)]
    verbose: bool,

    /// Write the run log here instead of ~/.openclaw/logs/
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Project directory containing the Dockerfile and compose file (default: current directory)
    #[arg(long = "project-dir", short = 'C', value_name = "DIR")]
    project_dir: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.log_file.as_deref());
    debug!(version = env!("OPENCLAW_DEPLOY_VERSION"), "starting");

    let interrupt = InterruptSignal::new();
    let handler_signal = interrupt.clone();
    if let Err(err) = ctrlc::set_handler(move || handler_signal.trigger()) {
        warn!(error = %err, "could not install Ctrl-C handler");
    }

    let ctx = Context {
        project_dir: cli.project_dir,
        config_file: cli.config,
        verbose: cli.verbose,
        interrupt,
    };

    match cli.command.execute(&ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            if let Some((workflow, status)) = e.rollback() {
                eprint!("{}", output::render_rollback(workflow, status));
            }
            if e.is_interrupted() {
                ExitCode::from(INTERRUPTED_EXIT_CODE)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
