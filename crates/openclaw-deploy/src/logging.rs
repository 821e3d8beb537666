//! Console and file logging for the CLI.
//!
//! Progress goes to stderr so command output on stdout stays clean. Every
//! run also writes a DEBUG-level log file, by default under
//! `~/.openclaw/logs/`.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use tracing::{debug, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Default log file: `$HOME/.openclaw/logs/deploy_<YYYYmmdd_HHMMSS>.log`.
#[must_use]
pub fn default_log_file() -> Option<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    dirs::home_dir().map(|home| {
        home.join(".openclaw")
            .join("logs")
            .join(format!("deploy_{timestamp}.log"))
    })
}

fn console_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Install the global subscriber. Failing to open the log file degrades to
/// console-only logging.
pub fn init(verbose: bool, log_file: Option<&Path>) {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .with_filter(console_filter(verbose));

    let path = log_file.map(Path::to_path_buf).or_else(default_log_file);
    let (file, file_error) = match path.as_deref().map(open_log_file) {
        Some(Ok(file)) => {
            let layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_filter(LevelFilter::DEBUG);
            (Some(layer), None)
        }
        Some(Err(err)) => (None, Some(err)),
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init();

    match (&path, file_error) {
        (Some(path), Some(err)) => {
            warn!(
                path = %path.display(),
                error = %err,
                "could not open log file, logging to console only"
            );
        }
        (Some(path), None) => debug!(path = %path.display(), "writing log file"),
        (None, _) => debug!("no home directory, logging to console only"),
    }
}
