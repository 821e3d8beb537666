use std::io;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DockerError {
    #[error("failed to start '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("command failed: {command} ({})\n{output}", describe_exit(*code))]
    Failed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("command timed out after {}s: {command}", timeout.as_secs())]
    TimedOut { command: String, timeout: Duration },

    #[error("command interrupted: {command}")]
    Interrupted { command: String },

    #[error("IO error while waiting for command")]
    Io(#[from] io::Error),
}

impl DockerError {
    /// True when the program itself could not be found.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted { .. })
    }
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exit code {code}"),
    )
}
