use openclaw_config::DeploymentConfig;
use tracing::debug;

use crate::Result;
use crate::traits::ContainerEngine;

pub const DEFAULT_TAIL: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogsInput {
    pub tail: usize,
    pub follow: bool,
}

impl Default for LogsInput {
    fn default() -> Self {
        Self {
            tail: DEFAULT_TAIL,
            follow: false,
        }
    }
}

pub struct LogsOperation<E> {
    engine: E,
}

impl<E> LogsOperation<E>
where
    E: ContainerEngine,
{
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Print the gateway service's logs to the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs command cannot be run.
    pub fn execute(&self, config: &DeploymentConfig, input: LogsInput) -> Result<()> {
        debug!(
            service = %config.service_name,
            tail = input.tail,
            follow = input.follow,
            "showing service logs"
        );
        self.engine.stream_logs(config, input.tail, input.follow)
    }
}
