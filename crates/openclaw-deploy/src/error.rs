use openclaw_operations::{OperationError, RollbackStatus, Workflow};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("failed to load configuration")]
    Config(#[from] openclaw_config::ConfigError),

    #[error("deployment is not healthy")]
    Unhealthy,

    #[error("operation cancelled by user")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Operation(err) if err.is_interrupted())
    }

    /// Rollback outcome of a failed deploy or update.
    #[must_use]
    pub fn rollback(&self) -> Option<(Workflow, &RollbackStatus)> {
        match self {
            Self::Operation(OperationError::WorkflowFailed {
                workflow, rollback, ..
            }) => Some((*workflow, rollback)),
            _ => None,
        }
    }
}
