use std::fmt;
use std::path::PathBuf;

use openclaw_rollback::{ActionStatus, RollbackOutcome, RollbackReport};
use thiserror::Error;

use crate::operations::HealthOutcome;

/// Workflow that drives a rollback sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Deploy,
    Update,
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deploy => f.write_str("deployment"),
            Self::Update => f.write_str("update"),
        }
    }
}

/// One undo action attempted while unwinding a failed workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolledBackAction {
    pub description: String,
    pub reverted: bool,
    /// Rendered error when the action failed.
    pub error: Option<String>,
}

/// What happened to the partial state of a failed workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackStatus {
    pub outcome: RollbackOutcome,
    /// Attempted actions in the order they ran.
    pub actions: Vec<RolledBackAction>,
}

impl RollbackStatus {
    #[must_use]
    pub fn from_report(report: RollbackReport<OperationError>) -> Self {
        let outcome = report.outcome();
        let descriptions: Vec<_> = report
            .records()
            .iter()
            .map(|record| (record.description.clone(), record.status))
            .collect();
        let mut failures = report.into_failures().into_iter();

        let actions = descriptions
            .into_iter()
            .map(|(description, status)| {
                let error = match status {
                    ActionStatus::Failed => failures.next().map(|f| f.error.to_string()),
                    _ => None,
                };
                RolledBackAction {
                    description,
                    reverted: error.is_none(),
                    error,
                }
            })
            .collect();

        Self { outcome, actions }
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        match self.outcome {
            RollbackOutcome::CompletedWithErrors => false,
            RollbackOutcome::AlreadyUnwound { succeeded } => succeeded,
            _ => true,
        }
    }

    /// Partial state was left in place on purpose.
    #[must_use]
    pub fn was_disabled(&self) -> bool {
        self.outcome == RollbackOutcome::Disabled
    }
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Docker(#[from] openclaw_docker::DockerError),

    #[error(transparent)]
    Config(#[from] openclaw_config::ConfigError),

    #[error("prerequisite validation failed: {}", failed.join(", "))]
    Validation { failed: Vec<String> },

    #[error("health check failed: {0}")]
    HealthCheck(HealthOutcome),

    #[error("container '{name}' does not exist; run 'openclaw-deploy deploy' first")]
    ContainerMissing { name: String },

    #[error("failed to create directory '{path}'")]
    DirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read '{path}'")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}'")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove '{path}'")]
    FileRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("interrupted by user")]
    Interrupted,

    #[error("operation cancelled")]
    Cancelled,

    #[error("interaction failed")]
    Interaction(#[source] std::io::Error),

    #[error("{workflow} failed")]
    WorkflowFailed {
        workflow: Workflow,
        #[source]
        source: Box<OperationError>,
        rollback: RollbackStatus,
    },
}

pub type Result<T> = std::result::Result<T, OperationError>;

impl OperationError {
    /// True when the failure traces back to a user interrupt.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        match self {
            Self::Interrupted | Self::HealthCheck(HealthOutcome::Interrupted) => true,
            Self::Docker(err) => err.is_interrupted(),
            Self::WorkflowFailed { source, .. } => source.is_interrupted(),
            _ => false,
        }
    }
}
