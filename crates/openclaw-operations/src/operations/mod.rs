mod cleanup;
mod deploy;
mod health;
mod logs;
mod status;
mod token;
mod update;
mod validate;

pub use cleanup::{CleanupInput, CleanupOperation, CleanupOutcome, CleanupSummary};
pub use deploy::{DeployInput, DeployOperation, DeployOutput, EnvFileAction};
pub use health::{HealthOutcome, HealthWait};
pub use logs::{DEFAULT_TAIL, LogsInput, LogsOperation};
pub use status::{StatusOperation, StatusReport};
pub use token::generate_gateway_token;
pub use update::{UpdateInput, UpdateOperation, UpdateOutput};
pub use validate::{PrerequisiteCheck, ValidateOperation, ValidationOptions};

use openclaw_docker::InterruptSignal;
use tracing::warn;

use crate::Result;
use crate::error::OperationError;

/// Stop between workflow steps once the user has interrupted.
fn ensure_not_interrupted(interrupt: &InterruptSignal) -> Result<()> {
    if interrupt.is_triggered() {
        return Err(OperationError::Interrupted);
    }
    Ok(())
}

/// Clear a pending interrupt so the undo commands are not refused. A second
/// Ctrl-C during the rollback stops them again.
fn release_for_rollback(interrupt: &InterruptSignal) {
    if interrupt.is_triggered() {
        warn!("interrupted, rolling back completed steps");
        interrupt.reset();
    }
}
