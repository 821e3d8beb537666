use openclaw_config::DeploymentConfig;
use openclaw_docker::InterruptSignal;
use openclaw_rollback::RollbackSequencer;
use tracing::{error, info, info_span, warn};

use super::{ensure_not_interrupted, release_for_rollback};
use super::health::{HealthOutcome, HealthWait};
use super::validate::{ValidateOperation, ValidationOptions};
use crate::Result;
use crate::error::{OperationError, RollbackStatus, Workflow};
use crate::traits::{ContainerEngine, PrerequisiteChecker};

type Rollback<'a> = RollbackSequencer<'a, OperationError>;

pub struct UpdateInput {
    pub config: DeploymentConfig,
    pub no_cache: bool,
    pub skip_health_check: bool,
    pub rollback: bool,
}

#[derive(Debug, Clone)]
pub struct UpdateOutput {
    pub config: DeploymentConfig,
    pub health: Option<HealthOutcome>,
}

/// Rebuild the image of an existing deployment and restart it.
pub struct UpdateOperation<E, P> {
    engine: E,
    checker: P,
    interrupt: InterruptSignal,
}

#[cfg(test)]
impl<E, P> UpdateOperation<E, P> {
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E, P> UpdateOperation<E, P>
where
    E: ContainerEngine,
    P: PrerequisiteChecker,
{
    pub fn new(engine: E, checker: P, interrupt: InterruptSignal) -> Self {
        Self {
            engine,
            checker,
            interrupt,
        }
    }

    /// # Errors
    ///
    /// Returns [`OperationError::ContainerMissing`] when there is no
    /// deployment to update, and [`OperationError::WorkflowFailed`] when a
    /// step fails after the update started.
    pub fn execute(&self, input: UpdateInput) -> Result<UpdateOutput> {
        let container = &input.config.container_name;
        if !self.engine.container_exists(container)? {
            error!(container = %container, "container does not exist");
            return Err(OperationError::ContainerMissing {
                name: container.clone(),
            });
        }

        let span = info_span!("update", container = %container);
        let _entered = span.enter();

        let mut rollback = Rollback::with_span(span.clone());
        if !input.rollback {
            rollback.disable();
        }

        match self.run_steps(input, &mut rollback) {
            Ok(output) => {
                rollback.clear();
                info!("✓ update completed successfully");
                Ok(output)
            }
            Err(err) => {
                error!(error = %err, "update failed");
                release_for_rollback(&self.interrupt);
                let report = rollback.execute_with_report();
                Err(OperationError::WorkflowFailed {
                    workflow: Workflow::Update,
                    source: Box::new(err),
                    rollback: RollbackStatus::from_report(report),
                })
            }
        }
    }

    fn run_steps<'a>(
        &'a self,
        input: UpdateInput,
        rollback: &mut Rollback<'a>,
    ) -> Result<UpdateOutput> {
        let UpdateInput {
            config,
            no_cache,
            skip_health_check,
            ..
        } = input;
        let engine = &self.engine;

        info!("Step 1/4: Validating prerequisites");
        // The running gateway holds the port until it is stopped.
        let options = ValidationOptions::for_config(&config).without_port_check();
        ValidateOperation::new(&self.checker).execute(&options)?;
        ensure_not_interrupted(&self.interrupt)?;

        info!("Step 2/4: Stopping current services");
        engine.stop_services(&config, false)?;
        let previous = config.clone();
        rollback.add_action("Start previous services", move || {
            engine.start_services(&previous)
        });
        ensure_not_interrupted(&self.interrupt)?;

        info!("Step 3/4: Rebuilding Docker image");
        if no_cache {
            info!("building with --no-cache to pick up the latest OpenClaw version");
        }
        engine.build_image(&config, no_cache)?;
        ensure_not_interrupted(&self.interrupt)?;

        info!("Step 4/4: Starting updated services");
        engine.start_services(&config)?;
        rollback.clear();
        let updated = config.clone();
        rollback.add_action("Stop updated services", move || {
            engine.stop_services(&updated, false)
        });

        let health = if skip_health_check {
            None
        } else {
            ensure_not_interrupted(&self.interrupt)?;
            info!("verifying deployment health");
            let outcome = HealthWait::for_config(&config).wait(
                engine,
                &config.container_name,
                &self.interrupt,
            )?;
            if !outcome.is_healthy() {
                error!(
                    "health check failed after update, check logs with: docker compose logs -f {}",
                    config.service_name
                );
                warn!("previous image was overwritten, you may need to redeploy");
                return Err(OperationError::HealthCheck(outcome));
            }
            Some(outcome)
        };

        Ok(UpdateOutput { config, health })
    }
}
