use openclaw_config::DeploymentConfig;
use openclaw_docker::InterruptSignal;
use openclaw_rollback::RollbackSequencer;
use tracing::{error, info, info_span, warn};

use super::{ensure_not_interrupted, release_for_rollback};
use super::health::{HealthOutcome, HealthWait};
use super::token::generate_gateway_token;
use super::validate::{ValidateOperation, ValidationOptions};
use crate::Result;
use crate::error::{OperationError, RollbackStatus, Workflow};
use crate::traits::{ConfirmationProvider, ContainerEngine, HostFiles, PrerequisiteChecker};

type Rollback<'a> = RollbackSequencer<'a, OperationError>;

pub struct DeployInput {
    pub config: DeploymentConfig,
    pub no_cache: bool,
    pub skip_health_check: bool,
    /// Ask before overwriting an existing `.env` file.
    pub interactive: bool,
    /// Undo completed steps when a later one fails.
    pub rollback: bool,
}

/// What happened to the project's `.env` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvFileAction {
    Created,
    Overwritten,
    /// The user declined to overwrite the existing file.
    Kept,
}

#[derive(Debug, Clone)]
pub struct DeployOutput {
    /// Configuration as deployed, including a generated token.
    pub config: DeploymentConfig,
    pub env_file: EnvFileAction,
    pub token_generated: bool,
    /// `None` when the health check was skipped.
    pub health: Option<HealthOutcome>,
}

pub struct DeployOperation<E, F, P, C> {
    engine: E,
    files: F,
    checker: P,
    confirmation: C,
    interrupt: InterruptSignal,
}

#[cfg(test)]
impl<E, F, P, C> DeployOperation<E, F, P, C> {
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    pub(crate) fn files(&self) -> &F {
        &self.files
    }

    pub(crate) fn confirmation(&self) -> &C {
        &self.confirmation
    }
}

impl<E, F, P, C> DeployOperation<E, F, P, C>
where
    E: ContainerEngine,
    F: HostFiles,
    P: PrerequisiteChecker,
    C: ConfirmationProvider,
{
    pub fn new(
        engine: E,
        files: F,
        checker: P,
        confirmation: C,
        interrupt: InterruptSignal,
    ) -> Self {
        Self {
            engine,
            files,
            checker,
            confirmation,
            interrupt,
        }
    }

    /// Validate the host, write the environment file, build the image, start
    /// the services and wait for the gateway to become healthy.
    ///
    /// Every step that leaves state behind registers its undo right after it
    /// succeeds. If a later step fails, the registered undos run in reverse
    /// order, unless rollback is disabled in `input`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::WorkflowFailed`] carrying the failure that
    /// stopped the deployment and the outcome of the rollback.
    pub fn execute(&self, input: DeployInput) -> Result<DeployOutput> {
        let span = info_span!("deploy", container = %input.config.container_name);
        let _entered = span.enter();

        let mut rollback = Rollback::with_span(span.clone());
        if !input.rollback {
            rollback.disable();
        }

        match self.run_steps(input, &mut rollback) {
            Ok(output) => {
                rollback.clear();
                info!("✓ deployment completed successfully");
                Ok(output)
            }
            Err(err) => {
                error!(error = %err, "deployment failed");
                release_for_rollback(&self.interrupt);
                let report = rollback.execute_with_report();
                Err(OperationError::WorkflowFailed {
                    workflow: Workflow::Deploy,
                    source: Box::new(err),
                    rollback: RollbackStatus::from_report(report),
                })
            }
        }
    }

    fn run_steps<'a>(
        &'a self,
        input: DeployInput,
        rollback: &mut Rollback<'a>,
    ) -> Result<DeployOutput> {
        let DeployInput {
            mut config,
            no_cache,
            skip_health_check,
            interactive,
            ..
        } = input;

        info!("Step 1/6: Validating prerequisites");
        ValidateOperation::new(&self.checker).execute(&ValidationOptions::for_config(&config))?;
        ensure_not_interrupted(&self.interrupt)?;

        info!("Step 2/6: Creating host directories");
        for dir in config.host_dirs() {
            self.files.create_dir_all(dir)?;
        }
        ensure_not_interrupted(&self.interrupt)?;

        info!("Step 3/6: Generating environment configuration");
        let (env_file, token_generated) =
            self.write_env_file(&mut config, interactive, rollback)?;
        if !config.has_model_provider() {
            warn!(
                "⚠ no API keys configured; edit {} before the gateway will work",
                config.env_file_path().display()
            );
        }
        ensure_not_interrupted(&self.interrupt)?;

        info!("Step 4/6: Building Docker image");
        self.engine.build_image(&config, no_cache)?;
        ensure_not_interrupted(&self.interrupt)?;

        info!("Step 5/6: Starting services");
        self.engine.start_services(&config)?;
        let engine = &self.engine;
        let started = config.clone();
        rollback.add_action("Stop services", move || {
            let stopped = engine.stop_services(&started, false).inspect_err(|err| {
                warn!(error = %err, "compose down failed, removing the container anyway");
            });
            let removed = engine
                .remove_container(&started.container_name, true)
                .inspect_err(|err| warn!(error = %err, "container removal failed"));
            stopped.and(removed.map(drop))
        });
        ensure_not_interrupted(&self.interrupt)?;

        let health = if skip_health_check {
            info!("Step 6/6: Health check skipped");
            None
        } else {
            info!("Step 6/6: Verifying deployment health");
            let outcome = HealthWait::for_config(&config).wait(
                &self.engine,
                &config.container_name,
                &self.interrupt,
            )?;
            if !outcome.is_healthy() {
                error!(
                    "health check failed, check logs with: docker compose logs -f {}",
                    config.service_name
                );
                return Err(OperationError::HealthCheck(outcome));
            }
            Some(outcome)
        };

        Ok(DeployOutput {
            config,
            env_file,
            token_generated,
            health,
        })
    }

    /// Returns the action taken and whether a token was generated.
    fn write_env_file<'a>(
        &'a self,
        config: &mut DeploymentConfig,
        interactive: bool,
        rollback: &mut Rollback<'a>,
    ) -> Result<(EnvFileAction, bool)> {
        let path = config.env_file_path();
        let previous = self.files.read_optional(&path)?;

        if previous.is_some() && interactive {
            warn!(path = %path.display(), ".env file already exists");
            if !self.confirmation.confirm("Overwrite existing .env file?")? {
                info!("keeping existing .env file");
                return Ok((EnvFileAction::Kept, false));
            }
        }

        let token_generated = config.gateway_token.as_deref().is_none_or(str::is_empty);
        if token_generated {
            config.gateway_token = Some(generate_gateway_token());
            info!("generated new gateway token");
        }

        self.files.write(&path, &config.render_env_file())?;
        info!(path = %path.display(), "✓ environment file written");

        let files = &self.files;
        let action = match previous {
            Some(contents) => {
                rollback.add_action("Restore previous .env file", move || {
                    files.write(&path, &contents)
                });
                EnvFileAction::Overwritten
            }
            None => {
                rollback.add_action("Remove .env file", move || files.remove_file(&path));
                EnvFileAction::Created
            }
        };
        Ok((action, token_generated))
    }
}
