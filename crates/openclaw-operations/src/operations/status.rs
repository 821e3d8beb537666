use openclaw_config::DeploymentConfig;
use openclaw_docker::{ContainerStatus, HealthStatus};
use tracing::debug;

use crate::Result;
use crate::traits::ContainerEngine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub container_name: String,
    pub exists: bool,
    pub running: bool,
    pub status: Option<ContainerStatus>,
    /// `None` when the container has no health check.
    pub health: Option<HealthStatus>,
    pub gateway_url: String,
    pub gateway_url_with_token: Option<String>,
}

impl StatusReport {
    /// Exists, runs, and reports healthy or has no health check.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.exists
            && self.running
            && matches!(self.health, None | Some(HealthStatus::Healthy))
    }
}

pub struct StatusOperation<E> {
    engine: E,
}

impl<E> StatusOperation<E>
where
    E: ContainerEngine,
{
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// # Errors
    ///
    /// Returns an error if the container runtime cannot be queried.
    pub fn execute(&self, config: &DeploymentConfig) -> Result<StatusReport> {
        let name = &config.container_name;
        let exists = self.engine.container_exists(name)?;

        let (running, status, health) = if exists {
            (
                self.engine.container_running(name)?,
                self.engine.container_status(name)?,
                self.engine.container_health(name)?,
            )
        } else {
            (false, None, None)
        };
        debug!(container = %name, exists, running, "collected deployment status");

        Ok(StatusReport {
            container_name: name.clone(),
            exists,
            running,
            status,
            health,
            gateway_url: config.gateway_url(),
            gateway_url_with_token: config.gateway_url_with_token(),
        })
    }
}
