use openclaw_config::DeploymentConfig;
use openclaw_docker::{ContainerStatus, HealthStatus};

use crate::Result;

/// Container runtime operations the workflows depend on.
///
/// Service-level methods act on the compose project described by the
/// configuration; container-level methods take the container name.
pub trait ContainerEngine: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be queried.
    fn container_exists(&self, name: &str) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the runtime cannot be queried.
    fn container_running(&self, name: &str) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the runtime cannot be queried.
    fn container_status(&self, name: &str) -> Result<Option<ContainerStatus>>;

    /// # Errors
    ///
    /// Returns an error if the runtime cannot be queried.
    fn container_health(&self, name: &str) -> Result<Option<HealthStatus>>;

    /// # Errors
    ///
    /// Returns an error if the image build fails.
    fn build_image(&self, config: &DeploymentConfig, no_cache: bool) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the services cannot be started.
    fn start_services(&self, config: &DeploymentConfig) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the services cannot be stopped.
    fn stop_services(&self, config: &DeploymentConfig, remove_volumes: bool) -> Result<()>;

    /// Returns whether a container was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be reached.
    fn remove_container(&self, name: &str, force: bool) -> Result<bool>;

    /// Returns whether the image was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be reached.
    fn remove_image(&self, name: &str, force: bool) -> Result<bool>;

    /// Returns whether the volume was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be reached.
    fn remove_volume(&self, name: &str, force: bool) -> Result<bool>;

    /// Print service logs to the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs command cannot be run.
    fn stream_logs(&self, config: &DeploymentConfig, tail: usize, follow: bool) -> Result<()>;
}
