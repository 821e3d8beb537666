use openclaw_config::DeploymentConfig;
use openclaw_docker::{ComposeProject, ContainerStatus, Docker, HealthStatus};
use tracing::{info, warn};

use crate::Result;
use crate::traits::ContainerEngine;

pub struct DockerEngine {
    docker: Docker,
}

impl DockerEngine {
    #[must_use]
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    #[must_use]
    pub fn docker(&self) -> &Docker {
        &self.docker
    }

    fn project(config: &DeploymentConfig) -> ComposeProject {
        ComposeProject::new(&config.project_dir, &config.compose_file)
            .with_env(config.to_env_vars())
    }
}

impl ContainerEngine for DockerEngine {
    fn container_exists(&self, name: &str) -> Result<bool> {
        Ok(self.docker.container_exists(name)?)
    }

    fn container_running(&self, name: &str) -> Result<bool> {
        Ok(self.docker.container_running(name)?)
    }

    fn container_status(&self, name: &str) -> Result<Option<ContainerStatus>> {
        Ok(self.docker.container_status(name)?)
    }

    fn container_health(&self, name: &str) -> Result<Option<HealthStatus>> {
        Ok(self.docker.container_health(name)?)
    }

    fn build_image(&self, config: &DeploymentConfig, no_cache: bool) -> Result<()> {
        info!(image = %config.image_name, "building Docker image, this may take several minutes");
        let project = Self::project(config);
        self.docker.compose(&project).build(no_cache)?;
        info!(image = %config.image_name, "✓ Docker image built");
        Ok(())
    }

    fn start_services(&self, config: &DeploymentConfig) -> Result<()> {
        let project = Self::project(config);
        self.docker.compose(&project).up()?;
        info!("✓ services started");
        Ok(())
    }

    fn stop_services(&self, config: &DeploymentConfig, remove_volumes: bool) -> Result<()> {
        let project = Self::project(config);
        self.docker.compose(&project).down(remove_volumes)?;
        info!("✓ services stopped");
        Ok(())
    }

    fn remove_container(&self, name: &str, force: bool) -> Result<bool> {
        Ok(self.docker.remove_container(name, force)?)
    }

    fn remove_image(&self, name: &str, force: bool) -> Result<bool> {
        Ok(self.docker.remove_image(name, force)?)
    }

    fn remove_volume(&self, name: &str, force: bool) -> Result<bool> {
        Ok(self.docker.remove_volume(name, force)?)
    }

    fn stream_logs(&self, config: &DeploymentConfig, tail: usize, follow: bool) -> Result<()> {
        let project = Self::project(config);
        let output = self
            .docker
            .compose(&project)
            .logs(tail, follow, &config.service_name)?;
        if !output.success() {
            warn!(code = ?output.code, "logs command exited unsuccessfully");
        }
        Ok(())
    }
}
