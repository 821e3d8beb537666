use std::path::{Path, PathBuf};

use openclaw_config::DeploymentConfig;
use tracing::{info, warn};

use crate::Result;
use crate::traits::{ConfirmationProvider, ContainerEngine, HostFiles};

pub struct CleanupInput {
    pub config: DeploymentConfig,
    pub remove_volumes: bool,
    pub remove_image: bool,
    /// Remove the project's `.env` file.
    pub remove_config: bool,
    pub interactive: bool,
}

impl CleanupInput {
    /// What this cleanup would remove, one line per item.
    #[must_use]
    pub fn planned_removals(&self) -> Vec<String> {
        let config = &self.config;
        let mut items = vec![format!("Container: {}", config.container_name)];
        if self.remove_volumes {
            items.push(format!("Volume: {}", config.home_volume));
            items.push(format!("Data: {}", config.openclaw_home.display()));
        }
        if self.remove_image {
            items.push(format!("Image: {}", config.image_name));
        }
        if self.remove_config {
            items.push(format!("Config: {}", config.env_file_path().display()));
        }
        items
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    pub container_removed: bool,
    pub volume_removed: bool,
    pub image_removed: bool,
    pub env_file_removed: bool,
    /// Host directories that are never removed automatically.
    pub leftover_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    NothingToClean,
    Cancelled,
    Completed(CleanupSummary),
}

/// Remove a deployment. Cleanup is not transactional: it stops at the first
/// failing step and nothing is undone.
pub struct CleanupOperation<E, F, C> {
    engine: E,
    files: F,
    confirmation: C,
}

#[cfg(test)]
impl<E, F, C> CleanupOperation<E, F, C> {
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

impl<E, F, C> CleanupOperation<E, F, C>
where
    E: ContainerEngine,
    F: HostFiles,
    C: ConfirmationProvider,
{
    pub fn new(engine: E, files: F, confirmation: C) -> Self {
        Self {
            engine,
            files,
            confirmation,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the runtime cannot be queried, the confirmation
    /// prompt fails, or a removal step fails.
    pub fn execute(&self, input: &CleanupInput) -> Result<CleanupOutcome> {
        let config = &input.config;

        if !self.engine.container_exists(&config.container_name)? {
            warn!(
                container = %config.container_name,
                "container does not exist, nothing to clean up"
            );
            return Ok(CleanupOutcome::NothingToClean);
        }

        if input.interactive {
            warn!("this will remove the OpenClaw deployment:");
            for item in input.planned_removals() {
                warn!("  - {item}");
            }
            if !self.confirmation.confirm("Continue with cleanup?")? {
                info!("cleanup cancelled");
                return Ok(CleanupOutcome::Cancelled);
            }
        }

        let mut summary = CleanupSummary::default();

        info!("stopping services");
        self.engine.stop_services(config, input.remove_volumes)?;

        info!(container = %config.container_name, "removing container");
        summary.container_removed = self.engine.remove_container(&config.container_name, true)?;

        if input.remove_volumes {
            info!(volume = %config.home_volume, "removing volume");
            summary.volume_removed = self.engine.remove_volume(&config.home_volume, true)?;
            summary.leftover_dirs = config
                .host_dirs()
                .into_iter()
                .map(Path::to_path_buf)
                .collect();
            warn!("host directories still exist, remove them manually with:");
            for dir in &summary.leftover_dirs {
                warn!("  rm -rf {}", dir.display());
            }
        }

        if input.remove_image {
            info!(image = %config.image_name, "removing image");
            summary.image_removed = self.engine.remove_image(&config.image_name, true)?;
        }

        if input.remove_config {
            let env_file = config.env_file_path();
            if self.files.exists(&env_file) {
                info!(path = %env_file.display(), "removing config");
                self.files.remove_file(&env_file)?;
                summary.env_file_removed = true;
            }
        }

        info!("✓ cleanup completed successfully");
        Ok(CleanupOutcome::Completed(summary))
    }
}
