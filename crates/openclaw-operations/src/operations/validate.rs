use std::path::PathBuf;

use openclaw_config::DeploymentConfig;
use tracing::{error, info};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{CheckOutcome, PrerequisiteChecker};

/// Named result of one prerequisite check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrerequisiteCheck {
    pub name: &'static str,
    pub passed: bool,
    pub message: String,
}

impl PrerequisiteCheck {
    fn new(name: &'static str, outcome: CheckOutcome) -> Self {
        Self {
            name,
            passed: outcome.passed,
            message: outcome.message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// `None` skips the port check.
    pub port: Option<u16>,
    pub project_dir: PathBuf,
    pub compose_file: PathBuf,
    pub required_disk_gb: f64,
    /// Fail when any check fails.
    pub strict: bool,
}

impl ValidationOptions {
    /// Strict options for a configuration, including the port check.
    #[must_use]
    pub fn for_config(config: &DeploymentConfig) -> Self {
        Self {
            port: Some(config.gateway_port),
            project_dir: config.project_dir.clone(),
            compose_file: config.compose_file.clone(),
            required_disk_gb: config.required_disk_gb,
            strict: true,
        }
    }

    #[must_use]
    pub fn without_port_check(mut self) -> Self {
        self.port = None;
        self
    }
}

pub struct ValidateOperation<'a, C> {
    checker: &'a C,
}

impl<'a, C> ValidateOperation<'a, C>
where
    C: PrerequisiteChecker,
{
    pub fn new(checker: &'a C) -> Self {
        Self { checker }
    }

    /// Run every check without logging or failing.
    #[must_use]
    pub fn run_checks(&self, options: &ValidationOptions) -> Vec<PrerequisiteCheck> {
        let checker = self.checker;
        let mut checks = vec![
            PrerequisiteCheck::new("Docker Installed", checker.docker_installed()),
            PrerequisiteCheck::new("Docker Compose", checker.docker_compose()),
            PrerequisiteCheck::new("Docker Running", checker.docker_running()),
            PrerequisiteCheck::new("Docker Permissions", checker.docker_permissions()),
        ];
        if let Some(port) = options.port {
            checks.push(PrerequisiteCheck::new(
                "Port Available",
                checker.port_available(port),
            ));
        }
        checks.push(PrerequisiteCheck::new(
            "Disk Space",
            checker.disk_space(&options.project_dir, options.required_disk_gb),
        ));
        checks.push(PrerequisiteCheck::new(
            "Required Files",
            checker.required_files(&options.project_dir, &options.compose_file),
        ));
        checks
    }

    /// Run and log every check.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Validation`] naming the failed checks when
    /// `options.strict` is set and any check fails.
    pub fn execute(&self, options: &ValidationOptions) -> Result<Vec<PrerequisiteCheck>> {
        info!("validating prerequisites");
        let checks = self.run_checks(options);

        for check in &checks {
            if check.passed {
                info!("✓ {}: {}", check.name, check.message);
            } else {
                error!("✗ {}: {}", check.name, check.message);
            }
        }

        let failed: Vec<String> = checks
            .iter()
            .filter(|check| !check.passed)
            .map(|check| check.name.to_string())
            .collect();

        if options.strict && !failed.is_empty() {
            return Err(OperationError::Validation { failed });
        }
        Ok(checks)
    }
}
