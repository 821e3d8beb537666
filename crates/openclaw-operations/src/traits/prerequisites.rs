use std::path::Path;

/// Result of a single host check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub message: String,
}

impl CheckOutcome {
    #[must_use]
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// Host probes run before a deployment. Probes never fail; problems are
/// reported through [`CheckOutcome`].
pub trait PrerequisiteChecker: Send + Sync {
    fn docker_installed(&self) -> CheckOutcome;

    fn docker_compose(&self) -> CheckOutcome;

    fn docker_running(&self) -> CheckOutcome;

    fn docker_permissions(&self) -> CheckOutcome;

    fn port_available(&self, port: u16) -> CheckOutcome;

    fn disk_space(&self, path: &Path, required_gb: f64) -> CheckOutcome;

    /// `compose_file` is relative to `project_dir` unless absolute.
    fn required_files(&self, project_dir: &Path, compose_file: &Path) -> CheckOutcome;
}
