use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use openclaw_config::DeploymentConfig;
use openclaw_docker::{ContainerStatus, DockerError, HealthStatus, InterruptSignal};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    CheckOutcome, ConfirmationProvider, ContainerEngine, HostFiles, PrerequisiteChecker,
};

type ContainerState = (Option<ContainerStatus>, Option<HealthStatus>);

/// Calls made against [`MockContainerEngine`] that change state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Build { no_cache: bool },
    Start,
    Stop { remove_volumes: bool },
    RemoveContainer(String),
    RemoveImage(String),
    RemoveVolume(String),
    Logs { tail: usize, follow: bool },
}

fn mock_failure(operation: &str) -> OperationError {
    OperationError::Docker(DockerError::Failed {
        command: format!("docker {operation}"),
        code: Some(1),
        output: format!("mock {operation} failure"),
    })
}

pub struct MockContainerEngine {
    exists: bool,
    states: Vec<ContainerState>,
    polls: Mutex<usize>,
    calls: Mutex<Vec<EngineCall>>,
    failing: HashSet<&'static str>,
    interrupt: Option<(&'static str, InterruptSignal)>,
}

impl MockContainerEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            exists: false,
            states: Vec::new(),
            polls: Mutex::new(0),
            calls: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            interrupt: None,
        }
    }

    #[must_use]
    pub fn with_existing_container(mut self) -> Self {
        self.exists = true;
        self
    }

    /// States returned by successive status polls. The last one repeats.
    #[must_use]
    pub fn with_states(mut self, states: impl IntoIterator<Item = ContainerState>) -> Self {
        self.states = states.into_iter().collect();
        self
    }

    #[must_use]
    pub fn healthy() -> Self {
        Self::new().with_states([(Some(ContainerStatus::Running), Some(HealthStatus::Healthy))])
    }

    /// Make every call of `operation` fail. Operations are named `build`,
    /// `start`, `stop`, `remove_container`, `remove_image`, `remove_volume`
    /// and `logs`.
    #[must_use]
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    /// Trigger `signal` once `operation` succeeds, as a Ctrl-C arriving
    /// while that command runs. Like the command runner, every call is
    /// refused while the signal stays triggered.
    #[must_use]
    pub fn interrupted_after(mut self, operation: &'static str, signal: InterruptSignal) -> Self {
        self.interrupt = Some((operation, signal));
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn status_polls(&self) -> usize {
        *self.polls.lock().expect("lock poisoned")
    }

    fn refuse_if_interrupted(&self, operation: &str) -> Result<()> {
        match &self.interrupt {
            Some((_, signal)) if signal.is_triggered() => {
                Err(OperationError::Docker(DockerError::Interrupted {
                    command: format!("docker {operation}"),
                }))
            }
            _ => Ok(()),
        }
    }

    fn record(&self, operation: &'static str, call: EngineCall) -> Result<()> {
        self.refuse_if_interrupted(operation)?;
        self.calls.lock().expect("lock poisoned").push(call);
        if self.failing.contains(operation) {
            return Err(mock_failure(operation));
        }
        let pending = self.interrupt.as_ref().filter(|(after, _)| *after == operation);
        if let Some((_, signal)) = pending {
            signal.trigger();
        }
        Ok(())
    }

    fn state_at(&self, poll: usize) -> ContainerState {
        match self.states.len() {
            0 => (None, None),
            len => self.states[poll.min(len - 1)].clone(),
        }
    }
}

impl Default for MockContainerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerEngine for MockContainerEngine {
    fn container_exists(&self, _name: &str) -> Result<bool> {
        Ok(self.exists)
    }

    fn container_running(&self, _name: &str) -> Result<bool> {
        let poll = self.status_polls();
        Ok(self.exists && self.state_at(poll).0 == Some(ContainerStatus::Running))
    }

    fn container_status(&self, _name: &str) -> Result<Option<ContainerStatus>> {
        self.refuse_if_interrupted("inspect")?;
        let mut polls = self.polls.lock().expect("lock poisoned");
        let (status, _) = self.state_at(*polls);
        *polls += 1;
        Ok(status)
    }

    fn container_health(&self, _name: &str) -> Result<Option<HealthStatus>> {
        let poll = self.status_polls().saturating_sub(1);
        Ok(self.state_at(poll).1)
    }

    fn build_image(&self, _config: &DeploymentConfig, no_cache: bool) -> Result<()> {
        self.record("build", EngineCall::Build { no_cache })
    }

    fn start_services(&self, _config: &DeploymentConfig) -> Result<()> {
        self.record("start", EngineCall::Start)
    }

    fn stop_services(&self, _config: &DeploymentConfig, remove_volumes: bool) -> Result<()> {
        self.record("stop", EngineCall::Stop { remove_volumes })
    }

    fn remove_container(&self, name: &str, _force: bool) -> Result<bool> {
        self.record("remove_container", EngineCall::RemoveContainer(name.to_string()))?;
        Ok(true)
    }

    fn remove_image(&self, name: &str, _force: bool) -> Result<bool> {
        self.record("remove_image", EngineCall::RemoveImage(name.to_string()))?;
        Ok(true)
    }

    fn remove_volume(&self, name: &str, _force: bool) -> Result<bool> {
        self.record("remove_volume", EngineCall::RemoveVolume(name.to_string()))?;
        Ok(true)
    }

    fn stream_logs(&self, _config: &DeploymentConfig, tail: usize, follow: bool) -> Result<()> {
        self.record("logs", EngineCall::Logs { tail, follow })
    }
}

/// In-memory host filesystem.
pub struct MockHostFiles {
    files: Mutex<HashMap<PathBuf, String>>,
    dirs: Mutex<Vec<PathBuf>>,
    fail_writes: bool,
}

impl MockHostFiles {
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            dirs: Mutex::new(Vec::new()),
            fail_writes: false,
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files
            .lock()
            .expect("lock poisoned")
            .insert(path.into(), contents.to_string());
        self
    }

    #[must_use]
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().expect("lock poisoned").get(path).cloned()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn created_dirs(&self) -> Vec<PathBuf> {
        self.dirs.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockHostFiles {
    fn default() -> Self {
        Self::new()
    }
}

impl HostFiles for MockHostFiles {
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.dirs
            .lock()
            .expect("lock poisoned")
            .push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().expect("lock poisoned").contains_key(path)
    }

    fn read_optional(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.contents(path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if self.fail_writes {
            return Err(OperationError::FileWrite {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.files
            .lock()
            .expect("lock poisoned")
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.files.lock().expect("lock poisoned").remove(path);
        Ok(())
    }
}

/// Prerequisite checker with per-check failures, keyed by check name.
pub struct MockPrerequisites {
    failing: HashSet<&'static str>,
    ports: Mutex<Vec<u16>>,
}

impl MockPrerequisites {
    #[must_use]
    pub fn passing() -> Self {
        Self {
            failing: HashSet::new(),
            ports: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn failing(mut self, check: &'static str) -> Self {
        self.failing.insert(check);
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn ports_probed(&self) -> Vec<u16> {
        self.ports.lock().expect("lock poisoned").clone()
    }

    fn outcome(&self, check: &'static str) -> CheckOutcome {
        if self.failing.contains(check) {
            CheckOutcome::fail(format!("{check} failed"))
        } else {
            CheckOutcome::pass(format!("{check} ok"))
        }
    }
}

impl PrerequisiteChecker for MockPrerequisites {
    fn docker_installed(&self) -> CheckOutcome {
        self.outcome("Docker Installed")
    }

    fn docker_compose(&self) -> CheckOutcome {
        self.outcome("Docker Compose")
    }

    fn docker_running(&self) -> CheckOutcome {
        self.outcome("Docker Running")
    }

    fn docker_permissions(&self) -> CheckOutcome {
        self.outcome("Docker Permissions")
    }

    fn port_available(&self, port: u16) -> CheckOutcome {
        self.ports.lock().expect("lock poisoned").push(port);
        self.outcome("Port Available")
    }

    fn disk_space(&self, _path: &Path, _required_gb: f64) -> CheckOutcome {
        self.outcome("Disk Space")
    }

    fn required_files(&self, _project_dir: &Path, _compose_file: &Path) -> CheckOutcome {
        self.outcome("Required Files")
    }
}

/// Answers every prompt the same way and records the prompts.
pub struct MockConfirmation {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl MockConfirmation {
    #[must_use]
    pub fn always(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("lock poisoned").clone()
    }
}

impl ConfirmationProvider for MockConfirmation {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.prompts
            .lock()
            .expect("lock poisoned")
            .push(prompt.to_string());
        Ok(self.answer)
    }
}
