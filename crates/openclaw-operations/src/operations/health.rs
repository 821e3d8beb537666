use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use openclaw_config::DeploymentConfig;
use openclaw_docker::{ContainerStatus, HealthStatus, InterruptSignal};
use tracing::{debug, error, info, warn};

use crate::Result;
use crate::traits::ContainerEngine;

/// Polls a container running without a health check this many times before
/// accepting it as healthy.
const NO_HEALTH_CHECK_GRACE_POLLS: u32 = 3;

const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// How waiting for a container to become healthy ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthOutcome {
    Healthy { elapsed: Duration },
    /// Running, with no health check defined by the image.
    RunningWithoutHealthCheck,
    Unhealthy,
    Exited(ContainerStatus),
    TimedOut(Duration),
    Interrupted,
}

impl HealthOutcome {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(
            self,
            Self::Healthy { .. } | Self::RunningWithoutHealthCheck
        )
    }
}

impl fmt::Display for HealthOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy { elapsed } => {
                write!(f, "container is healthy (took {}s)", elapsed.as_secs())
            }
            Self::RunningWithoutHealthCheck => {
                f.write_str("container is running (no health check)")
            }
            Self::Unhealthy => f.write_str("container is unhealthy"),
            Self::Exited(status) => write!(f, "container exited unexpectedly: {status}"),
            Self::TimedOut(timeout) => write!(
                f,
                "container did not become healthy within {}s",
                timeout.as_secs()
            ),
            Self::Interrupted => f.write_str("interrupted while waiting for container health"),
        }
    }
}

/// Polling parameters for [`HealthWait::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthWait {
    pub timeout: Duration,
    pub interval: Duration,
}

impl HealthWait {
    #[must_use]
    pub fn for_config(config: &DeploymentConfig) -> Self {
        Self {
            timeout: config.health_wait_timeout(),
            interval: config.health_poll_interval(),
        }
    }

    /// Poll status and health until the container settles, the timeout
    /// passes, or `interrupt` is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if the container runtime cannot be queried.
    pub fn wait<E>(
        &self,
        engine: &E,
        container: &str,
        interrupt: &InterruptSignal,
    ) -> Result<HealthOutcome>
    where
        E: ContainerEngine + ?Sized,
    {
        info!(container, "waiting for container to become healthy");
        let started = Instant::now();
        let mut polls = 0u32;

        while started.elapsed() < self.timeout {
            if interrupt.is_triggered() {
                return Ok(HealthOutcome::Interrupted);
            }

            let status = engine.container_status(container)?;
            let health = engine.container_health(container)?;
            debug!(container, status = ?status, health = ?health, polls, "container state");

            match (&status, &health) {
                (Some(ContainerStatus::Running), Some(HealthStatus::Healthy)) => {
                    let outcome = HealthOutcome::Healthy {
                        elapsed: started.elapsed(),
                    };
                    info!("✓ {outcome}");
                    return Ok(outcome);
                }
                (Some(ContainerStatus::Running), Some(HealthStatus::Unhealthy)) => {
                    warn!(container, "container is unhealthy");
                    return Ok(HealthOutcome::Unhealthy);
                }
                (Some(ContainerStatus::Running), None) if polls > NO_HEALTH_CHECK_GRACE_POLLS => {
                    info!("✓ container is running (no health check)");
                    return Ok(HealthOutcome::RunningWithoutHealthCheck);
                }
                (Some(status), _) if status.has_stopped() => {
                    error!(container, %status, "container exited unexpectedly");
                    return Ok(HealthOutcome::Exited(status.clone()));
                }
                _ => {}
            }

            polls += 1;
            if !sleep_unless_interrupted(self.interval, interrupt) {
                return Ok(HealthOutcome::Interrupted);
            }
        }

        warn!(
            container,
            timeout_secs = self.timeout.as_secs(),
            "container did not become healthy in time"
        );
        Ok(HealthOutcome::TimedOut(self.timeout))
    }
}

/// Returns `false` if the interrupt fired while sleeping.
fn sleep_unless_interrupted(duration: Duration, interrupt: &InterruptSignal) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if interrupt.is_triggered() {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(SLEEP_SLICE.min(deadline - now));
    }
}
