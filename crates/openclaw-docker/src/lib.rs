mod command;
mod compose;
mod docker;
mod error;
mod interrupt;
mod types;

pub use command::{CommandOutput, CommandRunner, CommandSpec, OutputMode};
pub use compose::{Compose, ComposeProject};
pub use docker::Docker;
pub use error::DockerError;
pub use interrupt::InterruptSignal;
pub use types::{ContainerStatus, HealthStatus};

pub type Result<T> = std::result::Result<T, DockerError>;

/// Binary used when no override is configured.
pub const DEFAULT_DOCKER_BINARY: &str = "docker";
