mod config;
mod env_file;
mod error;
mod loader;

pub use config::DeploymentConfig;
pub use env_file::{ENV_FILE_HEADER, EnvKey, parse_env_file};
pub use error::ConfigError;
pub use loader::{ConfigOverrides, load_config};

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Name of the environment file compose reads from the project directory.
pub const ENV_FILE_NAME: &str = ".env";
