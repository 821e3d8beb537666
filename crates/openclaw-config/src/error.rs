use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine the current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to read configuration file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("failed to read environment file '{path}'")]
    EnvFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
