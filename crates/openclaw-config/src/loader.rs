use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env_file::parse_env_file;
use crate::{ConfigError, DeploymentConfig, Result};

/// Values given on the command line, applied after the configuration source.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub project_dir: Option<PathBuf>,
    pub gateway_token: Option<String>,
    /// Fills `anthropic_api_key` only when the source left it unset.
    pub api_key: Option<String>,
}

/// Load the deployment configuration.
///
/// The first available source wins: the YAML file at `config_file`, then the
/// project's `.env` file, then defaults. Overrides are applied on top.
///
/// # Errors
///
/// Returns an error if the current directory is needed but unavailable, or
/// if the chosen source cannot be read or parsed.
pub fn load_config(
    config_file: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<DeploymentConfig> {
    let project_dir = match &overrides.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(ConfigError::CurrentDir)?,
    };

    let mut config = match config_file.filter(|path| path.exists()) {
        Some(path) => read_yaml(path)?,
        None => {
            let mut config = DeploymentConfig::default();
            config.project_dir.clone_from(&project_dir);
            read_env_file(&mut config)?;
            config
        }
    };

    config.project_dir = project_dir;

    if let Some(token) = &overrides.gateway_token {
        config.gateway_token = Some(token.clone());
    }
    if config.anthropic_api_key.is_none() {
        config.anthropic_api_key.clone_from(&overrides.api_key);
    }

    Ok(config)
}

fn read_yaml(path: &Path) -> Result<DeploymentConfig> {
    info!(path = %path.display(), "loading configuration");
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if contents.trim().is_empty() {
        debug!(path = %path.display(), "configuration file is empty, using defaults");
        return Ok(DeploymentConfig::default());
    }

    serde_yml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_env_file(config: &mut DeploymentConfig) -> Result<()> {
    let path = config.env_file_path();
    if !path.exists() {
        debug!(path = %path.display(), "no environment file, using defaults");
        return Ok(());
    }

    debug!(path = %path.display(), "loading configuration from environment file");
    let contents = fs::read_to_string(&path)
        .map_err(|source| ConfigError::EnvFileRead { path, source })?;
    config.apply_env_vars(&parse_env_file(&contents));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(dir: &Path) -> ConfigOverrides {
        ConfigOverrides {
            project_dir: Some(dir.to_path_buf()),
            ..ConfigOverrides::default()
        }
    }

    #[test]
    fn defaults_when_no_source_exists() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;

        let config = load_config(None, &overrides(dir.path()))?;

        assert_eq!(config.project_dir, dir.path());
        assert_eq!(config.gateway_token, None);
        assert_eq!(config.gateway_bind, "lan");
        Ok(())
    }

    #[test]
    fn env_file_is_used_without_yaml() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join(".env"),
            "OPENCLAW_GATEWAY_TOKEN=from-env\nOPENAI_API_KEY=sk-openai\n",
        )?;

        let config = load_config(None, &overrides(dir.path()))?;

        assert_eq!(config.gateway_token.as_deref(), Some("from-env"));
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-openai"));
        Ok(())
    }

    #[test]
    fn yaml_takes_precedence_over_env_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(".env"), "OPENCLAW_GATEWAY_TOKEN=from-env\n")?;
        let yaml = dir.path().join("deploy.yml");
        fs::write(&yaml, "gateway_port: 19000\n")?;

        let config = load_config(Some(&yaml), &overrides(dir.path()))?;

        assert_eq!(config.gateway_port, 19000);
        assert_eq!(config.gateway_token, None);
        assert_eq!(config.project_dir, dir.path());
        Ok(())
    }

    #[test]
    fn missing_yaml_falls_back_to_env_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(".env"), "OPENCLAW_GATEWAY_BIND=loopback\n")?;
        let missing = dir.path().join("missing.yml");

        let config = load_config(Some(&missing), &overrides(dir.path()))?;

        assert_eq!(config.gateway_bind, "loopback");
        Ok(())
    }

    #[test]
    fn empty_yaml_yields_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let yaml = dir.path().join("deploy.yml");
        fs::write(&yaml, "\n")?;

        let config = load_config(Some(&yaml), &overrides(dir.path()))?;

        assert_eq!(config.gateway_port, 18789);
        Ok(())
    }

    #[test]
    fn invalid_yaml_reports_path() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let yaml = dir.path().join("deploy.yml");
        fs::write(&yaml, "gateway_port: [not, a, port]\n")?;

        let err = load_config(Some(&yaml), &overrides(dir.path()))
            .expect_err("invalid yaml should fail");

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("deploy.yml"));
        Ok(())
    }

    #[test]
    fn explicit_token_overrides_source() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(".env"), "OPENCLAW_GATEWAY_TOKEN=from-env\n")?;
        let overrides = ConfigOverrides {
            gateway_token: Some("from-cli".to_string()),
            ..overrides(dir.path())
        };

        let config = load_config(None, &overrides)?;

        assert_eq!(config.gateway_token.as_deref(), Some("from-cli"));
        Ok(())
    }

    #[test]
    fn api_key_only_fills_missing_anthropic_key() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let overrides = ConfigOverrides {
            api_key: Some("sk-cli".to_string()),
            ..overrides(dir.path())
        };

        let config = load_config(None, &overrides)?;
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-cli"));

        fs::write(dir.path().join(".env"), "ANTHROPIC_API_KEY=sk-file\n")?;
        let config = load_config(None, &overrides)?;
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-file"));
        Ok(())
    }
}
