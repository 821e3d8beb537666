use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ENV_FILE_NAME;
use crate::env_file::{ENV_FILE_HEADER, EnvKey};

/// Everything a deployment of the gateway needs to know.
///
/// Every field has a default, so a YAML file only has to name the values it
/// changes. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeploymentConfig {
    pub project_dir: PathBuf,
    pub openclaw_home: PathBuf,
    pub workspace_dir: PathBuf,
    /// Relative paths are resolved against `project_dir`.
    pub compose_file: PathBuf,

    pub image_name: String,
    pub container_name: String,
    pub service_name: String,
    pub gateway_port: u16,
    pub openclaw_version: String,

    pub gateway_token: Option<String>,
    pub gateway_bind: String,

    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub google_ai_api_key: Option<String>,
    pub ollama_base_url: Option<String>,

    pub apt_packages: String,
    pub home_volume: String,

    pub restart_policy: String,
    pub read_only: bool,
    pub tmpfs_size: String,
    pub log_max_size: String,
    pub log_max_file: String,

    pub health_interval: u64,
    pub health_timeout: u64,
    pub health_start_period: u64,
    pub health_retries: u32,

    /// Free space required in the project directory. `0` skips the check.
    pub required_disk_gb: f64,
    pub health_wait_timeout_secs: u64,
    pub health_poll_interval_secs: u64,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        let project_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_dirs(project_dir, &home)
    }
}

impl DeploymentConfig {
    /// Defaults rooted at explicit project and home directories.
    #[must_use]
    pub fn with_dirs(project_dir: impl Into<PathBuf>, home: &Path) -> Self {
        Self {
            project_dir: project_dir.into(),
            openclaw_home: home.join(".openclaw"),
            workspace_dir: home.join("openclaw").join("workspace"),
            compose_file: PathBuf::from("docker-compose.yml"),
            image_name: "openclaw:local".to_string(),
            container_name: "openclaw-gateway".to_string(),
            service_name: "openclaw-gateway".to_string(),
            gateway_port: 18789,
            openclaw_version: "latest".to_string(),
            gateway_token: None,
            gateway_bind: "lan".to_string(),
            anthropic_api_key: None,
            openai_api_key: None,
            google_ai_api_key: None,
            ollama_base_url: None,
            apt_packages: String::new(),
            home_volume: "openclaw-home".to_string(),
            restart_policy: "unless-stopped".to_string(),
            read_only: true,
            tmpfs_size: "512M".to_string(),
            log_max_size: "10m".to_string(),
            log_max_file: "3".to_string(),
            health_interval: 30,
            health_timeout: 10,
            health_start_period: 60,
            health_retries: 3,
            required_disk_gb: 5.0,
            health_wait_timeout_secs: 120,
            health_poll_interval_secs: 5,
        }
    }

    #[must_use]
    pub fn env_file_path(&self) -> PathBuf {
        self.project_dir.join(ENV_FILE_NAME)
    }

    #[must_use]
    pub fn compose_file_path(&self) -> PathBuf {
        self.project_dir.join(&self.compose_file)
    }

    /// Host directories bind-mounted into the gateway container.
    #[must_use]
    pub fn host_dirs(&self) -> [&Path; 2] {
        [&self.openclaw_home, &self.workspace_dir]
    }

    #[must_use]
    pub fn gateway_url(&self) -> String {
        format!("http://localhost:{}", self.gateway_port)
    }

    #[must_use]
    pub fn gateway_url_with_token(&self) -> Option<String> {
        self.gateway_token
            .as_deref()
            .map(|token| format!("{}?token={token}", self.gateway_url()))
    }

    #[must_use]
    pub fn health_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.health_wait_timeout_secs)
    }

    #[must_use]
    pub fn health_poll_interval(&self) -> Duration {
        Duration::from_secs(self.health_poll_interval_secs)
    }

    /// True when at least one model provider is configured.
    #[must_use]
    pub fn has_model_provider(&self) -> bool {
        [
            &self.anthropic_api_key,
            &self.openai_api_key,
            &self.google_ai_api_key,
            &self.ollama_base_url,
        ]
        .into_iter()
        .any(|value| value.as_deref().is_some_and(|v| !v.is_empty()))
    }

    /// Current value for `key`, `None` when unset or empty.
    #[must_use]
    pub fn env_value(&self, key: EnvKey) -> Option<&str> {
        let value = match key {
            EnvKey::GatewayToken => self.gateway_token.as_deref(),
            EnvKey::GatewayBind => Some(self.gateway_bind.as_str()),
            EnvKey::AnthropicApiKey => self.anthropic_api_key.as_deref(),
            EnvKey::OpenAiApiKey => self.openai_api_key.as_deref(),
            EnvKey::GoogleAiApiKey => self.google_ai_api_key.as_deref(),
            EnvKey::OllamaBaseUrl => self.ollama_base_url.as_deref(),
            EnvKey::AptPackages => Some(self.apt_packages.as_str()),
            EnvKey::HomeVolume => Some(self.home_volume.as_str()),
        };
        value.filter(|v| !v.is_empty())
    }

    pub fn set_env_value(&mut self, key: EnvKey, value: impl Into<String>) {
        let value = value.into();
        match key {
            EnvKey::GatewayToken => self.gateway_token = Some(value),
            EnvKey::GatewayBind => self.gateway_bind = value,
            EnvKey::AnthropicApiKey => self.anthropic_api_key = Some(value),
            EnvKey::OpenAiApiKey => self.openai_api_key = Some(value),
            EnvKey::GoogleAiApiKey => self.google_ai_api_key = Some(value),
            EnvKey::OllamaBaseUrl => self.ollama_base_url = Some(value),
            EnvKey::AptPackages => self.apt_packages = value,
            EnvKey::HomeVolume => self.home_volume = value,
        }
    }

    /// Copy known, non-empty variables onto this configuration. Unknown keys
    /// are ignored.
    pub fn apply_env_vars(&mut self, vars: &IndexMap<String, String>) {
        for (name, value) in vars {
            if value.is_empty() {
                continue;
            }
            if let Some(key) = EnvKey::from_name(name) {
                self.set_env_value(key, value.as_str());
            }
        }
    }

    /// Variables passed to compose and written to the environment file.
    #[must_use]
    pub fn to_env_vars(&self) -> IndexMap<String, String> {
        EnvKey::ALL
            .into_iter()
            .filter_map(|key| {
                self.env_value(key)
                    .map(|value| (key.as_str().to_string(), value.to_string()))
            })
            .collect()
    }

    #[must_use]
    pub fn render_env_file(&self) -> String {
        let mut rendered = String::from(ENV_FILE_HEADER);
        rendered.push('\n');
        for (key, value) in self.to_env_vars() {
            let _ = writeln!(rendered, "{key}={value}");
        }
        rendered
    }
}
