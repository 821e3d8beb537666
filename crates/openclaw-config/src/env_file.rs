use indexmap::IndexMap;

/// First lines of every generated environment file.
pub const ENV_FILE_HEADER: &str = "# OpenClaw Docker Configuration\n# Generated by openclaw-deploy\n";

/// Environment variables understood by the compose file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvKey {
    GatewayToken,
    GatewayBind,
    AnthropicApiKey,
    OpenAiApiKey,
    GoogleAiApiKey,
    OllamaBaseUrl,
    AptPackages,
    HomeVolume,
}

impl EnvKey {
    /// Every key, in the order they are written to the environment file.
    pub const ALL: [Self; 8] = [
        Self::GatewayToken,
        Self::GatewayBind,
        Self::AnthropicApiKey,
        Self::OpenAiApiKey,
        Self::GoogleAiApiKey,
        Self::OllamaBaseUrl,
        Self::AptPackages,
        Self::HomeVolume,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GatewayToken => "OPENCLAW_GATEWAY_TOKEN",
            Self::GatewayBind => "OPENCLAW_GATEWAY_BIND",
            Self::AnthropicApiKey => "ANTHROPIC_API_KEY",
            Self::OpenAiApiKey => "OPENAI_API_KEY",
            Self::GoogleAiApiKey => "GOOGLE_AI_API_KEY",
            Self::OllamaBaseUrl => "OLLAMA_BASE_URL",
            Self::AptPackages => "OPENCLAW_DOCKER_APT_PACKAGES",
            Self::HomeVolume => "OPENCLAW_HOME_VOLUME",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

/// Parse `KEY=VALUE` lines.
///
/// Blank lines, `#` comments and lines without `=` are skipped. Keys and
/// values are trimmed and a repeated key keeps its last value.
#[must_use]
pub fn parse_env_file(contents: &str) -> IndexMap<String, String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}
