//! Process environment read by the CLI: prompt policy and the docker binary.

use std::ffi::OsString;
use std::fmt;
use std::io::IsTerminal;

use openclaw_docker::DEFAULT_DOCKER_BINARY;
use tracing::debug;

const NO_TTY_VAR: &str = "OPENCLAW_DEPLOY_NO_TTY";
const FORCE_TTY_VAR: &str = "OPENCLAW_DEPLOY_FORCE_TTY";
const DOCKER_BIN_VAR: &str = "OPENCLAW_DOCKER_BIN";

/// Presence of any of these marks a CI run.
const CI_MARKERS: [&str; 8] = [
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TF_BUILD",
];

/// Why prompts are suppressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptBlocker {
    Disabled,
    Ci(&'static str),
    NotATerminal,
}

impl fmt::Display for PromptBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "{NO_TTY_VAR} is set"),
            Self::Ci(marker) => write!(f, "CI detected via {marker}"),
            Self::NotATerminal => f.write_str("stdin is not a terminal"),
        }
    }
}

/// True when confirmation prompts may be shown.
pub fn is_interactive() -> bool {
    match prompt_blocker(|name| std::env::var_os(name), std::io::stdin().is_terminal()) {
        None => true,
        Some(blocker) => {
            debug!(reason = %blocker, "prompts disabled");
            false
        }
    }
}

/// `OPENCLAW_DEPLOY_NO_TTY` beats `OPENCLAW_DEPLOY_FORCE_TTY`, which beats CI
/// detection and the terminal check.
fn prompt_blocker<F>(lookup: F, stdin_is_terminal: bool) -> Option<PromptBlocker>
where
    F: Fn(&str) -> Option<OsString>,
{
    if lookup(NO_TTY_VAR).is_some() {
        Some(PromptBlocker::Disabled)
    } else if lookup(FORCE_TTY_VAR).is_some() {
        None
    } else if let Some(marker) = CI_MARKERS.into_iter().find(|&name| lookup(name).is_some()) {
        Some(PromptBlocker::Ci(marker))
    } else if stdin_is_terminal {
        None
    } else {
        Some(PromptBlocker::NotATerminal)
    }
}

/// Docker CLI to run, overridable for testing and alternative runtimes.
pub fn docker_binary() -> String {
    docker_binary_from(std::env::var_os(DOCKER_BIN_VAR))
}

fn docker_binary_from(value: Option<OsString>) -> String {
    value
        .filter(|value| !value.is_empty())
        .map_or_else(
            || DEFAULT_DOCKER_BINARY.to_string(),
            |value| value.to_string_lossy().into_owned(),
        )
}
