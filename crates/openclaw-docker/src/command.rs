use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::{DockerError, InterruptSignal, Result};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Where a command's stdout and stderr go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Collect both streams into [`CommandOutput`].
    #[default]
    Capture,
    /// Share the terminal with the child process.
    Inherit,
}

/// Description of a single external command invocation.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: IndexMap<String, String>,
    timeout: Option<Duration>,
    check: bool,
    output: OutputMode,
}

impl CommandSpec {
    /// A checked, captured command with no timeout.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: IndexMap::new(),
            timeout: None,
            check: true,
            output: OutputMode::Capture,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add variables on top of the inherited environment.
    #[must_use]
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Do not treat a non-zero exit status as an error.
    #[must_use]
    pub fn unchecked(mut self) -> Self {
        self.check = false;
        self
    }

    #[must_use]
    pub fn inherit_output(mut self) -> Self {
        self.output = OutputMode::Inherit;
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    #[must_use]
    pub fn env_vars(&self) -> &IndexMap<String, String> {
        &self.env
    }

    #[must_use]
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.check
    }

    #[must_use]
    pub fn output_mode(&self) -> OutputMode {
        self.output
    }

    /// Program and arguments joined with spaces, for logs and errors.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Exit status and captured streams of a finished command.
///
/// Both streams are empty when the command ran with [`OutputMode::Inherit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stderr when it has content, stdout otherwise.
    #[must_use]
    pub fn diagnostic(&self) -> &str {
        if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        }
    }
}

/// Runs [`CommandSpec`]s as child processes, honoring timeouts and the
/// shared [`InterruptSignal`].
#[derive(Debug, Clone)]
pub struct CommandRunner {
    interrupt: InterruptSignal,
    poll_interval: Duration,
}

impl CommandRunner {
    #[must_use]
    pub fn new(interrupt: InterruptSignal) -> Self {
        Self {
            interrupt,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn interrupt(&self) -> &InterruptSignal {
        &self.interrupt
    }

    /// # Errors
    ///
    /// Returns [`DockerError::Spawn`] if the program cannot be started,
    /// [`DockerError::TimedOut`] or [`DockerError::Interrupted`] if the child
    /// had to be killed, and [`DockerError::Failed`] if a checked command
    /// exits unsuccessfully.
    pub fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let command_line = spec.command_line();
        debug!(command = %command_line, "running command");

        if self.interrupt.is_triggered() {
            return Err(DockerError::Interrupted {
                command: command_line,
            });
        }

        let mut command = Command::new(&spec.program);
        command.args(&spec.args).envs(&spec.env);
        if let Some(cwd) = &spec.cwd {
            command.current_dir(cwd);
        }
        match spec.output {
            OutputMode::Capture => {
                command
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
            OutputMode::Inherit => {
                command
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
        }

        let mut child = command.spawn().map_err(|source| DockerError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        let status = self.wait(&mut child, spec.timeout, &command_line)?;

        let output = CommandOutput {
            code: status.code(),
            stdout: collect_reader(stdout_reader),
            stderr: collect_reader(stderr_reader),
        };
        debug!(command = %command_line, code = ?output.code, "command finished");

        if spec.check && !status.success() {
            return Err(DockerError::Failed {
                command: command_line,
                code: output.code,
                output: output.diagnostic().to_string(),
            });
        }

        Ok(output)
    }

    fn wait(
        &self,
        child: &mut Child,
        timeout: Option<Duration>,
        command_line: &str,
    ) -> Result<ExitStatus> {
        let started = Instant::now();

        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }

            if self.interrupt.is_triggered() {
                terminate(child, command_line);
                return Err(DockerError::Interrupted {
                    command: command_line.to_string(),
                });
            }

            if let Some(timeout) = timeout.filter(|timeout| started.elapsed() >= *timeout) {
                terminate(child, command_line);
                return Err(DockerError::TimedOut {
                    command: command_line.to_string(),
                    timeout,
                });
            }

            thread::sleep(self.poll_interval);
        }
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(InterruptSignal::new())
    }
}

fn terminate(child: &mut Child, command_line: &str) {
    if let Err(error) = child.kill() {
        warn!(command = %command_line, %error, "failed to kill command");
        return;
    }
    if let Err(error) = child.wait() {
        warn!(command = %command_line, %error, "failed to reap killed command");
    }
}

fn spawn_reader<R>(mut source: R) -> JoinHandle<io::Result<String>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buffer = Vec::new();
        source.read_to_end(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    })
}

fn collect_reader(reader: Option<JoinHandle<io::Result<String>>>) -> String {
    match reader.map(JoinHandle::join) {
        Some(Ok(Ok(text))) => text,
        Some(Ok(Err(error))) => {
            warn!(%error, "failed to read command output");
            String::new()
        }
        Some(Err(_)) => {
            warn!("command output reader panicked");
            String::new()
        }
        None => String::new(),
    }
}
