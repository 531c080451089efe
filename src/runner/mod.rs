//! Child process execution
//!
//! Every external tool hostcare touches goes through [`CommandRunner`], so the
//! pipeline can be driven against [`mock::MockRunner`] in tests.

pub mod mock;
pub mod step;

pub use step::{StepOutcome, StepRunner};

use crate::MaintenanceError;
use async_trait::async_trait;
use std::process::Stdio;
use tracing::{debug, trace};

/// Environment forced on every child so package and restart tools never prompt
pub const NONINTERACTIVE_ENV: &[(&str, &str)] = &[
    ("DEBIAN_FRONTEND", "noninteractive"),
    ("NEEDRESTART_MODE", "a"),
];

/// A fully formed external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Needs root; wrapped in `sudo env ...` when not already root
    pub privileged: bool,
}

impl CommandSpec {
    /// Command run as the invoking user
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            privileged: false,
        }
    }

    /// Command that needs root
    pub fn privileged(program: impl Into<String>) -> Self {
        Self {
            privileged: true,
            ..Self::new(program)
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program and arguments joined for display and matching
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Full argv, including the sudo wrapper when it applies.
    ///
    /// sudo resets the environment, so the non-interactive variables are
    /// passed through `env` on the far side of it.
    pub fn argv(&self, use_sudo: bool) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 5);
        if self.privileged && use_sudo {
            argv.push("sudo".to_string());
            argv.push("env".to_string());
            argv.extend(NONINTERACTIVE_ENV.iter().map(|(k, v)| format!("{}={}", k, v)));
        }
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Exit status of a finished child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// `None` when the child was terminated by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for CommandStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Status plus captured stdout
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub status: CommandStatus,
    pub stdout: String,
}

/// Executes external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run with inherited stdio and wait for the exit status
    async fn status(&self, command: &CommandSpec) -> Result<CommandStatus, MaintenanceError>;

    /// Run with stdout captured; stderr still passes through
    async fn capture(&self, command: &CommandSpec) -> Result<CapturedOutput, MaintenanceError>;

    /// Whether `tool` is installed on this host
    fn has_tool(&self, tool: &str) -> bool;
}

/// Runs commands on the real host with `tokio::process`
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    use_sudo: bool,
}

impl SystemRunner {
    pub fn new(use_sudo: bool) -> Self {
        Self { use_sudo }
    }

    fn command(&self, spec: &CommandSpec) -> tokio::process::Command {
        let argv = self.argv(spec);
        trace!("argv: {:?}", argv);
        let mut cmd = tokio::process::Command::new(&argv[0]);
        cmd.args(&argv[1..]).envs(NONINTERACTIVE_ENV.iter().copied());
        cmd
    }

    fn argv(&self, spec: &CommandSpec) -> Vec<String> {
        spec.argv(self.use_sudo)
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn status(&self, command: &CommandSpec) -> Result<CommandStatus, MaintenanceError> {
        debug!("Running command: {}", command);
        let status = self
            .command(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| MaintenanceError::Command(format!("{}: {}", command.program, e)))?;
        debug!("{} exited with {:?}", command.program, status.code());
        Ok(status.into())
    }

    async fn capture(&self, command: &CommandSpec) -> Result<CapturedOutput, MaintenanceError> {
        debug!("Capturing command: {}", command);
        let output = self
            .command(command)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| MaintenanceError::Command(format!("{}: {}", command.program, e)))?;

        Ok(CapturedOutput {
            status: output.status.into(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    fn has_tool(&self, tool: &str) -> bool {
        which::which(tool).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_args() {
        let cmd = CommandSpec::privileged("apt-get").args(["dist-upgrade", "-y"]);
        assert_eq!(cmd.display(), "apt-get dist-upgrade -y");
        assert_eq!(cmd.to_string(), "apt-get dist-upgrade -y");
    }

    #[test]
    fn test_privileged_argv_wraps_sudo() {
        let cmd = CommandSpec::privileged("apt-get").arg("update");
        assert_eq!(
            cmd.argv(true),
            vec![
                "sudo",
                "env",
                "DEBIAN_FRONTEND=noninteractive",
                "NEEDRESTART_MODE=a",
                "apt-get",
                "update"
            ]
        );
        assert_eq!(cmd.argv(false), vec!["apt-get", "update"]);
    }

    #[test]
    fn test_unprivileged_argv_never_wraps() {
        let cmd = CommandSpec::new("find").args(["/home/ops/.cache/thumbnails", "-delete"]);
        assert_eq!(cmd.argv(true)[0], "find");
    }

    #[test]
    fn test_command_status() {
        assert!(CommandStatus::from_code(0).success());
        assert!(!CommandStatus::from_code(100).success());
        assert!(!CommandStatus { code: None }.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_exports_noninteractive_env() {
        let runner = SystemRunner::new(false);
        let check = r#"test "$DEBIAN_FRONTEND" = noninteractive && test "$NEEDRESTART_MODE" = a && exit 3"#;
        let command = CommandSpec::privileged("sh").args(["-c", check]);

        let status = runner.status(&command).await.unwrap();
        assert_eq!(status.code, Some(3));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_captures_stdout() {
        let runner = SystemRunner::new(false);
        let command = CommandSpec::new("sh").args(["-c", r#"printf '%s' "$DEBIAN_FRONTEND""#]);

        let output = runner.capture(&command).await.unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, "noninteractive");
    }

    #[tokio::test]
    async fn test_system_runner_spawn_failure_is_an_error() {
        let runner = SystemRunner::new(false);
        let command = CommandSpec::new("hostcare-no-such-tool");

        assert!(matches!(
            runner.status(&command).await,
            Err(MaintenanceError::Command(_))
        ));
        assert!(runner.capture(&command).await.is_err());
        assert!(!runner.has_tool("hostcare-no-such-tool"));
    }
}
