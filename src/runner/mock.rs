//! Mock command runner for testing
//!
//! Records every command it is asked to run and answers with configured exit
//! codes and output instead of touching the host.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use super::{CapturedOutput, CommandRunner, CommandSpec, CommandStatus};
use crate::MaintenanceError;

/// Mock command runner
///
/// Responses are matched against the command's display form
/// (`program arg1 arg2 ...`) by prefix; the first configured match wins.
///
/// # Example
/// ```
/// use hostcare::runner::mock::MockRunner;
///
/// let mock = MockRunner::new()
///     .with_tools(&["apt-get", "dpkg"])
///     .with_exit("apt-get update", 100)
///     .with_output("uname -r", "5.15.0-100-generic\n");
/// ```
#[derive(Default)]
pub struct MockRunner {
    tools: HashSet<String>,
    exits: Vec<(String, i32)>,
    outputs: Vec<(String, String)>,
    spawn_errors: Vec<String>,
    invocations: Mutex<Vec<String>>,
}

impl MockRunner {
    /// Create a mock where every command succeeds with empty output
    pub fn new() -> Self {
        Self::default()
    }

    /// Tools reported as installed
    pub fn with_tools(mut self, tools: &[&str]) -> Self {
        self.tools.extend(tools.iter().map(|t| t.to_string()));
        self
    }

    /// Exit code for commands starting with `prefix`
    pub fn with_exit(mut self, prefix: &str, code: i32) -> Self {
        self.exits.push((prefix.to_string(), code));
        self
    }

    /// Captured stdout for commands starting with `prefix`
    pub fn with_output(mut self, prefix: &str, stdout: &str) -> Self {
        self.outputs.push((prefix.to_string(), stdout.to_string()));
        self
    }

    /// Commands starting with `prefix` fail to spawn
    pub fn with_spawn_error(mut self, prefix: &str) -> Self {
        self.spawn_errors.push(prefix.to_string());
        self
    }

    /// Every command run so far, in order
    pub fn invocations(&self) -> Vec<String> {
        self.invocations
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Whether any recorded command starts with `prefix`
    pub fn ran(&self, prefix: &str) -> bool {
        self.invocations().iter().any(|c| c.starts_with(prefix))
    }

    fn record(&self, command: &CommandSpec) -> Result<String, MaintenanceError> {
        let line = command.display();
        if let Ok(mut calls) = self.invocations.lock() {
            calls.push(line.clone());
        }
        if self.spawn_errors.iter().any(|p| line.starts_with(p.as_str())) {
            return Err(MaintenanceError::Command(format!(
                "{}: No such file or directory",
                command.program
            )));
        }
        Ok(line)
    }

    fn exit_for(&self, line: &str) -> i32 {
        self.exits
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, code)| *code)
            .unwrap_or(0)
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn status(&self, command: &CommandSpec) -> Result<CommandStatus, MaintenanceError> {
        let line = self.record(command)?;
        Ok(CommandStatus::from_code(self.exit_for(&line)))
    }

    async fn capture(&self, command: &CommandSpec) -> Result<CapturedOutput, MaintenanceError> {
        let line = self.record(command)?;
        let stdout = self
            .outputs
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default();

        Ok(CapturedOutput {
            status: CommandStatus::from_code(self.exit_for(&line)),
            stdout,
        })
    }

    fn has_tool(&self, tool: &str) -> bool {
        self.tools.contains(tool)
    }
}
