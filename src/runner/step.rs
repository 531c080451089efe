//! Step runner - one external command with pass/fail reporting
//!
//! A failed step always reaches the continuation gate. Abort surfaces as
//! [`MaintenanceError::Aborted`], which unwinds the rest of the pipeline.

use super::{CommandRunner, CommandSpec};
use crate::gate::{self, Decision, Operator};
use crate::{MaintenanceError, ui};
use tracing::{debug, info, warn};

/// Result of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    /// Failed, and the operator chose to continue (or the step was best-effort)
    Failed { code: Option<i32> },
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Runs steps against a command runner, asking an operator on failure
#[derive(Clone, Copy)]
pub struct StepRunner<'a> {
    runner: &'a dyn CommandRunner,
    operator: &'a dyn Operator,
}

impl<'a> StepRunner<'a> {
    pub fn new(runner: &'a dyn CommandRunner, operator: &'a dyn Operator) -> Self {
        Self { runner, operator }
    }

    pub fn runner(&self) -> &'a dyn CommandRunner {
        self.runner
    }

    pub fn operator(&self) -> &'a dyn Operator {
        self.operator
    }

    /// Run a step; on failure the operator decides whether the run goes on
    pub async fn run(
        &self,
        description: &str,
        command: &CommandSpec,
    ) -> Result<StepOutcome, MaintenanceError> {
        let outcome = self.execute(description, command).await;
        let StepOutcome::Failed { code } = outcome else {
            return Ok(outcome);
        };

        match gate::ask_continue(self.operator).await {
            Decision::Continue => {
                info!("Continuing after failed step: {}", description);
                Ok(outcome)
            }
            Decision::Abort => Err(MaintenanceError::aborted(description, code)),
        }
    }

    /// Run a step whose failure is only worth a warning
    pub async fn run_best_effort(&self, description: &str, command: &CommandSpec) -> StepOutcome {
        let outcome = self.execute(description, command).await;
        if let StepOutcome::Failed { code } = outcome {
            let status = code.map_or_else(|| "no exit status".to_string(), |c| c.to_string());
            ui::warning(&format!("{} failed ({}); continuing", description, status));
        }
        outcome
    }

    async fn execute(&self, description: &str, command: &CommandSpec) -> StepOutcome {
        ui::start(description);
        debug!("Step '{}': {}", description, command);

        let code = match self.runner.status(command).await {
            Ok(status) if status.success() => {
                ui::success(description);
                return StepOutcome::Succeeded;
            }
            Ok(status) => status.code,
            Err(e) => {
                warn!("Could not run {}: {}", command.program, e);
                None
            }
        };

        ui::failure(description, code);
        StepOutcome::Failed { code }
    }
}
