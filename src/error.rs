//! Error types for hostcare

use thiserror::Error;

/// Main error type for hostcare operations
#[derive(Error, Debug)]
pub enum MaintenanceError {
    #[error("Command execution failed: {0}")]
    Command(String),

    /// The operator declined to continue after a failed step
    #[error("Aborted after '{step}' failed")]
    Aborted { step: String, code: Option<i32> },

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl MaintenanceError {
    /// Create an abort error for a failed step
    pub fn aborted(step: impl Into<String>, code: Option<i32>) -> Self {
        Self::Aborted {
            step: step.into(),
            code,
        }
    }

    /// Process exit code this error should terminate with.
    ///
    /// An abort propagates the failed step's exit status; anything that
    /// would map to success (missing code, zero, or out of range) becomes 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Aborted {
                code: Some(code), ..
            } => u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abort_propagates_step_code() {
        assert_eq!(MaintenanceError::aborted("apt-get update", Some(100)).exit_code(), 100);
    }

    #[test]
    fn test_abort_without_code_exits_one() {
        assert_eq!(MaintenanceError::aborted("reboot", None).exit_code(), 1);
        assert_eq!(MaintenanceError::aborted("reboot", Some(0)).exit_code(), 1);
        assert_eq!(MaintenanceError::aborted("reboot", Some(-9)).exit_code(), 1);
        assert_eq!(MaintenanceError::aborted("reboot", Some(300)).exit_code(), 1);
    }

    #[test]
    fn test_other_errors_exit_one() {
        let err = MaintenanceError::Command("spawn".into());
        assert_eq!(err.exit_code(), 1);
        let err = MaintenanceError::Environment("no home".into());
        assert_eq!(err.exit_code(), 1);
    }
}
