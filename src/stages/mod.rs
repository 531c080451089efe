//! Maintenance stages
//!
//! Stages run in a fixed order:
//! 1. Greeting
//! 2. Update - refresh the package index, full upgrade
//! 3. Housekeeping - caches, logs, temp files, stale kernels
//! 4. Custom cleanup - operator hook, if installed
//! 5. Containers - compose stack refresh, if enabled
//! 6. Reboot check
//! 7. Summary

pub mod containers;
pub mod custom_cleanup;
pub mod greeting;
pub mod housekeeping;
pub mod reboot;
pub mod summary;
pub mod update;

use crate::config::MaintenanceConfig;
use crate::runner::StepRunner;
use crate::state::RunSession;

/// Everything a stage needs: host config, the step runner, and run timing
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub config: &'a MaintenanceConfig,
    pub steps: StepRunner<'a>,
    pub session: RunSession,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a MaintenanceConfig, steps: StepRunner<'a>, session: RunSession) -> Self {
        Self {
            config,
            steps,
            session,
        }
    }
}
