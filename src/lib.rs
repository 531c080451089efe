//! hostcare library
//!
//! Supervised maintenance of a single host: package updates, housekeeping,
//! an optional container refresh, a reboot check, and a closing summary.
//!
//! # Design Principles
//!
//! - **Run and recover**: every external step reports pass/fail; a failure
//!   stops the run unless the operator explicitly continues
//! - **Degrade on absence**: optional tools and paths are skipped, not failed
//! - **Sequential**: one child process at a time, no internal concurrency
//! - **No state**: nothing is persisted between runs

pub mod config;
pub mod gate;
pub mod modules;
pub mod network;
pub mod runner;
pub mod stages;
pub mod state;
pub mod ui;

mod error;

pub use error::MaintenanceError;

use stages::Context;
use stages::reboot::RebootCheck;
use tracing::{debug, info};

/// Maintenance stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Host name and start time
    Greeting,
    /// Package index refresh and full upgrade
    Update,
    /// Caches, logs, temp files, stale kernels
    Housekeeping,
    /// Operator cleanup executable, if installed
    CustomCleanup,
    /// Compose stack refresh, if enabled
    Containers,
    /// Offer a reboot when one is pending
    RebootCheck,
    /// Timing and host diagnostics
    Summary,
}

impl Stage {
    /// The full pipeline
    pub const ALL: [Stage; 7] = [
        Stage::Greeting,
        Stage::Update,
        Stage::Housekeeping,
        Stage::CustomCleanup,
        Stage::Containers,
        Stage::RebootCheck,
        Stage::Summary,
    ];

    /// Whether this stage runs on this host at all
    pub fn applies(&self, ctx: &Context<'_>) -> bool {
        match self {
            Stage::CustomCleanup => stages::custom_cleanup::applies(ctx),
            Stage::Containers => ctx.config.containers,
            _ => true,
        }
    }

    /// Operator-facing notice for a stage that does not apply.
    ///
    /// Only an absent optional path earns one; the container stage is opt-in
    /// and stays quiet when disabled.
    pub fn skip_notice(&self, ctx: &Context<'_>) -> Option<String> {
        match self {
            Stage::CustomCleanup => Some(stages::custom_cleanup::absent_notice(
                &ctx.config.paths.custom_cleanup(),
            )),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Greeting => write!(f, "greeting"),
            Stage::Update => write!(f, "update"),
            Stage::Housekeeping => write!(f, "housekeeping"),
            Stage::CustomCleanup => write!(f, "custom-cleanup"),
            Stage::Containers => write!(f, "containers"),
            Stage::RebootCheck => write!(f, "reboot-check"),
            Stage::Summary => write!(f, "summary"),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every applicable stage ran
    Completed,
    /// A reboot was issued; later stages did not run
    Rebooted,
}

/// Run the full maintenance pipeline
pub async fn run_pipeline(ctx: &Context<'_>) -> Result<RunOutcome, MaintenanceError> {
    run_stages(ctx, &Stage::ALL).await
}

/// Run the given stages in order, skipping those that do not apply
pub async fn run_stages(ctx: &Context<'_>, stages: &[Stage]) -> Result<RunOutcome, MaintenanceError> {
    for stage in stages {
        if !stage.applies(ctx) {
            debug!("Skipping stage: {}", stage);
            if let Some(notice) = stage.skip_notice(ctx) {
                ui::warning(&notice);
            }
            continue;
        }
        info!("Starting stage: {}", stage);
        if run_stage(ctx, *stage).await? == RunOutcome::Rebooted {
            info!("Reboot issued during stage: {}", stage);
            return Ok(RunOutcome::Rebooted);
        }
        info!("Completed stage: {}", stage);
    }
    Ok(RunOutcome::Completed)
}

async fn run_stage(ctx: &Context<'_>, stage: Stage) -> Result<RunOutcome, MaintenanceError> {
    match stage {
        Stage::Greeting => stages::greeting::run(ctx),
        Stage::Update => stages::update::run(ctx).await?,
        Stage::Housekeeping => stages::housekeeping::run(ctx).await?,
        Stage::CustomCleanup => stages::custom_cleanup::run(ctx).await,
        Stage::Containers => stages::containers::run(ctx).await?,
        Stage::RebootCheck => {
            if stages::reboot::check_reboot(ctx).await? == RebootCheck::Rebooted {
                return Ok(RunOutcome::Rebooted);
            }
        }
        Stage::Summary => stages::summary::run(ctx).await?,
    }
    Ok(RunOutcome::Completed)
}
