//! Reboot check
//!
//! apt leaves a marker when an upgrade needs a restart. If it is present the
//! operator is asked whether to reboot now.

use super::Context;
use crate::gate;
use crate::runner::{CommandSpec, StepOutcome};
use crate::{MaintenanceError, ui};
use tokio::fs;
use tracing::{debug, info};

/// Prompt shown when a reboot is pending
pub const REBOOT_PROMPT: &str = "Reboot now? [y/N] ";

/// What the reboot check did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebootCheck {
    /// Reboot issued; nothing else should run
    Rebooted,
    /// Reboot pending, but the operator said no
    Declined,
    /// No reboot marker
    NotRequired,
    /// The reboot command failed and the operator chose to continue
    Failed,
}

/// Package names from the `.pkgs` sidecar, one per line
pub fn parse_pending_packages(content: &str) -> Vec<String> {
    let mut packages: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    packages.sort();
    packages.dedup();
    packages
}

/// Run the reboot check
pub async fn check_reboot(ctx: &Context<'_>) -> Result<RebootCheck, MaintenanceError> {
    ui::heading("Reboot check");

    let paths = &ctx.config.paths;
    if !paths.reboot_required().exists() {
        ui::detail("Reboot", "not required");
        return Ok(RebootCheck::NotRequired);
    }

    ui::warning("A reboot is required to finish applying updates");
    match fs::read_to_string(paths.reboot_required_pkgs()).await {
        Ok(content) => {
            for package in parse_pending_packages(&content) {
                ui::detail("Requested by", &package);
            }
        }
        Err(e) => debug!("No reboot package list: {}", e),
    }

    if !gate::confirm(ctx.steps.operator(), REBOOT_PROMPT).await {
        info!("Reboot declined");
        return Ok(RebootCheck::Declined);
    }

    ui::detail(
        "Reboot",
        &format!("in {} seconds", ctx.config.reboot_grace.as_secs()),
    );
    tokio::time::sleep(ctx.config.reboot_grace).await;

    match ctx
        .steps
        .run("Reboot", &CommandSpec::privileged("reboot"))
        .await?
    {
        StepOutcome::Succeeded => Ok(RebootCheck::Rebooted),
        StepOutcome::Failed { .. } => Ok(RebootCheck::Failed),
    }
}
