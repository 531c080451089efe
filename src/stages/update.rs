//! Update stage - refresh the package index and upgrade
//!
//! A failed refresh still reaches the upgrade if the operator continues.

use super::Context;
use crate::modules::packages;
use crate::{MaintenanceError, ui};
use tracing::info;

/// Run the update stage
pub async fn run(ctx: &Context<'_>) -> Result<(), MaintenanceError> {
    ui::heading("System update");

    ctx.steps
        .run("Refresh package index", &packages::update_index())
        .await?;
    let upgrade = ctx
        .steps
        .run("Upgrade installed packages", &packages::full_upgrade())
        .await?;

    info!("Update stage: completed (upgrade ok: {})", upgrade.is_success());
    Ok(())
}
