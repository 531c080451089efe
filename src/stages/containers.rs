//! Container stage - refresh the host's compose stack
//!
//! Off unless enabled. The stack definition is found by host name; a missing
//! file or a host without docker turns the stage into a warning.

use super::Context;
use crate::runner::CommandSpec;
use crate::{MaintenanceError, ui};
use std::path::Path;
use tracing::info;

/// Container engine binary
pub const DOCKER: &str = "docker";

fn compose(file: &Path) -> CommandSpec {
    CommandSpec::privileged(DOCKER).args(["compose", "-f"]).arg(file.display().to_string())
}

/// Run the container stage for `ctx.config.hostname`
pub async fn run(ctx: &Context<'_>) -> Result<(), MaintenanceError> {
    maintain_containers(ctx, &ctx.config.hostname).await
}

/// Stop, prune, pull and restart the compose stack defined for `host`
pub async fn maintain_containers(ctx: &Context<'_>, host: &str) -> Result<(), MaintenanceError> {
    ui::heading("Containers");

    let file = ctx.config.paths.compose_file(host);
    if !file.is_file() {
        ui::warning(&format!(
            "Skipping containers: no compose file at {}",
            file.display()
        ));
        return Ok(());
    }
    if !ctx.steps.runner().has_tool(DOCKER) {
        ui::warning("Skipping containers: docker not installed");
        return Ok(());
    }

    let steps = ctx.steps;
    // Volumes may live on network mounts
    steps
        .run("Mount all filesystems", &CommandSpec::privileged("mount").arg("-a"))
        .await?;
    steps
        .run("Stop container stack", &compose(&file).arg("down"))
        .await?;

    tokio::time::sleep(ctx.config.container_settle).await;

    steps
        .run(
            "Prune unused images, containers and volumes",
            &CommandSpec::privileged(DOCKER).args(["system", "prune", "--all", "--volumes", "--force"]),
        )
        .await?;
    steps
        .run("Pull updated images", &compose(&file).arg("pull"))
        .await?;
    steps
        .run(
            "Start container stack",
            &compose(&file).args(["up", "-d", "--remove-orphans"]),
        )
        .await?;
    steps
        .run(
            "Report container disk usage",
            &CommandSpec::privileged(DOCKER).args(["system", "df"]),
        )
        .await?;

    info!("Container stage: completed for {}", host);
    Ok(())
}
