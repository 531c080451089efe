//! Greeting stage

use super::Context;
use crate::ui;

/// Announce the run; cannot fail
pub fn run(ctx: &Context<'_>) {
    ui::heading(&format!("Maintenance of {}", ctx.config.hostname));
    ui::detail(
        "Started",
        &ctx.session.start_time().format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    if ctx.config.containers {
        ui::detail("Containers", "enabled");
    }
}
