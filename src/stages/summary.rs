//! Summary stage - timing and host diagnostics
//!
//! Diagnostics are informational; a failing probe is a warning.

use super::Context;
use crate::network::{self, InterfaceAddresses};
use crate::runner::{CommandRunner, CommandSpec};
use crate::state::Elapsed;
use crate::{MaintenanceError, ui};
use chrono::Local;
use tracing::warn;

/// Render one interface for the summary: `eth0 (UP) 192.168.1.20/24 ...`
pub fn format_interface(interface: &InterfaceAddresses) -> String {
    let addresses = if interface.addresses.is_empty() {
        "no address".to_string()
    } else {
        interface.addresses.join(" ")
    };
    format!("{} ({}) {}", interface.name, interface.state, addresses)
}

/// Elapsed time line: `125 seconds (2 min 5 sec)`
pub fn format_elapsed(elapsed: &Elapsed) -> String {
    format!("{} ({})", elapsed.as_seconds(), elapsed.as_minutes())
}

async fn probe(runner: &dyn CommandRunner, command: &CommandSpec) -> Option<String> {
    match runner.capture(command).await {
        Ok(out) if out.status.success() => Some(out.stdout),
        Ok(out) => {
            ui::warning(&format!("{} exited with {:?}", command, out.status.code));
            None
        }
        Err(e) => {
            ui::warning(&format!("{} unavailable: {}", command, e));
            None
        }
    }
}

/// Interfaces to report on, per the default route
pub async fn primary_interfaces(
    runner: &dyn CommandRunner,
) -> Result<Vec<InterfaceAddresses>, MaintenanceError> {
    let routes = probe(runner, &network::default_route_command())
        .await
        .unwrap_or_default();
    let selection = network::resolve(&routes)?;
    let listing = probe(runner, &network::address_command(&selection))
        .await
        .unwrap_or_default();
    Ok(network::select_addresses(
        &selection,
        network::parse_brief_addresses(&listing),
    ))
}

/// Run the summary stage
pub async fn run(ctx: &Context<'_>) -> Result<(), MaintenanceError> {
    let elapsed = Elapsed::new(ctx.session.elapsed());
    let runner = ctx.steps.runner();

    ui::heading("Summary");
    ui::detail("Finished", &Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
    ui::detail("Elapsed", &format_elapsed(&elapsed));

    if let Some(uptime) = probe(runner, &CommandSpec::new("uptime").arg("-p")).await {
        ui::detail("Uptime", uptime.trim());
    }

    if let Some(memory) = probe(runner, &CommandSpec::new("free").arg("-h")).await {
        println!("{}", memory.trim_end());
    }

    match primary_interfaces(runner).await {
        Ok(interfaces) if interfaces.is_empty() => ui::detail("Network", "no interfaces found"),
        Ok(interfaces) => {
            for interface in &interfaces {
                ui::detail("Network", &format_interface(interface));
            }
        }
        Err(e) => warn!("Could not resolve network interfaces: {}", e),
    }

    Ok(())
}
