//! Housekeeping stage - caches, logs, temp files, stale kernels
//!
//! Every action is independent. An action whose tool is not installed or
//! whose target directory does not exist is skipped with a warning and never
//! reaches the continuation gate.

use super::Context;
use crate::config::MaintenanceConfig;
use crate::modules::{kernels, packages};
use crate::runner::{CommandRunner, CommandSpec};
use crate::{MaintenanceError, ui};
use std::path::PathBuf;
use tracing::{debug, info};

/// What must be present on the host for an action to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Tool(&'static str),
    Dir(PathBuf),
}

impl Requirement {
    /// Describe the requirement if it is not met
    fn missing(&self, runner: &dyn CommandRunner) -> Option<String> {
        match self {
            Self::Tool(tool) if !runner.has_tool(tool) => Some(format!("{} not installed", tool)),
            Self::Dir(dir) if !dir.is_dir() => Some(format!("{} not found", dir.display())),
            _ => None,
        }
    }
}

/// One housekeeping action
#[derive(Debug, Clone)]
pub struct Action {
    pub description: String,
    pub command: CommandSpec,
    pub requires: Vec<Requirement>,
}

impl Action {
    fn new(description: &str, command: CommandSpec, requires: Vec<Requirement>) -> Self {
        Self {
            description: description.to_string(),
            command,
            requires,
        }
    }
}

/// Ordered housekeeping actions for this host, kernel purge excluded
pub fn plan(config: &MaintenanceConfig) -> Vec<Action> {
    use Requirement::{Dir, Tool};

    let paths = &config.paths;
    let apt = Tool(packages::APT);
    let log_age = format!("+{}", config.log_max_age_days);
    let temp_age = format!("+{}", config.temp_max_age_days);

    let aged_temp = |dir: PathBuf| {
        CommandSpec::privileged("find")
            .arg(dir.display().to_string())
            .args(["-xdev", "-type", "f", "-atime", temp_age.as_str(), "-delete"])
    };

    vec![
        Action::new(
            "Remove orphaned packages",
            packages::autoremove(),
            vec![apt.clone()],
        ),
        Action::new(
            "Clear obsolete package archives",
            packages::autoclean(),
            vec![apt.clone()],
        ),
        Action::new("Clear package cache", packages::clean(), vec![apt]),
        Action::new(
            "Trim journal",
            CommandSpec::privileged("journalctl")
                .arg(format!("--vacuum-time={}", config.journal_retention)),
            vec![Tool("journalctl")],
        ),
        Action::new(
            "Refresh locate database",
            CommandSpec::privileged("updatedb"),
            vec![Tool("updatedb")],
        ),
        Action::new(
            "Delete old compressed logs",
            CommandSpec::privileged("find")
                .arg(paths.log_dir().display().to_string())
                .args(["-type", "f", "-name", "*.gz", "-mtime", log_age.as_str(), "-delete"]),
            vec![Tool("find"), Dir(paths.log_dir())],
        ),
        Action::new(
            "Clear thumbnail cache",
            CommandSpec::new("find")
                .arg(paths.thumbnail_cache().display().to_string())
                .args(["-mindepth", "1", "-delete"]),
            vec![Tool("find"), Dir(paths.thumbnail_cache())],
        ),
        Action::new(
            "Delete stale files in /tmp",
            aged_temp(paths.tmp_dir()),
            vec![Tool("find"), Dir(paths.tmp_dir())],
        ),
        Action::new(
            "Delete stale files in /var/tmp",
            aged_temp(paths.var_tmp_dir()),
            vec![Tool("find"), Dir(paths.var_tmp_dir())],
        ),
    ]
}

/// Run the housekeeping stage
pub async fn run(ctx: &Context<'_>) -> Result<(), MaintenanceError> {
    ui::heading("Housekeeping");
    let runner = ctx.steps.runner();

    for action in plan(ctx.config) {
        if let Some(reason) = action.requires.iter().find_map(|r| r.missing(runner)) {
            ui::warning(&format!("Skipping '{}': {}", action.description, reason));
            continue;
        }
        ctx.steps.run(&action.description, &action.command).await?;
    }

    purge_old_kernels(ctx).await?;

    info!("Housekeeping stage: completed");
    Ok(())
}

/// Purge every installed kernel image except the running one, in one batch
pub async fn purge_old_kernels(ctx: &Context<'_>) -> Result<(), MaintenanceError> {
    let runner = ctx.steps.runner();
    let required = [
        Requirement::Tool(packages::APT),
        Requirement::Tool(packages::DPKG),
        Requirement::Tool("uname"),
    ];
    if let Some(reason) = required.iter().find_map(|r| r.missing(runner)) {
        ui::warning(&format!("Skipping kernel purge: {}", reason));
        return Ok(());
    }

    let uname = match runner.capture(&CommandSpec::new("uname").arg("-r")).await {
        Ok(out) if out.status.success() => out,
        _ => {
            ui::warning("Skipping kernel purge: could not determine running kernel");
            return Ok(());
        }
    };

    // dpkg exits 1 when nothing matches; the listing is still authoritative
    let listing = match runner.capture(&packages::list_kernel_images()).await {
        Ok(out) => out,
        Err(e) => {
            ui::warning(&format!("Skipping kernel purge: {}", e));
            return Ok(());
        }
    };
    let installed = packages::parse_dpkg_list(&listing.stdout);
    let stale = kernels::select_purge_candidates(&uname.stdout, &installed)?;

    let names: Vec<&str> = stale.iter().map(|k| k.name.as_str()).collect();
    let Some(purge) = packages::purge(&names) else {
        debug!("No stale kernels to purge");
        ui::detail("Kernels", "nothing to purge");
        return Ok(());
    };

    ctx.steps
        .run(&format!("Purge {} old kernel(s)", names.len()), &purge)
        .await?;
    Ok(())
}
