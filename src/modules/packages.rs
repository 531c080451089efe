//! Package management module
//!
//! Builds the apt/dpkg invocations the pipeline runs and parses `dpkg --list`
//! output into structured records.

use crate::runner::CommandSpec;

/// apt front-end used for every package operation
pub const APT: &str = "apt-get";

/// dpkg, used to list installed kernel images
pub const DPKG: &str = "dpkg";

/// Refresh the package index
pub fn update_index() -> CommandSpec {
    CommandSpec::privileged(APT).arg("update")
}

/// Upgrade everything, allowing dependency changes
pub fn full_upgrade() -> CommandSpec {
    CommandSpec::privileged(APT).args(["dist-upgrade", "-y"])
}

/// Remove packages nothing depends on anymore
pub fn autoremove() -> CommandSpec {
    CommandSpec::privileged(APT).args(["autoremove", "--purge", "-y"])
}

/// Drop cached archives that can no longer be downloaded
pub fn autoclean() -> CommandSpec {
    CommandSpec::privileged(APT).args(["autoclean", "-y"])
}

/// Drop every cached archive
pub fn clean() -> CommandSpec {
    CommandSpec::privileged(APT).args(["clean", "-y"])
}

/// Purge `packages` in one invocation; `None` when there is nothing to purge
pub fn purge<S: AsRef<str>>(packages: &[S]) -> Option<CommandSpec> {
    if packages.is_empty() {
        return None;
    }
    Some(
        CommandSpec::privileged(APT)
            .args(["purge", "-y"])
            .args(packages.iter().map(|p| p.as_ref().to_string())),
    )
}

/// List installed kernel image packages; dpkg expands the pattern itself
pub fn list_kernel_images() -> CommandSpec {
    CommandSpec::new(DPKG).args(["--list", "linux-image-*"])
}

/// One row of `dpkg --list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    /// Desired action, current state, and optional error flag (e.g. `ii`, `rc`, `iHR`)
    pub status: String,
    pub name: String,
    pub version: String,
}

impl InstalledPackage {
    /// Desired install, currently installed, no error flag
    pub fn is_fully_installed(&self) -> bool {
        self.status == "ii"
    }
}

/// Parse `dpkg --list` output, skipping the legend and any malformed rows
pub fn parse_dpkg_list(output: &str) -> Vec<InstalledPackage> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let status = fields.next()?;
            if !(2..=3).contains(&status.len()) || !status.chars().all(|c| c.is_ascii_alphabetic())
            {
                return None;
            }
            let name = fields.next()?;
            let version = fields.next().unwrap_or_default();
            Some(InstalledPackage {
                status: status.to_string(),
                name: name.to_string(),
                version: version.to_string(),
            })
        })
        .collect()
}
