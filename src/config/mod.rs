//! Run configuration
//!
//! hostcare has no config file. Everything is derived from the environment,
//! the command line, and what exists on the host.

use crate::MaintenanceError;
use crate::state::HostPaths;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

/// Journal retention handed to `journalctl --vacuum-time`
pub const DEFAULT_JOURNAL_RETENTION: &str = "2d";

/// Compressed logs older than this many days are deleted
pub const DEFAULT_LOG_MAX_AGE_DAYS: u32 = 7;

/// Temp files not accessed for this many days are deleted
pub const DEFAULT_TEMP_MAX_AGE_DAYS: u32 = 10;

/// Pause between stopping the container stack and pruning
pub const DEFAULT_CONTAINER_SETTLE: Duration = Duration::from_secs(5);

/// Grace delay before a confirmed reboot is issued
pub const DEFAULT_REBOOT_GRACE: Duration = Duration::from_secs(10);

/// Fallback when no host name can be read
const FALLBACK_HOSTNAME: &str = "localhost";

/// Everything a maintenance run needs to know about its host
#[derive(Debug, Clone)]
pub struct MaintenanceConfig {
    /// Host name, used in the greeting and the compose file name
    pub hostname: String,

    /// Filesystem contacts
    pub paths: HostPaths,

    /// Whether the container maintenance stage is enabled
    pub containers: bool,

    /// Whether privileged commands are wrapped in sudo
    pub use_sudo: bool,

    pub journal_retention: String,
    pub log_max_age_days: u32,
    pub temp_max_age_days: u32,
    pub container_settle: Duration,
    pub reboot_grace: Duration,
}

impl MaintenanceConfig {
    /// Build a config with default tunables
    pub fn new(hostname: impl Into<String>, paths: HostPaths) -> Self {
        Self {
            hostname: hostname.into(),
            paths,
            containers: false,
            use_sudo: false,
            journal_retention: DEFAULT_JOURNAL_RETENTION.to_string(),
            log_max_age_days: DEFAULT_LOG_MAX_AGE_DAYS,
            temp_max_age_days: DEFAULT_TEMP_MAX_AGE_DAYS,
            container_settle: DEFAULT_CONTAINER_SETTLE,
            reboot_grace: DEFAULT_REBOOT_GRACE,
        }
    }

    /// Enable or disable the container stage
    pub fn with_containers(mut self, containers: bool) -> Self {
        self.containers = containers;
        self
    }

    /// Set whether privileged commands go through sudo
    pub fn with_sudo(mut self, use_sudo: bool) -> Self {
        self.use_sudo = use_sudo;
        self
    }

    /// Set both pauses at once (tests use zero)
    pub fn with_delays(mut self, container_settle: Duration, reboot_grace: Duration) -> Self {
        self.container_settle = container_settle;
        self.reboot_grace = reboot_grace;
        self
    }

    /// Detect the configuration of the running host
    pub async fn from_env(containers: bool) -> Result<Self, MaintenanceError> {
        let home = dirs::home_dir().ok_or_else(|| {
            MaintenanceError::Environment("could not determine home directory".to_string())
        })?;
        let hostname = read_hostname().await;
        let uid = effective_uid().await;
        debug!("Host {} (euid {:?}), home {}", hostname, uid, home.display());

        Ok(Self::new(hostname, HostPaths::new(home))
            .with_containers(containers)
            .with_sudo(uid != Some(0)))
    }
}

/// Read the kernel host name, falling back to `$HOSTNAME` then `localhost`
async fn read_hostname() -> String {
    let from_kernel = fs::read_to_string("/proc/sys/kernel/hostname")
        .await
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    from_kernel
        .or_else(|| std::env::var("HOSTNAME").ok().filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| FALLBACK_HOSTNAME.to_string())
}

async fn effective_uid() -> Option<u32> {
    let status = fs::read_to_string(Path::new("/proc/self/status")).await.ok()?;
    parse_effective_uid(&status)
}

/// Extract the effective uid from `/proc/<pid>/status` content
///
/// The `Uid:` line lists real, effective, saved and filesystem uids.
pub fn parse_effective_uid(status: &str) -> Option<u32> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("Uid:"))
        .and_then(|ids| ids.split_whitespace().nth(1))
        .and_then(|euid| euid.parse().ok())
}
