//! Filesystem contacts
//!
//! Every path hostcare reads, probes, or cleans lives here so tests can point
//! the whole run at a temporary root.

use std::path::{Path, PathBuf};

/// Directory under the home directory holding per-host compose files
pub const COMPOSE_DIR: &str = "docker";

/// Name of the optional operator cleanup executable in `~/.local/bin`
pub const CUSTOM_CLEANUP_NAME: &str = "hostcare-cleanup";

/// Host paths used by the maintenance stages
#[derive(Debug, Clone)]
pub struct HostPaths {
    /// Filesystem root (default: /)
    pub root: PathBuf,
    /// Operator home directory
    pub home: PathBuf,
}

impl HostPaths {
    /// Create with the real filesystem root
    pub fn new(home: impl AsRef<Path>) -> Self {
        Self::with_root("/", home)
    }

    /// Create with a custom root (useful for testing)
    pub fn with_root(root: impl AsRef<Path>, home: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            home: home.as_ref().to_path_buf(),
        }
    }

    fn system(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    // ==================== Package Manager Markers ====================

    /// /var/run/reboot-required - Reboot-pending marker
    pub fn reboot_required(&self) -> PathBuf {
        self.system("var/run/reboot-required")
    }

    /// /var/run/reboot-required.pkgs - Packages that requested the reboot
    pub fn reboot_required_pkgs(&self) -> PathBuf {
        self.system("var/run/reboot-required.pkgs")
    }

    // ==================== Housekeeping Targets ====================

    /// /var/log - Rotated logs
    pub fn log_dir(&self) -> PathBuf {
        self.system("var/log")
    }

    /// /tmp
    pub fn tmp_dir(&self) -> PathBuf {
        self.system("tmp")
    }

    /// /var/tmp
    pub fn var_tmp_dir(&self) -> PathBuf {
        self.system("var/tmp")
    }

    // ==================== Home Paths ====================

    /// ~/.cache/thumbnails - Desktop thumbnail cache
    pub fn thumbnail_cache(&self) -> PathBuf {
        self.home.join(".cache").join("thumbnails")
    }

    /// ~/.local/bin/hostcare-cleanup - Operator cleanup hook
    pub fn custom_cleanup(&self) -> PathBuf {
        self.home.join(".local").join("bin").join(CUSTOM_CLEANUP_NAME)
    }

    /// ~/docker/<host>-compose.yml - Host-specific compose definition
    pub fn compose_file(&self, hostname: &str) -> PathBuf {
        self.home
            .join(COMPOSE_DIR)
            .join(format!("{}-compose.yml", hostname))
    }
}
