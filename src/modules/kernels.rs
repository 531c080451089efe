//! Stale kernel selection
//!
//! Picks installed kernel images that are not the running kernel. The running
//! kernel's package is never selected, whatever the input looks like.

use super::packages::InstalledPackage;
use crate::MaintenanceError;
use regex::Regex;
use tracing::{debug, warn};

/// Kernel image package names that carry a version number
const VERSIONED_IMAGE_PATTERN: &str = r"^linux-image-.*\d+\.\d+";

/// Whether a kernel image is the one currently booted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum KernelTag {
    Current,
    Removable,
}

/// An installed, versioned kernel image package
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct KernelPackage {
    pub name: String,
    pub tag: KernelTag,
}

/// Tag every fully installed, versioned kernel image.
///
/// The running version is matched literally anywhere in the package name.
/// A blank running version means the running kernel is unknown, so every
/// image is treated as current.
pub fn classify(
    running_version: &str,
    installed: &[InstalledPackage],
) -> Result<Vec<KernelPackage>, MaintenanceError> {
    let versioned = Regex::new(VERSIONED_IMAGE_PATTERN)?;
    let running_version = running_version.trim();
    let running = Regex::new(&regex::escape(running_version))?;

    let mut kernels: Vec<KernelPackage> = installed
        .iter()
        .filter(|p| p.is_fully_installed())
        .filter(|p| versioned.is_match(&p.name))
        .map(|p| {
            let tag = if running_version.is_empty() || running.is_match(&p.name) {
                KernelTag::Current
            } else {
                KernelTag::Removable
            };
            KernelPackage {
                name: p.name.clone(),
                tag,
            }
        })
        .collect();

    kernels.sort();
    kernels.dedup();
    Ok(kernels)
}

/// Kernel images safe to purge, sorted by name
pub fn select_purge_candidates(
    running_version: &str,
    installed: &[InstalledPackage],
) -> Result<Vec<KernelPackage>, MaintenanceError> {
    if running_version.trim().is_empty() {
        warn!("Running kernel version unknown; not selecting any kernel for removal");
    }

    let candidates: Vec<KernelPackage> = classify(running_version, installed)?
        .into_iter()
        .filter(|k| k.tag == KernelTag::Removable)
        .collect();

    debug!(
        "Selected {} kernel packages for removal (running {})",
        candidates.len(),
        running_version.trim()
    );
    Ok(candidates)
}
