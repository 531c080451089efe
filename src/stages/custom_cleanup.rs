//! Custom cleanup stage
//!
//! Runs the operator's own cleanup executable when one is installed. Its
//! failure is reported as a warning and never stops the run.

use super::Context;
use crate::runner::CommandSpec;
use crate::ui;
use std::path::Path;
use tracing::info;

/// Whether `path` is a regular file with an execute bit set
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

/// Whether this stage applies to the host
pub fn applies(ctx: &Context<'_>) -> bool {
    is_executable(&ctx.config.paths.custom_cleanup())
}

/// Notice shown when no cleanup executable is installed
pub fn absent_notice(script: &Path) -> String {
    format!(
        "No executable custom cleanup script at {}; skipping",
        script.display()
    )
}

/// Run the custom cleanup stage
pub async fn run(ctx: &Context<'_>) {
    ui::heading("Custom cleanup");
    let script = ctx.config.paths.custom_cleanup();
    let command = CommandSpec::new(script.display().to_string());

    let outcome = ctx
        .steps
        .run_best_effort("Run custom cleanup script", &command)
        .await;
    info!("Custom cleanup: {:?}", outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn test_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let script = temp_dir.path().join("cleanup");
        fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();

        fs::set_permissions(&script, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable(&script));

        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable(&script));
    }

    #[test]
    fn test_absent_notice_names_script() {
        let notice = absent_notice(Path::new("/home/ops/.local/bin/hostcare-cleanup"));
        assert!(notice.contains("/home/ops/.local/bin/hostcare-cleanup"));
        assert!(notice.ends_with("skipping"));
    }

    #[test]
    fn test_missing_and_directories_are_not_executable() {
        let temp_dir = TempDir::new().unwrap();
        assert!(!is_executable(&temp_dir.path().join("absent")));
        assert!(!is_executable(temp_dir.path()));
    }
}
