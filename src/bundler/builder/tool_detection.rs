//! External tool detection and availability checking.
//!
//! Every program the run needs is resolved before anything on disk is
//! touched, so a missing tool never leaves a half-cleaned base directory.

use crate::bundler::{
    error::{Error, Result},
    settings::Settings,
};
use std::path::{Path, PathBuf};

/// Resolves one configured program to an executable path.
fn resolve(tool: &Path, hint: &'static str) -> Result<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool.display(), path.display());
            Ok(path)
        }
        Err(e) => {
            log::debug!("{} not found: {}", tool.display(), e);
            Err(Error::ToolNotFound {
                tool: tool.display().to_string(),
                hint,
            })
        }
    }
}

/// Checks that every program needed for this run is available.
///
/// `create-dmg` is only required when `installer` is set.
pub fn require_tools(settings: &Settings, installer: bool) -> Result<()> {
    let tools = settings.tools();

    resolve(
        &tools.python,
        "install Python 3 (e.g. `brew install python`) or set tools.python",
    )?;
    resolve(
        &tools.install_name_tool,
        "install the Xcode command line tools (`xcode-select --install`)",
    )?;
    resolve(
        &tools.codesign,
        "install the Xcode command line tools (`xcode-select --install`)",
    )?;

    if installer {
        resolve(&tools.create_dmg, "install it with `brew install create-dmg`")?;
    } else {
        log::debug!("Disk image not requested, skipping create-dmg check");
    }

    log::info!("✓ All required tools available");
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::bundler::settings::{BundleConfig, SettingsBuilder, ToolSettings};

    fn settings_with(tools: ToolSettings) -> Settings {
        SettingsBuilder::new()
            .base_directory("/tmp")
            .project_directory("/tmp")
            .config(BundleConfig {
                tools,
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    fn present() -> ToolSettings {
        ToolSettings {
            python: "sh".into(),
            install_name_tool: "sh".into(),
            codesign: "sh".into(),
            create_dmg: "/nonexistent/create-dmg".into(),
        }
    }

    #[test]
    fn create_dmg_only_required_for_installer() {
        let settings = settings_with(present());
        require_tools(&settings, false).unwrap();

        let err = require_tools(&settings, true).unwrap_err();
        match err {
            Error::ToolNotFound { tool, .. } => assert_eq!(tool, "/nonexistent/create-dmg"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_codesign_is_reported() {
        let settings = settings_with(ToolSettings {
            codesign: "definitely-not-codesign-xyz".into(),
            ..present()
        });
        let err = require_tools(&settings, false).unwrap_err();
        assert!(err.to_string().contains("definitely-not-codesign-xyz"));
    }
}
