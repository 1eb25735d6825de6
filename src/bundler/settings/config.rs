//! Settings file loaded from TOML.

use super::{DmgSettings, ToolSettings};
use crate::bundler::error::{ErrorExt, Result};
use std::path::{Path, PathBuf};

/// Overridable bundler configuration.
///
/// Every key is optional; absent keys keep the built-in defaults taken from
/// the application's `setup.py`.
///
/// ```toml
/// app_name = "PyQtImageViewer"
/// py2app_version = "0.28.8"
///
/// [tools]
/// python = "/opt/homebrew/bin/python3.12"
///
/// [dmg]
/// window_size = [640, 320]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    /// Application name; the bundle is `<app_name>.app`.
    pub app_name: String,

    /// Directory name of the isolated environment under the base directory.
    pub env_name: String,

    /// Requirements manifest, relative to the project directory.
    pub requirements: PathBuf,

    /// Project descriptor handed to the packaging tool.
    pub descriptor: PathBuf,

    /// Pinned `py2app` version.
    pub py2app_version: String,

    /// Runtime search path added to the bundle executable.
    pub library_rpath: String,

    /// Verify the ad-hoc signature after signing.
    pub verify_signature: bool,

    /// External programs.
    pub tools: ToolSettings,

    /// Disk image layout.
    pub dmg: DmgSettings,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            app_name: "PyQtImageViewer".into(),
            env_name: "build_env".into(),
            requirements: PathBuf::from("requirements.txt"),
            descriptor: PathBuf::from("setup.py"),
            py2app_version: "0.28.8".into(),
            library_rpath: "@executable_path/../Resources/lib/python3.12/PySide6/Qt/lib".into(),
            verify_signature: true,
            tools: ToolSettings::default(),
            dmg: DmgSettings::default(),
        }
    }
}

impl BundleConfig {
    /// Reads and parses a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).fs_context("reading settings file", path)?;
        let config = toml::from_str(&contents)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let config: BundleConfig = toml::from_str("").unwrap();
        assert_eq!(config, BundleConfig::default());
    }

    #[test]
    fn partial_tables_merge_with_defaults() {
        let config: BundleConfig = toml::from_str(
            r#"
            py2app_version = "0.28.6"

            [tools]
            codesign = "/usr/local/bin/fake-codesign"

            [dmg]
            window_size = [640, 320]
            "#,
        )
        .unwrap();

        assert_eq!(config.py2app_version, "0.28.6");
        assert_eq!(config.app_name, "PyQtImageViewer");
        assert_eq!(
            config.tools.codesign,
            PathBuf::from("/usr/local/bin/fake-codesign")
        );
        assert_eq!(config.tools.python, PathBuf::from("python3"));
        assert_eq!(config.dmg.window_size, (640, 320));
        assert_eq!(config.dmg.icon_size, 100);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: std::result::Result<BundleConfig, _> = toml::from_str("py2app = \"1\"");
        assert!(res.is_err());
    }

    #[test]
    fn load_reports_missing_file_path() {
        let err = BundleConfig::load(Path::new("/nonexistent/bundler.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bundler.toml"));
    }
}
