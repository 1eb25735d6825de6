//! Builder for constructing Settings.

use super::{BundleConfig, Settings};
use crate::bundler::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Starts from the built-in [`BundleConfig`] defaults; a loaded settings file
/// replaces them wholesale via [`SettingsBuilder::config`], and the directory
/// setters (fed by CLI flags) always win.
///
/// # Examples
///
/// ```no_run
/// use imageviewer_bundler::bundler::{BundleConfig, SettingsBuilder};
///
/// # fn example() -> imageviewer_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .config(BundleConfig {
///         py2app_version: "0.28.6".into(),
///         ..Default::default()
///     })
///     .base_directory("/tmp/out")
///     .project_directory(".")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    base_directory: Option<PathBuf>,
    project_directory: Option<PathBuf>,
    config: BundleConfig,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the base directory.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn base_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.base_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the project directory containing the descriptor and requirements.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn project_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replaces the overridable configuration.
    pub fn config(mut self, config: BundleConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates and builds the final [`Settings`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSettings`] if a required directory is missing,
    /// the application or environment name is not a single path component,
    /// or a DMG window dimension is zero.
    pub fn build(self) -> Result<Settings> {
        let base_directory = self
            .base_directory
            .ok_or_else(|| Error::InvalidSettings("base directory is required".into()))?;
        let project_directory = self
            .project_directory
            .ok_or_else(|| Error::InvalidSettings("project directory is required".into()))?;

        let config = self.config;

        require_single_component("app_name", &config.app_name)?;
        require_single_component("env_name", &config.env_name)?;
        if config.py2app_version.trim().is_empty() {
            return Err(Error::InvalidSettings(
                "py2app_version must not be empty".into(),
            ));
        }
        let (width, height) = config.dmg.window_size;
        if width == 0 || height == 0 {
            return Err(Error::InvalidSettings(format!(
                "dmg window_size must be non-zero, got {width}x{height}"
            )));
        }

        Ok(Settings::new(
            base_directory,
            project_directory,
            config.app_name,
            config.env_name,
            config.requirements,
            config.descriptor,
            config.py2app_version,
            config.library_rpath,
            config.verify_signature,
            config.tools,
            config.dmg,
        ))
    }
}

/// Rejects names that would not stay a direct child of the base directory.
///
/// These names become paths that are deleted unconditionally, so `.`, `..`,
/// separators and roots are refused.
fn require_single_component(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidSettings(format!("{field} must not be empty")));
    }

    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || name.contains(['/', '\\']) {
        return Err(Error::InvalidSettings(format!(
            "{field} must be a single directory name, got '{name}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
            .base_directory("/work/Downloads")
            .project_directory("/work/viewer")
    }

    #[test]
    fn derived_paths_hang_off_base_directory() {
        let settings = builder().build().unwrap();

        assert_eq!(settings.build_directory(), PathBuf::from("/work/Downloads/build"));
        assert_eq!(settings.dist_directory(), PathBuf::from("/work/Downloads/dist"));
        assert_eq!(settings.env_directory(), PathBuf::from("/work/Downloads/build_env"));
        assert_eq!(
            settings.built_bundle_path(),
            PathBuf::from("/work/Downloads/dist/PyQtImageViewer.app")
        );
        assert_eq!(
            settings.final_bundle_path(),
            PathBuf::from("/work/Downloads/PyQtImageViewer.app")
        );
        assert_eq!(
            settings.final_dmg_path(),
            PathBuf::from("/work/Downloads/PyQtImageViewer.dmg")
        );
        assert_eq!(
            settings.requirements_path(),
            PathBuf::from("/work/viewer/requirements.txt")
        );
        assert_eq!(settings.py2app_requirement(), "py2app==0.28.8");
    }

    #[test]
    fn volume_defaults_follow_app_name() {
        let settings = builder().build().unwrap();
        assert_eq!(settings.volume_name(), "PyQtImageViewer");
        assert_eq!(
            settings.volume_icon_path(),
            Some(PathBuf::from(
                "/work/viewer/ImageViewer/Resources/ImageViewer.icns"
            ))
        );
    }

    #[test]
    fn missing_base_directory_is_rejected() {
        let err = SettingsBuilder::new()
            .project_directory(".")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));
    }

    #[test]
    fn env_name_must_be_single_component() {
        let err = builder()
            .config(BundleConfig {
                env_name: "../escape".into(),
                ..Default::default()
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("single directory name"));
    }

    #[test]
    fn current_directory_env_name_is_rejected() {
        let err = builder()
            .config(BundleConfig {
                env_name: ".".into(),
                ..Default::default()
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("env_name"));
    }

    #[test]
    fn app_name_cannot_leave_base_directory() {
        for name in ["../Documents/x", "..", ".", "/etc/passwd", "nested/app"] {
            let err = builder()
                .config(BundleConfig {
                    app_name: name.into(),
                    ..Default::default()
                })
                .build()
                .unwrap_err();
            assert!(
                err.to_string().contains("app_name"),
                "accepted app_name {name:?}"
            );
        }
    }

    #[test]
    fn zero_window_dimension_is_rejected() {
        let mut config = BundleConfig::default();
        config.dmg.window_size = (0, 300);
        let err = builder().config(config).build().unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));
    }
}
