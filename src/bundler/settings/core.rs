//! Core Settings struct and implementations.

use super::{DmgSettings, ToolSettings};
use std::path::{Path, PathBuf};

/// Main settings for a bundling run.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder), which validates
/// every field. All derived paths (build, dist, environment, final artifacts)
/// hang off the base directory.
///
/// # Examples
///
/// ```no_run
/// use imageviewer_bundler::bundler::SettingsBuilder;
///
/// # fn example() -> imageviewer_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .base_directory("/Users/me/Downloads")
///     .project_directory("/Users/me/src/PyQtImageViewer")
///     .build()?;
/// assert!(settings.final_bundle_path().ends_with("PyQtImageViewer.app"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    base_directory: PathBuf,
    project_directory: PathBuf,
    app_name: String,
    env_name: String,
    requirements: PathBuf,
    descriptor: PathBuf,
    py2app_version: String,
    library_rpath: String,
    verify_signature: bool,
    tools: ToolSettings,
    dmg: DmgSettings,
}

impl Settings {
    /// Returns the base directory holding all transient and final artifacts.
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Returns the directory containing the project descriptor.
    pub fn project_directory(&self) -> &Path {
        &self.project_directory
    }

    /// Returns the application name.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Returns the bundle directory name, `<AppName>.app`.
    pub fn bundle_file_name(&self) -> String {
        format!("{}.app", self.app_name)
    }

    /// Intermediate build directory handed to the packaging tool.
    pub fn build_directory(&self) -> PathBuf {
        self.base_directory.join("build")
    }

    /// Output directory handed to the packaging tool.
    pub fn dist_directory(&self) -> PathBuf {
        self.base_directory.join("dist")
    }

    /// Isolated environment directory.
    pub fn env_directory(&self) -> PathBuf {
        self.base_directory.join(&self.env_name)
    }

    /// Where the packaging tool leaves the bundle.
    pub fn built_bundle_path(&self) -> PathBuf {
        self.dist_directory().join(self.bundle_file_name())
    }

    /// Canonical destination of the finished bundle.
    pub fn final_bundle_path(&self) -> PathBuf {
        self.base_directory.join(self.bundle_file_name())
    }

    /// Canonical destination of the disk image.
    pub fn final_dmg_path(&self) -> PathBuf {
        self.base_directory.join(format!("{}.dmg", self.app_name))
    }

    /// Requirements manifest resolved against the project directory.
    pub fn requirements_path(&self) -> PathBuf {
        self.project_directory.join(&self.requirements)
    }

    /// Project descriptor as passed to the interpreter (relative to the project directory).
    pub fn descriptor(&self) -> &Path {
        &self.descriptor
    }

    /// Pinned packaging tool requirement, e.g. `py2app==0.28.8`.
    pub fn py2app_requirement(&self) -> String {
        format!("py2app=={}", self.py2app_version)
    }

    /// Runtime search path added to the bundle executable.
    pub fn library_rpath(&self) -> &str {
        &self.library_rpath
    }

    /// Whether the signature is verified after ad-hoc signing.
    pub fn verify_signature(&self) -> bool {
        self.verify_signature
    }

    /// External programs.
    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    /// Disk image layout.
    pub fn dmg(&self) -> &DmgSettings {
        &self.dmg
    }

    /// Volume name, defaulting to the application name.
    pub fn volume_name(&self) -> &str {
        self.dmg.volume_name.as_deref().unwrap_or(&self.app_name)
    }

    /// Volume icon resolved against the project directory.
    pub fn volume_icon_path(&self) -> Option<PathBuf> {
        self.dmg
            .volume_icon
            .as_ref()
            .map(|icon| self.project_directory.join(icon))
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        base_directory: PathBuf,
        project_directory: PathBuf,
        app_name: String,
        env_name: String,
        requirements: PathBuf,
        descriptor: PathBuf,
        py2app_version: String,
        library_rpath: String,
        verify_signature: bool,
        tools: ToolSettings,
        dmg: DmgSettings,
    ) -> Self {
        Self {
            base_directory,
            project_directory,
            app_name,
            env_name,
            requirements,
            descriptor,
            py2app_version,
            library_rpath,
            verify_signature,
            tools,
            dmg,
        }
    }
}
