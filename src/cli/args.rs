//! Command line argument parsing and runtime configuration.

use crate::bundler::{BundleConfig, Settings, SettingsBuilder};
use crate::error::{CliError, Result};
use clap::Parser;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Positional value that turns on disk image creation.
pub const INSTALLER_TOKEN: &str = "dmg";

/// Packages PyQtImageViewer into a signed macOS .app bundle
#[derive(Parser, Debug)]
#[command(
    name = "imageviewer_bundler",
    version,
    about = "Packages PyQtImageViewer into a signed macOS .app bundle",
    long_about = "Builds PyQtImageViewer.app with py2app in a throwaway virtual environment, \
patches its runtime library path, signs it ad-hoc and moves it into the base directory.

Usage:
  imageviewer_bundler                 # bundle only
  imageviewer_bundler dmg             # bundle and disk image
  imageviewer_bundler dmg --base-dir ~/Builds --config bundler.toml

Exit code 0 = every reported artifact exists."
)]
pub struct Args {
    /// Pass `dmg` to also build the disk image installer; any other value is ignored
    #[arg(value_name = "MODE")]
    pub mode: Option<String>,

    /// Directory receiving build/, dist/ and the final artifacts [default: ~/Downloads]
    #[arg(short = 'b', long, env = "IMAGEVIEWER_BASE_DIR", value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Directory containing setup.py and requirements.txt [default: current directory]
    #[arg(short = 'p', long, env = "IMAGEVIEWER_PROJECT_DIR", value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// TOML file overriding tool names, versions and DMG layout
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether the positional mode requests a disk image.
    pub fn installer_requested(&self) -> bool {
        self.mode.as_deref() == Some(INSTALLER_TOKEN)
    }
}

fn absolute(argument: &'static str, path: &Path) -> Result<PathBuf> {
    path.absolutize()
        .map(|p| p.into_owned())
        .map_err(|e| {
            CliError::UnresolvablePath {
                argument,
                reason: e.to_string(),
            }
            .into()
        })
}

fn default_base_dir() -> Result<PathBuf> {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .ok_or_else(|| {
            CliError::InvalidArguments {
                reason: "cannot determine the Downloads directory; pass --base-dir".into(),
            }
            .into()
        })
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
    settings: Settings,
    installer: bool,
}

impl RuntimeConfig {
    /// Resolves directories, loads the settings file and validates the result.
    ///
    /// Precedence: flags and environment variables, then the settings file,
    /// then built-in defaults.
    pub fn from_args(args: &Args) -> Result<Self> {
        let base_dir = match &args.base_dir {
            Some(dir) => dir.clone(),
            None => default_base_dir()?,
        };
        let project_dir = args
            .project_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config = match &args.config {
            Some(path) => BundleConfig::load(path)?,
            None => BundleConfig::default(),
        };

        let settings = SettingsBuilder::new()
            .config(config)
            .base_directory(absolute("--base-dir", &base_dir)?)
            .project_directory(absolute("--project-dir", &project_dir)?)
            .build()?;

        if let Some(mode) = args.mode.as_deref().filter(|m| *m != INSTALLER_TOKEN) {
            log::debug!("Mode '{}' is not '{}', skipping disk image", mode, INSTALLER_TOKEN);
        }

        Ok(Self {
            output: super::OutputManager::new(args.quiet),
            settings,
            installer: args.installer_requested(),
        })
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Resolved bundler settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether a disk image was requested
    pub fn installer(&self) -> bool {
        self.installer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("imageviewer_bundler").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn only_exact_token_requests_installer() {
        assert!(parse(&["dmg"]).installer_requested());
        assert!(!parse(&[]).installer_requested());
        assert!(!parse(&["DMG"]).installer_requested());
        assert!(!parse(&["release"]).installer_requested());
    }

    #[test]
    fn runtime_config_absolutizes_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let args = parse(&[
            "dmg",
            "--base-dir",
            tmp.path().to_str().unwrap(),
            "--project-dir",
            "viewer",
        ]);

        let runtime = RuntimeConfig::from_args(&args).unwrap();
        assert!(runtime.installer());
        assert_eq!(runtime.settings().base_directory(), tmp.path());
        assert!(runtime.settings().project_directory().is_absolute());
        assert!(runtime.settings().project_directory().ends_with("viewer"));
    }

    #[test]
    fn settings_file_is_applied() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("bundler.toml");
        std::fs::write(&config, "app_name = \"Viewer\"\n").unwrap();

        let args = parse(&[
            "--base-dir",
            tmp.path().to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ]);
        let runtime = RuntimeConfig::from_args(&args).unwrap();
        assert_eq!(runtime.settings().app_name(), "Viewer");
        assert!(!runtime.installer());
    }
}
