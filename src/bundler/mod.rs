//! Packaging of the PyQtImageViewer application for macOS.
//!
//! Sequences py2app, `install_name_tool`, `codesign` and `create-dmg` to turn
//! the Python project into a signed `.app` bundle and optional disk image.

pub mod builder;
pub mod error;
pub mod platform;
pub mod settings;
pub mod utils;

pub use builder::{ArtifactKind, BundledArtifact, Bundler, Step};
pub use error::{Error, Result};
pub use settings::{BundleConfig, DmgSettings, Settings, SettingsBuilder, ToolSettings};
