//! macOS packaging for the PyQtImageViewer application.
//!
//! This library sequences the external tools that turn the Python project
//! into distributable artifacts:
//! - a signed `.app` bundle (py2app, `install_name_tool`, `codesign`)
//! - an optional `.dmg` installer (`create-dmg`)
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
