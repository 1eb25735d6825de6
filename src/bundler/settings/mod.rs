//! Configuration structures for bundling operations.
//!
//! Built-in defaults mirror the application's `setup.py`; a TOML settings
//! file may override them, and [`SettingsBuilder`] validates the result.

mod builder;
mod config;
mod core;
mod macos;
mod tools;

pub use builder::SettingsBuilder;
pub use config::BundleConfig;
pub use core::Settings;
pub use macos::DmgSettings;
pub use tools::ToolSettings;
