//! macOS packaging steps.
//!
//! Each submodule wraps one external tool:
//! - `venv` - isolated Python environment (`python -m venv`)
//! - `py2app` - dependency installation and `.app` construction
//! - `rpath` - `install_name_tool -add_rpath` on the bundle executable
//! - `sign` - ad-hoc `codesign`
//! - `dmg` - `create-dmg` disk image

pub mod dmg;
pub mod py2app;
pub mod rpath;
pub mod sign;
pub mod venv;

pub use venv::VirtualEnv;
