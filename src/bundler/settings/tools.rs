//! External program names.

use std::path::PathBuf;

/// Programs invoked by the bundler.
///
/// Each entry is either a bare program name resolved on `PATH` or a path to
/// an executable.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolSettings {
    /// Host interpreter used to create the isolated environment.
    pub python: PathBuf,

    /// Mach-O load command editor.
    pub install_name_tool: PathBuf,

    /// Code signing tool.
    pub codesign: PathBuf,

    /// Disk image authoring tool.
    pub create_dmg: PathBuf,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            python: PathBuf::from("python3"),
            install_name_tool: PathBuf::from("install_name_tool"),
            codesign: PathBuf::from("codesign"),
            create_dmg: PathBuf::from("create-dmg"),
        }
    }
}
