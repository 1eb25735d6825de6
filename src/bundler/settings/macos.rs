//! macOS disk image settings.

use std::path::PathBuf;

/// macOS DMG disk image configuration.
///
/// Configures the volume and Finder window layout of the disk image installer.
///
/// # Configuration
///
/// ```toml
/// [dmg]
/// volume_icon = "ImageViewer/Resources/ImageViewer.icns"
/// window_size = [600, 300]
/// app_icon_position = [175, 120]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DmgSettings {
    /// Mounted volume name.
    ///
    /// Default: None (uses the application name)
    pub volume_name: Option<String>,

    /// Volume icon (`.icns`). Relative paths resolve against the project directory.
    ///
    /// Default: `ImageViewer/Resources/ImageViewer.icns`
    pub volume_icon: Option<PathBuf>,

    /// Finder window position (x, y) on screen.
    pub window_position: (u32, u32),

    /// Finder window size (width, height) in pixels.
    pub window_size: (u32, u32),

    /// Icon size in pixels.
    pub icon_size: u32,

    /// Position of the `.app` icon inside the window.
    pub app_icon_position: (u32, u32),

    /// Position of the Applications drop link inside the window.
    pub app_drop_link_position: (u32, u32),
}

impl Default for DmgSettings {
    fn default() -> Self {
        Self {
            volume_name: None,
            volume_icon: Some(PathBuf::from("ImageViewer/Resources/ImageViewer.icns")),
            window_position: (200, 120),
            window_size: (600, 300),
            icon_size: 100,
            app_icon_position: (175, 120),
            app_drop_link_position: (425, 120),
        }
    }
}
