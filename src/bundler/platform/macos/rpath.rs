//! Runtime search path patching for the bundle executable.
//!
//! The bundled Qt libraries live inside `Contents/Resources`, so the
//! executable gets an `LC_RPATH` relative to `@executable_path`.

use crate::bundler::{
    builder::Step,
    error::{ErrorExt, Result},
    settings::Settings,
    utils::process::run_step,
};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Locates the bundle's main executable.
///
/// Uses `CFBundleExecutable` from `Contents/Info.plist` when present, otherwise
/// falls back to the application name.
pub fn bundle_executable(bundle: &Path, settings: &Settings) -> Result<PathBuf> {
    let contents = bundle.join("Contents");
    let info_plist = contents.join("Info.plist");

    let name = if info_plist.is_file() {
        let value = plist::Value::from_file(&info_plist)?;
        value
            .as_dictionary()
            .and_then(|dict| dict.get("CFBundleExecutable"))
            .and_then(|v| v.as_string())
            .map(str::to_owned)
    } else {
        None
    };

    let name = name.unwrap_or_else(|| {
        log::debug!(
            "No CFBundleExecutable in {}, assuming {}",
            info_plist.display(),
            settings.app_name()
        );
        settings.app_name().to_owned()
    });

    let executable = contents.join("MacOS").join(name);
    if !executable.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "bundle executable missing",
        ))
        .fs_context("locating", executable);
    }
    Ok(executable)
}

/// Reads the `LC_RPATH` entries of a thin Mach-O binary.
///
/// Returns `None` when the file cannot be inspected (fat binaries, non-Mach-O
/// files); the caller then defers to `install_name_tool`.
fn existing_rpaths(executable: &Path) -> Result<Option<Vec<String>>> {
    let buffer = std::fs::read(executable).fs_context("reading executable", executable)?;

    match goblin::Object::parse(&buffer) {
        Ok(goblin::Object::Mach(goblin::mach::Mach::Binary(macho))) => {
            Ok(Some(macho.rpaths.iter().map(|s| s.to_string()).collect()))
        }
        Ok(goblin::Object::Mach(goblin::mach::Mach::Fat(_))) => {
            log::debug!("{} is a fat binary, not inspecting rpaths", executable.display());
            Ok(None)
        }
        Ok(_) | Err(_) => {
            log::warn!(
                "{} is not a Mach-O file, skipping rpath inspection",
                executable.display()
            );
            Ok(None)
        }
    }
}

/// Adds the configured runtime search path to the bundle executable.
///
/// Skipped when the executable already carries the rpath, since
/// `install_name_tool` rejects duplicates.
pub async fn add_rpath(bundle: &Path, settings: &Settings) -> Result<()> {
    let executable = bundle_executable(bundle, settings)?;
    let rpath = settings.library_rpath();

    if let Some(rpaths) = existing_rpaths(&executable)? {
        if rpaths.iter().any(|existing| existing == rpath) {
            log::info!("{} already has rpath {}", executable.display(), rpath);
            return Ok(());
        }
    }

    log::info!("Adding rpath {} to {}", rpath, executable.display());
    let mut cmd = Command::new(&settings.tools().install_name_tool);
    cmd.arg("-add_rpath").arg(rpath).arg(&executable);
    run_step(Step::PatchRpath, &mut cmd).await?;

    log::info!("✓ Patched {}", executable.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::SettingsBuilder;

    fn settings() -> Settings {
        SettingsBuilder::new()
            .base_directory("/tmp")
            .project_directory("/tmp")
            .build()
            .unwrap()
    }

    fn make_bundle(root: &Path, exe: &str) -> PathBuf {
        let bundle = root.join("PyQtImageViewer.app");
        std::fs::create_dir_all(bundle.join("Contents/MacOS")).unwrap();
        std::fs::write(bundle.join("Contents/MacOS").join(exe), b"#!/bin/sh\n").unwrap();
        bundle
    }

    #[test]
    fn executable_comes_from_info_plist() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = make_bundle(tmp.path(), "viewer-main");

        let mut dict = plist::Dictionary::new();
        dict.insert("CFBundleExecutable".into(), "viewer-main".into());
        plist::Value::Dictionary(dict)
            .to_file_xml(bundle.join("Contents/Info.plist"))
            .unwrap();

        let exe = bundle_executable(&bundle, &settings()).unwrap();
        assert!(exe.ends_with("Contents/MacOS/viewer-main"));
    }

    #[test]
    fn executable_falls_back_to_app_name() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = make_bundle(tmp.path(), "PyQtImageViewer");

        let exe = bundle_executable(&bundle, &settings()).unwrap();
        assert!(exe.ends_with("Contents/MacOS/PyQtImageViewer"));
    }

    #[test]
    fn missing_executable_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = make_bundle(tmp.path(), "something-else");

        let err = bundle_executable(&bundle, &settings()).unwrap_err();
        assert!(err.to_string().contains("PyQtImageViewer"));
    }

    const MH_MAGIC_64: u32 = 0xfeed_facf;
    const CPU_TYPE_ARM64: u32 = 0x0100_000c;
    const MH_EXECUTE: u32 = 0x2;
    const LC_RPATH: u32 = 0x8000_001c;

    /// A thin 64-bit Mach-O executable whose only load command is `LC_RPATH`.
    fn macho_with_rpath(rpath: &str) -> Vec<u8> {
        let mut command = Vec::new();
        let path_offset = 12u32;
        let unpadded = path_offset as usize + rpath.len() + 1;
        let cmdsize = unpadded.div_ceil(8) * 8;
        command.extend_from_slice(&LC_RPATH.to_le_bytes());
        command.extend_from_slice(&(cmdsize as u32).to_le_bytes());
        command.extend_from_slice(&path_offset.to_le_bytes());
        command.extend_from_slice(rpath.as_bytes());
        command.resize(cmdsize, 0);

        let mut image = Vec::new();
        for field in [
            MH_MAGIC_64,
            CPU_TYPE_ARM64,
            0,
            MH_EXECUTE,
            1,
            cmdsize as u32,
            0,
            0,
        ] {
            image.extend_from_slice(&field.to_le_bytes());
        }
        image.extend_from_slice(&command);
        image
    }

    /// Settings whose `install_name_tool` always fails.
    fn settings_with_failing_tool() -> Settings {
        let mut config = crate::bundler::settings::BundleConfig::default();
        config.tools.install_name_tool = "false".into();
        SettingsBuilder::new()
            .base_directory("/tmp")
            .project_directory("/tmp")
            .config(config)
            .build()
            .unwrap()
    }

    #[test]
    fn rpaths_are_read_from_load_commands() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("viewer");
        std::fs::write(&file, macho_with_rpath("@executable_path/../Frameworks")).unwrap();

        assert_eq!(
            existing_rpaths(&file).unwrap(),
            Some(vec!["@executable_path/../Frameworks".to_string()])
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn existing_rpath_skips_install_name_tool() {
        let settings = settings_with_failing_tool();
        let tmp = tempfile::tempdir().unwrap();
        let bundle = make_bundle(tmp.path(), "PyQtImageViewer");
        std::fs::write(
            bundle.join("Contents/MacOS/PyQtImageViewer"),
            macho_with_rpath(settings.library_rpath()),
        )
        .unwrap();

        add_rpath(&bundle, &settings).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_rpath_runs_install_name_tool() {
        let settings = settings_with_failing_tool();
        let tmp = tempfile::tempdir().unwrap();
        let bundle = make_bundle(tmp.path(), "PyQtImageViewer");
        std::fs::write(
            bundle.join("Contents/MacOS/PyQtImageViewer"),
            macho_with_rpath("@loader_path/lib"),
        )
        .unwrap();

        let err = add_rpath(&bundle, &settings).await.unwrap_err();
        assert_eq!(err.step_exit_code(), Some(1));
    }

    #[test]
    fn non_macho_files_are_not_inspected() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("script");
        std::fs::write(&file, b"#!/bin/sh\necho hi\n").unwrap();
        assert!(existing_rpaths(&file).unwrap().is_none());
    }
}
