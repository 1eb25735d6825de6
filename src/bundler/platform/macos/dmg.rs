//! macOS DMG disk image creator.
//!
//! Builds a drag-to-install disk image with `create-dmg`: the bundle, an
//! Applications drop link, a volume icon and a fixed Finder window layout.

use crate::bundler::{
    builder::Step,
    error::{Context, Error, ErrorExt, Result},
    settings::Settings,
    utils::{fs, process::run_step},
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

fn pair(args: &mut Vec<OsString>, flag: &str, (x, y): (u32, u32)) {
    args.push(flag.into());
    args.push(x.to_string().into());
    args.push(y.to_string().into());
}

/// Builds the `create-dmg` argument list.
///
/// `staging` is the folder whose contents become the volume; it holds only
/// the bundle.
pub fn create_dmg_args(settings: &Settings, dmg_path: &Path, staging: &Path) -> Vec<OsString> {
    let layout = settings.dmg();
    let app = settings.bundle_file_name();
    let mut args: Vec<OsString> = Vec::new();

    args.push("--volname".into());
    args.push(settings.volume_name().into());

    if let Some(icon) = settings.volume_icon_path() {
        args.push("--volicon".into());
        args.push(icon.into());
    }

    pair(&mut args, "--window-pos", layout.window_position);
    pair(&mut args, "--window-size", layout.window_size);

    args.push("--icon-size".into());
    args.push(layout.icon_size.to_string().into());

    let (x, y) = layout.app_icon_position;
    args.push("--icon".into());
    args.push(app.clone().into());
    args.push(x.to_string().into());
    args.push(y.to_string().into());

    args.push("--hide-extension".into());
    args.push(app.into());

    pair(&mut args, "--app-drop-link", layout.app_drop_link_position);

    args.push(dmg_path.into());
    args.push(staging.into());
    args
}

/// Creates the disk image for `bundle` at the canonical DMG path.
///
/// # Process
/// 1. Remove any previous image (a missing one is fine)
/// 2. Copy the bundle into a temporary staging directory
/// 3. Run `create-dmg` against the staging directory
/// 4. Check the image exists
pub async fn bundle_dmg(settings: &Settings, bundle: &Path) -> Result<PathBuf> {
    let dmg_path = settings.final_dmg_path();
    log::info!("Creating disk image {}", dmg_path.display());

    fs::remove_path(&dmg_path).await?;

    if let Some(icon) = settings.volume_icon_path() {
        if !icon.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "volume icon missing",
            ))
            .fs_context("locating", icon);
        }
    }

    let staging = tempfile::Builder::new()
        .prefix("dmg-staging")
        .tempdir()
        .fs_context("creating staging directory", std::env::temp_dir())?;
    let staged_app = staging.path().join(settings.bundle_file_name());

    log::debug!("Copying .app to staging: {}", staged_app.display());
    fs::copy_dir(bundle, &staged_app)
        .await
        .with_context(|| format!("staging {} for the disk image", bundle.display()))?;

    let mut cmd = Command::new(&settings.tools().create_dmg);
    cmd.args(create_dmg_args(settings, &dmg_path, staging.path()));
    run_step(Step::CreateDmg, &mut cmd).await?;

    // tempfile removes the staging directory
    drop(staging);

    if !dmg_path.is_file() {
        return Err(Error::GenericError(format!(
            "create-dmg finished but {} was not produced",
            dmg_path.display()
        )));
    }

    log::info!("✓ Created {}", dmg_path.display());
    Ok(dmg_path)
}
