//! Dependency installation and `.app` construction with py2app.

use super::venv::VirtualEnv;
use crate::bundler::{
    builder::Step,
    error::{Error, Result},
    settings::Settings,
    utils::process::run_step,
};
use std::path::PathBuf;

/// Installs pip, the project requirements and the pinned py2app, in that order.
pub async fn install_dependencies(env: &VirtualEnv, settings: &Settings) -> Result<()> {
    log::info!("Upgrading pip");
    let mut cmd = env.python_command()?;
    cmd.args(["-m", "pip", "install", "--upgrade", "pip"]);
    run_step(Step::UpgradePip, &mut cmd).await?;

    let requirements = settings.requirements_path();
    log::info!("Installing requirements from {}", requirements.display());
    let mut cmd = env.python_command()?;
    cmd.args(["-m", "pip", "install", "-r"]).arg(&requirements);
    run_step(Step::InstallRequirements, &mut cmd).await?;

    let py2app = settings.py2app_requirement();
    log::info!("Installing {}", py2app);
    let mut cmd = env.python_command()?;
    cmd.args(["-m", "pip", "install"]).arg(&py2app);
    run_step(Step::InstallPy2app, &mut cmd).await?;

    log::info!("✓ Dependencies installed");
    Ok(())
}

/// Runs `setup.py py2app` with explicit build and dist directories.
///
/// Returns the path of the produced bundle inside `dist/`.
pub async fn build_bundle(env: &VirtualEnv, settings: &Settings) -> Result<PathBuf> {
    log::info!(
        "Building {} from {}",
        settings.bundle_file_name(),
        settings.descriptor().display()
    );

    let mut cmd = env.python_command()?;
    cmd.current_dir(settings.project_directory())
        .arg(settings.descriptor())
        .arg("py2app")
        .arg("--bdist-base")
        .arg(settings.build_directory())
        .arg("--dist-dir")
        .arg(settings.dist_directory());
    run_step(Step::BuildBundle, &mut cmd).await?;

    let bundle = settings.built_bundle_path();
    if !bundle.is_dir() {
        return Err(Error::GenericError(format!(
            "py2app finished but {} was not produced",
            bundle.display()
        )));
    }

    log::info!("✓ Built {}", bundle.display());
    Ok(bundle)
}
