//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that runs the packaging
//! steps in order and reports the resulting artifacts.

use super::{
    artifact::{ArtifactKind, BundledArtifact},
    step::Step,
    tool_detection::require_tools,
};
use crate::bundler::{
    error::{Context, Result},
    platform::macos::{VirtualEnv, dmg, py2app, rpath, sign},
    settings::Settings,
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Main bundler orchestrator.
///
/// Runs the sequence fail-fast: the first failing step aborts the run and its
/// error is returned unchanged apart from context. Already completed
/// destructive steps are not rolled back. The isolated environment is the
/// exception, since its guard removes it on every exit path.
///
/// # Examples
///
/// ```no_run
/// use imageviewer_bundler::bundler::{Bundler, SettingsBuilder};
///
/// # async fn example() -> imageviewer_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .base_directory("/Users/me/Downloads")
///     .project_directory(".")
///     .build()?;
///
/// let artifacts = Bundler::new(settings).bundle(true).await?;
/// for artifact in artifacts {
///     println!("{}: {} ({} bytes)", artifact.kind, artifact.path.display(), artifact.size);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Builds, patches and signs the bundle, then optionally wraps it in a DMG.
    ///
    /// # Returns
    ///
    /// The final bundle, followed by the disk image when `installer` is set.
    ///
    /// # Errors
    ///
    /// The first failing step's error. `build/` and `dist/` are left in place
    /// for inspection; the isolated environment is always removed.
    pub async fn bundle(&self, installer: bool) -> Result<Vec<BundledArtifact>> {
        let settings = &self.settings;
        log::info!(
            "Bundling {} into {}",
            settings.app_name(),
            settings.base_directory().display()
        );

        log::info!("[{}] resolving external programs", Step::Preflight);
        require_tools(settings, installer)?;

        self.clean_intermediate(Step::CleanStale).await?;

        let built = {
            let env = VirtualEnv::create(settings).await?;
            py2app::install_dependencies(&env, settings).await?;
            let built = py2app::build_bundle(&env, settings).await?;
            env.teardown().await?;
            built
        };

        rpath::add_rpath(&built, settings)
            .await
            .context("patching the bundle executable")?;

        sign::sign_adhoc(&built, settings).await?;
        if settings.verify_signature() {
            sign::verify(&built, settings).await?;
        }

        let bundle = self.finalize(&built).await?;
        let mut artifacts =
            vec![BundledArtifact::measure(ArtifactKind::AppBundle, bundle.clone()).await?];

        if installer {
            let dmg_path = dmg::bundle_dmg(settings, &bundle).await?;
            artifacts.push(BundledArtifact::measure(ArtifactKind::Dmg, dmg_path).await?);
        } else {
            log::info!("Disk image not requested, skipping");
        }

        self.clean_intermediate(Step::CleanIntermediate).await?;

        log::info!("✓ Bundling complete");
        Ok(artifacts)
    }

    /// Removes `build/` and `dist/` under the base directory.
    async fn clean_intermediate(&self, step: Step) -> Result<()> {
        let settings = &self.settings;
        log::info!("[{}] removing build and dist directories", step);

        fs::create_dir_all(settings.base_directory()).await?;
        fs::remove_dir_all(&settings.build_directory()).await?;
        fs::remove_dir_all(&settings.dist_directory()).await?;
        Ok(())
    }

    /// Replaces the bundle at its canonical path with the freshly built one.
    async fn finalize(&self, built: &Path) -> Result<PathBuf> {
        let destination = self.settings.final_bundle_path();
        log::info!("[{}] {}", Step::FinalizeBundle, destination.display());

        fs::remove_path(&destination).await?;
        fs::move_dir(built, &destination)
            .await
            .with_context(|| format!("moving bundle to {}", destination.display()))?;

        Ok(destination)
    }
}
