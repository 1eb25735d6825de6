//! Ad-hoc code signing of the finished bundle.
//!
//! Patching the executable invalidates py2app's signature, so the whole
//! bundle is re-signed with the ad-hoc identity `-`.

use crate::bundler::{builder::Step, error::Result, settings::Settings, utils::process::run_step};
use std::path::Path;
use tokio::process::Command;

/// Ad-hoc signing identity.
pub const ADHOC_IDENTITY: &str = "-";

/// Recursively re-signs `bundle` with an ad-hoc identity.
pub async fn sign_adhoc(bundle: &Path, settings: &Settings) -> Result<()> {
    log::info!("Signing {} (ad-hoc)", bundle.display());

    let mut cmd = Command::new(&settings.tools().codesign);
    cmd.args(["--force", "--deep", "--sign", ADHOC_IDENTITY])
        .arg(bundle);
    run_step(Step::SignBundle, &mut cmd).await?;

    log::info!("✓ Signed {}", bundle.display());
    Ok(())
}

/// Verifies the signature of `bundle` and everything nested in it.
pub async fn verify(bundle: &Path, settings: &Settings) -> Result<()> {
    let mut cmd = Command::new(&settings.tools().codesign);
    cmd.args(["--verify", "--deep", "--strict"]).arg(bundle);
    run_step(Step::VerifySignature, &mut cmd).await?;

    log::info!("✓ Signature verified");
    Ok(())
}
