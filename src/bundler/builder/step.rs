//! Identity of each bundling step.

use std::fmt;

/// One step of the bundling sequence, in execution order.
///
/// Carried by [`Error::StepFailed`](crate::bundler::Error::StepFailed) so a
/// failure names the step that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Resolving the external programs up front
    Preflight,
    /// Removing `build/` and `dist/` left over from a previous run
    CleanStale,
    /// `python -m venv`
    CreateEnvironment,
    /// `pip install --upgrade pip`
    UpgradePip,
    /// `pip install -r requirements.txt`
    InstallRequirements,
    /// `pip install py2app==<version>`
    InstallPy2app,
    /// `python setup.py py2app`
    BuildBundle,
    /// Deactivating and deleting the isolated environment
    TeardownEnvironment,
    /// `install_name_tool -add_rpath`
    PatchRpath,
    /// `codesign --sign -`
    SignBundle,
    /// `codesign --verify`
    VerifySignature,
    /// Replacing the bundle at its canonical path
    FinalizeBundle,
    /// `create-dmg`
    CreateDmg,
    /// Removing `build/` and `dist/` after a successful run
    CleanIntermediate,
}

impl Step {
    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Step::Preflight => "preflight tool check",
            Step::CleanStale => "stale build cleanup",
            Step::CreateEnvironment => "environment creation",
            Step::UpgradePip => "pip upgrade",
            Step::InstallRequirements => "requirements installation",
            Step::InstallPy2app => "py2app installation",
            Step::BuildBundle => "bundle construction",
            Step::TeardownEnvironment => "environment teardown",
            Step::PatchRpath => "runtime path patch",
            Step::SignBundle => "ad-hoc signing",
            Step::VerifySignature => "signature verification",
            Step::FinalizeBundle => "bundle finalization",
            Step::CreateDmg => "disk image creation",
            Step::CleanIntermediate => "final cleanup",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
