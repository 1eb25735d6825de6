//! Command line interface for the bundler.
//!
//! Parses arguments, runs the [`Bundler`](crate::bundler::Bundler) and
//! reports the artifacts or the failing step.

mod args;
mod output;

pub use args::{Args, INSTALLER_TOKEN, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::Bundler;
use crate::error::{BundlerError, Result};

/// Main CLI entry point
///
/// Returns the process exit code.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let runtime = RuntimeConfig::from_args(&args)?;
    execute(&runtime).await
}

/// Runs the bundler for an already resolved configuration.
pub async fn execute(runtime: &RuntimeConfig) -> Result<i32> {
    let output = runtime.output();
    let settings = runtime.settings();

    output.section(&format!("Bundling {}", settings.bundle_file_name()))?;
    output.progress(&format!(
        "Base directory: {}",
        settings.base_directory().display()
    ))?;
    if runtime.installer() {
        output.progress("Disk image requested")?;
    }

    let bundler = Bundler::new(settings.clone());
    match bundler.bundle(runtime.installer()).await {
        Ok(artifacts) => {
            output.section("Artifacts")?;
            for artifact in &artifacts {
                output.success(&format!(
                    "{} {} ({} bytes)",
                    artifact.kind,
                    artifact.path.display(),
                    artifact.size
                ))?;
                output.indent(&format!("sha256 {}", artifact.checksum))?;
            }
            Ok(0)
        }
        Err(e) => {
            if let Some(stderr) = e.step_stderr() {
                for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
                    eprintln!("    {}", line);
                }
            }
            output.error(&e.to_string());

            let err = BundlerError::from(e);
            for suggestion in err.recovery_suggestions() {
                output.warn(&suggestion)?;
            }
            Ok(err.exit_code())
        }
    }
}
