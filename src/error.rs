//! Top-level error types for the CLI.
//!
//! Wraps bundler failures and argument problems, and maps them to a process
//! exit code.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for the binary
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors (terminal output)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundler errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// A path argument could not be resolved
    #[error("Cannot resolve {argument}: {reason}")]
    UnresolvablePath {
        /// Argument name
        argument: &'static str,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Process exit code for this error.
    ///
    /// A failing external tool's own exit code is propagated; everything else
    /// exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            BundlerError::Bundler(e) => e
                .step_exit_code()
                .filter(|code| *code != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::{Error, Step};

        let BundlerError::Bundler(inner) = self else {
            return vec!["Run with --help to see the accepted arguments".to_string()];
        };

        let mut inner = inner;
        while let Error::Context(_, source) = inner {
            inner = source.as_ref();
        }

        match inner {
            Error::ToolNotFound { hint, .. } => vec![hint.to_string()],
            Error::StepFailed {
                step: Step::InstallRequirements,
                ..
            } => vec!["Check requirements.txt and your network connection".to_string()],
            Error::StepFailed {
                step: Step::BuildBundle,
                ..
            } => vec![
                "Check the py2app output above".to_string(),
                "build/ and dist/ were kept for inspection".to_string(),
            ],
            Error::InvalidSettings(_) | Error::Toml(_) => {
                vec!["Fix the settings file passed with --config".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
