//! Artifacts reported by a successful run.

use super::checksum::{artifact_size, calculate_sha256};
use crate::bundler::error::Result;
use std::{fmt, path::PathBuf};

/// Kind of artifact produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Signed `.app` bundle
    AppBundle,
    /// `.dmg` disk image installer
    Dmg,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::AppBundle => f.write_str("app"),
            ArtifactKind::Dmg => f.write_str("dmg"),
        }
    }
}

/// A final artifact with its location and integrity data.
#[derive(Debug, Clone)]
pub struct BundledArtifact {
    /// What was produced
    pub kind: ArtifactKind,
    /// Canonical path of the artifact
    pub path: PathBuf,
    /// Size in bytes (sum of all files for a bundle)
    pub size: u64,
    /// Hex-encoded SHA-256
    pub checksum: String,
}

impl BundledArtifact {
    /// Measures the artifact at `path`.
    pub async fn measure(kind: ArtifactKind, path: PathBuf) -> Result<Self> {
        let size = artifact_size(&path).await?;
        let checksum = calculate_sha256(&path).await?;
        Ok(Self {
            kind,
            path,
            size,
            checksum,
        })
    }
}
