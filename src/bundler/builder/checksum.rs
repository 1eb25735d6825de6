//! Artifact checksum and size calculation.
//!
//! Both single files (`.dmg`) and directory trees (`.app` bundles) are
//! supported.

use crate::{
    bail,
    bundler::error::{ErrorExt, Result},
};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

const CHUNK: usize = 8192;

/// Calculates the SHA-256 checksum of a file or directory tree.
///
/// Directories hash each file's relative path followed by its content, in
/// sorted path order, so the result is stable across runs.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK];

    if metadata.is_file() {
        hash_file(path, &mut hasher, &mut buffer).await?;
    } else if metadata.is_dir() {
        for file in sorted_files(path)? {
            if let Ok(rel_path) = file.strip_prefix(path) {
                hasher.update(rel_path.to_string_lossy().as_bytes());
            }
            hash_file(&file, &mut hasher, &mut buffer).await?;
        }
    } else {
        bail!("Path is neither file nor directory: {}", path.display());
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Total size in bytes of a file, or of every regular file under a directory.
pub async fn artifact_size(path: &Path) -> Result<u64> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;
    if metadata.is_file() {
        return Ok(metadata.len());
    }

    let mut total = 0u64;
    for entry in walkdir::WalkDir::new(path).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            total += entry.metadata()?.len();
        }
    }
    Ok(total)
}

fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

async fn hash_file(path: &Path, hasher: &mut Sha256, buffer: &mut [u8]) -> Result<()> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for hashing", path)?;
    loop {
        let n = file
            .read(buffer)
            .await
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            return Ok(());
        }
        hasher.update(&buffer[..n]);
    }
}
