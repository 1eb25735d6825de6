//! File system utilities for bundling.
//!
//! Removal helpers are idempotent: a missing target is not an error.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io::{self},
    path::Path,
};
use tokio::fs;

/// Creates all of the directories of the specified path.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Fs {
            context: "removing directory",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Removes whatever sits at `path`: a directory tree, a file or a symlink.
pub async fn remove_path(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(Error::Fs {
                context: "inspecting",
                path: path.to_path_buf(),
                error: e,
            });
        }
    };

    if metadata.is_dir() {
        remove_dir_all(path).await
    } else {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Fs {
                context: "removing file",
                path: path.to_path_buf(),
                error: e,
            }),
        }
    }
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks (py2app bundles are full of them).
/// Fails if the source path is not a directory or doesn't exist.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::GenericError(format!(
            "{} is not a directory",
            from.display()
        )));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())
                    .fs_context("reading symlink", entry.path())?;
                let linked = if entry.path().is_dir() {
                    symlink_dir(&target, &dest_path)
                } else {
                    symlink_file(&target, &dest_path)
                };
                linked.fs_context("creating symlink", &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path).fs_context("copying file", entry.path())?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

/// Moves a directory, falling back to copy + delete across filesystems.
pub async fn move_dir(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!(
                "{} and {} are on different filesystems, copying",
                from.display(),
                to.display()
            );
            copy_dir(from, to).await?;
            remove_dir_all(from).await
        }
        Err(e) => Err(Error::Fs {
            context: "moving",
            path: from.to_path_buf(),
            error: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn removal_of_missing_paths_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        remove_dir_all(&tmp.path().join("build")).await.unwrap();
        remove_path(&tmp.path().join("PyQtImageViewer.dmg")).await.unwrap();
    }

    #[tokio::test]
    async fn remove_path_handles_files_and_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("old.dmg");
        let dir = tmp.path().join("Old.app/Contents");
        std::fs::write(&file, b"dmg").unwrap();
        std::fs::create_dir_all(&dir).unwrap();

        remove_path(&file).await.unwrap();
        remove_path(&tmp.path().join("Old.app")).await.unwrap();

        assert!(!file.exists());
        assert!(!tmp.path().join("Old.app").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn copy_dir_preserves_symlinks() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("App.app");
        std::fs::create_dir_all(src.join("Contents/MacOS")).unwrap();
        std::fs::write(src.join("Contents/MacOS/App"), b"bin").unwrap();
        std::os::unix::fs::symlink("MacOS/App", src.join("Contents/current")).unwrap();

        let dst = tmp.path().join("staging/App.app");
        copy_dir(&src, &dst).await.unwrap();

        assert_eq!(std::fs::read(dst.join("Contents/MacOS/App")).unwrap(), b"bin");
        let link = std::fs::read_link(dst.join("Contents/current")).unwrap();
        assert_eq!(link, Path::new("MacOS/App"));
    }

    #[tokio::test]
    async fn move_dir_relocates_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("dist/App.app");
        std::fs::create_dir_all(src.join("Contents")).unwrap();
        std::fs::write(src.join("Contents/Info.plist"), b"plist").unwrap();

        let dst = tmp.path().join("App.app");
        move_dir(&src, &dst).await.unwrap();

        assert!(!src.exists());
        assert!(dst.join("Contents/Info.plist").is_file());
    }
}
