//! Isolated Python environment scoped to one bundling run.
//!
//! The environment directory exists exactly as long as the [`VirtualEnv`]
//! value: [`VirtualEnv::teardown`] removes it on the success path and `Drop`
//! removes it on every early return.

use crate::bundler::{
    builder::Step,
    error::{Error, Result},
    settings::Settings,
    utils::{fs, process::run_step},
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

#[cfg(not(windows))]
const BIN_DIR: &str = "bin";
#[cfg(windows)]
const BIN_DIR: &str = "Scripts";

/// Handle to a live, activated environment.
///
/// Commands built through [`VirtualEnv::command`] run "activated": the
/// environment's interpreter, `VIRTUAL_ENV` set, its `bin` first on `PATH`,
/// and `PYTHONHOME` cleared. Consuming the handle in `teardown` deactivates it.
#[derive(Debug)]
pub struct VirtualEnv {
    root: PathBuf,
    released: bool,
}

impl VirtualEnv {
    /// Creates a fresh environment at the settings' environment directory.
    pub async fn create(settings: &Settings) -> Result<Self> {
        let root = settings.env_directory();
        log::info!("Creating isolated environment at {}", root.display());

        // Guard first so a half-created directory is removed on failure.
        let env = Self {
            root,
            released: false,
        };

        let mut cmd = Command::new(&settings.tools().python);
        cmd.arg("-m").arg("venv").arg(&env.root);
        run_step(Step::CreateEnvironment, &mut cmd).await?;

        if !env.python().exists() {
            return Err(Error::GenericError(format!(
                "venv finished but {} does not exist",
                env.python().display()
            )));
        }

        Ok(env)
    }

    /// Environment root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The environment's interpreter.
    pub fn python(&self) -> PathBuf {
        self.root.join(BIN_DIR).join("python")
    }

    /// Builds an activated command for `program`.
    pub fn command(&self, program: impl AsRef<std::ffi::OsStr>) -> Result<Command> {
        let mut cmd = Command::new(program);
        cmd.env("VIRTUAL_ENV", &self.root)
            .env("PATH", self.activated_path()?)
            .env_remove("PYTHONHOME");
        Ok(cmd)
    }

    /// Builds an activated command running the environment's interpreter.
    pub fn python_command(&self) -> Result<Command> {
        self.command(self.python())
    }

    fn activated_path(&self) -> Result<OsString> {
        let mut paths = vec![self.root.join(BIN_DIR)];
        if let Some(current) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&current));
        }
        std::env::join_paths(paths)
            .map_err(|e| Error::GenericError(format!("cannot build activated PATH: {}", e)))
    }

    /// Deactivates and deletes the environment.
    pub async fn teardown(mut self) -> Result<()> {
        log::info!("[{}] removing {}", Step::TeardownEnvironment, self.root.display());
        self.released = true;
        fs::remove_dir_all(&self.root).await
    }
}

impl Drop for VirtualEnv {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        // Best-effort; Drop must not fail and the original error is what matters.
        log::warn!(
            "Run aborted, removing isolated environment {}",
            self.root.display()
        );
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove {}: {}", self.root.display(), e),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::bundler::settings::{BundleConfig, SettingsBuilder, ToolSettings};
    use std::os::unix::fs::PermissionsExt;

    fn write_script(path: &Path, body: &str) {
        std::fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn settings(base: &Path, python: PathBuf) -> Settings {
        SettingsBuilder::new()
            .base_directory(base)
            .project_directory(base)
            .config(BundleConfig {
                tools: ToolSettings {
                    python,
                    ..Default::default()
                },
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn teardown_removes_environment() {
        let tmp = tempfile::tempdir().unwrap();
        let python = tmp.path().join("python3");
        // `python3 -m venv DIR`
        write_script(&python, r#"mkdir -p "$3/bin" && touch "$3/bin/python""#);

        let settings = settings(tmp.path(), python);
        let env = VirtualEnv::create(&settings).await.unwrap();
        assert!(env.root().is_dir());

        let cmd = env.python_command().unwrap();
        let vars: Vec<_> = cmd.as_std().get_envs().collect();
        assert!(vars.iter().any(|(k, v)| *k == "VIRTUAL_ENV"
            && v.map(Path::new) == Some(env.root())));

        env.teardown().await.unwrap();
        assert!(!settings.env_directory().exists());
    }

    #[tokio::test]
    async fn drop_removes_environment_on_early_exit() {
        let tmp = tempfile::tempdir().unwrap();
        let python = tmp.path().join("python3");
        write_script(&python, r#"mkdir -p "$3/bin" && touch "$3/bin/python""#);

        let settings = settings(tmp.path(), python);
        {
            let _env = VirtualEnv::create(&settings).await.unwrap();
            assert!(settings.env_directory().is_dir());
        }
        assert!(!settings.env_directory().exists());
    }

    #[tokio::test]
    async fn failed_creation_leaves_nothing_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let python = tmp.path().join("python3");
        write_script(&python, r#"mkdir -p "$3"; echo "no ensurepip" >&2; exit 1"#);

        let settings = settings(tmp.path(), python);
        let err = VirtualEnv::create(&settings).await.unwrap_err();
        assert!(matches!(
            err,
            Error::StepFailed {
                step: Step::CreateEnvironment,
                ..
            }
        ));
        assert!(!settings.env_directory().exists());
    }
}
