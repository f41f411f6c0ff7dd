//! Mirror a repository from one remote to another
use rand::{distr::Alphanumeric, rng, Rng};
use std::{
    fs::{create_dir, remove_dir_all},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use url::Url;

use crate::errors::MigrateError;
use crate::git::{GitCommand, GitRunner};
use crate::platform::PlatformType;

/// Name of the bare mirror inside the workspace
const MIRROR_DIR: &str = "repo.git";

/// Scratch directory removed when dropped
#[derive(Debug)]
pub struct Workspace {
    /// Location of the directory
    path: PathBuf,
}

impl Workspace {
    /// Create a fresh, randomly named directory under `parent`
    /// # Errors
    /// Error if the directory can't be created
    pub fn create_in(parent: &Path) -> Result<Self, MigrateError> {
        let rand_string: String = rng()
            .sample_iter(&Alphanumeric)
            .take(10)
            .map(char::from)
            .collect();
        let path = parent.join(format!("bb2gh-{rand_string}"));
        create_dir(&path)?;
        log::debug!("Created workspace {}", path.display());
        Ok(Self { path })
    }

    /// Location of the directory
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        match remove_dir_all(&self.path) {
            Ok(()) => log::debug!("Cleaned up {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!("Unable to remove {}: {e}", self.path.display()),
        }
    }
}

/// Make `destination`'s refs an exact copy of `source`'s.
///
/// The push is destructive: refs that only exist on `destination` are deleted.
/// The scratch workspace under `scratch_parent` is gone when this returns,
/// whatever the outcome, and also when the future is dropped midway.
/// # Errors
/// Error if the workspace can't be created or a git step fails
pub async fn mirror_repository(
    git: &dyn GitRunner,
    source: &Url,
    destination: &Url,
    scratch_parent: &Path,
) -> Result<(), MigrateError> {
    let workspace = Workspace::create_in(scratch_parent)?;
    let mirror = workspace.path().join(MIRROR_DIR);

    let clone = GitCommand::mirror_clone(source, &mirror);
    log::info!("Cloning {}", source.path().trim_start_matches('/'));
    git.run(&clone, workspace.path())
        .await
        .map_err(|e| e.with_platform(PlatformType::Bitbucket))?;

    let push = GitCommand::mirror_push(destination);
    log::info!("Pushing to {}", destination.path().trim_start_matches('/'));
    git.run(&push, &mirror)
        .await
        .map_err(|e| e.with_platform(PlatformType::Github))?;

    log::info!("Repository migration completed successfully!");
    Ok(())
}
