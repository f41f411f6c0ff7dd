//! End-to-end migration: ensure, mirror, describe
use std::path::PathBuf;

use crate::{
    bitbucket::{pipelines::PipelineDescriptor, BITBUCKET_TOKEN_USER, BITBUCKET_URL},
    config::MigrationConfig,
    errors::MigrateError,
    git::{remote_url, GitRunner},
    github::{GITHUB_TOKEN_USER, GITHUB_URL},
    platform::{ensure_repo, Platform},
    sync::mirror_repository,
};

/// Where the migration works and writes
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Parent of the scratch workspace
    pub scratch_dir: PathBuf,

    /// Directory receiving the pipeline descriptor
    pub output_dir: PathBuf,

    /// Branch the scheduled sync runs against
    pub branch: String,

    /// Base URL of the source git host
    pub source_host: String,

    /// Base URL of the destination git host
    pub destination_host: String,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
            output_dir: PathBuf::from("."),
            branch: "main".to_string(),
            source_host: BITBUCKET_URL.to_string(),
            destination_host: GITHUB_URL.to_string(),
        }
    }
}

/// Run the whole migration and return the path of the pipeline descriptor.
///
/// Stops at the first failing stage.
/// # Errors
/// Error if the destination can't be created, or the clone, push or write fails
pub async fn run_migration(
    config: &MigrationConfig,
    destination: &dyn Platform,
    git: &dyn GitRunner,
    options: &MigrationOptions,
) -> Result<PathBuf, MigrateError> {
    let source_url = remote_url(
        &options.source_host,
        BITBUCKET_TOKEN_USER,
        &config.source.token,
        &config.source.account,
        &config.source.repo,
    )?;
    let destination_url = remote_url(
        &options.destination_host,
        GITHUB_TOKEN_USER,
        &config.destination.token,
        &config.destination.account,
        &config.destination.repo,
    )?;

    ensure_repo(destination, &config.destination.repo, config.private).await?;
    mirror_repository(git, &source_url, &destination_url, &options.scratch_dir).await?;

    PipelineDescriptor {
        source_account: config.source.account.clone(),
        source_repo: config.source.repo.clone(),
        destination_account: config.destination.account.clone(),
        destination_repo: config.destination.repo.clone(),
        branch: options.branch.clone(),
    }
    .write_to(&options.output_dir)
}
