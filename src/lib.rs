//! # bb2gh
//!
//! Mirror a Bitbucket repository to GitHub, then keep the mirror up to date
//! with a Bitbucket Pipelines job.
//!
//! The run creates the GitHub repository when needed, mirror-clones the
//! Bitbucket repository into a scratch directory, mirror-pushes it to GitHub
//! and writes `bitbucket-pipelines.yml`. The mirror push makes GitHub's refs
//! an exact copy of Bitbucket's: refs that only exist on GitHub are deleted.
//!
//! ## Usage
//!
//! ```txt
//! Usage: bb2gh [OPTIONS]
//!
//! Options:
//!       --bb-user <BB_USER>        Bitbucket username or workspace
//!       --bb-repo <BB_REPO>        Bitbucket repository name
//!       --gh-user <GH_USER>        GitHub username
//!       --gh-repo <GH_REPO>        GitHub repository name
//!       --bb-token <BB_TOKEN>      Bitbucket access token
//!       --gh-token <GH_TOKEN>      GitHub personal access token
//!       --private                  Create a private GitHub repository
//!       --save-env                 Save configuration to the settings file
//!       --env-file <ENV_FILE>      Settings file to read and save [default: .env]
//!   -o, --output-dir <OUTPUT_DIR>  Directory receiving bitbucket-pipelines.yml [default: .]
//!   -b, --branch <BRANCH>          Branch the scheduled sync runs against [default: main]
//!       --non-interactive          Fail instead of prompting for missing values
//!   -v, --verbose...               Verbose mode (-v, -vv)
//!   -h, --help                     Print help
//!   -V, --version                  Print version
//! ```
//!
//! Values missing from the flags are read from the environment
//! (`BITBUCKET_USERNAME`, `BITBUCKET_REPO`, `BITBUCKET_TOKEN`,
//! `GITHUB_USERNAME`, `GITHUB_REPO`, `GITHUB_TOKEN`, `GITHUB_PRIVATE`),
//! then from the settings file, then prompted for.

#![warn(clippy::all, rust_2018_idioms)]
#![deny(
    missing_docs,
    clippy::all,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![warn(clippy::cargo, clippy::multiple_crate_versions)]

pub(crate) mod bitbucket;
pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod git;
pub(crate) mod github;
pub(crate) mod migrate;
pub(crate) mod platform;
pub(crate) mod sync;
pub(crate) mod utils;

pub use bitbucket::pipelines::{PipelineDescriptor, PIPELINES_FILE, SYNC_CRON};
pub use cli::{migrate_main, save_if_requested, MigrateCli};
pub use config::{
    ConfigKey, ConfigSource, Layer, MigrationConfig, NonInteractive, Prompter, RepoIdentity,
    Resolver, TerminalPrompter,
};
pub use errors::{MigrateError, MigrateErrorKind};
pub use git::{remote_url, GitCommand, GitFuture, GitRunner, SystemGit};
pub use github::platform::GithubPlatform;
pub use migrate::{run_migration, MigrationOptions};
pub use platform::{ensure_repo, Platform, PlatformFuture, PlatformType};
pub use sync::{mirror_repository, Workspace};
pub use utils::{is_truthy, Secret};
