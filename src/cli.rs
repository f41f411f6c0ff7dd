//! Command line options for the bb2gh tool
use crate::{
    bitbucket::BITBUCKET_TOKEN_VARIABLE,
    config::{
        ConfigKey, ConfigSource, Layer, MigrationConfig, NonInteractive, Prompter, Resolver,
        TerminalPrompter,
    },
    errors::{MigrateError, MigrateErrorKind},
    git::SystemGit,
    github::{platform::GithubPlatform, GITHUB_TOKEN_VARIABLE},
    migrate::{run_migration, MigrationOptions},
    utils::Secret,
};
use clap::Parser;
use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
};

/// bb2gh - Mirror a Bitbucket repository to GitHub and keep it in sync.
///
/// The mirror push overwrites the GitHub repository: refs missing on
/// Bitbucket are deleted there.
#[derive(Parser, Clone, Debug)]
#[command(version, about)]
pub struct MigrateCli {
    /// Bitbucket username or workspace
    #[arg(long = "bb-user")]
    pub bb_user: Option<String>,

    /// Bitbucket repository name
    #[arg(long = "bb-repo")]
    pub bb_repo: Option<String>,

    /// GitHub username
    #[arg(long = "gh-user")]
    pub gh_user: Option<String>,

    /// GitHub repository name
    #[arg(long = "gh-repo")]
    pub gh_repo: Option<String>,

    /// Bitbucket access token
    #[arg(long = "bb-token")]
    pub bb_token: Option<Secret>,

    /// GitHub personal access token
    #[arg(long = "gh-token")]
    pub gh_token: Option<Secret>,

    /// Create a private GitHub repository
    #[arg(long)]
    pub private: bool,

    /// Save configuration to the settings file
    #[arg(long = "save-env")]
    pub save_env: bool,

    /// Settings file to read and save
    #[arg(long = "env-file", default_value = ".env")]
    pub env_file: PathBuf,

    /// Directory receiving bitbucket-pipelines.yml
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Branch the scheduled sync runs against
    #[arg(short, long, default_value = "main")]
    pub branch: String,

    /// Fail instead of prompting for missing values
    #[arg(long)]
    pub non_interactive: bool,

    /// Verbose mode (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ConfigSource for MigrateCli {
    fn lookup(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::SourceAccount => self.bb_user.clone(),
            ConfigKey::SourceRepo => self.bb_repo.clone(),
            ConfigKey::DestinationAccount => self.gh_user.clone(),
            ConfigKey::DestinationRepo => self.gh_repo.clone(),
            ConfigKey::SourceToken => self.bb_token.as_ref().map(|s| s.expose().to_string()),
            ConfigKey::DestinationToken => self.gh_token.as_ref().map(|s| s.expose().to_string()),
            ConfigKey::Private => self.private.then(|| "true".to_string()),
        }
    }
}

impl MigrateCli {
    /// Log level matching the verbosity flag
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Prompter to use for missing values
    fn prompter(&self) -> Box<dyn Prompter> {
        if self.non_interactive || !std::io::stdin().is_terminal() {
            Box::new(NonInteractive)
        } else {
            Box::new(TerminalPrompter)
        }
    }
}

/// Save `config` to `path` when `save_flag` is set or the user agrees.
///
/// A refused prompt or a failed write is only a warning: the migration
/// already succeeded. Returns whether the file was written.
pub fn save_if_requested(
    config: &MigrationConfig,
    path: &Path,
    save_flag: bool,
    prompter: &dyn Prompter,
) -> bool {
    let save = save_flag
        || prompter
            .confirm(&format!("Save configuration to {}? (y/n)", path.display()))
            .unwrap_or_else(|e| {
                log::warn!("Not saving configuration: {e}");
                false
            });
    if !save {
        return false;
    }
    match config.save(path) {
        Ok(()) => {
            println!("For security, avoid committing this file to version control.");
            true
        }
        Err(e) => {
            log::warn!("Error creating {}: {e}", path.display());
            false
        }
    }
}

/// Run the bb2gh tool with the provided command line options
/// # Errors
/// Error if the configuration is incomplete or a migration stage fails
pub async fn migrate_main(args: MigrateCli) -> Result<(), MigrateError> {
    let settings = Layer::from_file(&args.env_file)?;
    let environment = Layer::from_env();
    let prompter = args.prompter();
    let sources: Vec<&dyn ConfigSource> = vec![&args, &environment, &settings];
    let config = Resolver::new(sources, prompter.as_ref()).resolve()?;

    let platform = GithubPlatform::new(
        config.destination.account.clone(),
        config.destination.token.clone(),
    );
    let options = MigrationOptions {
        output_dir: args.output_dir.clone(),
        branch: args.branch.clone(),
        ..Default::default()
    };
    let git = SystemGit::default();
    let descriptor = tokio::select! {
        result = run_migration(&config, &platform, &git, &options) => result?,
        Ok(()) = tokio::signal::ctrl_c() => {
            return Err(MigrateError::new(MigrateErrorKind::Interrupted).with_text("received Ctrl-C"));
        }
    };

    println!("\nIMPORTANT: You need to add {} to your Bitbucket repository", descriptor.display());
    println!("and set up the following repository variables in Bitbucket:");
    println!("- {BITBUCKET_TOKEN_VARIABLE}: Your Bitbucket access token");
    println!("- {GITHUB_TOKEN_VARIABLE}: Your GitHub personal access token");

    save_if_requested(&config, &args.env_file, args.save_env, prompter.as_ref());

    println!("\nMigration completed successfully!");
    println!(
        "GitHub repository {}/{} now mirrors Bitbucket repository {}/{}.",
        config.destination.account,
        config.destination.repo,
        config.source.account,
        config.source.repo
    );
    println!("Next steps:");
    println!("1. Add the bitbucket-pipelines.yml file to your Bitbucket repository");
    println!("2. Set up repository variables in Bitbucket");
    println!("3. Enable Bitbucket Pipelines");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::RepoIdentity;

    /// Gives the same answer to every confirmation
    struct Confirming(bool);

    impl Prompter for Confirming {
        fn prompt(&self, key: ConfigKey) -> Result<String, MigrateError> {
            Err(MigrateError::new(MigrateErrorKind::Config).with_text(key.env_name()))
        }

        fn confirm(&self, _question: &str) -> Result<bool, MigrateError> {
            Ok(self.0)
        }
    }

    fn config() -> MigrationConfig {
        MigrationConfig {
            source: RepoIdentity {
                account: "acme".to_string(),
                repo: "widgets".to_string(),
                token: Secret::new("bbtoken"),
            },
            destination: RepoIdentity {
                account: "acme-gh".to_string(),
                repo: "widgets".to_string(),
                token: Secret::new("ghtoken"),
            },
            private: false,
        }
    }

    #[test]
    fn flags_map_to_keys() {
        let args = MigrateCli::try_parse_from([
            "bb2gh",
            "--bb-user",
            "acme",
            "--gh-token",
            "ghtoken",
            "--private",
        ])
        .unwrap();
        assert_eq!(args.lookup(ConfigKey::SourceAccount).as_deref(), Some("acme"));
        assert_eq!(args.lookup(ConfigKey::DestinationToken).as_deref(), Some("ghtoken"));
        assert_eq!(args.lookup(ConfigKey::Private).as_deref(), Some("true"));
        assert_eq!(args.lookup(ConfigKey::SourceRepo), None);
        assert_eq!(args.env_file, PathBuf::from(".env"));
        assert_eq!(args.branch, "main");
    }

    #[test]
    fn private_absent_defers_to_other_sources() {
        let args = MigrateCli::try_parse_from(["bb2gh"]).unwrap();
        assert_eq!(args.lookup(ConfigKey::Private), None);
        assert_eq!(args.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn tokens_hidden_from_debug() {
        let args = MigrateCli::try_parse_from(["bb2gh", "--bb-token", "s3cr3t", "-vv"]).unwrap();
        assert!(!format!("{args:?}").contains("s3cr3t"));
        assert_eq!(args.log_level(), log::LevelFilter::Trace);
    }

    #[test]
    fn save_flag_writes_without_asking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        assert!(save_if_requested(&config(), &path, true, &NonInteractive));
        let saved = Layer::from_file(&path).unwrap();
        assert_eq!(saved.lookup(ConfigKey::SourceRepo).as_deref(), Some("widgets"));
    }

    #[test]
    fn non_interactive_without_flag_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        assert!(!save_if_requested(&config(), &path, false, &NonInteractive));
        assert!(!path.exists());
    }

    #[test]
    fn answer_to_save_question_is_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        assert!(!save_if_requested(&config(), &path, false, &Confirming(false)));
        assert!(!path.exists());
        assert!(save_if_requested(&config(), &path, false, &Confirming(true)));
        assert!(path.exists());
    }

    #[test]
    fn unwritable_settings_file_is_only_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(".env");
        assert!(!save_if_requested(&config(), &path, true, &NonInteractive));
        assert!(!path.exists());
    }
}
