//! Configuration handling
use std::{
    collections::HashMap,
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
};

use crate::{
    errors::{MigrateError, MigrateErrorKind},
    utils::{get_password, input, is_truthy, yes_no_input, Secret},
};

/// Every setting the migration needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Bitbucket workspace or username
    SourceAccount,
    /// Bitbucket repository
    SourceRepo,
    /// GitHub username
    DestinationAccount,
    /// GitHub repository
    DestinationRepo,
    /// Bitbucket access token
    SourceToken,
    /// GitHub personal access token
    DestinationToken,
    /// Whether a newly created GitHub repository is private
    Private,
}

impl ConfigKey {
    /// The six required values, in prompting order
    pub const REQUIRED: [ConfigKey; 6] = [
        ConfigKey::SourceAccount,
        ConfigKey::SourceRepo,
        ConfigKey::DestinationAccount,
        ConfigKey::DestinationRepo,
        ConfigKey::SourceToken,
        ConfigKey::DestinationToken,
    ];

    /// Name in the environment and in the settings file
    pub fn env_name(self) -> &'static str {
        match self {
            ConfigKey::SourceAccount => "BITBUCKET_USERNAME",
            ConfigKey::SourceRepo => "BITBUCKET_REPO",
            ConfigKey::DestinationAccount => "GITHUB_USERNAME",
            ConfigKey::DestinationRepo => "GITHUB_REPO",
            ConfigKey::SourceToken => "BITBUCKET_TOKEN",
            ConfigKey::DestinationToken => "GITHUB_TOKEN",
            ConfigKey::Private => "GITHUB_PRIVATE",
        }
    }

    /// Command line flag
    pub fn flag(self) -> &'static str {
        match self {
            ConfigKey::SourceAccount => "--bb-user",
            ConfigKey::SourceRepo => "--bb-repo",
            ConfigKey::DestinationAccount => "--gh-user",
            ConfigKey::DestinationRepo => "--gh-repo",
            ConfigKey::SourceToken => "--bb-token",
            ConfigKey::DestinationToken => "--gh-token",
            ConfigKey::Private => "--private",
        }
    }

    /// Human description used in prompts
    pub fn description(self) -> &'static str {
        match self {
            ConfigKey::SourceAccount => "your Bitbucket username or workspace",
            ConfigKey::SourceRepo => "your Bitbucket repository name",
            ConfigKey::DestinationAccount => "your GitHub username",
            ConfigKey::DestinationRepo => "your GitHub repository name",
            ConfigKey::SourceToken => "your Bitbucket access token",
            ConfigKey::DestinationToken => "your GitHub personal access token",
            ConfigKey::Private => "whether the GitHub repository is private",
        }
    }

    /// Credentials are read without echo
    pub fn is_secret(self) -> bool {
        matches!(self, ConfigKey::SourceToken | ConfigKey::DestinationToken)
    }
}

/// A place configuration values can come from
pub trait ConfigSource {
    /// Value for `key`, if this source has one
    fn lookup(&self, key: ConfigKey) -> Option<String>;
}

/// A flat `NAME=value` map, from the environment or a settings file
#[derive(Debug, Clone, Default)]
pub struct Layer {
    /// Values by environment name
    values: HashMap<String, String>,
}

impl Layer {
    /// Snapshot of the process environment
    pub fn from_env() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Read a settings file; a missing file gives an empty layer
    /// # Errors
    /// Error if the file exists but can't be parsed
    pub fn from_file(path: &Path) -> Result<Self, MigrateError> {
        if !path.exists() {
            log::debug!("No settings file at {}", path.display());
            return Ok(Self::default());
        }
        log::info!("Loading configuration from {}", path.display());
        // from_path_iter is deprecated upstream but is the only reader that leaves the environment alone
        #[allow(deprecated)]
        let values = dotenv::from_path_iter(path)?.collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self { values })
    }
}

impl FromIterator<(String, String)> for Layer {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl ConfigSource for Layer {
    fn lookup(&self, key: ConfigKey) -> Option<String> {
        self.values.get(key.env_name()).cloned()
    }
}

/// Asks the operator for what no source provided
pub trait Prompter {
    /// Ask for the value of `key`
    /// # Errors
    /// Error if no answer can be obtained
    fn prompt(&self, key: ConfigKey) -> Result<String, MigrateError>;

    /// Ask a yes/no question
    /// # Errors
    /// Error if no answer can be obtained
    fn confirm(&self, question: &str) -> Result<bool, MigrateError>;
}

/// Prompts on the terminal; tokens are read without echo
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(&self, key: ConfigKey) -> Result<String, MigrateError> {
        print!("Enter {}: ", key.description());
        if key.is_secret() {
            let _ = std::io::stdout().flush();
            get_password()
        } else {
            input()
        }
    }

    fn confirm(&self, question: &str) -> Result<bool, MigrateError> {
        yes_no_input(question)
    }
}

/// Never prompts: missing values are an error, questions are answered "no"
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractive;

impl Prompter for NonInteractive {
    fn prompt(&self, key: ConfigKey) -> Result<String, MigrateError> {
        Err(
            MigrateError::new(MigrateErrorKind::Config).with_text(&format!(
                "missing {}: pass {} or set {}",
                key.description(),
                key.flag(),
                key.env_name()
            )),
        )
    }

    fn confirm(&self, _question: &str) -> Result<bool, MigrateError> {
        Ok(false)
    }
}

/// Account, repository and token on one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    /// Account or workspace
    pub account: String,

    /// Repository name
    pub repo: String,

    /// Access token
    pub token: Secret,
}

/// Everything a migration run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Bitbucket side
    pub source: RepoIdentity,

    /// GitHub side
    pub destination: RepoIdentity,

    /// Create the GitHub repository as private
    pub private: bool,
}

/// Merges configuration sources by priority
pub struct Resolver<'a> {
    /// Sources, highest priority first
    sources: Vec<&'a dyn ConfigSource>,

    /// Last resort for missing values
    prompter: &'a dyn Prompter,
}

impl<'a> Resolver<'a> {
    /// `sources` are queried in order, the first non-empty value wins
    pub fn new(sources: Vec<&'a dyn ConfigSource>, prompter: &'a dyn Prompter) -> Self {
        Self { sources, prompter }
    }

    /// First non-empty value among the sources
    pub fn lookup(&self, key: ConfigKey) -> Option<String> {
        self.sources
            .iter()
            .filter_map(|source| source.lookup(key))
            .find(|value| !value.is_empty())
    }

    /// Value from the sources, else from the prompter
    fn require(&self, key: ConfigKey) -> Result<String, MigrateError> {
        if let Some(value) = self.lookup(key) {
            return Ok(value);
        }
        let value = self.prompter.prompt(key)?;
        let value = if key.is_secret() {
            value
        } else {
            value.trim().to_string()
        };
        if value.is_empty() {
            return Err(MigrateError::new(MigrateErrorKind::Config)
                .with_text(&format!("{} can't be empty", key.description())));
        }
        Ok(value)
    }

    /// Produce a fully populated configuration
    /// # Errors
    /// Error if a required value is still missing after prompting
    pub fn resolve(&self) -> Result<MigrationConfig, MigrateError> {
        let mut values = HashMap::new();
        for key in ConfigKey::REQUIRED {
            values.insert(key, self.require(key)?);
        }
        let mut take = |key: ConfigKey| values.remove(&key).unwrap_or_default();
        Ok(MigrationConfig {
            source: RepoIdentity {
                account: take(ConfigKey::SourceAccount),
                repo: take(ConfigKey::SourceRepo),
                token: Secret::new(take(ConfigKey::SourceToken)),
            },
            destination: RepoIdentity {
                account: take(ConfigKey::DestinationAccount),
                repo: take(ConfigKey::DestinationRepo),
                token: Secret::new(take(ConfigKey::DestinationToken)),
            },
            private: self.lookup(ConfigKey::Private).is_some_and(is_truthy),
        })
    }
}

/// Quote `value` when the settings parser would not read it back verbatim
fn quote_value(value: &str) -> String {
    let plain = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_./:@+,".contains(c));
    if plain {
        value.to_string()
    } else if !value.contains('\'') && !value.contains('\n') {
        format!("'{value}'")
    } else {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('$', "\\$")
            .replace('\n', "\\n");
        format!("\"{escaped}\"")
    }
}

impl MigrationConfig {
    /// Settings file content, readable back through [`Layer::from_file`]
    pub fn to_settings(&self) -> String {
        let line = |key: ConfigKey, value: &str| format!("{}={}\n", key.env_name(), quote_value(value));
        let mut content = format!(
            "# Environment variables for Bitbucket to GitHub migration\n# Created on {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        content.push_str("\n# Bitbucket credentials\n");
        content.push_str(&line(ConfigKey::SourceToken, self.source.token.expose()));
        content.push_str(&line(ConfigKey::SourceAccount, &self.source.account));
        content.push_str(&line(ConfigKey::SourceRepo, &self.source.repo));
        content.push_str("\n# GitHub credentials\n");
        content.push_str(&line(ConfigKey::DestinationToken, self.destination.token.expose()));
        content.push_str(&line(ConfigKey::DestinationAccount, &self.destination.account));
        content.push_str(&line(ConfigKey::DestinationRepo, &self.destination.repo));
        content.push_str("\n# Optional settings\n");
        content.push_str(&line(
            ConfigKey::Private,
            if self.private { "true" } else { "false" },
        ));
        content
    }

    /// Write the configuration to `path`, readable by the owner only
    /// # Errors
    /// Error if the file can't be created or written to
    pub fn save(&self, path: &Path) -> Result<(), MigrateError> {
        let mut file = create_private(path)?;
        file.write_all(self.to_settings().as_bytes())?;
        log::info!(
            "Configuration saved to {} with secure permissions.",
            path.display()
        );
        Ok(())
    }
}

/// Open `path` for writing with owner-only permissions
#[cfg(unix)]
fn create_private(path: &Path) -> Result<File, MigrateError> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies to new files
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

/// Open `path` for writing
#[cfg(not(unix))]
fn create_private(path: &Path) -> Result<File, MigrateError> {
    Ok(OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?)
}
