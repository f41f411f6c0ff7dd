//! git invocations with credential-bearing remotes
use std::{
    ffi::OsString,
    fmt,
    future::Future,
    path::{Path, PathBuf},
    pin::Pin,
    process::Stdio,
};

use tokio::process::Command;
use url::Url;

use crate::{
    errors::{MigrateError, MigrateErrorKind},
    utils::Secret,
};

/// Placeholder written instead of a credential
const REDACTED: &str = "***";

/// Build `host/<account>/<repo>.git`, percent-encoding both names
/// # Errors
/// Error if `host` is not a valid base URL
pub fn repo_url(host: &str, account: &str, repo: &str) -> Result<Url, MigrateError> {
    let mut url = Url::parse(host)?;
    url.path_segments_mut()
        .map_err(|_| cannot_hold_path(host))?
        .pop_if_empty()
        .push(account)
        .push(&format!("{repo}.git"));
    Ok(url)
}

/// Build `https://<token_user>:<token>@host/<account>/<repo>.git`
/// # Errors
/// Error if `host` is not a valid base URL
pub fn remote_url(
    host: &str,
    token_user: &str,
    token: &Secret,
    account: &str,
    repo: &str,
) -> Result<Url, MigrateError> {
    let mut url = repo_url(host, account, repo)?;
    url.set_username(token_user)
        .map_err(|_| cannot_hold_path(host))?;
    url.set_password(Some(token.expose()))
        .map_err(|_| cannot_hold_path(host))?;
    Ok(url)
}

/// Error for a base URL that can't carry a repository path
fn cannot_hold_path(host: &str) -> MigrateError {
    MigrateError::new(MigrateErrorKind::Url).with_text(&format!("{host} can't hold a path"))
}

/// One argument of a git command line
#[derive(Debug, Clone)]
enum GitArg {
    /// Literal argument
    Plain(&'static str),
    /// Local path
    Path(PathBuf),
    /// Remote URL with embedded credentials
    Remote(Url),
}

/// A git command line whose display form never contains credentials
#[derive(Debug, Clone)]
pub struct GitCommand {
    /// Arguments after `git`
    args: Vec<GitArg>,
}

impl GitCommand {
    /// `git clone --mirror <remote> <destination>`
    pub fn mirror_clone(remote: &Url, destination: &Path) -> Self {
        Self {
            args: vec![
                GitArg::Plain("clone"),
                GitArg::Plain("--mirror"),
                GitArg::Remote(remote.clone()),
                GitArg::Path(destination.to_path_buf()),
            ],
        }
    }

    /// `git push --mirror <remote>`
    ///
    /// Deletes every ref of the remote that the local repository lacks.
    pub fn mirror_push(remote: &Url) -> Self {
        Self {
            args: vec![
                GitArg::Plain("push"),
                GitArg::Plain("--mirror"),
                GitArg::Remote(remote.clone()),
            ],
        }
    }

    /// git subcommand (`clone`, `push`)
    pub fn subcommand(&self) -> &str {
        match self.args.first() {
            Some(GitArg::Plain(s)) => *s,
            _ => "",
        }
    }

    /// Remote URLs, credentials included
    pub fn remotes(&self) -> Vec<&Url> {
        self.args
            .iter()
            .filter_map(|arg| match arg {
                GitArg::Remote(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    /// Local paths passed to git
    pub fn paths(&self) -> Vec<&Path> {
        self.args
            .iter()
            .filter_map(|arg| match arg {
                GitArg::Path(path) => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }

    /// Real argument list, for the child process only
    fn os_args(&self) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| match arg {
                GitArg::Plain(s) => OsString::from(*s),
                GitArg::Path(p) => p.clone().into_os_string(),
                GitArg::Remote(url) => OsString::from(url.as_str()),
            })
            .collect()
    }

    /// Replace every credential of this command found in `text`
    pub fn redact(&self, text: &str) -> String {
        let mut redacted = text.to_string();
        for url in self.remotes() {
            let Some(password) = url.password() else {
                continue;
            };
            let decoded = urlencoding::decode(password)
                .map(|s| s.into_owned())
                .unwrap_or_default();
            for secret in [password.to_string(), decoded] {
                if !secret.is_empty() {
                    redacted = redacted.replace(&secret, REDACTED);
                }
            }
        }
        redacted
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("git")?;
        for arg in &self.args {
            match arg {
                GitArg::Plain(s) => write!(f, " {s}")?,
                GitArg::Path(p) => write!(f, " {}", p.display())?,
                GitArg::Remote(url) => {
                    let mut shown = url.clone();
                    if shown.password().is_some() {
                        let _ = shown.set_password(Some(REDACTED));
                    }
                    write!(f, " {shown}")?
                }
            }
        }
        Ok(())
    }
}

/// Boxed future returned by [`GitRunner::run`]
pub type GitFuture<'a> = Pin<Box<dyn Future<Output = Result<(), MigrateError>> + Send + 'a>>;

/// Runs git commands
pub trait GitRunner: Sync + Send {
    /// Run `command` inside `cwd`, failing on a non-zero exit
    fn run<'a>(&'a self, command: &'a GitCommand, cwd: &'a Path) -> GitFuture<'a>;
}

/// Runs the `git` executable
#[derive(Debug, Clone)]
pub struct SystemGit {
    /// git executable
    program: PathBuf,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }
}

impl SystemGit {
    /// Use another git executable
    pub fn with_program<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl GitRunner for SystemGit {
    fn run<'a>(&'a self, command: &'a GitCommand, cwd: &'a Path) -> GitFuture<'a> {
        Box::pin(async move {
            log::debug!("Running {command} in {}", cwd.display());
            let output = Command::new(&self.program)
                .args(command.os_args())
                .current_dir(cwd)
                .env("GIT_TERMINAL_PROMPT", "0")
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|e| {
                    MigrateError::new(MigrateErrorKind::Transfer)
                        .with_text(&format!("Unable to run {}: {e}", self.program.display()))
                })?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(MigrateError::new(MigrateErrorKind::Transfer).with_text(&format!(
                    "{command} failed ({}): {}",
                    output.status,
                    command.redact(stderr.trim())
                )));
            }
            Ok(())
        })
    }
}
