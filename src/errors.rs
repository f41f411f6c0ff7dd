//! Error handling for the bb2gh crate.
use std::{error::Error as StdError, fmt};

use crate::platform::PlatformType;

/// Error type for the bb2gh crate.
#[derive(Debug)]
pub struct MigrateError {
    /// Inner error.
    inner: Box<Inner>,
}

impl MigrateError {
    /// Create a new error.
    pub fn new(kind: MigrateErrorKind) -> Self {
        Self {
            inner: Box::new(Inner {
                kind,
                source: None,
                platform: None,
            }),
        }
    }

    /// Attach a textual cause to the error.
    pub fn with_text(mut self, text: &str) -> Self {
        self.inner.source = Some(Box::new(std::io::Error::other(text.to_string())));
        self
    }

    /// Attach the platform the error comes from.
    pub(crate) fn with_platform(mut self, platform: PlatformType) -> Self {
        self.inner.platform = Some(platform);
        self
    }

    /// Build an error of `kind` wrapping `source`.
    fn with_source(kind: MigrateErrorKind, source: BoxError) -> Self {
        Self {
            inner: Box::new(Inner {
                kind,
                source: Some(source),
                platform: None,
            }),
        }
    }

    /// Kind of the error.
    pub fn kind(&self) -> &MigrateErrorKind {
        &self.inner.kind
    }

    /// Platform involved in the error, if any.
    pub fn platform(&self) -> Option<&PlatformType> {
        self.inner.platform.as_ref()
    }
}

/// Type alias for a boxed error.
pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Inner error type for the bb2gh crate.
#[derive(Debug)]
struct Inner {
    /// Error kind.
    kind: MigrateErrorKind,

    /// Platform error
    platform: Option<PlatformType>,

    /// Source error.
    source: Option<BoxError>,
}

/// Category of a [`MigrateError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrateErrorKind {
    /// A required configuration value could not be resolved.
    Config,

    /// The settings file could not be read or parsed.
    Settings,

    /// Filesystem error.
    Io,

    /// Error related to the reqwest crate.
    Reqwest,

    /// Error related to serde.
    Serde,

    /// A remote URL could not be built.
    Url,

    /// The destination repository could not be created.
    RepoCreation,

    /// The mirror clone or the mirror push failed.
    Transfer,

    /// The run was interrupted by the operator.
    Interrupted,
}

impl fmt::Display for MigrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.inner.kind)?;
        if let Some(platform) = &self.inner.platform {
            write!(f, " ({platform})")?;
        }
        if let Some(source) = &self.inner.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for MigrateError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

impl From<reqwest::Error> for MigrateError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest only ever sees API URLs, which carry no credentials
        Self::with_source(MigrateErrorKind::Reqwest, Box::new(e))
    }
}

impl From<serde_json::Error> for MigrateError {
    fn from(e: serde_json::Error) -> Self {
        Self::with_source(MigrateErrorKind::Serde, Box::new(e))
    }
}

impl From<std::io::Error> for MigrateError {
    fn from(e: std::io::Error) -> Self {
        Self::with_source(MigrateErrorKind::Io, Box::new(e))
    }
}

impl From<dotenv::Error> for MigrateError {
    fn from(e: dotenv::Error) -> Self {
        Self::with_source(MigrateErrorKind::Settings, Box::new(e))
    }
}

impl From<url::ParseError> for MigrateError {
    fn from(e: url::ParseError) -> Self {
        Self::with_source(MigrateErrorKind::Url, Box::new(e))
    }
}
