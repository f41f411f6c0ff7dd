//! Destination hosting platform abstraction
use std::{future::Future, pin::Pin};

use crate::errors::MigrateError;

/// Boxed future returned by [`Platform`] methods
pub type PlatformFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, MigrateError>> + Send + 'a>>;

/// Repository operations needed on the destination host
pub trait Platform: Sync + Send {
    /// Whether `name` exists under the configured account.
    ///
    /// Only an explicit "found" answer counts; any other status is `false`.
    fn repo_exists<'a>(&'a self, name: &'a str) -> PlatformFuture<'a, bool>;

    /// Create an empty repository called `name`
    fn create_repo<'a>(&'a self, name: &'a str, private: bool) -> PlatformFuture<'a, ()>;

    /// Account the repositories live under
    fn get_username(&self) -> &str;

    /// Kind of platform
    fn get_type(&self) -> PlatformType;
}

/// Supported hosting platforms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformType {
    /// bitbucket.org
    Bitbucket,
    /// github.com
    Github,
}

impl std::fmt::Display for PlatformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformType::Bitbucket => write!(f, "bitbucket"),
            PlatformType::Github => write!(f, "github"),
        }
    }
}

/// Make sure `name` exists on `platform`, creating it when missing.
///
/// Issues at most one creation request.
/// # Errors
/// Error if the existence check cannot be sent or the creation is refused
pub async fn ensure_repo(
    platform: &dyn Platform,
    name: &str,
    private: bool,
) -> Result<(), MigrateError> {
    let full_name = format!("{}/{}", platform.get_username(), name);
    if platform.repo_exists(name).await? {
        log::info!(
            "{} repository {full_name} already exists.",
            platform.get_type()
        );
        return Ok(());
    }
    log::info!(
        "{} repository {full_name} does not exist. Creating...",
        platform.get_type()
    );
    platform.create_repo(name, private).await?;
    log::info!("{} repository created: {full_name}", platform.get_type());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Mutex;

    /// Records creation requests
    struct FakePlatform {
        exists: bool,
        created: Mutex<Vec<(String, bool)>>,
    }

    impl Platform for FakePlatform {
        fn repo_exists<'a>(&'a self, _name: &'a str) -> PlatformFuture<'a, bool> {
            Box::pin(async move { Ok(self.exists) })
        }

        fn create_repo<'a>(&'a self, name: &'a str, private: bool) -> PlatformFuture<'a, ()> {
            Box::pin(async move {
                self.created.lock().unwrap().push((name.to_string(), private));
                Ok(())
            })
        }

        fn get_username(&self) -> &str {
            "acme-gh"
        }

        fn get_type(&self) -> PlatformType {
            PlatformType::Github
        }
    }

    #[tokio::test]
    async fn creates_missing_repo_once() {
        let platform = FakePlatform {
            exists: false,
            created: Mutex::new(vec![]),
        };
        ensure_repo(&platform, "widgets", true).await.unwrap();
        assert_eq!(
            *platform.created.lock().unwrap(),
            vec![("widgets".to_string(), true)]
        );
    }

    #[tokio::test]
    async fn leaves_existing_repo_alone() {
        let platform = FakePlatform {
            exists: true,
            created: Mutex::new(vec![]),
        };
        ensure_repo(&platform, "widgets", false).await.unwrap();
        assert!(platform.created.lock().unwrap().is_empty());
    }
}
