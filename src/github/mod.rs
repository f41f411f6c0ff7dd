//! GitHub module.
pub(crate) mod platform;
pub(crate) mod repo;

/// GitHub URL for git transport
pub(crate) const GITHUB_URL: &str = "https://github.com";

/// GitHub API URL
pub(crate) const GITHUB_API_URL: &str = "https://api.github.com";

/// GitHub API Header
const GITHUB_API_HEADER: &str = "X-GitHub-Api-Version";

/// GitHub API Version
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Username GitHub expects in front of a token in an HTTPS remote
pub(crate) const GITHUB_TOKEN_USER: &str = "x-access-token";

/// Pipeline variable holding the GitHub token
pub(crate) const GITHUB_TOKEN_VARIABLE: &str = "GITHUB_TOKEN";
