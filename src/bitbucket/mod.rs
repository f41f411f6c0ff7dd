//! Bitbucket module.
pub(crate) mod pipelines;

/// Bitbucket URL for git transport
pub(crate) const BITBUCKET_URL: &str = "https://bitbucket.org";

/// Username Bitbucket expects in front of an access token in an HTTPS remote
pub(crate) const BITBUCKET_TOKEN_USER: &str = "x-token-auth";

/// Pipeline variable holding the Bitbucket token
pub(crate) const BITBUCKET_TOKEN_VARIABLE: &str = "BITBUCKET_TOKEN";
