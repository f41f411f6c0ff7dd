//! Github repository payloads
use serde::{Deserialize, Serialize};

/// Body of `POST /user/repos`
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateRepoGithub {
    /// Repository name
    pub name: String,

    /// Repository private status
    pub private: bool,

    /// Always false: the mirror push is rejected by a non-empty repository
    pub auto_init: bool,
}

impl CreateRepoGithub {
    /// Request for an empty repository
    pub fn new(name: &str, private: bool) -> Self {
        Self {
            name: name.to_string(),
            private,
            auto_init: false,
        }
    }
}
