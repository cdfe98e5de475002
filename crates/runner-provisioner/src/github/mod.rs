// GitHub-facing pieces: the repository a runner registers against and the
// client that issues registration tokens for it.

pub mod registration_token;

pub use registration_token::{GitHubTokenClient, RegistrationTokenProvider};

use std::fmt;

/// A repository on GitHub, identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// The repository's web URL on `server_url`, which is what the runner's
    /// configuration script expects as `--url`.
    pub fn html_url(&self, server_url: &str) -> String {
        format!(
            "{}/{}/{}",
            server_url.trim_end_matches('/'),
            self.owner,
            self.name
        )
    }

    /// REST endpoint that issues runner registration tokens for this repository.
    pub fn registration_token_url(&self, api_url: &str) -> String {
        format!(
            "{}/repos/{}/{}/actions/runners/registration-token",
            api_url.trim_end_matches('/'),
            self.owner,
            self.name
        )
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
