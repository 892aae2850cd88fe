//! Access credentials.

use serde::Serialize;
use std::fmt;

/// A credential passed opaquely to every external call.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credential {
    #[serde(rename = "type")]
    pub kind: String,
    pub host: String,
    pub username: String,
    pub password: String,
}

impl Credential {
    /// A `git_source` credential using the access-token username convention.
    #[must_use]
    pub fn git_source(host: &str, token: &str) -> Self {
        Self {
            kind: "git_source".to_string(),
            host: host.to_string(),
            username: "x-access-token".to_string(),
            password: token.to_string(),
        }
    }

    pub fn is_git_source_for(&self, host: &str) -> bool {
        self.kind == "git_source" && self.host.eq_ignore_ascii_case(host)
    }
}

// Keeps secrets out of logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("kind", &self.kind)
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_password() {
        let credential = Credential::git_source("github.com", "ghp_secret");
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn matches_git_source_host() {
        let credential = Credential::git_source("GitHub.com", "token");
        assert!(credential.is_git_source_for("github.com"));
        assert!(!credential.is_git_source_for("gitlab.com"));
    }
}
