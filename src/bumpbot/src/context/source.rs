//! Repository coordinates.

use crate::config::ConfigError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Default public GitHub REST endpoint.
pub const GITHUB_API_ENDPOINT: &str = "https://api.github.com";

/// Supported source hosting providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    #[serde(rename = "github")]
    GitHub,
}

impl Provider {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(Self::GitHub),
            other => Err(format!("unsupported provider '{other}'")),
        }
    }
}

/// Where the dependency files live. Built once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    provider: Provider,
    repo: String,
    directory: String,
    branch: Option<String>,
    api_endpoint: String,
}

impl Source {
    /// Creates a source for `repo` (`owner/name`) rooted at `directory`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the repo name is not `owner/name`.
    pub fn new(provider: Provider, repo: &str, directory: &str) -> Result<Self, ConfigError> {
        if split_repo(repo).is_none() {
            return Err(ConfigError::ValidationError {
                path: "source".to_string(),
                message: format!("repo must be in 'owner/name' form, got '{repo}'"),
            });
        }

        Ok(Self {
            provider,
            repo: repo.to_string(),
            directory: directory.to_string(),
            branch: None,
            api_endpoint: GITHUB_API_ENDPOINT.to_string(),
        })
    }

    /// Pins the branch files are fetched from and new pull requests target.
    #[must_use]
    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    /// Overrides the hosting API endpoint.
    #[must_use]
    pub fn with_api_endpoint(mut self, api_endpoint: &str) -> Self {
        self.api_endpoint = api_endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Full repository name, `owner/name`.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn owner(&self) -> &str {
        split_repo(&self.repo).map_or("", |(owner, _)| owner)
    }

    pub fn name(&self) -> &str {
        split_repo(&self.repo).map_or("", |(_, name)| name)
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    /// Host name credentials for this source are registered under.
    pub fn hostname(&self) -> String {
        if self.api_endpoint == GITHUB_API_ENDPOINT {
            return "github.com".to_string();
        }
        url::Url::parse(&self.api_endpoint)
            .ok()
            .and_then(|url| url.host_str().map(str::to_owned))
            .unwrap_or_else(|| "github.com".to_string())
    }

    /// Web URL of a pull request, used when the API omits one.
    pub fn pull_request_url(&self, number: u64) -> String {
        format!("https://{}/{}/pull/{number}", self.hostname(), self.repo)
    }
}

/// Splits `owner/name`, rejecting empty parts and nested paths.
pub(crate) fn split_repo(repo: &str) -> Option<(&str, &str)> {
    let (owner, name) = repo.split_once('/')?;
    (!owner.is_empty() && !name.is_empty() && !name.contains('/')).then_some((owner, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_owner_and_name() {
        let source = Source::new(Provider::GitHub, "zooniverse/Ouroboros", "/").unwrap();
        assert_eq!(source.owner(), "zooniverse");
        assert_eq!(source.name(), "Ouroboros");
        assert_eq!(source.hostname(), "github.com");
    }

    #[test]
    fn rejects_malformed_repo() {
        assert!(Source::new(Provider::GitHub, "zooniverse", "/").is_err());
        assert!(Source::new(Provider::GitHub, "a/b/c", "/").is_err());
        assert!(Source::new(Provider::GitHub, "/b", "/").is_err());
    }

    #[test]
    fn enterprise_endpoint_changes_hostname() {
        let source = Source::new(Provider::GitHub, "org/app", "/")
            .unwrap()
            .with_api_endpoint("https://github.example.com/api/v3/");
        assert_eq!(source.api_endpoint(), "https://github.example.com/api/v3");
        assert_eq!(source.hostname(), "github.example.com");
        assert_eq!(
            source.pull_request_url(7),
            "https://github.example.com/org/app/pull/7"
        );
    }

    #[test]
    fn parses_provider_case_insensitively() {
        assert_eq!("GitHub".parse::<Provider>(), Ok(Provider::GitHub));
        assert!("gitlab".parse::<Provider>().is_err());
    }
}
