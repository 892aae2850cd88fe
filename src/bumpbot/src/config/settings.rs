//! Settings file deserialization.

use crate::config::{ConfigError, PullRequestFormats};
use crate::context::split_repo;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Parsed contents of a `bumpbot.toml` file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Full name of the repository to update, in `owner/name` form.
    pub repo: String,

    /// Directory holding the dependency manifest files.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Source hosting provider.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Package manager identifier used to pick the ecosystem helpers.
    pub package_manager: String,

    /// Substring of a pull request head label marking it as opened by the automation.
    #[serde(default = "default_automation_label")]
    pub automation_label: String,

    /// Branch existing pull requests are expected to target.
    ///
    /// Falls back to the repository default branch when unset.
    pub tracked_branch: Option<String>,

    /// Branch dependency files are fetched from and new pull requests target.
    pub target_branch: Option<String>,

    /// Hosting API endpoint, for GitHub Enterprise installs.
    pub api_endpoint: Option<String>,

    /// Credentials handed to every external call.
    #[serde(default = "default_credentials")]
    pub credentials: Vec<CredentialSettings>,

    /// Helper executables keyed by package manager identifier.
    #[serde(default)]
    pub helpers: BTreeMap<String, HelperSettings>,

    /// Title, body and branch formats for new pull requests.
    #[serde(default)]
    pub pull_request: PullRequestFormats,
}

/// A credential entry. The secret is either inline or read from an environment variable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CredentialSettings {
    #[serde(rename = "type", default = "default_credential_type")]
    pub kind: String,

    pub host: String,

    #[serde(default = "default_username")]
    pub username: String,

    /// Inline secret. Prefer `password-env`.
    pub password: Option<String>,

    #[serde(default = "default_password_env")]
    pub password_env: String,
}

/// External helper executable serving one package manager.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HelperSettings {
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Extra environment passed to the helper process.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

fn default_directory() -> String {
    "/".to_string()
}

fn default_provider() -> String {
    "github".to_string()
}

fn default_automation_label() -> String {
    "dependabot".to_string()
}

fn default_credential_type() -> String {
    "git_source".to_string()
}

fn default_username() -> String {
    "x-access-token".to_string()
}

pub(crate) fn default_password_env() -> String {
    "GITHUB_OAUTH_TOKEN".to_string()
}

fn default_credentials() -> Vec<CredentialSettings> {
    vec![CredentialSettings {
        kind: default_credential_type(),
        host: "github.com".to_string(),
        username: default_username(),
        password: None,
        password_env: default_password_env(),
    }]
}

impl Settings {
    /// Loads and validates settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, malformed,
    /// or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading settings");

        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::parse(&content, &path.display().to_string())
    }

    /// Parses and validates settings from TOML text. `origin` names the source in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the content is malformed or fails validation.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content).map_err(|e| ConfigError::TomlError {
            path: origin.to_string(),
            source: e,
        })?;
        settings.validate(origin)?;
        Ok(settings)
    }

    fn validate(&self, origin: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: origin.to_string(),
            message,
        };

        if split_repo(&self.repo).is_none() {
            return Err(invalid(format!(
                "repo must be in 'owner/name' form, got '{}'",
                self.repo
            )));
        }

        if !self.directory.starts_with('/') {
            return Err(invalid(format!(
                "directory must be absolute within the repository, got '{}'",
                self.directory
            )));
        }

        if self.package_manager.trim().is_empty() {
            return Err(invalid("package-manager must not be empty".to_string()));
        }

        if self.automation_label.trim().is_empty() {
            return Err(invalid("automation-label must not be empty".to_string()));
        }

        if self.credentials.is_empty() {
            return Err(invalid("at least one credential is required".to_string()));
        }

        if let Some(endpoint) = &self.api_endpoint {
            url::Url::parse(endpoint)
                .map_err(|e| invalid(format!("api-endpoint '{endpoint}' is not a URL: {e}")))?;
        }

        for (name, helper) in &self.helpers {
            if helper.command.trim().is_empty() {
                return Err(invalid(format!("helper '{name}' has an empty command")));
            }
        }

        Ok(())
    }
}
