//! Request context shared by every step of a run.
//!
//! The context couples the repository [`Source`] with the [`Credential`] list.
//! It is built once and borrowed by the fetcher, parser, checker, updater and
//! pull request host.

mod credential;
mod source;

pub use credential::Credential;
pub use source::{Provider, Source, GITHUB_API_ENDPOINT};
pub(crate) use source::split_repo;

use crate::config::{ConfigError, CredentialSettings, Settings};
use tracing::debug;

/// Immutable repository coordinates plus credentials.
#[derive(Debug, Clone)]
pub struct RequestContext {
    source: Source,
    credentials: Vec<Credential>,
}

impl RequestContext {
    pub fn new(source: Source, credentials: Vec<Credential>) -> Self {
        Self {
            source,
            credentials,
        }
    }

    /// Builds the context from settings, resolving each credential secret.
    ///
    /// A secret comes from the inline `password`, else the `password-env`
    /// variable, else `token` when the credential targets the source host.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the provider is unknown, the repo is malformed,
    /// a secret can't be resolved, or no `git_source` credential targets the
    /// source host.
    pub fn from_settings(settings: &Settings, token: Option<&str>) -> Result<Self, ConfigError> {
        let provider = settings
            .provider
            .parse::<Provider>()
            .map_err(|message| ConfigError::ValidationError {
                path: "provider".to_string(),
                message,
            })?;

        let mut source = Source::new(provider, &settings.repo, &settings.directory)?
            .with_branch(settings.target_branch.clone());
        if let Some(endpoint) = &settings.api_endpoint {
            source = source.with_api_endpoint(endpoint);
        }

        let source_host = source.hostname();
        let credentials = settings
            .credentials
            .iter()
            .map(|entry| resolve_credential(entry, &source_host, token))
            .collect::<Result<Vec<_>, _>>()?;

        if !credentials.iter().any(|c| c.is_git_source_for(&source_host)) {
            return Err(ConfigError::ValidationError {
                path: "credentials".to_string(),
                message: format!("no git_source credential for {source_host}"),
            });
        }

        debug!(
            repo = %source.repo(),
            credentials = credentials.len(),
            "Built request context"
        );

        Ok(Self::new(source, credentials))
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    /// Token used for the hosting API: the secret of the `git_source`
    /// credential for the source host.
    pub fn api_token(&self) -> Option<&str> {
        let host = self.source.hostname();
        self.credentials
            .iter()
            .find(|c| c.is_git_source_for(&host))
            .map(|c| c.password.as_str())
    }
}

fn resolve_credential(
    entry: &CredentialSettings,
    source_host: &str,
    token: Option<&str>,
) -> Result<Credential, ConfigError> {
    let password = entry
        .password
        .clone()
        .or_else(|| std::env::var(&entry.password_env).ok())
        .filter(|secret| !secret.is_empty())
        .or_else(|| {
            token
                .filter(|_| entry.host.eq_ignore_ascii_case(source_host))
                .map(str::to_owned)
        })
        .ok_or_else(|| ConfigError::MissingSecret {
            host: entry.host.clone(),
            variable: entry.password_env.clone(),
        })?;

    Ok(Credential {
        kind: entry.kind.clone(),
        host: entry.host.clone(),
        username: entry.username.clone(),
        password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(extra: &str) -> Settings {
        Settings::parse(
            &format!(
                r#"
repo = "zooniverse/Ouroboros"
package-manager = "bundler"
{extra}
"#
            ),
            "inline",
        )
        .unwrap()
    }

    #[test]
    fn resolves_secret_from_environment() {
        temp_env::with_var("GITHUB_OAUTH_TOKEN", Some("env-token"), || {
            let context = RequestContext::from_settings(&settings(""), None).unwrap();
            assert_eq!(context.api_token(), Some("env-token"));
            assert_eq!(context.credentials()[0].username, "x-access-token");
            assert_eq!(context.source().directory(), "/");
        });
    }

    #[test]
    fn falls_back_to_explicit_token_for_source_host() {
        temp_env::with_var_unset("GITHUB_OAUTH_TOKEN", || {
            let context = RequestContext::from_settings(&settings(""), Some("cli-token")).unwrap();
            assert_eq!(context.api_token(), Some("cli-token"));
        });
    }

    #[test]
    fn missing_secret_is_an_error() {
        temp_env::with_var_unset("GITHUB_OAUTH_TOKEN", || {
            let result = RequestContext::from_settings(&settings(""), None);
            assert!(matches!(result, Err(ConfigError::MissingSecret { .. })));
        });
    }

    #[test]
    fn explicit_token_is_not_leaked_to_other_hosts() {
        temp_env::with_var_unset("REGISTRY_TOKEN", || {
            let result = RequestContext::from_settings(
                &settings(
                    r#"
[[credentials]]
type = "rubygems_server"
host = "gems.example.com"
password-env = "REGISTRY_TOKEN"
"#,
                ),
                Some("cli-token"),
            );
            assert!(matches!(
                result,
                Err(ConfigError::MissingSecret { host, .. }) if host == "gems.example.com"
            ));
        });
    }

    #[test]
    fn registry_credential_alone_is_rejected() {
        let result = RequestContext::from_settings(
            &settings(
                r#"
[[credentials]]
type = "rubygems_server"
host = "gems.example.com"
password = "registry-secret"
"#,
            ),
            Some("cli-token"),
        );
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { path, .. }) if path == "credentials"
        ));
    }

    #[test]
    fn api_token_ignores_other_hosts() {
        let source = Source::new(Provider::GitHub, "acme/app", "/").unwrap();
        let context = RequestContext::new(
            source,
            vec![
                Credential {
                    kind: "rubygems_server".to_string(),
                    host: "gems.example.com".to_string(),
                    username: "x-access-token".to_string(),
                    password: "registry-secret".to_string(),
                },
                Credential::git_source("github.com", "ghp_token"),
            ],
        );
        assert_eq!(context.api_token(), Some("ghp_token"));

        let registry_only = RequestContext::new(
            context.source().clone(),
            context.credentials()[..1].to_vec(),
        );
        assert_eq!(registry_only.api_token(), None);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        temp_env::with_var("GITHUB_OAUTH_TOKEN", Some("t"), || {
            let result =
                RequestContext::from_settings(&settings("provider = \"bitbucket\""), None);
            assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
        });
    }
}
