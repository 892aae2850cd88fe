//! Runner error types.

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Settings and context errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Fetch, parse, check or update helper errors.
    #[error(transparent)]
    Ecosystem(#[from] crate::ecosystem::EcosystemError),

    /// Hosting API errors.
    #[error(transparent)]
    PullRequest(#[from] crate::pull_requests::PrError),

    /// Pull request message rendering errors.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// The dependency isn't declared in the fetched files.
    #[error("Can't find the dependency '{name}' in the parsed dependency files")]
    DependencyNotFound { name: String },

    /// The dependency can't be updated without unlocking other requirements.
    #[error("{name} - Can not update the package deps without unlocking")]
    CannotUpdate { name: String },
}
