//! Pull request error types.

use thiserror::Error;

/// Errors that can occur while listing, creating or updating pull requests.
#[derive(Debug, Error)]
pub enum PrError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// An automation pull request whose title doesn't name a dependency.
    #[error("Can't find the dependency name in the title of #{number}: '{title}'")]
    UnrecognisedTitle { number: u64, title: String },

    /// No API token is available to build the client.
    #[error("No access token configured for {host}")]
    MissingToken { host: String },

    /// The hosting API answered with something we can't use.
    #[error("Unexpected response from the hosting API: {message}")]
    UnexpectedResponse { message: String },
}
