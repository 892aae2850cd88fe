//! Pull request message rendering using Handlebars.
//!
//! Titles, bodies, branch names and commit titles are rendered from
//! [`PullRequestFormats`](crate::config::PullRequestFormats) with the updated
//! dependencies as data.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TemplateRenderer};

use bstr::ByteSlice;

/// Rendered text for a new pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestMessage {
    pub title: String,
    pub body: String,
    pub commit_title: String,
    pub branch_name: String,
}

impl PullRequestMessage {
    /// Commit message: title, blank line, body.
    #[must_use]
    pub fn commit_message(&self) -> String {
        if self.body.trim().is_empty() {
            self.commit_title.clone()
        } else {
            format!("{}\n\n{}", self.commit_title, self.body.trim_end())
        }
    }
}

/// Checks that `name` can be used as a branch name.
///
/// # Errors
///
/// Returns [`TemplateError::InvalidBranchName`] if git would reject the name.
pub fn validate_branch_name(name: &str) -> Result<(), TemplateError> {
    gix_validate::reference::name_partial(name.as_bytes().as_bstr())
        .map(|_| ())
        .map_err(|e| TemplateError::InvalidBranchName {
            name: name.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_branch_name() {
        assert!(validate_branch_name("dependabot/bundler/rack-ssl-1.4.0").is_ok());
        assert!(validate_branch_name("dependabot/npm_and_yarn/@babel/core-7.0.0").is_ok());
        assert!(validate_branch_name("bad..name").is_err());
        assert!(validate_branch_name("trailing/").is_err());
        assert!(validate_branch_name("has space").is_err());
    }

    #[test]
    fn test_commit_message_joins_title_and_body() {
        let message = PullRequestMessage {
            title: "Bump rack".to_string(),
            body: "Bumps rack.\n".to_string(),
            commit_title: "Bump rack from 1 to 2".to_string(),
            branch_name: "dependabot/bundler/rack-2".to_string(),
        };
        assert_eq!(message.commit_message(), "Bump rack from 1 to 2\n\nBumps rack.");

        let bare = PullRequestMessage {
            body: String::new(),
            ..message
        };
        assert_eq!(bare.commit_message(), "Bump rack from 1 to 2");
    }
}
