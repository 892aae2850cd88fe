//! Pull request status types.

use serde::Serialize;

/// Outcome of creating or updating a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PrStatus {
    /// A new pull request was opened.
    Created {
        /// GitHub PR number.
        number: u64,
        /// GitHub PR URL.
        url: String,
    },

    /// A commit was pushed onto an existing pull request's branch.
    Updated {
        /// GitHub PR number.
        number: u64,
        /// GitHub PR URL.
        url: String,
    },

    /// Nothing was written.
    Skipped {
        /// Reason for skipping.
        reason: String,
    },
}

impl PrStatus {
    /// Returns the status as a string for logs and summaries.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
            Self::Skipped { .. } => "skipped",
        }
    }

    /// Returns the PR URL if one was written.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Created { url, .. } | Self::Updated { url, .. } => Some(url),
            Self::Skipped { .. } => None,
        }
    }
}
