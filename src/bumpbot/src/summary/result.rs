//! Per-dependency outcome types.

use crate::pull_requests::PrStatus;

/// Result of processing a single dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateResult {
    /// A pull request was created, updated, or left alone by the host.
    Applied {
        /// Dependency name.
        dependency: String,
        /// Outcome reported by the host.
        status: PrStatus,
    },

    /// Updated files were computed but nothing was written.
    Previewed {
        /// Dependency name.
        dependency: String,
        /// Existing pull request that would be updated.
        number: u64,
        /// Number of files that would change.
        files: usize,
    },

    /// The dependency could not be updated.
    Skipped {
        /// Dependency name.
        dependency: String,
        /// Reason for skipping.
        reason: String,
    },
}

impl UpdateResult {
    #[must_use]
    pub fn dependency(&self) -> &str {
        match self {
            Self::Applied { dependency, .. }
            | Self::Previewed { dependency, .. }
            | Self::Skipped { dependency, .. } => dependency,
        }
    }
}
