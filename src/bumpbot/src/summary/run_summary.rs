//! Run summary types.

use super::result::UpdateResult;
use crate::pull_requests::PrStatus;

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Open automation pull requests that were stale or off-branch.
    pub eligible_pull_requests: usize,

    /// Dependencies selected for an update.
    pub candidates: usize,

    /// Number of pull requests opened.
    pub prs_created: usize,

    /// Number of existing pull requests refreshed.
    pub prs_updated: usize,

    /// Number of updates computed in dry-run mode.
    pub previewed: usize,

    /// Number of dependencies skipped.
    pub skipped: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Every outcome, in processing order.
    pub results: Vec<UpdateResult>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with a processing result.
    pub fn record_result(&mut self, result: UpdateResult) {
        match &result {
            UpdateResult::Applied { status, .. } => match status {
                PrStatus::Created { .. } => self.prs_created += 1,
                PrStatus::Updated { .. } => self.prs_updated += 1,
                PrStatus::Skipped { .. } => self.skipped += 1,
            },
            UpdateResult::Previewed { .. } => self.previewed += 1,
            UpdateResult::Skipped { .. } => self.skipped += 1,
        }
        self.results.push(result);
    }

    /// Returns true if any dependency was left without an update.
    #[must_use]
    pub fn has_skips(&self) -> bool {
        self.skipped > 0
    }
}
