//! Listing, creating and updating pull requests.
//!
//! The hosting provider sits behind [`PullRequestHost`]. Listing is exposed
//! as an explicit page cursor so callers decide when to fetch the next page.
//! [`GitHubHost`] implements the trait with octocrab.

mod eligibility;
mod enumerate;
mod error;
mod github;
mod status;

pub use eligibility::{extract_dependency_name, EligibilityFilter};
pub use enumerate::collect_eligible_pull_requests;
pub use error::PrError;
pub use github::GitHubHost;
pub use status::PrStatus;

use crate::ecosystem::DependencyFile;
use crate::templates::PullRequestMessage;
use async_trait::async_trait;
use tracing::{info, info_span, Instrument};

/// The fields of an open pull request used to decide eligibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    pub number: u64,
    pub title: String,
    /// `owner:branch` label of the head.
    pub head_label: String,
    pub head_ref: String,
    pub base_sha: String,
    pub base_ref: String,
    pub html_url: String,
}

/// One page of a pull request listing.
#[derive(Debug)]
pub struct PullRequestPage<C> {
    pub items: Vec<PullRequestInfo>,
    /// Cursor for the following page, absent on the last page.
    pub next: Option<C>,
}

/// A new pull request to open on top of `base_commit`.
#[derive(Debug, Clone, Copy)]
pub struct NewPullRequest<'a> {
    pub base_branch: &'a str,
    pub base_commit: &'a str,
    pub files: &'a [DependencyFile],
    pub message: &'a PullRequestMessage,
}

/// Fresh files to push onto an existing pull request, rebuilt on `base_commit`.
#[derive(Debug, Clone, Copy)]
pub struct PullRequestRefresh<'a> {
    pub number: u64,
    pub base_commit: &'a str,
    pub files: &'a [DependencyFile],
}

/// A hosting provider bound to one repository.
#[async_trait]
pub trait PullRequestHost: Send + Sync {
    /// Opaque continuation handed back to [`next_open_page`](Self::next_open_page).
    type Cursor: Send + Sync;

    /// Default branch of the repository.
    async fn default_branch(&self) -> Result<String, PrError>;

    /// First page of open pull requests.
    async fn first_open_page(&self) -> Result<PullRequestPage<Self::Cursor>, PrError>;

    /// The page following `cursor`.
    async fn next_open_page(
        &self,
        cursor: &Self::Cursor,
    ) -> Result<PullRequestPage<Self::Cursor>, PrError>;

    /// Pushes a branch with the files and opens a pull request from it.
    async fn create_pull_request(&self, request: &NewPullRequest<'_>)
        -> Result<PrStatus, PrError>;

    /// Replaces the head of an existing pull request with a commit of the files.
    async fn update_pull_request(
        &self,
        request: &PullRequestRefresh<'_>,
    ) -> Result<PrStatus, PrError>;
}

/// Opens a pull request for updated files.
///
/// Returns [`PrStatus::Skipped`] without calling the host when there are no files.
///
/// # Errors
///
/// Returns [`PrError`] if the host rejects any request.
pub async fn create_pr<H: PullRequestHost>(
    host: &H,
    request: &NewPullRequest<'_>,
) -> Result<PrStatus, PrError> {
    let span = info_span!(
        "create_pr",
        branch = %request.message.branch_name,
        base = %request.base_branch
    );

    async {
        if request.files.is_empty() {
            info!("No changes detected");
            return Ok(no_changes());
        }

        info!(files = request.files.len(), "Creating pull request");
        let status = host.create_pull_request(request).await?;
        info!(status = status.as_str(), url = status.url().unwrap_or(""), "Create finished");
        Ok(status)
    }
    .instrument(span)
    .await
}

/// Pushes updated files onto an existing pull request.
///
/// Returns [`PrStatus::Skipped`] without calling the host when there are no files.
///
/// # Errors
///
/// Returns [`PrError`] if the host rejects any request.
pub async fn update_pr<H: PullRequestHost>(
    host: &H,
    request: &PullRequestRefresh<'_>,
) -> Result<PrStatus, PrError> {
    let span = info_span!("update_pr", number = request.number);

    async {
        if request.files.is_empty() {
            info!("No changes detected");
            return Ok(no_changes());
        }

        info!(files = request.files.len(), "Updating pull request");
        let status = host.update_pull_request(request).await?;
        info!(status = status.as_str(), url = status.url().unwrap_or(""), "Update finished");
        Ok(status)
    }
    .instrument(span)
    .await
}

fn no_changes() -> PrStatus {
    PrStatus::Skipped {
        reason: "no changes made".to_string(),
    }
}
