//! GitHub implementation of [`PullRequestHost`] on top of octocrab.
//!
//! Commits are built with the git data API: a tree on top of the base
//! commit's tree, a commit whose only parent is the base commit, then a
//! branch ref pointing at it. No local clone is needed.

use super::{
    NewPullRequest, PrError, PrStatus, PullRequestHost, PullRequestInfo, PullRequestPage,
    PullRequestRefresh,
};
use crate::context::{RequestContext, Source, GITHUB_API_ENDPOINT};
use crate::ecosystem::DependencyFile;
use crate::rate_limit::ensure_core_rate_limit;
use async_trait::async_trait;
use octocrab::models::pulls::PullRequest;
use octocrab::{Octocrab, Page};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

/// Results per page when listing pull requests.
const RESULTS_PER_PAGE: u8 = 100;

/// Mode for regular, non-executable files in git trees.
const FILE_MODE: &str = "100644";

#[derive(Debug, Deserialize)]
struct GitObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitCommit {
    tree: GitObject,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    #[serde(rename = "ref")]
    name: String,
    object: GitObject,
}

/// Pull request host for one GitHub repository.
#[derive(Clone)]
pub struct GitHubHost {
    octocrab: Octocrab,
    source: Source,
}

impl GitHubHost {
    /// Builds an authenticated client for the context's source.
    ///
    /// # Errors
    ///
    /// Returns [`PrError`] if no token is available or the client can't be built.
    pub fn new(context: &RequestContext) -> Result<Self, PrError> {
        let source = context.source().clone();
        let token = context.api_token().ok_or_else(|| PrError::MissingToken {
            host: source.hostname(),
        })?;

        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if source.api_endpoint() != GITHUB_API_ENDPOINT {
            builder = builder.base_uri(source.api_endpoint().to_string())?;
        }

        Ok(Self::with_client(builder.build()?, source))
    }

    /// Wraps an existing client.
    pub fn with_client(octocrab: Octocrab, source: Source) -> Self {
        Self { octocrab, source }
    }

    fn route(&self, path: &str) -> String {
        format!(
            "/repos/{}/{}/{}",
            self.source.owner(),
            self.source.name(),
            path.trim_start_matches('/')
        )
    }

    /// Commits `files` on top of `base_commit` and returns the new commit sha.
    async fn commit_files(
        &self,
        base_commit: &str,
        files: &[DependencyFile],
        message: &str,
    ) -> Result<String, PrError> {
        let base: GitCommit = self
            .octocrab
            .get(self.route(&format!("git/commits/{base_commit}")), None::<&()>)
            .await?;

        let entries: Vec<Value> = files.iter().map(tree_entry).collect();
        let tree: GitObject = self
            .octocrab
            .post(
                self.route("git/trees"),
                Some(&json!({ "base_tree": base.tree.sha, "tree": entries })),
            )
            .await?;

        let commit: GitObject = self
            .octocrab
            .post(
                self.route("git/commits"),
                Some(&json!({
                    "message": message,
                    "tree": tree.sha,
                    "parents": [base_commit],
                })),
            )
            .await?;

        debug!(commit = %commit.sha, files = files.len(), "Created commit");
        Ok(commit.sha)
    }

    async fn branch_exists(&self, branch: &str) -> Result<bool, PrError> {
        let full_name = format!("refs/heads/{branch}");
        let refs: Vec<GitRef> = self
            .octocrab
            .get(self.route(&format!("git/matching-refs/heads/{branch}")), None::<&()>)
            .await?;
        Ok(refs.iter().any(|r| r.name == full_name))
    }
}

fn to_info(source: &Source, pr: &PullRequest) -> PullRequestInfo {
    PullRequestInfo {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        head_label: pr.head.label.clone().unwrap_or_default(),
        head_ref: pr.head.ref_field.clone(),
        base_sha: pr.base.sha.clone(),
        base_ref: pr.base.ref_field.clone(),
        html_url: pr
            .html_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_else(|| source.pull_request_url(pr.number)),
    }
}

/// Keeps the octocrab page as the cursor only while it links onwards.
fn to_page(source: &Source, page: Page<PullRequest>) -> PullRequestPage<Page<PullRequest>> {
    let items = page.items.iter().map(|pr| to_info(source, pr)).collect();
    let next = page.next.is_some().then_some(page);
    PullRequestPage { items, next }
}

fn followed(page: Option<Page<PullRequest>>) -> Result<Page<PullRequest>, PrError> {
    page.ok_or_else(|| PrError::UnexpectedResponse {
        message: "next page link led nowhere".to_string(),
    })
}

fn require_default_branch(source: &Source, branch: Option<String>) -> Result<String, PrError> {
    branch.ok_or_else(|| PrError::UnexpectedResponse {
        message: format!("{} reports no default branch", source.repo()),
    })
}

fn tree_entry(file: &DependencyFile) -> Value {
    if file.deleted {
        json!({ "path": file.path(), "mode": FILE_MODE, "type": "blob", "sha": null })
    } else {
        json!({ "path": file.path(), "mode": FILE_MODE, "type": "blob", "content": file.content })
    }
}

#[async_trait]
impl PullRequestHost for GitHubHost {
    type Cursor = Page<PullRequest>;

    async fn default_branch(&self) -> Result<String, PrError> {
        let repo_info = self
            .octocrab
            .repos(self.source.owner(), self.source.name())
            .get()
            .await?;
        require_default_branch(&self.source, repo_info.default_branch)
    }

    async fn first_open_page(&self) -> Result<PullRequestPage<Self::Cursor>, PrError> {
        ensure_core_rate_limit(&self.octocrab).await?;

        let page = self
            .octocrab
            .pulls(self.source.owner(), self.source.name())
            .list()
            .state(octocrab::params::State::Open)
            .per_page(RESULTS_PER_PAGE)
            .send()
            .await?;

        Ok(to_page(&self.source, page))
    }

    async fn next_open_page(
        &self,
        cursor: &Self::Cursor,
    ) -> Result<PullRequestPage<Self::Cursor>, PrError> {
        ensure_core_rate_limit(&self.octocrab).await?;

        let page = followed(
            self.octocrab
                .get_page::<PullRequest>(&cursor.next)
                .await?,
        )?;

        Ok(to_page(&self.source, page))
    }

    async fn create_pull_request(
        &self,
        request: &NewPullRequest<'_>,
    ) -> Result<PrStatus, PrError> {
        let message = request.message;
        ensure_core_rate_limit(&self.octocrab).await?;

        if self.branch_exists(&message.branch_name).await? {
            info!(branch = %message.branch_name, "Branch already exists");
            return Ok(PrStatus::Skipped {
                reason: format!("branch {} already exists", message.branch_name),
            });
        }

        let commit = self
            .commit_files(request.base_commit, request.files, &message.commit_message())
            .await?;

        let branch: GitRef = self
            .octocrab
            .post(
                self.route("git/refs"),
                Some(&json!({
                    "ref": format!("refs/heads/{}", message.branch_name),
                    "sha": commit,
                })),
            )
            .await?;
        debug!(branch = %branch.name, sha = %branch.object.sha, "Pushed branch");

        let pr = self
            .octocrab
            .pulls(self.source.owner(), self.source.name())
            .create(&message.title, &message.branch_name, request.base_branch)
            .body(&message.body)
            .send()
            .await?;

        let url = to_info(&self.source, &pr).html_url;
        Ok(PrStatus::Created {
            number: pr.number,
            url,
        })
    }

    async fn update_pull_request(
        &self,
        request: &PullRequestRefresh<'_>,
    ) -> Result<PrStatus, PrError> {
        ensure_core_rate_limit(&self.octocrab).await?;

        let pr = self
            .octocrab
            .pulls(self.source.owner(), self.source.name())
            .get(request.number)
            .await?;
        let info = to_info(&self.source, &pr);

        // Keep the message the pull request was opened with
        let head: GitCommit = self
            .octocrab
            .get(self.route(&format!("git/commits/{}", pr.head.sha)), None::<&()>)
            .await?;

        let commit = self
            .commit_files(request.base_commit, request.files, &head.message)
            .await?;

        let branch: GitRef = self
            .octocrab
            .patch(
                self.route(&format!("git/refs/heads/{}", info.head_ref)),
                Some(&json!({ "sha": commit, "force": true })),
            )
            .await?;
        debug!(branch = %branch.name, sha = %branch.object.sha, "Force-pushed branch");

        Ok(PrStatus::Updated {
            number: info.number,
            url: info.html_url,
        })
    }
}
