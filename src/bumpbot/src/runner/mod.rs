//! Orchestrates the refresh of existing pull requests and the creation of new ones.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::context::RequestContext;
use crate::ecosystem::{
    Dependency, DependencyFile, Ecosystem, EcosystemRegistry, FetchedFiles, RequirementsToUnlock,
};
use crate::pull_requests::{
    collect_eligible_pull_requests, create_pr, extract_dependency_name, update_pr,
    EligibilityFilter, GitHubHost, NewPullRequest, PrStatus, PullRequestHost, PullRequestInfo,
    PullRequestRefresh,
};
use crate::summary::{RunSummary, UpdateResult};
use crate::templates::TemplateRenderer;
use std::collections::HashSet;
use tracing::{debug, info, info_span, warn, Instrument};

/// Outcome of checking a single dependency.
enum Prepared {
    /// The dependency can't move without unlocking other requirements.
    Blocked,
    /// Updated declarations and the files they produce, sorted by path.
    Ready {
        dependencies: Vec<Dependency>,
        files: Vec<DependencyFile>,
    },
}

/// An open pull request paired with the dependency it bumps.
struct Candidate<'a> {
    pull_request: PullRequestInfo,
    dependency: &'a Dependency,
}

/// Runs dependency updates against one repository.
pub struct Runner<H: PullRequestHost = GitHubHost> {
    config: RunnerConfig,
    context: RequestContext,
    ecosystem: Ecosystem,
    host: H,
    renderer: TemplateRenderer,
}

impl Runner<GitHubHost> {
    /// Builds a runner talking to GitHub.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if no ecosystem serves the configured package
    /// manager or the GitHub client can't be built.
    pub fn new(
        config: RunnerConfig,
        context: RequestContext,
        registry: &EcosystemRegistry,
    ) -> Result<Self, RunnerError> {
        let host = GitHubHost::new(&context)?;
        Self::with_host(config, context, registry, host)
    }
}

impl<H: PullRequestHost> Runner<H> {
    /// Builds a runner on top of an arbitrary pull request host.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Ecosystem`] if no ecosystem serves the
    /// configured package manager.
    pub fn with_host(
        config: RunnerConfig,
        context: RequestContext,
        registry: &EcosystemRegistry,
        host: H,
    ) -> Result<Self, RunnerError> {
        let ecosystem = registry.get(config.package_manager())?.clone();
        Ok(Self {
            config,
            context,
            ecosystem,
            host,
            renderer: TemplateRenderer::new(),
        })
    }

    /// Refreshes open automation pull requests for the `outdated` dependencies.
    ///
    /// Candidate updates are always computed. They are only pushed when
    /// `force_pr_update` is enabled; otherwise each is recorded as previewed.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if fetching, parsing or listing fails, an
    /// automation pull request has an unrecognised title, or a selected
    /// dependency isn't declared in the fetched files.
    pub async fn update_existing(&self, outdated: &[String]) -> Result<RunSummary, RunnerError> {
        let dry_run = !self.config.force_pr_update();
        let mut summary = RunSummary::new(dry_run);
        if dry_run {
            info!("Pull request updates disabled, computing changes only");
        }

        let (fetched, dependencies) = self.load_dependencies().await?;

        let tracked_branch = match self.config.tracked_branch() {
            Some(branch) => branch.to_string(),
            None => self.host.default_branch().await?,
        };
        let filter = EligibilityFilter {
            automation_label: self.config.automation_label(),
            base_commit: &fetched.commit,
            tracked_branch: &tracked_branch,
        };

        let eligible = collect_eligible_pull_requests(&self.host, &filter).await?;
        summary.eligible_pull_requests = eligible.len();

        let candidates = select_candidates(eligible, outdated, &dependencies)?;
        summary.candidates = candidates.len();
        info!(
            eligible = summary.eligible_pull_requests,
            candidates = summary.candidates,
            tracked_branch = %tracked_branch,
            "Selected pull requests to refresh"
        );

        for candidate in &candidates {
            let span = info_span!(
                "refresh",
                dependency = %candidate.dependency.name,
                number = candidate.pull_request.number
            );
            let result = self
                .refresh(candidate, &fetched, dry_run)
                .instrument(span)
                .await?;
            summary.record_result(result);
        }

        Ok(summary)
    }

    /// Opens a new pull request updating the dependency called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::DependencyNotFound`] if `name` isn't declared,
    /// [`RunnerError::CannotUpdate`] if it can't move without unlocking other
    /// requirements, and other [`RunnerError`] variants if any step fails.
    pub async fn update_named(&self, name: &str) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(false);
        let (fetched, dependencies) = self.load_dependencies().await?;

        let dependency = dependencies
            .iter()
            .find(|dependency| dependency.name == name)
            .ok_or_else(|| RunnerError::DependencyNotFound {
                name: name.to_string(),
            })?;
        summary.candidates = 1;

        let span = info_span!("create", dependency = %name);
        let status = self
            .create(dependency, &fetched)
            .instrument(span)
            .await?;

        summary.record_result(UpdateResult::Applied {
            dependency: name.to_string(),
            status,
        });
        Ok(summary)
    }

    async fn refresh(
        &self,
        candidate: &Candidate<'_>,
        fetched: &FetchedFiles,
        dry_run: bool,
    ) -> Result<UpdateResult, RunnerError> {
        let dependency = candidate.dependency.name.clone();
        let number = candidate.pull_request.number;

        let files = match self.prepare_update(candidate.dependency, &fetched.files).await? {
            Prepared::Blocked => {
                warn!("Can not update the package deps without unlocking");
                return Ok(UpdateResult::Skipped {
                    dependency,
                    reason: "requires unlocking other requirements".to_string(),
                });
            }
            Prepared::Ready { files, .. } => files,
        };

        if dry_run {
            info!(files = files.len(), "Would update pull request");
            return Ok(UpdateResult::Previewed {
                dependency,
                number,
                files: files.len(),
            });
        }

        let status = update_pr(
            &self.host,
            &PullRequestRefresh {
                number,
                base_commit: &fetched.commit,
                files: &files,
            },
        )
        .await?;
        Ok(UpdateResult::Applied { dependency, status })
    }

    async fn create(
        &self,
        dependency: &Dependency,
        fetched: &FetchedFiles,
    ) -> Result<PrStatus, RunnerError> {
        let (updated, files) = match self.prepare_update(dependency, &fetched.files).await? {
            Prepared::Blocked => {
                return Err(RunnerError::CannotUpdate {
                    name: dependency.name.clone(),
                })
            }
            Prepared::Ready {
                dependencies,
                files,
            } => (dependencies, files),
        };

        let source = self.context.source();
        let message = self.renderer.render_message(
            self.config.formats(),
            &updated,
            self.config.package_manager().as_str(),
            source.directory(),
        )?;

        let base_branch = match source.branch() {
            Some(branch) => branch.to_string(),
            None => self.host.default_branch().await?,
        };

        let status = create_pr(
            &self.host,
            &NewPullRequest {
                base_branch: &base_branch,
                base_commit: &fetched.commit,
                files: &files,
                message: &message,
            },
        )
        .await?;
        Ok(status)
    }

    async fn load_dependencies(&self) -> Result<(FetchedFiles, Vec<Dependency>), RunnerError> {
        let source = self.context.source();
        info!(
            repo = %source.repo(),
            directory = %source.directory(),
            package_manager = %self.config.package_manager(),
            "Fetching dependency files"
        );

        let fetched = self
            .ecosystem
            .fetcher
            .fetch_files(&self.context, source.branch())
            .await?;
        let dependencies = self
            .ecosystem
            .parser
            .parse(&fetched.files, &self.context)
            .await?;

        info!(
            files = fetched.files.len(),
            dependencies = dependencies.len(),
            commit = %fetched.commit,
            "Parsed dependency files"
        );
        Ok((fetched, dependencies))
    }

    /// Checks `dependency` and computes the files its update would change.
    async fn prepare_update(
        &self,
        dependency: &Dependency,
        files: &[DependencyFile],
    ) -> Result<Prepared, RunnerError> {
        let credentials = self.context.credentials();
        let checker = &self.ecosystem.checker;

        // Logged only, a current dependency can still sit on a stale base
        let up_to_date = checker.up_to_date(dependency, files, credentials).await?;
        debug!(up_to_date, "Checked dependency");

        if !checker
            .can_update(dependency, files, credentials, RequirementsToUnlock::Own)
            .await?
        {
            return Ok(Prepared::Blocked);
        }

        let dependencies = checker
            .updated_dependencies(dependency, files, credentials, RequirementsToUnlock::Own)
            .await?;
        let mut updated_files = self
            .ecosystem
            .updater
            .updated_files(&dependencies, files, credentials)
            .await?;
        updated_files.sort_by_key(DependencyFile::path);

        Ok(Prepared::Ready {
            dependencies,
            files: updated_files,
        })
    }
}

/// Pairs eligible pull requests with outdated dependencies.
///
/// Titles are matched case-insensitively against `outdated`, then the name
/// must match a parsed dependency exactly.
fn select_candidates<'a>(
    eligible: Vec<PullRequestInfo>,
    outdated: &[String],
    dependencies: &'a [Dependency],
) -> Result<Vec<Candidate<'a>>, RunnerError> {
    let outdated: HashSet<String> = outdated.iter().map(|name| name.to_lowercase()).collect();
    let mut candidates = Vec::new();

    for pull_request in eligible {
        let name = extract_dependency_name(&pull_request)?;
        if !outdated.contains(&name.to_lowercase()) {
            debug!(number = pull_request.number, name, "Dependency not outdated");
            continue;
        }

        let dependency = dependencies
            .iter()
            .find(|dependency| dependency.name == name)
            .ok_or_else(|| RunnerError::DependencyNotFound {
                name: name.to_string(),
            })?;

        candidates.push(Candidate {
            pull_request,
            dependency,
        });
    }

    Ok(candidates)
}
