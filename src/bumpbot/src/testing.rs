//! In-memory host and ecosystem used by unit tests.

use crate::context::{Credential, RequestContext};
use crate::ecosystem::{
    Dependency, DependencyFile, EcosystemError, FetchedFiles, FileFetcher, FileParser,
    FileUpdater, RequirementsToUnlock, UpdateChecker,
};
use crate::pull_requests::{
    NewPullRequest, PrError, PrStatus, PullRequestHost, PullRequestInfo, PullRequestPage,
    PullRequestRefresh,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub(crate) const BASE_COMMIT: &str = "abc123";

/// An open automation pull request for `name` based on `base_sha` of `main`.
pub(crate) fn automation_pr(number: u64, name: &str, base_sha: &str) -> PullRequestInfo {
    PullRequestInfo {
        number,
        title: format!("Bump {name} from 1.0.0 to 2.0.0"),
        head_label: format!("acme:dependabot/bundler/{name}-2.0.0"),
        head_ref: format!("dependabot/bundler/{name}-2.0.0"),
        base_sha: base_sha.to_string(),
        base_ref: "main".to_string(),
        html_url: format!("https://github.com/acme/app/pull/{number}"),
    }
}

/// Serves fixed pages and records every request.
pub(crate) struct FakeHost {
    pages: Vec<Vec<PullRequestInfo>>,
    fail_on_page: Option<usize>,
    page_requests: AtomicUsize,
    created: Mutex<Vec<String>>,
    updated: Mutex<Vec<u64>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::with_pages(vec![vec![]])
    }
}

impl FakeHost {
    pub(crate) fn with_pages(pages: Vec<Vec<PullRequestInfo>>) -> Self {
        Self {
            pages,
            fail_on_page: None,
            page_requests: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
        }
    }

    /// Makes the request for 1-based `page` fail.
    pub(crate) fn failing_on_page(mut self, page: usize) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    pub(crate) fn page_requests(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }

    pub(crate) fn created_branches(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub(crate) fn updated_numbers(&self) -> Vec<u64> {
        self.updated.lock().unwrap().clone()
    }

    pub(crate) fn mutations(&self) -> usize {
        self.created.lock().unwrap().len() + self.updated.lock().unwrap().len()
    }

    fn page(&self, index: usize) -> Result<PullRequestPage<usize>, PrError> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_page == Some(index + 1) {
            return Err(PrError::UnexpectedResponse {
                message: format!("page {} unavailable", index + 1),
            });
        }
        Ok(PullRequestPage {
            items: self.pages.get(index).cloned().unwrap_or_default(),
            next: (index + 1 < self.pages.len()).then_some(index + 1),
        })
    }
}

#[async_trait]
impl PullRequestHost for FakeHost {
    type Cursor = usize;

    async fn default_branch(&self) -> Result<String, PrError> {
        Ok("main".to_string())
    }

    async fn first_open_page(&self) -> Result<PullRequestPage<usize>, PrError> {
        self.page(0)
    }

    async fn next_open_page(&self, cursor: &usize) -> Result<PullRequestPage<usize>, PrError> {
        self.page(*cursor)
    }

    async fn create_pull_request(
        &self,
        request: &NewPullRequest<'_>,
    ) -> Result<PrStatus, PrError> {
        let mut created = self.created.lock().unwrap();
        created.push(request.message.branch_name.clone());
        let number = 100 + created.len() as u64;
        Ok(PrStatus::Created {
            number,
            url: format!("https://github.com/acme/app/pull/{number}"),
        })
    }

    async fn update_pull_request(
        &self,
        request: &PullRequestRefresh<'_>,
    ) -> Result<PrStatus, PrError> {
        self.updated.lock().unwrap().push(request.number);
        Ok(PrStatus::Updated {
            number: request.number,
            url: format!("https://github.com/acme/app/pull/{}", request.number),
        })
    }
}

/// A bundler-like ecosystem over a `Gemfile.lock` with `name (version)` lines.
/// Every update moves a dependency to 2.0.0.
pub(crate) struct FakeEcosystem {
    dependencies: Vec<Dependency>,
    blocked: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeEcosystem {
    pub(crate) fn new(names: &[&str]) -> Self {
        Self {
            dependencies: names.iter().map(|name| dependency(name, "1.0.0")).collect(),
            blocked: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Makes `can_update` answer false for `name`.
    pub(crate) fn blocking(mut self, name: &str) -> Self {
        self.blocked.insert(name.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn lockfile(&self) -> String {
        self.dependencies
            .iter()
            .map(|d| format!("{} ({})\n", d.name, d.version.as_deref().unwrap_or("")))
            .collect()
    }
}

pub(crate) fn dependency(name: &str, version: &str) -> Dependency {
    Dependency {
        name: name.to_string(),
        version: Some(version.to_string()),
        requirements: vec![],
        previous_version: None,
        previous_requirements: None,
        package_manager: "bundler".to_string(),
    }
}

#[async_trait]
impl FileFetcher for FakeEcosystem {
    async fn fetch_files(
        &self,
        _context: &RequestContext,
        _target_branch: Option<&str>,
    ) -> Result<FetchedFiles, EcosystemError> {
        self.record("fetch_files".to_string());
        Ok(FetchedFiles {
            files: vec![
                DependencyFile::new("Gemfile.lock", "/", &self.lockfile()),
                DependencyFile::new("Gemfile", "/", "source 'https://rubygems.org'\n"),
            ],
            commit: BASE_COMMIT.to_string(),
        })
    }
}

#[async_trait]
impl FileParser for FakeEcosystem {
    async fn parse(
        &self,
        _files: &[DependencyFile],
        _context: &RequestContext,
    ) -> Result<Vec<Dependency>, EcosystemError> {
        self.record("parse".to_string());
        Ok(self.dependencies.clone())
    }
}

#[async_trait]
impl UpdateChecker for FakeEcosystem {
    async fn up_to_date(
        &self,
        dependency: &Dependency,
        _files: &[DependencyFile],
        _credentials: &[Credential],
    ) -> Result<bool, EcosystemError> {
        self.record(format!("up_to_date:{}", dependency.name));
        Ok(false)
    }

    async fn can_update(
        &self,
        dependency: &Dependency,
        _files: &[DependencyFile],
        _credentials: &[Credential],
        unlock: RequirementsToUnlock,
    ) -> Result<bool, EcosystemError> {
        self.record(format!("can_update:{}:{unlock:?}", dependency.name));
        Ok(!self.blocked.contains(&dependency.name))
    }

    async fn updated_dependencies(
        &self,
        dependency: &Dependency,
        _files: &[DependencyFile],
        _credentials: &[Credential],
        _unlock: RequirementsToUnlock,
    ) -> Result<Vec<Dependency>, EcosystemError> {
        self.record(format!("updated_dependencies:{}", dependency.name));
        let mut updated = dependency.clone();
        updated.previous_version = dependency.version.clone();
        updated.version = Some("2.0.0".to_string());
        Ok(vec![updated])
    }
}

#[async_trait]
impl FileUpdater for FakeEcosystem {
    async fn updated_files(
        &self,
        dependencies: &[Dependency],
        files: &[DependencyFile],
        _credentials: &[Credential],
    ) -> Result<Vec<DependencyFile>, EcosystemError> {
        self.record("updated_files".to_string());
        let updated = files
            .iter()
            .filter_map(|file| {
                let mut content = file.content.clone();
                for dependency in dependencies {
                    content = content.replace(
                        &format!(
                            "{} ({})",
                            dependency.name,
                            dependency.previous_version.as_deref().unwrap_or("")
                        ),
                        &format!(
                            "{} ({})",
                            dependency.name,
                            dependency.version.as_deref().unwrap_or("")
                        ),
                    );
                }
                (content != file.content).then(|| DependencyFile {
                    content,
                    ..file.clone()
                })
            })
            .collect();
        Ok(updated)
    }
}
