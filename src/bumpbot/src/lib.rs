#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod context;
pub mod ecosystem;
pub mod pull_requests;
pub mod rate_limit;
pub mod runner;
pub mod summary;
pub mod templates;

#[cfg(test)]
mod testing;

pub use config::{load_settings, ConfigError, PullRequestFormats, Settings, DEFAULT_SETTINGS_FILE};
pub use context::{Credential, Provider, RequestContext, Source};
pub use ecosystem::{
    Dependency, DependencyFile, Ecosystem, EcosystemError, EcosystemRegistry, FetchedFiles,
    FileFetcher, FileParser, FileUpdater, HelperProcess, PackageManager, RequirementsToUnlock,
    UpdateChecker,
};
pub use pull_requests::{
    collect_eligible_pull_requests, create_pr, extract_dependency_name, update_pr,
    EligibilityFilter, GitHubHost, PrError, PrStatus, PullRequestHost, PullRequestInfo,
};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{RunSummary, UpdateResult};
pub use templates::{PullRequestMessage, TemplateError, TemplateRenderer};
