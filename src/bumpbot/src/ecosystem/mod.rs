//! Pluggable fetch, parse, check and update capabilities.
//!
//! Resolving versions and rewriting manifests is ecosystem specific and lives
//! outside this crate. Each package manager is served by an [`Ecosystem`]: four
//! capability objects looked up in an [`EcosystemRegistry`] by
//! [`PackageManager`]. The shipped binary backs every capability with a
//! [`HelperProcess`].

mod error;
mod helper;
mod package_manager;
mod registry;
mod types;

pub use error::EcosystemError;
pub use helper::HelperProcess;
pub use package_manager::PackageManager;
pub use registry::EcosystemRegistry;
pub use types::{Dependency, DependencyFile, FetchedFiles, Requirement, RequirementsToUnlock};

use crate::context::{Credential, RequestContext};
use async_trait::async_trait;
use std::sync::Arc;

/// Retrieves the dependency files of a repository.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Fetches the manifest files and the commit they were read at.
    /// `target_branch` of `None` means the default branch.
    async fn fetch_files(
        &self,
        context: &RequestContext,
        target_branch: Option<&str>,
    ) -> Result<FetchedFiles, EcosystemError>;
}

/// Turns dependency files into declared dependencies.
#[async_trait]
pub trait FileParser: Send + Sync {
    async fn parse(
        &self,
        files: &[DependencyFile],
        context: &RequestContext,
    ) -> Result<Vec<Dependency>, EcosystemError>;
}

/// Decides whether, and how, a single dependency can be updated.
#[async_trait]
pub trait UpdateChecker: Send + Sync {
    async fn up_to_date(
        &self,
        dependency: &Dependency,
        files: &[DependencyFile],
        credentials: &[Credential],
    ) -> Result<bool, EcosystemError>;

    async fn can_update(
        &self,
        dependency: &Dependency,
        files: &[DependencyFile],
        credentials: &[Credential],
        unlock: RequirementsToUnlock,
    ) -> Result<bool, EcosystemError>;

    /// The minimal set of dependency declarations to change, target first.
    async fn updated_dependencies(
        &self,
        dependency: &Dependency,
        files: &[DependencyFile],
        credentials: &[Credential],
        unlock: RequirementsToUnlock,
    ) -> Result<Vec<Dependency>, EcosystemError>;
}

/// Writes updated dependency declarations back into file contents.
#[async_trait]
pub trait FileUpdater: Send + Sync {
    /// Returns only the files whose contents changed.
    async fn updated_files(
        &self,
        dependencies: &[Dependency],
        files: &[DependencyFile],
        credentials: &[Credential],
    ) -> Result<Vec<DependencyFile>, EcosystemError>;
}

/// The four capabilities serving one package manager.
#[derive(Clone)]
pub struct Ecosystem {
    pub fetcher: Arc<dyn FileFetcher>,
    pub parser: Arc<dyn FileParser>,
    pub checker: Arc<dyn UpdateChecker>,
    pub updater: Arc<dyn FileUpdater>,
}

impl Ecosystem {
    /// Uses one implementation for all four capabilities.
    pub fn from_single<T>(implementation: T) -> Self
    where
        T: FileFetcher + FileParser + UpdateChecker + FileUpdater + 'static,
    {
        Self::from_shared(Arc::new(implementation))
    }

    /// Like [`from_single`](Self::from_single) for an already shared implementation.
    pub fn from_shared<T>(shared: Arc<T>) -> Self
    where
        T: FileFetcher + FileParser + UpdateChecker + FileUpdater + 'static,
    {
        Self {
            fetcher: shared.clone(),
            parser: shared.clone(),
            checker: shared.clone(),
            updater: shared,
        }
    }
}

impl std::fmt::Debug for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ecosystem").finish_non_exhaustive()
    }
}
