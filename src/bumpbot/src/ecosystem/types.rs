//! Values exchanged with ecosystem helpers.

use serde::{Deserialize, Serialize};

/// A dependency manifest or lockfile. Opaque apart from its path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyFile {
    /// File name, possibly with subdirectories, relative to `directory`.
    pub name: String,

    #[serde(default)]
    pub content: String,

    /// Repository directory the file lives in (e.g. "/").
    #[serde(default = "root_directory")]
    pub directory: String,

    /// Whether the update removes this file.
    #[serde(default)]
    pub deleted: bool,
}

fn root_directory() -> String {
    "/".to_string()
}

impl DependencyFile {
    pub fn new(name: &str, directory: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_string(),
            directory: directory.to_string(),
            deleted: false,
        }
    }

    /// Repository-relative path, without a leading slash.
    pub fn path(&self) -> String {
        let directory = self.directory.trim_matches('/');
        let name = self.name.trim_start_matches('/');
        if directory.is_empty() {
            name.to_string()
        } else {
            format!("{directory}/{name}")
        }
    }
}

/// One declared requirement of a dependency in a specific file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub file: String,
    pub requirement: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub source: Option<serde_json::Value>,
}

/// A dependency as reported by a parser or update checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,

    /// Resolved version, when the ecosystem has one (lockfile based).
    pub version: Option<String>,

    #[serde(default)]
    pub requirements: Vec<Requirement>,

    /// Version before the update. Only set on updated dependencies.
    #[serde(default)]
    pub previous_version: Option<String>,

    #[serde(default)]
    pub previous_requirements: Option<Vec<Requirement>>,

    pub package_manager: String,
}

impl Dependency {
    /// Version if known, else the first declared requirement.
    pub fn display_version(&self) -> Option<&str> {
        self.version.as_deref().or_else(|| {
            self.requirements
                .iter()
                .find_map(|r| r.requirement.as_deref())
        })
    }

    /// Previous version if known, else the first previous requirement.
    pub fn display_previous_version(&self) -> Option<&str> {
        self.previous_version.as_deref().or_else(|| {
            self.previous_requirements
                .iter()
                .flatten()
                .find_map(|r| r.requirement.as_deref())
        })
    }
}

/// Files fetched from the repository and the commit they were read at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedFiles {
    pub files: Vec<DependencyFile>,
    /// Base commit for staleness checks and new commits.
    pub commit: String,
}

/// Which requirements an update checker may loosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementsToUnlock {
    /// Only lockfile versions may change.
    None,
    /// The target dependency's own requirement may change.
    Own,
    /// Requirements of other dependencies may change too.
    All,
}
