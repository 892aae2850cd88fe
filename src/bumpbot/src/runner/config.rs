//! Runner configuration.

use crate::config::{PullRequestFormats, Settings};
use crate::ecosystem::PackageManager;

/// Configuration for a run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Package manager whose ecosystem serves the run.
    package_manager: PackageManager,
    /// Head label substring marking automation pull requests.
    automation_label: String,
    /// Branch pull requests should target; `None` means the default branch.
    tracked_branch: Option<String>,
    /// Formats for new pull requests.
    formats: PullRequestFormats,
    /// Whether existing pull requests are actually updated.
    force_pr_update: bool,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(package_manager: PackageManager, automation_label: &str) -> Self {
        Self {
            package_manager,
            automation_label: automation_label.to_string(),
            tracked_branch: None,
            formats: PullRequestFormats::default(),
            force_pr_update: false,
        }
    }

    /// Creates a configuration from loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            PackageManager::from(settings.package_manager.as_str()),
            &settings.automation_label,
        )
        .with_tracked_branch(settings.tracked_branch.clone())
        .with_formats(settings.pull_request.clone())
    }

    /// Sets the branch existing pull requests must target to count as current.
    pub fn with_tracked_branch(mut self, tracked_branch: Option<String>) -> Self {
        self.tracked_branch = tracked_branch;
        self
    }

    /// Sets the formats for new pull requests.
    pub fn with_formats(mut self, formats: PullRequestFormats) -> Self {
        self.formats = formats;
        self
    }

    /// Enables writes when refreshing existing pull requests.
    pub fn with_force_pr_update(mut self, force_pr_update: bool) -> Self {
        self.force_pr_update = force_pr_update;
        self
    }

    /// Returns the package manager.
    pub fn package_manager(&self) -> &PackageManager {
        &self.package_manager
    }

    /// Returns the automation head label substring.
    pub fn automation_label(&self) -> &str {
        &self.automation_label
    }

    /// Returns the tracked branch, if pinned.
    pub fn tracked_branch(&self) -> Option<&str> {
        self.tracked_branch.as_deref()
    }

    /// Returns the pull request formats.
    pub fn formats(&self) -> &PullRequestFormats {
        &self.formats
    }

    /// Returns whether existing pull requests are written to.
    pub fn force_pr_update(&self) -> bool {
        self.force_pr_update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_settings() {
        let settings = Settings::parse(
            r#"
repo = "zooniverse/Ouroboros"
package-manager = "bundler"
automation-label = "zooniverse:dependabot"
tracked-branch = "master"
"#,
            "inline",
        )
        .unwrap();

        let config = RunnerConfig::from_settings(&settings);

        assert_eq!(config.package_manager(), &PackageManager::Bundler);
        assert_eq!(config.automation_label(), "zooniverse:dependabot");
        assert_eq!(config.tracked_branch(), Some("master"));
        // Writes stay off until explicitly enabled
        assert!(!config.force_pr_update());
        assert!(config.with_force_pr_update(true).force_pr_update());
    }
}
