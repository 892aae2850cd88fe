//! Settings loading.
//!
//! A run is described by a single `bumpbot.toml` naming the repository, the
//! package manager, credentials, and the helper executables serving each
//! package manager.

mod error;
mod pull_request;
mod settings;

pub use error::ConfigError;
pub use pull_request::{
    default_body_format, default_branch_name_format, default_commit_title_format,
    default_title_format, PullRequestFormats,
};
pub use settings::{CredentialSettings, HelperSettings, Settings};

use std::path::Path;
use tracing::info;

/// Default settings file name, looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "bumpbot.toml";

/// Loads settings from `path`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file doesn't exist, can't be parsed, or fails validation.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let settings = Settings::load(path)?;
    info!(
        repo = %settings.repo,
        package_manager = %settings.package_manager,
        directory = %settings.directory,
        "Loaded settings"
    );
    Ok(settings)
}
