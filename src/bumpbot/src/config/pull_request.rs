//! Formats used when opening new pull requests.

use serde::Deserialize;

/// Handlebars formats for the title, body, branch and commit of a new pull request.
///
/// Available variables: `name`, `version`, `previous_version`, `package_manager`,
/// `directory`, `dependencies` (list of `{name, version, previous_version}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PullRequestFormats {
    #[serde(default = "default_title_format")]
    pub title_format: String,

    #[serde(default = "default_branch_name_format")]
    pub branch_name_format: String,

    #[serde(default = "default_commit_title_format")]
    pub commit_title_format: String,

    #[serde(default = "default_body_format")]
    pub body_format: String,
}

impl Default for PullRequestFormats {
    fn default() -> Self {
        Self {
            title_format: default_title_format(),
            branch_name_format: default_branch_name_format(),
            commit_title_format: default_commit_title_format(),
            body_format: default_body_format(),
        }
    }
}

/// The default title. Existing pull requests are matched against this shape.
pub fn default_title_format() -> String {
    "Bump {{name}} from {{previous_version}} to {{version}}".to_string()
}

pub fn default_branch_name_format() -> String {
    "dependabot/{{package_manager}}/{{name}}-{{version}}".to_string()
}

pub fn default_commit_title_format() -> String {
    "Bump {{name}} from {{previous_version}} to {{version}}".to_string()
}

pub fn default_body_format() -> String {
    "Bumps {{name}} from {{previous_version}} to {{version}}.\n\
     {{#each dependencies}}\n- `{{name}}`: {{previous_version}} -> {{version}}{{/each}}\n"
        .to_string()
}
