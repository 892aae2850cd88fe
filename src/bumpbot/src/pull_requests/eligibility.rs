//! Deciding which open pull requests need refreshing.

use super::{PrError, PullRequestInfo};
use regex::Regex;
use std::sync::LazyLock;

/// Titles opened by the automation: "Bump <name> from <old> to <new>".
static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\ABump\s(.+)\sfrom").expect("title pattern is valid"));

/// Selects automation pull requests that are stale or target another branch.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityFilter<'a> {
    /// Substring of the head label identifying the automation.
    pub automation_label: &'a str,
    /// Commit the dependency files were fetched at.
    pub base_commit: &'a str,
    /// Branch pull requests are expected to target.
    pub tracked_branch: &'a str,
}

impl EligibilityFilter<'_> {
    /// True iff `pr` comes from the automation and is not already based on
    /// `base_commit` of `tracked_branch`.
    #[must_use]
    pub fn is_eligible(&self, pr: &PullRequestInfo) -> bool {
        let from_automation = pr.head_label.contains(self.automation_label);
        let up_to_date = pr.base_sha == self.base_commit && pr.base_ref == self.tracked_branch;
        from_automation && !up_to_date
    }
}

/// Extracts the dependency name from an automation pull request title.
///
/// # Errors
///
/// Returns [`PrError::UnrecognisedTitle`] if the title doesn't follow the
/// "Bump <name> from" convention.
pub fn extract_dependency_name(pr: &PullRequestInfo) -> Result<&str, PrError> {
    TITLE_PATTERN
        .captures(&pr.title)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str())
        .ok_or_else(|| PrError::UnrecognisedTitle {
            number: pr.number,
            title: pr.title.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "4f2c9a1";

    fn pr(title: &str, label: &str, base_sha: &str, base_ref: &str) -> PullRequestInfo {
        PullRequestInfo {
            number: 12,
            title: title.to_string(),
            head_label: label.to_string(),
            head_ref: "dependabot/bundler/rack-ssl-1.4.0".to_string(),
            base_sha: base_sha.to_string(),
            base_ref: base_ref.to_string(),
            html_url: "https://github.com/zooniverse/Ouroboros/pull/12".to_string(),
        }
    }

    fn filter() -> EligibilityFilter<'static> {
        EligibilityFilter {
            automation_label: "zooniverse:dependabot",
            base_commit: BASE,
            tracked_branch: "master",
        }
    }

    #[test]
    fn current_automation_pr_is_not_eligible() {
        let current = pr("Bump rack", "zooniverse:dependabot/bundler/rack", BASE, "master");
        assert!(!filter().is_eligible(&current));
    }

    #[test]
    fn stale_automation_pr_is_eligible() {
        let stale = pr("Bump rack", "zooniverse:dependabot/bundler/rack", "0ld", "master");
        assert!(filter().is_eligible(&stale));
    }

    #[test]
    fn automation_pr_on_other_branch_is_eligible() {
        let off_branch = pr("Bump rack", "zooniverse:dependabot/bundler/rack", BASE, "develop");
        assert!(filter().is_eligible(&off_branch));
    }

    #[test]
    fn human_pr_is_never_eligible() {
        let human = pr("Bump rack", "someone:feature", "0ld", "develop");
        assert!(!filter().is_eligible(&human));
    }

    #[test]
    fn extracts_name_from_title() {
        let bump = pr("Bump rack-ssl from 1.3.2 to 1.4.0", "", BASE, "master");
        assert_eq!(extract_dependency_name(&bump).unwrap(), "rack-ssl");
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let bump = pr("bump Nokogiri FROM 1.15.0 to 1.16.0", "", BASE, "master");
        assert_eq!(extract_dependency_name(&bump).unwrap(), "Nokogiri");
    }

    #[test]
    fn unexpected_title_is_an_error() {
        let other = pr("Update rack-ssl to 1.4.0", "", BASE, "master");
        assert!(matches!(
            extract_dependency_name(&other),
            Err(PrError::UnrecognisedTitle { number: 12, .. })
        ));
    }

    #[test]
    fn title_must_start_with_bump() {
        let prefixed = pr("[security] Bump rack from 1 to 2", "", BASE, "master");
        assert!(extract_dependency_name(&prefixed).is_err());
    }
}
