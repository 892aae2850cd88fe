//! Walking every page of open pull requests.

use super::{EligibilityFilter, PrError, PullRequestHost, PullRequestInfo};
use tracing::{debug, info};

/// Collects eligible open pull requests across all pages.
///
/// Page one is requested first; each further page is requested only when the
/// previous page carried a next cursor, so K pages cost exactly K requests.
/// Any request failure aborts the walk.
///
/// # Errors
///
/// Returns [`PrError`] if any page request fails.
pub async fn collect_eligible_pull_requests<H: PullRequestHost>(
    host: &H,
    filter: &EligibilityFilter<'_>,
) -> Result<Vec<PullRequestInfo>, PrError> {
    let mut eligible = Vec::new();
    let mut pages = 1usize;
    let mut page = host.first_open_page().await?;

    loop {
        let total = page.items.len();
        eligible.extend(page.items.into_iter().filter(|pr| filter.is_eligible(pr)));
        debug!(page = pages, total, eligible = eligible.len(), "Scanned page");

        let Some(cursor) = page.next else {
            break;
        };
        page = host.next_open_page(&cursor).await?;
        pages += 1;
    }

    info!(pages, count = eligible.len(), "Collected eligible pull requests");
    Ok(eligible)
}
