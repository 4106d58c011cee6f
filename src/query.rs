use tracing::{debug, info};

use crate::{
    aggregate::fetch_aggregates,
    classify::{assign_sections, process_pull_request},
    config::Config,
    error::TriageError,
    github::Forge,
    search::{build_search_query, search_pull_requests},
    types::{ProcessedPullRequest, Section},
};

/// Searches, enriches and classifies the caller's and team's open PRs.
///
/// Returns no sections at all when the search matched nothing. Otherwise
/// returns the five sections in their fixed order. Any fetch failure fails
/// the whole run.
pub async fn triage<F>(forge: &F, config: &Config) -> Result<Vec<Section>, TriageError>
where
    F: Forge + ?Sized,
{
    let query = build_search_query(config);
    debug!(%query, "Searching pull requests");

    let references = search_pull_requests(forge, &query)
        .await
        .map_err(TriageError::Search)?;

    if references.is_empty() {
        info!("No pull requests matched");
        return Ok(Vec::new());
    }

    let aggregates = fetch_aggregates(forge, &references).await?;

    let processed: Vec<ProcessedPullRequest> =
        aggregates.into_iter().map(process_pull_request).collect();

    Ok(assign_sections(&processed, &config.my_github_user))
}
