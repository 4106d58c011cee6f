//! Concurrent enrichment of search results into aggregate pull requests.

use futures::{future::try_join_all, try_join};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::{EnrichError, ResourceKind},
    github::{Forge, fetch},
    types::{
        AggregatePullRequest, CheckRunsResponse, Comment, Commit, PullRequestDetail,
        PullRequestRef, Review,
    },
};

/// Fetches a PR's detail and then, concurrently, its comments, commits,
/// reviews and check runs. The aggregate is only built once all succeeded.
pub async fn fetch_aggregate<F>(
    forge: &F,
    reference: &PullRequestRef,
) -> Result<AggregatePullRequest, EnrichError>
where
    F: Forge + ?Sized,
{
    let detail: PullRequestDetail =
        fetch_resource(forge, reference, ResourceKind::Detail, reference.as_str()).await?;

    let reviews_url = format!("{}/reviews", detail.links.self_link.href);
    let check_runs_path = check_runs_path(&detail);

    let (comments, commits, reviews, check_runs) = try_join!(
        fetch_resource::<Vec<Comment>, _>(
            forge,
            reference,
            ResourceKind::Comments,
            &detail.comments_url
        ),
        fetch_resource::<Vec<Commit>, _>(
            forge,
            reference,
            ResourceKind::Commits,
            &detail.commits_url
        ),
        fetch_resource::<Vec<Review>, _>(forge, reference, ResourceKind::Reviews, &reviews_url),
        fetch_resource::<CheckRunsResponse, _>(
            forge,
            reference,
            ResourceKind::CheckRuns,
            &check_runs_path
        ),
    )?;

    debug!(
        pr = %reference,
        comments = comments.len(),
        commits = commits.len(),
        reviews = reviews.len(),
        check_runs = check_runs.check_runs.len(),
        "Fetched pull request"
    );

    Ok(AggregatePullRequest {
        detail,
        comments,
        commits,
        reviews,
        check_runs: check_runs.check_runs,
    })
}

/// Enriches every reference concurrently.
///
/// Results are in the order of `references`, whatever order the fetches
/// finish in. The first failure aborts the whole batch: fetches still in
/// flight are dropped and no partial result is returned.
pub async fn fetch_aggregates<F>(
    forge: &F,
    references: &[PullRequestRef],
) -> Result<Vec<AggregatePullRequest>, EnrichError>
where
    F: Forge + ?Sized,
{
    debug!(count = references.len(), "Fetching pull request details");
    try_join_all(
        references
            .iter()
            .map(|reference| fetch_aggregate(forge, reference)),
    )
    .await
}

/// Check runs of the PR's head branch. Each ref segment is percent-encoded so
/// that `#`, `%` and `?` in branch names stay part of the path.
fn check_runs_path(detail: &PullRequestDetail) -> String {
    let head_ref = detail
        .head
        .ref_name
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!(
        "repos/{}/commits/{head_ref}/check-runs",
        detail.base.repo.full_name
    )
}

async fn fetch_resource<T, F>(
    forge: &F,
    reference: &PullRequestRef,
    resource: ResourceKind,
    url: &str,
) -> Result<T, EnrichError>
where
    T: DeserializeOwned,
    F: Forge + ?Sized,
{
    fetch(forge, url, &[]).await.map_err(|source| EnrichError {
        reference: reference.to_string(),
        resource,
        source,
    })
}
