use tracing::{debug, info};

use crate::{
    config::Config,
    error::FetchError,
    github::{Forge, fetch},
    types::{PullRequestRef, SearchIssuesResult},
};

/// Number of search results requested. No further pages are fetched.
pub const PER_PAGE: usize = 10;

const SEARCH_ENDPOINT: &str = "search/issues";

#[derive(Debug, Default)]
pub struct SearchQueryBuilder {
    terms: Vec<String>,
}

impl SearchQueryBuilder {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn pr_type(&mut self) -> &mut Self {
        self.terms.push("is:pr".to_string());
        self
    }

    pub fn open(&mut self) -> &mut Self {
        self.terms.push("is:open".to_string());
        self
    }

    pub fn org(&mut self, organization: &str) -> &mut Self {
        self.terms.push(format!("org:{organization}"));
        self
    }

    /// Restricts to the authenticated user's pull requests.
    pub fn author_me(&mut self) -> &mut Self {
        self.terms.push("author:@me".to_string());
        self
    }

    /// Repeated `author:` qualifiers are OR'd by GitHub.
    pub fn author(&mut self, login: &str) -> &mut Self {
        self.terms.push(format!("author:{login}"));
        self
    }

    pub fn build(&self) -> String {
        self.terms.join(" ")
    }
}

/// Builds the query for open PRs in the organization by the caller or
/// any team member.
pub fn build_search_query(config: &Config) -> String {
    let mut builder = SearchQueryBuilder::new();
    builder
        .pr_type()
        .open()
        .org(&config.organization)
        .author_me();

    for user in &config.team_users {
        builder.author(user);
    }

    builder.build()
}

/// Runs the search and returns the matching pull requests in result order.
pub async fn search_pull_requests<F>(
    forge: &F,
    query: &str,
) -> Result<Vec<PullRequestRef>, FetchError>
where
    F: Forge + ?Sized,
{
    let per_page = PER_PAGE.to_string();
    let result: SearchIssuesResult = fetch(
        forge,
        SEARCH_ENDPOINT,
        &[("q", query), ("per_page", per_page.as_str())],
    )
    .await?;

    info!(
        total = result.total_count,
        returned = result.items.len(),
        "Search complete"
    );

    let mut references = Vec::with_capacity(result.items.len());
    for item in result.items {
        let Some(link) = item.pull_request else {
            debug!("Skipping search result that is not a pull request");
            continue;
        };
        let reference = PullRequestRef::new(&link.url).map_err(|source| FetchError::InvalidUrl {
            resource: link.url.clone(),
            source,
        })?;
        references.push(reference);
    }

    Ok(references)
}
