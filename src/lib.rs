//! prdash: pull request triage for a user and their team.
//!
//! Searches GitHub for open pull requests by the caller and their team
//! members, enriches each one concurrently with its comments, commits,
//! reviews and check runs, derives who acted last, and groups the results
//! into fixed, ordered sections that say where attention is needed.

pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod query;
pub mod search;
pub mod timeline;
pub mod types;

#[cfg(test)]
mod testing;

pub use aggregate::{fetch_aggregate, fetch_aggregates};
pub use classify::{assign_sections, process_pull_request, section_kinds};
pub use cli::{DisplayMode, RunOptions, parse_args};
pub use config::{Config, ConfigError};
pub use error::{EnrichError, FetchError, ResourceKind, TriageError};
pub use github::{Forge, GitHub, fetch, get_github_token};
pub use query::triage;
pub use search::{PER_PAGE, build_search_query, search_pull_requests};
pub use timeline::build_timeline;
pub use types::{
    Action, ActionKind, AggregatePullRequest, CheckConclusion, CheckRun, CheckRunStatus,
    ClassificationFlags, Comment, Commit, ProcessedPullRequest, PullRequestDetail,
    PullRequestRef, Review, ReviewState, Section, SectionKind, User,
};
