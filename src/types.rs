use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

/// Substring GitHub appends to the login of app and bot accounts.
pub const BOT_MARKER: &str = "[bot]";

/// A GitHub account as it appears on pull requests, comments and reviews.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub login: String,
}

impl User {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
        }
    }

    pub fn is_bot(&self) -> bool {
        self.login.contains(BOT_MARKER)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

/// The base side of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Base {
    pub repo: Repository,
}

/// The head side of a pull request. `repo` is null once a fork is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Branch {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub repo: Option<Repository>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub html: Link,
}

/// Pull request detail as returned by `GET /repos/{owner}/{repo}/pulls/{number}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullRequestDetail {
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub draft: bool,
    pub created_at: DateTime<Utc>,
    pub user: User,
    pub comments_url: String,
    pub commits_url: String,
    pub base: Base,
    pub head: Branch,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl PullRequestDetail {
    pub fn author(&self) -> &str {
        &self.user.login
    }

    pub fn html_url(&self) -> &str {
        &self.links.html.href
    }
}

/// Issue comment on a pull request. `user` is null for deleted accounts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    #[serde(other)]
    Unknown,
}

/// A pull request review. Pending reviews carry no `submitted_at`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Review {
    pub user: Option<User>,
    pub state: ReviewState,
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitAuthor {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitData {
    pub author: Option<CommitAuthor>,
}

/// Entry of `GET /repos/{owner}/{repo}/pulls/{number}/commits`.
///
/// `author` is the GitHub account GitHub associated with the commit, which
/// is frequently missing or unrelated to who pushed it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Commit {
    pub author: Option<User>,
    pub commit: CommitData,
}

impl Commit {
    pub fn authored_at(&self) -> Option<DateTime<Utc>> {
        self.commit.author.as_ref().and_then(|author| author.date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckRunStatus {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Requested,
    Pending,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Stale,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckRun {
    #[serde(default)]
    pub name: String,
    pub status: CheckRunStatus,
    pub conclusion: Option<CheckConclusion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckRunsResponse {
    #[serde(default)]
    pub total_count: u64,
    pub check_runs: Vec<CheckRun>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchPullRequestLink {
    pub url: String,
}

/// A search hit. Only pull requests carry a `pull_request` link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchItem {
    pub pull_request: Option<SearchPullRequestLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchIssuesResult {
    #[serde(default)]
    pub total_count: u64,
    pub items: Vec<SearchItem>,
}

/// API URL of a single pull request, as produced by the search step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PullRequestRef(Url);

impl PullRequestRef {
    pub fn new(url: &str) -> Result<Self, url::ParseError> {
        Url::parse(url).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// One pull request together with every sub-resource the classifier needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePullRequest {
    pub detail: PullRequestDetail,
    pub comments: Vec<Comment>,
    pub commits: Vec<Commit>,
    pub reviews: Vec<Review>,
    pub check_runs: Vec<CheckRun>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Opened,
    Commented,
    Reviewed,
    Committed,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Opened => "PR Opened",
            ActionKind::Commented => "comment",
            ActionKind::Reviewed => "review",
            ActionKind::Committed => "commit",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who last touched a pull request, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub actor: String,
    pub kind: ActionKind,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationFlags {
    pub reviewed: bool,
    pub changes_requested: bool,
    pub approved: bool,
    pub checks_running: bool,
    pub checks_failed: bool,
}

/// A pull request with its derived timeline and flags.
///
/// The timeline is never empty and is ordered newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedPullRequest {
    pub pull_request: AggregatePullRequest,
    pub timeline: Vec<Action>,
    pub flags: ClassificationFlags,
}

impl ProcessedPullRequest {
    pub fn author(&self) -> &str {
        self.pull_request.detail.author()
    }

    /// Actor of the most recent action; falls back to the author.
    pub fn last_actor(&self) -> &str {
        self.timeline
            .first()
            .map_or_else(|| self.author(), |action| action.actor.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    MyPrsNoActionNeeded,
    TeamPrsSomeoneElseLast,
    TeamPrsAuthorLast,
    TeamPrsReadyForReview,
    MyPrsNeedAttention,
}

impl SectionKind {
    /// Output order of the report.
    pub const ORDER: [SectionKind; 5] = [
        SectionKind::MyPrsNoActionNeeded,
        SectionKind::TeamPrsSomeoneElseLast,
        SectionKind::TeamPrsAuthorLast,
        SectionKind::TeamPrsReadyForReview,
        SectionKind::MyPrsNeedAttention,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::MyPrsNoActionNeeded => "My PRs, no action needed",
            SectionKind::TeamPrsSomeoneElseLast => {
                "Team PRs where someone else has the last action"
            }
            SectionKind::TeamPrsAuthorLast => "Team PRs where author has the last action",
            SectionKind::TeamPrsReadyForReview => "Team PRs ready for review",
            SectionKind::MyPrsNeedAttention => "My PRs that need attention",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub pull_requests: Vec<ProcessedPullRequest>,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            pull_requests: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pull_requests.is_empty()
    }
}
