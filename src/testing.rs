//! Test factories for pull request aggregates.
//!
//! Times are expressed as hours on a fixed day so orderings are easy to read
//! in assertions.

use chrono::{DateTime, TimeZone, Utc};

use crate::types::{
    AggregatePullRequest, Base, Branch, CheckConclusion, CheckRun, CheckRunStatus, Comment,
    Commit, CommitAuthor, CommitData, Link, Links, PullRequestDetail, Repository, Review,
    ReviewState, User,
};

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
}

/// An open PR by `author`, created at hour 1, with no sub-resources.
pub fn pr(author: &str) -> AggregatePullRequest {
    pr_numbered(author, 1)
}

pub fn pr_numbered(author: &str, number: u64) -> AggregatePullRequest {
    AggregatePullRequest {
        detail: PullRequestDetail {
            number,
            title: format!("Change #{number}"),
            state: "open".to_string(),
            draft: false,
            created_at: at(1),
            user: User::new(author),
            comments_url: format!("https://api.github.com/repos/acme/app/issues/{number}/comments"),
            commits_url: format!("https://api.github.com/repos/acme/app/pulls/{number}/commits"),
            base: Base {
                repo: Repository {
                    full_name: "acme/app".to_string(),
                },
            },
            head: Branch {
                ref_name: format!("topic-{number}"),
                repo: None,
            },
            links: Links {
                self_link: Link {
                    href: format!("https://api.github.com/repos/acme/app/pulls/{number}"),
                },
                html: Link {
                    href: format!("https://github.com/acme/app/pull/{number}"),
                },
            },
        },
        comments: vec![],
        commits: vec![],
        reviews: vec![],
        check_runs: vec![],
    }
}

/// Builds a PR and applies customizations via closure.
pub fn pr_with(author: &str, f: impl FnOnce(&mut AggregatePullRequest)) -> AggregatePullRequest {
    let mut pr = pr(author);
    f(&mut pr);
    pr
}

pub fn comment(login: &str, hour: u32) -> Comment {
    Comment {
        user: Some(User::new(login)),
        created_at: at(hour),
    }
}

pub fn review(login: &str, state: ReviewState, hour: u32) -> Review {
    Review {
        user: Some(User::new(login)),
        state,
        submitted_at: Some(at(hour)),
    }
}

pub fn commit(login: &str, hour: u32) -> Commit {
    Commit {
        author: Some(User::new(login)),
        commit: CommitData {
            author: Some(CommitAuthor {
                name: Some(login.to_string()),
                email: None,
                date: Some(at(hour)),
            }),
        },
    }
}

pub fn check_run(status: CheckRunStatus, conclusion: Option<CheckConclusion>) -> CheckRun {
    CheckRun {
        name: "ci/build".to_string(),
        status,
        conclusion,
    }
}
