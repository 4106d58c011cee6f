//! Derives "who last touched this PR, and how" from an aggregate.

use chrono::{DateTime, Utc};

use crate::types::{Action, ActionKind, AggregatePullRequest, User};

/// Returns the PR's actions newest first.
///
/// The result always contains the `Opened` action and at most one each of
/// the newest human comment, the newest human review and the newest commit.
/// Commits are attributed to the PR author: the API's per-commit author is
/// often missing or unrelated to who pushed.
pub fn build_timeline(pr: &AggregatePullRequest) -> Vec<Action> {
    let author = pr.detail.author();
    let mut actions = vec![Action {
        actor: author.to_string(),
        kind: ActionKind::Opened,
        time: pr.detail.created_at,
    }];

    let newest_comment = newest(pr.comments.iter().filter_map(|comment| {
        human(comment.user.as_ref()).map(|user| (user, comment.created_at))
    }));
    if let Some((user, time)) = newest_comment {
        actions.push(Action {
            actor: user.login.clone(),
            kind: ActionKind::Commented,
            time,
        });
    }

    let newest_review = newest(pr.reviews.iter().filter_map(|review| {
        let user = human(review.user.as_ref())?;
        review.submitted_at.map(|time| (user, time))
    }));
    if let Some((user, time)) = newest_review {
        actions.push(Action {
            actor: user.login.clone(),
            kind: ActionKind::Reviewed,
            time,
        });
    }

    let newest_commit = newest(
        pr.commits
            .iter()
            .filter_map(|commit| commit.authored_at().map(|time| ((), time))),
    );
    if let Some(((), time)) = newest_commit {
        actions.push(Action {
            actor: author.to_string(),
            kind: ActionKind::Committed,
            time,
        });
    }

    // Stable: equal timestamps keep insertion order.
    actions.sort_by(|a, b| b.time.cmp(&a.time));
    actions
}

/// Accounts that can be credited with an action. Bots and deleted users
/// are not.
fn human(user: Option<&User>) -> Option<&User> {
    user.filter(|user| !user.is_bot())
}

/// Newest entry by time; on a tie the first one seen wins.
fn newest<T>(entries: impl Iterator<Item = (T, DateTime<Utc>)>) -> Option<(T, DateTime<Utc>)> {
    entries.fold(None, |best, entry| match best {
        Some(current) if entry.1 <= current.1 => Some(current),
        _ => Some(entry),
    })
}
