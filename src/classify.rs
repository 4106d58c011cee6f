//! Status flags and section assignment for processed pull requests.

use crate::{
    timeline::build_timeline,
    types::{
        AggregatePullRequest, CheckConclusion, CheckRunStatus, ClassificationFlags,
        ProcessedPullRequest, ReviewState, Section, SectionKind,
    },
};

impl ClassificationFlags {
    pub fn from_pull_request(pr: &AggregatePullRequest) -> Self {
        let has_review = |state: ReviewState| pr.reviews.iter().any(|review| review.state == state);

        Self {
            reviewed: !pr.reviews.is_empty(),
            changes_requested: has_review(ReviewState::ChangesRequested),
            approved: has_review(ReviewState::Approved),
            checks_running: pr
                .check_runs
                .iter()
                .any(|run| run.status == CheckRunStatus::InProgress),
            checks_failed: pr
                .check_runs
                .iter()
                .any(|run| run.conclusion == Some(CheckConclusion::Failure)),
        }
    }
}

pub fn process_pull_request(pull_request: AggregatePullRequest) -> ProcessedPullRequest {
    let timeline = build_timeline(&pull_request);
    let flags = ClassificationFlags::from_pull_request(&pull_request);
    ProcessedPullRequest {
        pull_request,
        timeline,
        flags,
    }
}

/// Sections a PR belongs to, for the caller `me`.
///
/// Every PR gets exactly one of the "my PRs" or "team PRs ... last action"
/// sections. A team PR that is waiting on reviewers is additionally listed
/// under `TeamPrsReadyForReview`.
pub fn section_kinds(pr: &ProcessedPullRequest, me: &str) -> Vec<SectionKind> {
    let author = pr.author();
    let last_actor = pr.last_actor();

    if author == me {
        return if last_actor != me {
            vec![SectionKind::MyPrsNeedAttention]
        } else {
            vec![SectionKind::MyPrsNoActionNeeded]
        };
    }

    let author_acted_last = last_actor == author;
    let mut kinds = Vec::with_capacity(2);

    if author_acted_last
        && !pr.flags.checks_failed
        && !pr.flags.changes_requested
        && !pr.flags.approved
    {
        kinds.push(SectionKind::TeamPrsReadyForReview);
    }

    kinds.push(if author_acted_last {
        SectionKind::TeamPrsAuthorLast
    } else {
        SectionKind::TeamPrsSomeoneElseLast
    });

    kinds
}

/// Buckets PRs into the five report sections.
///
/// All five sections are returned in `SectionKind::ORDER`, empty or not;
/// within a section PRs keep their input order.
pub fn assign_sections(prs: &[ProcessedPullRequest], me: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = SectionKind::ORDER.into_iter().map(Section::new).collect();

    for pr in prs {
        for kind in section_kinds(pr, me) {
            if let Some(section) = sections.iter_mut().find(|section| section.kind == kind) {
                section.pull_requests.push(pr.clone());
            }
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        testing::{check_run, comment, commit, pr, pr_numbered, pr_with, review},
        types::ReviewState,
    };

    const ME: &str = "me";

    fn kinds_for(pr: AggregatePullRequest) -> Vec<SectionKind> {
        section_kinds(&process_pull_request(pr), ME)
    }

    #[test]
    fn test_flags_for_untouched_pr() {
        assert_eq!(
            ClassificationFlags::from_pull_request(&pr("alice")),
            ClassificationFlags::default()
        );
    }

    #[test]
    fn test_flags_from_reviews_and_checks() {
        let pr = pr_with("alice", |pr| {
            pr.reviews = vec![
                review("bob", ReviewState::ChangesRequested, 2),
                review("carol", ReviewState::Approved, 3),
            ];
            pr.check_runs = vec![
                check_run(CheckRunStatus::InProgress, None),
                check_run(CheckRunStatus::Completed, Some(CheckConclusion::Failure)),
            ];
        });

        assert_eq!(
            ClassificationFlags::from_pull_request(&pr),
            ClassificationFlags {
                reviewed: true,
                changes_requested: true,
                approved: true,
                checks_running: true,
                checks_failed: true,
            }
        );
    }

    #[test]
    fn test_commented_review_only_sets_reviewed() {
        let pr = pr_with("alice", |pr| {
            pr.reviews = vec![review("bob", ReviewState::Commented, 2)];
            pr.check_runs = vec![
                check_run(CheckRunStatus::Completed, Some(CheckConclusion::Success)),
                check_run(CheckRunStatus::Queued, None),
                check_run(CheckRunStatus::Completed, Some(CheckConclusion::Cancelled)),
            ];
        });

        let flags = ClassificationFlags::from_pull_request(&pr);
        assert!(flags.reviewed);
        assert!(!flags.changes_requested);
        assert!(!flags.approved);
        assert!(!flags.checks_running);
        assert!(!flags.checks_failed);
    }

    #[test]
    fn test_my_pr_with_someone_else_last_needs_attention() {
        let pr = pr_with(ME, |pr| pr.comments = vec![comment("alice", 3)]);
        assert_eq!(kinds_for(pr), vec![SectionKind::MyPrsNeedAttention]);
    }

    #[test]
    fn test_my_pr_where_i_acted_last_needs_no_action() {
        let pr = pr_with(ME, |pr| {
            pr.comments = vec![comment("alice", 3)];
            pr.commits = vec![commit(ME, 4)];
        });
        assert_eq!(kinds_for(pr), vec![SectionKind::MyPrsNoActionNeeded]);
    }

    #[test]
    fn test_my_pr_ignores_flags() {
        let pr = pr_with(ME, |pr| {
            pr.check_runs = vec![check_run(
                CheckRunStatus::Completed,
                Some(CheckConclusion::Failure),
            )];
        });
        assert_eq!(kinds_for(pr), vec![SectionKind::MyPrsNoActionNeeded]);
    }

    #[test]
    fn test_team_pr_with_author_commit_and_passing_checks_is_ready_for_review() {
        let pr = pr_with("alice", |pr| {
            pr.commits = vec![commit("alice", 3)];
            pr.check_runs = vec![check_run(
                CheckRunStatus::Completed,
                Some(CheckConclusion::Success),
            )];
        });
        assert_eq!(
            kinds_for(pr),
            vec![
                SectionKind::TeamPrsReadyForReview,
                SectionKind::TeamPrsAuthorLast
            ]
        );
    }

    #[test]
    fn test_changes_requested_is_never_ready_for_review() {
        let pr = pr_with("alice", |pr| {
            pr.reviews = vec![review("bob", ReviewState::ChangesRequested, 2)];
            pr.commits = vec![commit("alice", 5)];
        });
        let processed = process_pull_request(pr);

        assert!(processed.flags.changes_requested);
        assert_eq!(processed.last_actor(), "alice");
        assert_eq!(
            section_kinds(&processed, ME),
            vec![SectionKind::TeamPrsAuthorLast]
        );
    }

    #[test]
    fn test_approved_or_failing_team_pr_is_not_ready_for_review() {
        let approved = pr_with("alice", |pr| {
            pr.reviews = vec![review("bob", ReviewState::Approved, 2)];
            pr.commits = vec![commit("alice", 5)];
        });
        assert_eq!(kinds_for(approved), vec![SectionKind::TeamPrsAuthorLast]);

        let failing = pr_with("alice", |pr| {
            pr.check_runs = vec![check_run(
                CheckRunStatus::Completed,
                Some(CheckConclusion::Failure),
            )];
        });
        assert_eq!(kinds_for(failing), vec![SectionKind::TeamPrsAuthorLast]);
    }

    #[test]
    fn test_team_pr_with_reviewer_last() {
        let pr = pr_with("alice", |pr| {
            pr.commits = vec![commit("alice", 2)];
            pr.reviews = vec![review("me", ReviewState::Commented, 4)];
        });
        assert_eq!(kinds_for(pr), vec![SectionKind::TeamPrsSomeoneElseLast]);
    }

    #[test]
    fn test_bot_comment_does_not_take_last_action() {
        let pr = pr_with("alice", |pr| {
            pr.commits = vec![commit("alice", 2)];
            pr.comments = vec![comment("ci-helper[bot]", 9)];
        });
        assert_eq!(
            kinds_for(pr),
            vec![
                SectionKind::TeamPrsReadyForReview,
                SectionKind::TeamPrsAuthorLast
            ]
        );
    }

    #[test]
    fn test_assign_sections_returns_fixed_order_and_covers_every_pr() {
        let prs: Vec<ProcessedPullRequest> = vec![
            pr_with(ME, |pr| pr.comments = vec![comment("alice", 3)]),
            pr_numbered("alice", 2),
            pr_with("bob", |pr| {
                pr.detail.number = 3;
                pr.comments = vec![comment(ME, 3)];
            }),
            pr_numbered(ME, 4),
        ]
        .into_iter()
        .map(process_pull_request)
        .collect();

        let sections = assign_sections(&prs, ME);

        let order: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(order, SectionKind::ORDER.to_vec());

        let numbers = |kind: SectionKind| -> Vec<u64> {
            sections
                .iter()
                .find(|s| s.kind == kind)
                .unwrap()
                .pull_requests
                .iter()
                .map(|pr| pr.pull_request.detail.number)
                .collect()
        };
        assert_eq!(numbers(SectionKind::MyPrsNoActionNeeded), vec![4]);
        assert_eq!(numbers(SectionKind::TeamPrsSomeoneElseLast), vec![3]);
        assert_eq!(numbers(SectionKind::TeamPrsAuthorLast), vec![2]);
        assert_eq!(numbers(SectionKind::TeamPrsReadyForReview), vec![2]);
        assert_eq!(numbers(SectionKind::MyPrsNeedAttention), vec![1]);
    }

    #[test]
    fn test_assign_sections_on_empty_input() {
        let sections = assign_sections(&[], ME);
        assert_eq!(sections.len(), 5);
        assert!(sections.iter().all(Section::is_empty));
    }
}
