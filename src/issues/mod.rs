//! Issue tracker correlation.
//!
//! A commit summary may name the pull request it was squash-merged from
//! (`Fix parser (#123)`) or a ticket key (`PROJ-42 fix parser`). The tracker
//! kind decides which pattern is looked for; a summary without a match is
//! simply uncorrelated.
//!
//! - `http`: shared ureq agent and status handling
//! - `github`: pull requests via the REST API
//! - `jira`: tickets via `/rest/api/2`

pub mod github;
mod http;
pub mod jira;

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::TrackerKind;
use crate::error::Result;
use crate::models::{
    Commit, CorrelatedCommit, IssueComment, IssueDetails, IssueMetadata, IssueReference,
};

static PULL_REQUEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)").expect("valid pull request pattern"));
static TICKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]+-\d+").expect("valid ticket pattern"));

/// First issue identifier in a commit summary, if any.
pub fn extract_reference(kind: TrackerKind, summary: &str) -> Option<IssueReference> {
    match kind {
        TrackerKind::Github => PULL_REQUEST
            .captures(summary)
            .and_then(|caps| caps[1].parse().ok())
            .map(IssueReference::PullRequest),
        TrackerKind::Jira => TICKET
            .find(summary)
            .map(|m| IssueReference::Ticket(m.as_str().to_string())),
    }
}

/// A tracker account as reported by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    pub login: String,
    pub display_name: String,
    pub email: Option<String>,
}

impl Person {
    /// Bot accounts mention `bot` in their login or display name.
    pub fn is_bot(&self) -> bool {
        self.login.to_lowercase().contains("bot") || self.display_name.to_lowercase().contains("bot")
    }

    /// Whether this account plausibly belongs to the commit's author.
    pub fn is_author_of(&self, commit: &Commit) -> bool {
        let author = &commit.author;
        let email_match = self
            .email
            .as_deref()
            .is_some_and(|email| !email.is_empty() && email.eq_ignore_ascii_case(&author.email));
        let name_match = !author.name.is_empty()
            && (self.login == author.name || self.display_name == author.name);
        email_match || name_match
    }

    fn key(&self) -> &str {
        if self.login.is_empty() {
            &self.display_name
        } else {
            &self.login
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    pub author: Person,
    pub body: String,
}

/// An issue or pull request exactly as fetched, before any counting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIssue {
    pub reference: IssueReference,
    pub title: String,
    /// Ticket assignee or pull request author
    pub owner: Option<Person>,
    pub comments: Vec<RawComment>,
    pub details: IssueDetails,
}

impl IssueMetadata {
    /// Discussion metrics for `raw` as seen from `commit`'s author.
    pub fn from_raw(raw: RawIssue, commit: &Commit) -> Self {
        let human: Vec<&RawComment> = raw.comments.iter().filter(|c| !c.author.is_bot()).collect();

        let commit_author_comment_count = human
            .iter()
            .filter(|c| c.author.is_author_of(commit))
            .count();

        let mut people: HashSet<&str> = HashSet::new();
        if let Some(owner) = raw.owner.as_ref().filter(|o| !o.is_bot()) {
            people.insert(owner.key());
        }
        for comment in &human {
            people.insert(comment.author.key());
        }

        let comments = human
            .iter()
            .map(|c| IssueComment {
                author: c.author.key().to_string(),
                body: c.body.trim().to_string(),
            })
            .collect::<Vec<_>>();

        IssueMetadata {
            comment_count: comments.len(),
            commit_author_comment_count,
            people_involved: people.len(),
            comments,
            reference: raw.reference,
            title: raw.title,
            details: raw.details,
        }
    }
}

/// A source of issue metadata. Implementations are picked once from
/// `TrackerKind`; callers only ever hold a `dyn IssueTracker`.
pub trait IssueTracker: Send + Sync {
    fn kind(&self) -> TrackerKind;

    /// Fetch an issue. `Ok(None)` when the tracker does not know it.
    fn fetch(&self, reference: &IssueReference) -> Result<Option<RawIssue>>;

    fn reference_for(&self, commit: &Commit) -> Option<IssueReference> {
        extract_reference(self.kind(), &commit.summary)
    }

    fn resolve_issue(&self, reference: &IssueReference, commit: &Commit) -> Result<Option<IssueMetadata>> {
        Ok(self
            .fetch(reference)?
            .map(|raw| IssueMetadata::from_raw(raw, commit)))
    }
}

/// Attach issue metadata to each commit. Each reference is fetched once; the
/// per-commit author counts are still computed against every commit.
pub fn correlate<'a, I>(tracker: &dyn IssueTracker, commits: I) -> Result<Vec<CorrelatedCommit>>
where
    I: IntoIterator<Item = &'a Commit>,
{
    let mut fetched: HashMap<IssueReference, Option<RawIssue>> = HashMap::new();
    let mut correlated = Vec::new();

    for commit in commits {
        let reference = tracker.reference_for(commit);
        let issue = match &reference {
            Some(reference) => {
                if !fetched.contains_key(reference) {
                    tracing::debug!("Fetching {} {} for {}", tracker.kind().name(), reference, commit.short_oid());
                    let raw = tracker.fetch(reference)?;
                    if raw.is_none() {
                        tracing::info!("{} {} not found", tracker.kind().name(), reference);
                    }
                    fetched.insert(reference.clone(), raw);
                }
                fetched
                    .get(reference)
                    .cloned()
                    .flatten()
                    .map(|raw| IssueMetadata::from_raw(raw, commit))
            }
            None => None,
        };

        correlated.push(CorrelatedCommit {
            commit: commit.clone(),
            reference,
            issue,
        });
    }

    Ok(correlated)
}
