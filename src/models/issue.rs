//! Issue tracker DTOs.
//!
//! - `IssueReference`: identifier extracted from a commit summary
//! - `IssueMetadata`: derived discussion metrics for one issue or pull request
//! - `CorrelatedCommit`: a commit with its (optional) issue

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Commit;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum IssueReference {
    /// `(#123)` in a squash-merge summary
    PullRequest(u64),
    /// `PROJ-123`
    Ticket(String),
}

impl fmt::Display for IssueReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueReference::PullRequest(number) => write!(f, "#{}", number),
            IssueReference::Ticket(key) => f.write_str(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueComment {
    pub author: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueDetails {
    Ticket {
        priority: Option<String>,
        components: Vec<String>,
        labels: Vec<String>,
        linked_issues: usize,
        subtasks: usize,
        votes: u64,
        watches: u64,
    },
    PullRequest {
        review_count: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueMetadata {
    pub reference: IssueReference,
    pub title: String,
    /// Comments not written by bots
    pub comment_count: usize,
    pub commit_author_comment_count: usize,
    /// Assignee or pull request author plus distinct non-bot commenters
    pub people_involved: usize,
    pub comments: Vec<IssueComment>,
    pub details: IssueDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelatedCommit {
    pub commit: Commit,
    pub reference: Option<IssueReference>,
    pub issue: Option<IssueMetadata>,
}
