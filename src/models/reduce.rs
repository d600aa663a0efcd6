//! Density reduction DTOs.
//!
//! - `CommitClassification`: category counts plus the trivial/filtered flags
//! - `AnnotatedCommit`: one history entry with its classification
//! - `ReducedHistory`: the annotated history and summary counts
//!
//! Commits are never removed here; consumers decide whether to hide,
//! de-emphasize or label trivial ones.

use serde::{Deserialize, Serialize};

use super::{Commit, RenameEdge};
use crate::analysis::classify::CategoryCounts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommitClassification {
    pub counts: CategoryCounts,
    /// No substantive line was touched
    pub trivial: bool,
    /// Trivial and the full message contains a filter word
    pub filtered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedCommit {
    pub commit: Commit,
    pub path: String,
    /// Previous path when this commit moved the file
    pub renamed_from: Option<String>,
    /// Moved the file without touching a single line
    pub rename_only: bool,
    #[serde(flatten)]
    pub classification: CommitClassification,
}

impl AnnotatedCommit {
    pub fn is_trivial(&self) -> bool {
        self.classification.trivial
    }

    pub fn is_filtered(&self) -> bool {
        self.classification.filtered
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReductionSummary {
    pub total: usize,
    pub substantive: usize,
    pub trivial: usize,
    pub filtered: usize,
    pub rename_only: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReducedHistory {
    pub path: String,
    /// Newest first, same order as the reconstructed history
    pub commits: Vec<AnnotatedCommit>,
    pub renames: Vec<RenameEdge>,
    pub summary: ReductionSummary,
}

impl ReducedHistory {
    /// Commits that changed at least one substantive line.
    pub fn significant(&self) -> impl Iterator<Item = &AnnotatedCommit> {
        self.commits.iter().filter(|c| !c.is_trivial())
    }

    /// Drop the commits a reader asked to hide: the filtered ones when a
    /// message filter was given, otherwise every trivial one. `summary` keeps
    /// the counts of the full history.
    pub fn hide_trivial(&mut self, by_message_filter: bool) {
        self.commits.retain(|c| {
            if by_message_filter {
                !c.is_filtered()
            } else {
                !c.is_trivial()
            }
        });
    }

    pub fn get(&self, oid: &str) -> Option<&AnnotatedCommit> {
        self.commits.iter().find(|c| c.commit.oid == oid)
    }
}
