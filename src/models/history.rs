//! Rename-aware history DTOs.
//!
//! - `HistoryEntry`: a commit paired with the path the file had at that commit
//! - `RenameEdge`: one discovered rename/copy between two tree states
//! - `FileHistory`: the walker's full result, newest first

use serde::{Deserialize, Serialize};

use super::Commit;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub commit: Commit,
    /// Path of the tracked file in this commit's tree
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenameKind {
    Renamed,
    Copied,
}

/// `new_path` at `boundary` was `old_path` in `source`, an ancestor of `boundary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameEdge {
    pub kind: RenameKind,
    pub old_path: String,
    pub new_path: String,
    pub boundary: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileHistory {
    /// Path the history was requested for
    pub path: String,
    /// Newest first, each commit exactly once
    pub entries: Vec<HistoryEntry>,
    /// Renames crossed, in discovery order (newest first)
    pub renames: Vec<RenameEdge>,
    /// Number of path-scoped log queries issued
    pub iterations: usize,
}

impl FileHistory {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn oldest_first(&self) -> Vec<HistoryEntry> {
        self.entries.iter().rev().cloned().collect()
    }

    /// Every name the file has had, newest first.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !paths.contains(&entry.path.as_str()) {
                paths.push(&entry.path);
            }
        }
        paths
    }
}
