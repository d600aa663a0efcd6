//! Rename-aware file history.
//!
//! Repeats a path-scoped log query, following each discovered rename back to
//! the file's previous name, until a query yields no unseen commit or no
//! earlier name exists. Commits are deduplicated by id, not by path, so a
//! rename loop (A → B → A) terminates once a segment adds nothing new.
//!
//! Every entry names a path present in its commit's tree: a commit that
//! moved the file away is recorded under the new name, and one that deleted
//! it is left out.

use git2::Repository;
use std::collections::HashSet;

use crate::error::Result;
use crate::git::log::path_log;
use crate::git::rename::{find_rename_edge, path_at_commit};
use crate::git::repository::GitRepository;
use crate::models::{FileHistory, HistoryEntry};

/// Full history of `file_path` across renames, newest first.
pub fn build_history(repo: &Repository, file_path: &str) -> Result<FileHistory> {
    let mut history = FileHistory {
        path: file_path.to_string(),
        ..Default::default()
    };

    if repo.is_empty()? {
        return Ok(history);
    }

    let mut current = file_path.to_string();
    let mut seen: HashSet<String> = HashSet::new();

    loop {
        history.iterations += 1;

        let mut oldest_in_segment: Option<String> = None;
        for commit in path_log(repo, &current)? {
            if !seen.insert(commit.oid.clone()) {
                continue;
            }
            // Commits that deleted the file carry no version of it.
            let Some(path) = path_at_commit(repo, &commit.oid, &current)? else {
                continue;
            };
            oldest_in_segment = Some(commit.oid.clone());
            history.entries.push(HistoryEntry { commit, path });
        }

        let Some(boundary) = oldest_in_segment else {
            break;
        };

        match find_rename_edge(repo, &boundary, &current)? {
            Some(edge) => {
                tracing::info!("Following rename {} -> {}", edge.old_path, edge.new_path);
                current = edge.old_path.clone();
                history.renames.push(edge);
            }
            None => break,
        }
    }

    tracing::info!(
        "History for {}: {} commits, {} renames, {} log queries",
        file_path,
        history.entries.len(),
        history.renames.len(),
        history.iterations
    );

    Ok(history)
}

impl GitRepository {
    pub fn file_history(&self, path: &str) -> Result<FileHistory> {
        self.with_repo(|repo| build_history(repo, path))
    }
}
