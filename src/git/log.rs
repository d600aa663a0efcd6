//! Path-scoped commit log.
//!
//! Equivalent of `git log --no-merges -- <path>`: walks history newest first
//! and keeps the non-merge commits whose tree differs from their parent's
//! under the given pathspec. Root commits are compared against the empty tree.

use git2::{DiffOptions, Oid, Repository, Sort};

use crate::error::Result;
use crate::git::repository::commit_from_git;
use crate::models::Commit;

/// Commits reachable from HEAD that touched `path`, newest first.
pub fn path_log(repo: &Repository, path: &str) -> Result<Vec<Commit>> {
    let head = repo.head()?.peel_to_commit()?.id();
    path_log_from(repo, head, path)
}

/// Commits reachable from `start` that touched `path`, newest first.
pub fn path_log_from(repo: &Repository, start: Oid, path: &str) -> Result<Vec<Commit>> {
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    revwalk.push(start)?;

    let mut commits = Vec::new();
    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;
        if commit.parent_count() > 1 {
            continue;
        }
        if commit_touches_path(repo, &commit, path)? {
            commits.push(commit_from_git(&commit));
        }
    }

    tracing::debug!("Path log for {}: {} commits", path, commits.len());
    Ok(commits)
}

/// Non-merge commits reachable from `start`, newest first.
pub fn non_merge_ancestry(repo: &Repository, start: Oid) -> Result<Vec<Oid>> {
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    revwalk.push(start)?;

    let mut oids = Vec::new();
    for oid in revwalk {
        let oid = oid?;
        if repo.find_commit(oid)?.parent_count() <= 1 {
            oids.push(oid);
        }
    }
    Ok(oids)
}

pub fn commit_touches_path(repo: &Repository, commit: &git2::Commit, path: &str) -> Result<bool> {
    let tree = commit.tree()?;

    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };

    let mut opts = DiffOptions::new();
    opts.pathspec(path);
    opts.disable_pathspec_match(true);

    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

    Ok(diff.deltas().len() > 0)
}
