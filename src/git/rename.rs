//! Rename and copy discovery across tree states.
//!
//! Given a boundary commit (the oldest commit seen under some path), scan its
//! non-merge ancestry newest first. Each ancestor's tree is diffed against the
//! boundary tree with similarity-based rename/copy detection; the first
//! renamed or copied entry whose new path contains the tracked path names the
//! file's previous path.
//!
//! Matching is by substring containment, so tracking `Foo.java` also follows
//! `src/Foo.java` and `FooTest.java`.

use std::path::Path;

use git2::{Delta, DiffFindOptions, Oid, Repository};

use crate::error::{AppError, Result};
use crate::git::log::non_merge_ancestry;
use crate::models::{RenameEdge, RenameKind};

/// Where the file tracked as `path` lives in the tree of `commit`.
///
/// The path log also reports commits that removed `path`. When such a
/// commit moved the file elsewhere, the new path is returned; a plain
/// deletion yields `None`, since no version of the file exists there.
pub fn path_at_commit(repo: &Repository, commit: &str, path: &str) -> Result<Option<String>> {
    let oid = Oid::from_str(commit).map_err(|_| AppError::CommitNotFound(commit.to_string()))?;
    let commit = repo
        .find_commit(oid)
        .map_err(|_| AppError::CommitNotFound(commit.to_string()))?;
    let tree = commit.tree()?;

    if tree.get_path(Path::new(path)).is_ok() {
        return Ok(Some(path.to_string()));
    }

    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };
    let mut diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))?;

    let moved = diff.deltas().find_map(|delta| {
        let renamed = delta.status() == Delta::Renamed
            && delta.old_file().path().is_some_and(|p| p == Path::new(path));
        if renamed {
            delta.new_file().path().map(|p| p.to_string_lossy().to_string())
        } else {
            None
        }
    });

    match &moved {
        Some(new_path) => tracing::debug!("{} moved {} to {}", commit.id(), path, new_path),
        None => tracing::debug!("{} deleted {}", commit.id(), path),
    }
    Ok(moved)
}

/// Previous name of `tracked_path` before `boundary`, if any.
pub fn find_old_path(repo: &Repository, boundary: &str, tracked_path: &str) -> Result<Option<String>> {
    Ok(find_rename_edge(repo, boundary, tracked_path)?.map(|edge| edge.old_path))
}

pub fn find_rename_edge(repo: &Repository, boundary: &str, tracked_path: &str) -> Result<Option<RenameEdge>> {
    let boundary_oid =
        Oid::from_str(boundary).map_err(|_| AppError::CommitNotFound(boundary.to_string()))?;
    let boundary_commit = repo
        .find_commit(boundary_oid)
        .map_err(|_| AppError::CommitNotFound(boundary.to_string()))?;
    let boundary_tree = boundary_commit.tree()?;

    for oid in non_merge_ancestry(repo, boundary_oid)? {
        // Same tree, empty diff.
        if oid == boundary_oid {
            continue;
        }

        let candidate_tree = repo.find_commit(oid)?.tree()?;
        let mut diff = repo.diff_tree_to_tree(Some(&candidate_tree), Some(&boundary_tree), None)?;

        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true).copies(true);
        diff.find_similar(Some(&mut find_opts))?;

        for delta in diff.deltas() {
            let kind = match delta.status() {
                Delta::Renamed => RenameKind::Renamed,
                Delta::Copied => RenameKind::Copied,
                _ => continue,
            };

            let old_path = delta.old_file().path().map(|p| p.to_string_lossy().to_string());
            let new_path = delta.new_file().path().map(|p| p.to_string_lossy().to_string());

            if let (Some(old_path), Some(new_path)) = (old_path, new_path) {
                if new_path.contains(tracked_path) {
                    tracing::debug!("{} was {} before {}", new_path, old_path, boundary);
                    return Ok(Some(RenameEdge {
                        kind,
                        old_path,
                        new_path,
                        boundary: boundary.to_string(),
                        source: oid.to_string(),
                    }));
                }
            }
        }
    }

    Ok(None)
}
