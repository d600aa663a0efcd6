//! Throwaway repositories for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use git2::{IndexAddOption, Oid, Repository, Signature, Time};
use tempfile::TempDir;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
    clock: i64,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        Self {
            dir,
            repo,
            clock: 1_700_000_000,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) -> &Self {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        self
    }

    pub fn remove(&self, name: &str) -> &Self {
        fs::remove_file(self.dir.path().join(name)).unwrap();
        self
    }

    pub fn rename(&self, from: &str, to: &str) -> &Self {
        let to_path = self.dir.path().join(to);
        if let Some(parent) = to_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::rename(self.dir.path().join(from), to_path).unwrap();
        self
    }

    /// Stage the whole worktree (including deletions) and commit it on HEAD,
    /// one minute after the previous commit.
    pub fn commit(&mut self, message: &str) -> Oid {
        self.commit_as("Test User", "test@example.com", message)
    }

    pub fn commit_as(&mut self, name: &str, email: &str, message: &str) -> Oid {
        let tree_oid = self.stage();
        let tree = self.repo.find_tree(tree_oid).unwrap();
        self.clock += 60;
        let sig = Signature::new(name, email, &Time::new(self.clock, 0)).unwrap();

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    /// Commit the worktree with explicit parents (two for a merge) and move
    /// the current branch to it.
    pub fn commit_with_parents(&mut self, message: &str, parents: &[Oid]) -> Oid {
        let tree_oid = self.stage();
        let tree = self.repo.find_tree(tree_oid).unwrap();
        self.clock += 60;
        let sig = Signature::new("Test User", "test@example.com", &Time::new(self.clock, 0)).unwrap();

        let parents: Vec<git2::Commit> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        let oid = self
            .repo
            .commit(None, &sig, &sig, message, &tree, &parent_refs)
            .unwrap();

        let branch = self.repo.head().unwrap().name().unwrap().to_string();
        self.repo.reference(&branch, oid, true, message).unwrap();
        oid
    }

    fn stage(&self) -> Oid {
        let mut index = self.repo.index().unwrap();
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None).unwrap();
        index.update_all(["*"].iter(), None).unwrap();
        index.write().unwrap();
        index.write_tree().unwrap()
    }
}

/// Ten distinct code lines, long enough for similarity-based rename detection.
pub fn code(tag: &str) -> String {
    (0..10)
        .map(|i| format!("let {}_{} = compute({});\n", tag, i, i))
        .collect()
}
