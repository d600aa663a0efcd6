//! File snapshots along a reconstructed history.
//!
//! A `SnapshotSeries` holds the file's content at every history entry,
//! oldest first, addressed by index. Index 0 is the file's first version; the
//! empty pre-creation state is exposed through `before(0)`.
//!
//! Snapshots can be exported to a directory as `ver0`, `ver1`, ... for
//! inspection. A non-empty export directory is treated as an earlier export
//! of the same history and reused unless the caller asks otherwise.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{ObjectType, Oid, Repository};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{FileHistory, HistoryEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub index: usize,
    pub commit: String,
    pub path: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotSeries {
    snapshots: Vec<Snapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Keep an existing non-empty export untouched
    #[default]
    Reuse,
    /// Fail if the target already holds files
    Refuse,
    /// Clear the target, then write
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(usize),
    Skipped,
}

impl SnapshotSeries {
    /// Read every version of the file named by `history`, oldest first.
    pub fn materialize(repo: &Repository, history: &FileHistory) -> Result<Self> {
        Self::from_entries(repo, &history.oldest_first())
    }

    pub fn from_entries(repo: &Repository, oldest_first: &[HistoryEntry]) -> Result<Self> {
        let mut snapshots = Vec::with_capacity(oldest_first.len());
        for (index, entry) in oldest_first.iter().enumerate() {
            let lines = read_blob_lines(repo, &entry.commit.oid, &entry.path)?;
            snapshots.push(Snapshot {
                index,
                commit: entry.commit.oid.clone(),
                path: entry.path.clone(),
                lines,
            });
        }
        tracing::debug!("Materialized {} snapshots", snapshots.len());
        Ok(Self { snapshots })
    }

    /// Build a series from `(commit, path, text)` triples, oldest first.
    pub fn from_texts<I, C, P, T>(versions: I) -> Self
    where
        I: IntoIterator<Item = (C, P, T)>,
        C: Into<String>,
        P: Into<String>,
        T: AsRef<str>,
    {
        let snapshots = versions
            .into_iter()
            .enumerate()
            .map(|(index, (commit, path, text))| Snapshot {
                index,
                commit: commit.into(),
                path: path.into(),
                lines: split_lines(text.as_ref()),
            })
            .collect();
        Self { snapshots }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    /// Lines of the version preceding `index`; empty for the first version.
    pub fn before(&self, index: usize) -> &[String] {
        match index.checked_sub(1).and_then(|i| self.snapshots.get(i)) {
            Some(previous) => &previous.lines,
            None => &[],
        }
    }

    /// Snapshots of `history` backed by the export directory `dir`.
    ///
    /// A non-empty `dir` under `ExportMode::Reuse` is loaded as is, without
    /// reading a single blob. Otherwise the series is materialized from the
    /// repository and exported to `dir` according to `mode`.
    pub fn materialize_into(
        repo: &Repository,
        history: &FileHistory,
        dir: &Path,
        mode: ExportMode,
    ) -> Result<(Self, ExportOutcome)> {
        if mode == ExportMode::Reuse && !dir_is_empty(dir)? {
            tracing::info!("Reusing snapshots in {}", dir.display());
            let series = Self::load(dir, &history.oldest_first())?;
            return Ok((series, ExportOutcome::Skipped));
        }
        if mode == ExportMode::Refuse && !dir_is_empty(dir)? {
            return Err(AppError::TargetExists(dir.to_path_buf()));
        }

        let series = Self::materialize(repo, history)?;
        let outcome = series.export(dir, mode)?;
        Ok((series, outcome))
    }

    /// Write each snapshot to `dir/ver{index}`.
    pub fn export(&self, dir: &Path, mode: ExportMode) -> Result<ExportOutcome> {
        if !dir_is_empty(dir)? {
            match mode {
                ExportMode::Reuse => {
                    tracing::info!("Snapshot export at {} already present, skipping", dir.display());
                    return Ok(ExportOutcome::Skipped);
                }
                ExportMode::Refuse => return Err(AppError::TargetExists(dir.to_path_buf())),
                ExportMode::Replace => {
                    tracing::info!("Clearing snapshot export at {}", dir.display());
                    fs::remove_dir_all(dir)
                        .map_err(|e| AppError::io(format!("clearing {}", dir.display()), e))?;
                }
            }
        }

        fs::create_dir_all(dir).map_err(|e| AppError::io(format!("creating {}", dir.display()), e))?;

        for snapshot in &self.snapshots {
            let target = version_path(dir, snapshot.index);
            let mut content = snapshot.lines.join("\n");
            if !snapshot.lines.is_empty() {
                content.push('\n');
            }
            fs::write(&target, content)
                .map_err(|e| AppError::io(format!("writing {}", target.display()), e))?;
        }

        tracing::info!("Exported {} snapshots to {}", self.snapshots.len(), dir.display());
        Ok(ExportOutcome::Written(self.snapshots.len()))
    }

    /// Rebuild a series from an earlier export of the same history.
    pub fn load(dir: &Path, oldest_first: &[HistoryEntry]) -> Result<Self> {
        let mut snapshots = Vec::with_capacity(oldest_first.len());
        for (index, entry) in oldest_first.iter().enumerate() {
            let source = version_path(dir, index);
            let text = fs::read_to_string(&source)
                .map_err(|e| AppError::io(format!("reading {}", source.display()), e))?;
            snapshots.push(Snapshot {
                index,
                commit: entry.commit.oid.clone(),
                path: entry.path.clone(),
                lines: split_lines(&text),
            });
        }
        Ok(Self { snapshots })
    }
}

impl<'a> IntoIterator for &'a SnapshotSeries {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

pub fn version_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("ver{}", index))
}

/// Split text into lines without terminators. `\n` and `\r\n` both end a
/// line and a trailing terminator does not start a new one.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| line.to_string()).collect()
}

/// Lines of the blob at `path` in the tree of `commit_oid`.
pub fn read_blob_lines(repo: &Repository, commit_oid: &str, path: &str) -> Result<Vec<String>> {
    let oid = Oid::from_str(commit_oid).map_err(|_| AppError::CommitNotFound(commit_oid.to_string()))?;
    let commit = repo
        .find_commit(oid)
        .map_err(|_| AppError::CommitNotFound(commit_oid.to_string()))?;
    let tree = commit.tree()?;

    let missing = || AppError::MissingFromTree {
        path: path.to_string(),
        commit: commit_oid.to_string(),
    };

    let entry = tree.get_path(Path::new(path)).map_err(|_| missing())?;
    if entry.kind() != Some(ObjectType::Blob) {
        return Err(missing());
    }
    let obj = entry.to_object(repo)?;
    let blob = obj.as_blob().ok_or_else(missing)?;

    let text = std::str::from_utf8(blob.content()).map_err(|_| AppError::NotText {
        path: path.to_string(),
        commit: commit_oid.to_string(),
    })?;

    Ok(split_lines(text))
}

fn dir_is_empty(dir: &Path) -> Result<bool> {
    match fs::read_dir(dir) {
        Ok(mut entries) => Ok(entries.next().is_none()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(AppError::io(format!("inspecting {}", dir.display()), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> SnapshotSeries {
        SnapshotSeries::from_texts([
            ("c0", "a.txt", "one\n"),
            ("c1", "a.txt", "one\ntwo\n"),
            ("c2", "b.txt", "one\r\n\r\ntwo"),
        ])
    }

    #[test]
    fn split_lines_handles_terminators() {
        assert_eq!(split_lines(""), Vec::<String>::new());
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("a\r\n\nb"), vec!["a", "", "b"]);
    }

    #[test]
    fn before_first_version_is_empty() {
        let s = series();
        assert!(s.before(0).is_empty());
        assert_eq!(s.before(1).to_vec(), vec!["one"]);
        assert_eq!(s.before(2).to_vec(), vec!["one", "two"]);
        assert_eq!(s.get(2).unwrap().lines, vec!["one", "", "two"]);
    }

    #[test]
    fn export_then_load_round_trips_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        let s = series();

        assert_eq!(s.export(&target, ExportMode::Reuse).unwrap(), ExportOutcome::Written(3));
        assert!(version_path(&target, 0).exists());
        assert!(version_path(&target, 2).exists());

        let entries: Vec<HistoryEntry> = s
            .iter()
            .map(|snap| HistoryEntry {
                commit: crate::models::Commit {
                    oid: snap.commit.clone(),
                    author: crate::models::AuthorInfo { name: "t".into(), email: "t@x".into() },
                    committer: crate::models::AuthorInfo { name: "t".into(), email: "t@x".into() },
                    timestamp: 0,
                    summary: String::new(),
                    message: String::new(),
                    parents: vec![],
                },
                path: snap.path.clone(),
            })
            .collect();
        let loaded = SnapshotSeries::load(&target, &entries).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn export_policy_for_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let s = series();
        s.export(dir.path(), ExportMode::Reuse).unwrap();

        assert_eq!(s.export(dir.path(), ExportMode::Reuse).unwrap(), ExportOutcome::Skipped);
        assert!(matches!(
            s.export(dir.path(), ExportMode::Refuse),
            Err(AppError::TargetExists(_))
        ));

        fs::write(dir.path().join("stale"), "x").unwrap();
        assert_eq!(s.export(dir.path(), ExportMode::Replace).unwrap(), ExportOutcome::Written(3));
        assert!(!dir.path().join("stale").exists());
    }
}
