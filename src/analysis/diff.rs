//! Line-level deltas between consecutive snapshots.
//!
//! Version i is diffed against version i-1 (the empty file for i = 0) with
//! Myers' algorithm, and the resulting delta list is attributed to commit i,
//! the commit that produced the right-hand side.

use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, DiffOp};

use crate::error::{AppError, Result};
use crate::git::snapshot::SnapshotSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaKind {
    Insert,
    Delete,
    Change,
}

/// A run of lines starting at `start` (0-based) on one side of a delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub start: usize,
    pub lines: Vec<String>,
}

impl Chunk {
    fn slice(lines: &[String], start: usize, len: usize) -> Self {
        Self {
            start,
            lines: lines[start..start + len].to_vec(),
        }
    }

    fn empty(start: usize) -> Self {
        Self { start, lines: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn end(&self) -> usize {
        self.start + self.lines.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub kind: DeltaKind,
    pub source: Chunk,
    pub target: Chunk,
}

/// Deltas introduced by one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDiff {
    /// Snapshot index of the commit's version
    pub index: usize,
    pub commit: String,
    pub deltas: Vec<Delta>,
}

/// Delta lists for a whole series, in snapshot order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSet {
    diffs: Vec<CommitDiff>,
}

impl DiffSet {
    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    pub fn get(&self, commit: &str) -> Option<&CommitDiff> {
        self.diffs.iter().find(|d| d.commit == commit)
    }

    pub fn at(&self, index: usize) -> Option<&CommitDiff> {
        self.diffs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommitDiff> {
        self.diffs.iter()
    }

    /// Replay delta lists 0..=upto onto the empty file.
    pub fn replay(&self, upto: usize) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for diff in self.diffs.iter().take(upto + 1) {
            lines = apply(&lines, &diff.deltas).ok_or(AppError::PatchMismatch { index: diff.index })?;
        }
        Ok(lines)
    }
}

pub fn diff_all(series: &SnapshotSeries) -> DiffSet {
    let diffs = series
        .iter()
        .map(|snapshot| CommitDiff {
            index: snapshot.index,
            commit: snapshot.commit.clone(),
            deltas: diff_lines(series.before(snapshot.index), &snapshot.lines),
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        "Computed {} delta lists ({} deltas)",
        diffs.len(),
        diffs.iter().map(|d| d.deltas.len()).sum::<usize>()
    );

    DiffSet { diffs }
}

pub fn diff_lines(old: &[String], new: &[String]) -> Vec<Delta> {
    capture_diff_slices(Algorithm::Myers, old, new)
        .into_iter()
        .filter_map(|op| match op {
            DiffOp::Equal { .. } => None,
            DiffOp::Delete { old_index, old_len, new_index } => Some(Delta {
                kind: DeltaKind::Delete,
                source: Chunk::slice(old, old_index, old_len),
                target: Chunk::empty(new_index),
            }),
            DiffOp::Insert { old_index, new_index, new_len } => Some(Delta {
                kind: DeltaKind::Insert,
                source: Chunk::empty(old_index),
                target: Chunk::slice(new, new_index, new_len),
            }),
            DiffOp::Replace { old_index, old_len, new_index, new_len } => Some(Delta {
                kind: DeltaKind::Change,
                source: Chunk::slice(old, old_index, old_len),
                target: Chunk::slice(new, new_index, new_len),
            }),
        })
        .collect()
}

/// Apply `deltas` to `source`. Returns `None` when a delta's source side
/// does not match the lines it claims to replace.
pub fn apply(source: &[String], deltas: &[Delta]) -> Option<Vec<String>> {
    let mut out = Vec::with_capacity(source.len());
    let mut cursor = 0;

    for delta in deltas {
        let (start, end) = (delta.source.start, delta.source.end());
        if start < cursor || end > source.len() {
            return None;
        }
        out.extend_from_slice(&source[cursor..start]);
        if out.len() != delta.target.start || source[start..end] != delta.source.lines[..] {
            return None;
        }
        out.extend(delta.target.lines.iter().cloned());
        cursor = end;
    }

    out.extend_from_slice(&source[cursor..]);
    Some(out)
}
