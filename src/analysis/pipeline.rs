//! End-to-end density reduction for one file.
//!
//! history → snapshots → deltas → category counts → annotated history.
//! Every stage runs to completion before the next starts; the first error
//! aborts the run.

use std::path::Path;

use git2::Repository;

use crate::analysis::classify::LineRules;
use crate::analysis::diff::diff_all;
use crate::analysis::reduce::{classify_all, reduce};
use crate::config::ReduceOptions;
use crate::error::Result;
use crate::git::history::build_history;
use crate::git::repository::GitRepository;
use crate::git::snapshot::{ExportMode, SnapshotSeries};
use crate::models::{FileHistory, ReducedHistory};

pub fn analyze_file(repo: &Repository, file_path: &str, options: &ReduceOptions) -> Result<ReducedHistory> {
    let history = build_history(repo, file_path)?;
    analyze_history(repo, &history, options)
}

pub fn analyze_history(repo: &Repository, history: &FileHistory, options: &ReduceOptions) -> Result<ReducedHistory> {
    let snapshots = SnapshotSeries::materialize(repo, history)?;
    tracing::debug!("Materialized {} snapshots of {}", snapshots.len(), history.path);
    Ok(reduce_series(history, &snapshots, &options.rules, &options.filter_words))
}

/// Like `analyze_file`, with snapshots kept in `dir`: an existing export is
/// reused, a missing one is written.
pub fn analyze_file_with_snapshots(
    repo: &Repository,
    file_path: &str,
    options: &ReduceOptions,
    dir: &Path,
) -> Result<ReducedHistory> {
    let history = build_history(repo, file_path)?;
    let (snapshots, outcome) = SnapshotSeries::materialize_into(repo, &history, dir, ExportMode::Reuse)?;
    tracing::debug!("Snapshots of {} in {}: {:?}", history.path, dir.display(), outcome);
    Ok(reduce_series(&history, &snapshots, &options.rules, &options.filter_words))
}

/// Reduce an already materialized series, e.g. one loaded from an export.
pub fn reduce_series(
    history: &FileHistory,
    snapshots: &SnapshotSeries,
    rules: &LineRules,
    filter_words: &[String],
) -> ReducedHistory {
    let diffs = diff_all(snapshots);
    let counts = classify_all(&diffs, rules);
    let reduced = reduce(history, &counts, filter_words);
    tracing::info!(
        "{}: {} commits, {} trivial, {} filtered",
        reduced.path,
        reduced.summary.total,
        reduced.summary.trivial,
        reduced.summary.filtered
    );
    reduced
}

impl GitRepository {
    pub fn reduced_history(&self, path: &str, options: &ReduceOptions) -> Result<ReducedHistory> {
        self.with_repo(|repo| analyze_file(repo, path, options))
    }

    pub fn reduced_history_with_snapshots(
        &self,
        path: &str,
        options: &ReduceOptions,
        dir: &Path,
    ) -> Result<ReducedHistory> {
        self.with_repo(|repo| analyze_file_with_snapshots(repo, path, options, dir))
    }
}
