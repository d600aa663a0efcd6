//! JSON export of a reduced history, one record per commit.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::classify::CategoryCounts;
use crate::error::{AppError, Result};
use crate::models::{AnnotatedCommit, CorrelatedCommit, IssueMetadata, IssueReference, ReducedHistory};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub oid: String,
    pub author_name: String,
    pub author_email: String,
    pub timestamp: i64,
    pub summary: String,
    pub message: String,
    pub path: String,
    pub renamed_from: Option<String>,
    pub counts: CategoryCounts,
    pub trivial: bool,
    pub filtered: bool,
    pub rename_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<IssueReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<IssueMetadata>,
}

impl ExportRecord {
    pub fn new(commit: &AnnotatedCommit) -> Self {
        Self {
            oid: commit.commit.oid.clone(),
            author_name: commit.commit.author.name.clone(),
            author_email: commit.commit.author.email.clone(),
            timestamp: commit.commit.timestamp,
            summary: commit.commit.summary.clone(),
            message: commit.commit.message.clone(),
            path: commit.path.clone(),
            renamed_from: commit.renamed_from.clone(),
            counts: commit.classification.counts,
            trivial: commit.classification.trivial,
            filtered: commit.classification.filtered,
            rename_only: commit.rename_only,
            reference: None,
            issue: None,
        }
    }

    pub fn with_correlation(mut self, correlated: Option<&CorrelatedCommit>) -> Self {
        if let Some(c) = correlated {
            self.reference = c.reference.clone();
            self.issue = c.issue.clone();
        }
        self
    }
}

/// Records for every commit of `history`, joined with issue correlations by
/// commit id.
pub fn records(history: &ReducedHistory, correlated: &[CorrelatedCommit]) -> Vec<ExportRecord> {
    let by_oid: HashMap<&str, &CorrelatedCommit> = correlated
        .iter()
        .map(|c| (c.commit.oid.as_str(), c))
        .collect();

    history
        .commits
        .iter()
        .map(|commit| {
            ExportRecord::new(commit).with_correlation(by_oid.get(commit.commit.oid.as_str()).copied())
        })
        .collect()
}

/// Write `records` as a pretty-printed JSON array.
pub fn write_json(path: &Path, records: &[ExportRecord]) -> Result<()> {
    let context = || format!("Failed to write {}", path.display());

    let file = File::create(path).map_err(|e| AppError::io(context(), e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)
        .map_err(|e| AppError::io(context(), e.into()))?;
    writer.write_all(b"\n").map_err(|e| AppError::io(context(), e))?;
    writer.flush().map_err(|e| AppError::io(context(), e))?;

    tracing::info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}
