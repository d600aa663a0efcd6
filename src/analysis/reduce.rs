//! Density reduction over classified commits.
//!
//! A commit is trivial when it touched no substantive line. Filter words
//! only refine that set: a trivial commit whose full message contains any of
//! them is additionally marked filtered, while substantive commits are never
//! checked against the message. Nothing is removed from the history.

use std::collections::HashMap;

use crate::analysis::classify::{CategoryCounts, LineRules};
use crate::analysis::diff::DiffSet;
use crate::models::{AnnotatedCommit, CommitClassification, FileHistory, ReducedHistory, ReductionSummary};

/// Category counts for every commit in `diffs`, keyed by commit id.
pub fn classify_all(diffs: &DiffSet, rules: &LineRules) -> HashMap<String, CategoryCounts> {
    diffs
        .iter()
        .map(|diff| (diff.commit.clone(), rules.classify_deltas(&diff.deltas)))
        .collect()
}

/// Case-sensitive substring match against any non-empty filter word.
pub fn message_matches(message: &str, filter_words: &[String]) -> bool {
    filter_words
        .iter()
        .any(|word| !word.is_empty() && message.contains(word.as_str()))
}

pub fn classify_commit(counts: CategoryCounts, message: &str, filter_words: &[String]) -> CommitClassification {
    let trivial = counts.is_trivial();
    CommitClassification {
        counts,
        trivial,
        filtered: trivial && message_matches(message, filter_words),
    }
}

pub fn reduce(
    history: &FileHistory,
    counts: &HashMap<String, CategoryCounts>,
    filter_words: &[String],
) -> ReducedHistory {
    let mut summary = ReductionSummary::default();
    let mut commits = Vec::with_capacity(history.entries.len());

    for (i, entry) in history.entries.iter().enumerate() {
        let commit_counts = counts.get(&entry.commit.oid).copied().unwrap_or_default();
        let classification = classify_commit(commit_counts, &entry.commit.message, filter_words);

        // Entries are newest first, so the previous version is the next one.
        let renamed_from = history
            .entries
            .get(i + 1)
            .filter(|older| older.path != entry.path)
            .map(|older| older.path.clone());
        let rename_only = renamed_from.is_some() && commit_counts.total() == 0;

        summary.total += 1;
        if classification.trivial {
            summary.trivial += 1;
        } else {
            summary.substantive += 1;
        }
        if classification.filtered {
            summary.filtered += 1;
        }
        if rename_only {
            summary.rename_only += 1;
        }

        commits.push(AnnotatedCommit {
            commit: entry.commit.clone(),
            path: entry.path.clone(),
            renamed_from,
            rename_only,
            classification,
        });
    }

    tracing::info!(
        "Reduced {} commits: {} substantive, {} trivial, {} filtered",
        summary.total,
        summary.substantive,
        summary.trivial,
        summary.filtered
    );

    ReducedHistory {
        path: history.path.clone(),
        commits,
        renames: history.renames.clone(),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthorInfo, Commit, HistoryEntry};

    fn entry(oid: &str, path: &str, message: &str) -> HistoryEntry {
        let author = AuthorInfo {
            name: "Dev".to_string(),
            email: "dev@example.com".to_string(),
        };
        HistoryEntry {
            commit: Commit {
                oid: oid.to_string(),
                author: author.clone(),
                committer: author,
                timestamp: 0,
                summary: message.lines().next().unwrap_or("").to_string(),
                message: message.to_string(),
                parents: vec![],
            },
            path: path.to_string(),
        }
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn filter_only_refines_trivial_commits() {
        let history = FileHistory {
            path: "F.java".to_string(),
            entries: vec![
                entry("e", "F.java", "MINOR: cleanup"),
                entry("d", "F.java", "MINOR: cleanup"),
            ],
            ..Default::default()
        };
        let mut counts = HashMap::new();
        counts.insert("d".to_string(), CategoryCounts { documentation: 2, ..Default::default() });
        counts.insert("e".to_string(), CategoryCounts { substantive: 1, ..Default::default() });

        let reduced = reduce(&history, &counts, &words(&["MINOR"]));
        let d = reduced.get("d").unwrap();
        let e = reduced.get("e").unwrap();
        assert!(d.is_trivial() && d.is_filtered());
        assert!(!e.is_trivial() && !e.is_filtered());
        assert_eq!(reduced.summary.filtered, 1);
        assert_eq!(reduced.significant().count(), 1);
    }

    #[test]
    fn filter_words_are_case_sensitive_and_ored() {
        let filters = words(&["MINOR", "typo"]);
        assert!(message_matches("fix typo in docs", &filters));
        assert!(!message_matches("minor cleanup", &filters));
        assert!(!message_matches("anything", &words(&[""])));
        assert!(!message_matches("anything", &[]));
    }

    #[test]
    fn empty_diff_rename_is_trivial_and_rename_only() {
        let history = FileHistory {
            path: "b.txt".to_string(),
            entries: vec![entry("r", "b.txt", "move"), entry("c", "a.txt", "create")],
            ..Default::default()
        };
        let mut counts = HashMap::new();
        counts.insert("r".to_string(), CategoryCounts::default());
        counts.insert("c".to_string(), CategoryCounts { substantive: 3, ..Default::default() });

        let reduced = reduce(&history, &counts, &[]);
        let r = reduced.get("r").unwrap();
        assert!(r.is_trivial());
        assert!(r.rename_only);
        assert_eq!(r.renamed_from.as_deref(), Some("a.txt"));
        assert_eq!(r.classification.counts, CategoryCounts::default());
        assert!(!reduced.get("c").unwrap().rename_only);
        assert_eq!(reduced.summary.rename_only, 1);
    }

    #[test]
    fn order_and_membership_follow_history() {
        let history = FileHistory {
            path: "f".to_string(),
            entries: vec![entry("3", "f", "c"), entry("2", "f", "b"), entry("1", "f", "a")],
            ..Default::default()
        };
        let reduced = reduce(&history, &HashMap::new(), &[]);
        let oids: Vec<&str> = reduced.commits.iter().map(|c| c.commit.oid.as_str()).collect();
        assert_eq!(oids, ["3", "2", "1"]);
        assert_eq!(reduced.summary.total, 3);
    }
}
