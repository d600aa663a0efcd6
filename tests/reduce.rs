mod common;

use common::{code, TestRepo};
use git_lineage::analysis::{analyze_file, analyze_file_with_snapshots};
use git_lineage::git::history::build_history;
use git_lineage::git::snapshot::{version_path, ExportMode, ExportOutcome, SnapshotSeries};
use git_lineage::{AppError, GitRepository};
use git_lineage::analysis::classify::CategoryCounts;
use git_lineage::config::ReduceOptions;
use git_lineage::export;

fn options(words: &[&str]) -> ReduceOptions {
    ReduceOptions::new(words.iter().map(|w| w.to_string()).collect(), vec![])
}

#[test]
fn documentation_and_import_commits_are_trivial() {
    let mut t = TestRepo::new();
    t.write("Foo.java", &code("a"));
    let a = t.commit("Add implementation");
    t.write("Foo.java", &format!("{}// note\n", code("a")));
    let b = t.commit("Add note");
    t.write("Foo.java", &format!("{}// note\nimport Foo\n", code("a")));
    let c = t.commit("Add import");

    let reduced = analyze_file(&t.repo, "Foo.java", &options(&["MINOR"])).unwrap();
    assert_eq!(reduced.commits.len(), 3);

    let first = reduced.get(&a.to_string()).unwrap();
    assert!(first.classification.counts.substantive > 0);
    assert!(!first.is_trivial());

    let note = reduced.get(&b.to_string()).unwrap();
    assert_eq!(
        note.classification.counts,
        CategoryCounts {
            documentation: 1,
            ..Default::default()
        }
    );
    assert!(note.is_trivial());

    let import = reduced.get(&c.to_string()).unwrap();
    assert_eq!(import.classification.counts.import, 1);
    assert_eq!(import.classification.counts.substantive, 0);
    assert!(import.is_trivial());

    assert!(reduced.commits.iter().all(|c| !c.is_filtered()));
    assert_eq!(reduced.summary.trivial, 2);
    assert_eq!(reduced.significant().count(), 1);
}

#[test]
fn message_filter_only_refines_trivial_commits() {
    let mut t = TestRepo::new();
    t.write("lib.rs", &code("a"));
    t.commit("Initial");
    t.write("lib.rs", &format!("{}\n", code("a")));
    let d = t.commit("MINOR: cleanup");
    t.write("lib.rs", &format!("{}\nlet z = 1;\n", code("a")));
    let e = t.commit("MINOR: cleanup");

    let reduced = analyze_file(&t.repo, "lib.rs", &options(&["MINOR"])).unwrap();

    let d = reduced.get(&d.to_string()).unwrap();
    assert!(d.is_trivial());
    assert!(d.is_filtered());

    let e = reduced.get(&e.to_string()).unwrap();
    assert!(!e.is_trivial());
    assert!(!e.is_filtered());

    let reduced = analyze_file(&t.repo, "lib.rs", &options(&["minor"])).unwrap();
    assert_eq!(reduced.summary.filtered, 0);
}

#[test]
fn pure_rename_is_trivial_and_flagged() {
    let mut t = TestRepo::new();
    t.write("Old.java", &code("a"));
    t.commit("Create");
    t.rename("Old.java", "New.java");
    let moved = t.commit("Rename only");

    let reduced = analyze_file(&t.repo, "New.java", &options(&[])).unwrap();
    let rename = reduced.get(&moved.to_string()).unwrap();

    assert_eq!(rename.classification.counts, CategoryCounts::default());
    assert!(rename.is_trivial());
    assert!(rename.rename_only);
    assert_eq!(rename.renamed_from.as_deref(), Some("Old.java"));
    assert_eq!(reduced.summary.rename_only, 1);
}

#[test]
fn hide_trivial_keeps_summary_counts() {
    let mut t = TestRepo::new();
    t.write("a.rs", &code("a"));
    t.commit("Code");
    t.write("a.rs", &format!("{}\n", code("a")));
    t.commit("MINOR spacing");
    t.write("a.rs", &format!("{}\n// why\n", code("a")));
    t.commit("Comment");

    let repo = GitRepository::open(t.path()).unwrap();

    let mut reduced = repo.reduced_history("a.rs", &options(&["MINOR"])).unwrap();
    reduced.hide_trivial(true);
    let summaries: Vec<&str> = reduced.commits.iter().map(|c| c.commit.summary.as_str()).collect();
    assert_eq!(summaries, vec!["Comment", "Code"]);
    assert_eq!(reduced.summary.total, 3);

    let mut reduced = repo.reduced_history("a.rs", &options(&[])).unwrap();
    reduced.hide_trivial(false);
    assert_eq!(reduced.commits.len(), 1);
}

#[test]
fn export_writes_every_commit() {
    let mut t = TestRepo::new();
    t.write("a.rs", &code("a"));
    t.commit_as("Ada", "ada@example.com", "Code");
    t.write("a.rs", &format!("{}\n", code("a")));
    t.commit("Spacing");

    let reduced = analyze_file(&t.repo, "a.rs", &options(&[])).unwrap();
    let records = export::records(&reduced, &[]);
    let out = t.path().join("out.json");
    export::write_json(&out, &records).unwrap();

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let array = json.as_array().unwrap();
    assert_eq!(array.len(), 2);
    assert_eq!(array[0]["trivial"], true);
    assert_eq!(array[1]["author_name"], "Ada");
    assert_eq!(array[1]["counts"]["substantive"], 10);
}

#[test]
fn rename_loop_and_restored_file_reduce_cleanly() {
    let mut t = TestRepo::new();
    t.write("A.java", &code("a"));
    t.commit("Create A");
    t.rename("A.java", "B.java");
    t.commit("A -> B");
    t.rename("B.java", "A.java");
    t.commit("B -> A");

    let reduced = analyze_file(&t.repo, "A.java", &options(&[])).unwrap();
    assert_eq!(reduced.summary.total, 3);
    assert_eq!(reduced.summary.substantive, 1);

    t.remove("A.java");
    t.commit("Delete");
    t.write("A.java", &format!("{}let back = true;\n", code("a")));
    t.commit("Restore");

    let reduced = analyze_file(&t.repo, "A.java", &options(&[])).unwrap();
    let summaries: Vec<&str> = reduced.commits.iter().map(|c| c.commit.summary.as_str()).collect();
    assert_eq!(summaries, vec!["Restore", "B -> A", "A -> B", "Create A"]);
    assert!(!reduced.commits[0].is_trivial());
}

#[test]
fn existing_snapshot_export_is_read_instead_of_the_repository() {
    let mut t = TestRepo::new();
    t.write("a.rs", &code("a"));
    t.commit("Code");
    t.write("a.rs", &format!("{}\n", code("a")));
    let spacing = t.commit("Spacing");

    let out = tempfile::tempdir().unwrap();
    let dir = out.path().join("versions");

    let first = analyze_file_with_snapshots(&t.repo, "a.rs", &options(&[]), &dir).unwrap();
    assert!(first.get(&spacing.to_string()).unwrap().is_trivial());
    assert!(version_path(&dir, 0).exists());
    assert!(version_path(&dir, 1).exists());

    // Only the export knows about this line.
    std::fs::write(version_path(&dir, 1), format!("{}let edited = 1;\n", code("a"))).unwrap();

    let second = analyze_file_with_snapshots(&t.repo, "a.rs", &options(&[]), &dir).unwrap();
    let commit = second.get(&spacing.to_string()).unwrap();
    assert_eq!(commit.classification.counts.substantive, 1);
    assert!(!commit.is_trivial());

    let history = build_history(&t.repo, "a.rs").unwrap();
    let (series, outcome) = SnapshotSeries::materialize_into(&t.repo, &history, &dir, ExportMode::Reuse).unwrap();
    assert_eq!(outcome, ExportOutcome::Skipped);
    assert_eq!(series.get(1).unwrap().lines.last().map(String::as_str), Some("let edited = 1;"));

    assert!(matches!(
        SnapshotSeries::materialize_into(&t.repo, &history, &dir, ExportMode::Refuse),
        Err(AppError::TargetExists(_))
    ));

    let (_, outcome) = SnapshotSeries::materialize_into(&t.repo, &history, &dir, ExportMode::Replace).unwrap();
    assert_eq!(outcome, ExportOutcome::Written(2));
    let repo = GitRepository::open(t.path()).unwrap();
    let restored = repo.reduced_history_with_snapshots("a.rs", &options(&[]), &dir).unwrap();
    assert!(restored.get(&spacing.to_string()).unwrap().is_trivial());
}
