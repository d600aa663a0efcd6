//! Diff-based triviality classification.
//!
//! - `diff`: Myers line deltas between consecutive snapshots
//! - `classify`: line categories and per-commit counts
//! - `reduce`: trivial/filtered annotation of a history
//! - `pipeline`: runs the stages for one file

pub mod classify;
pub mod diff;
pub mod pipeline;
pub mod reduce;

pub use pipeline::{analyze_file, analyze_file_with_snapshots, analyze_history, reduce_series};
