//! Data transfer objects shared by the pipeline, the CLI and the API.
//!
//! These structs are serialized to JSON for export and HTTP responses.
//! - `commit`: Commit, AuthorInfo, CommitInfo
//! - `history`: HistoryEntry, FileHistory, RenameEdge
//! - `reduce`: AnnotatedCommit, ReducedHistory
//! - `issue`: IssueReference, IssueMetadata, IssueDetails
//! - `repository`: RepositoryInfo

pub mod commit;
pub mod history;
pub mod issue;
pub mod reduce;
pub mod repository;

pub use commit::*;
pub use history::*;
pub use issue::*;
pub use reduce::*;
pub use repository::*;
