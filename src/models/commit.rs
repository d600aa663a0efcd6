use serde::{Deserialize, Serialize};

use crate::git::repository::format_relative_time;

/// An immutable revision read from the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub oid: String,
    pub author: AuthorInfo,
    pub committer: AuthorInfo,
    /// Author time, unix seconds
    pub timestamp: i64,
    /// First paragraph of the message, collapsed onto one line
    pub summary: String,
    pub message: String,
    pub parents: Vec<String>,
}

impl Commit {
    pub fn short_oid(&self) -> &str {
        &self.oid[..self.oid.len().min(10)]
    }

    pub fn relative_time(&self) -> String {
        format_relative_time(self.timestamp)
    }

    pub fn to_info(&self) -> CommitInfo {
        CommitInfo {
            oid: self.oid.clone(),
            message: self.summary.clone(),
            author: self.author.name.clone(),
            timestamp: self.timestamp,
            relative_time: self.relative_time(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub name: String,
    pub email: String,
}

/// Compact commit view used in repository headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    pub oid: String,
    pub message: String,
    pub author: String,
    pub timestamp: i64,
    pub relative_time: String,
}
