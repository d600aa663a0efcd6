//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` for every failure the history pipeline can hit and
//! implements Axum's `IntoResponse` so the API returns JSON error bodies.
//!
//! Error mappings:
//! - `RepoNotFound`, `CommitNotFound` → 404
//! - `InvalidPath`, `Config` → 400
//! - `TargetExists` → 409
//! - `Tracker` → 502
//! - everything else → 500

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Commit not found: {0}")]
    CommitNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The reconstructed history named a path that is absent from the
    /// commit's tree. Only reachable through a walker bug or a stale path.
    #[error("{path} is missing from the tree of commit {commit}")]
    MissingFromTree { path: String, commit: String },

    #[error("{path} at commit {commit} is not valid UTF-8 text")]
    NotText { path: String, commit: String },

    #[error("Snapshot export target is not empty: {}", .0.display())]
    TargetExists(PathBuf),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Delta list {index} does not apply to its source snapshot")]
    PatchMismatch { index: usize },

    /// Network, authentication or protocol failure talking to an issue
    /// tracker. The run can be retried once the cause is fixed.
    #[error("{tracker} lookup failed: {message}")]
    Tracker { tracker: &'static str, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether repeating the failed step could succeed. Only issue-tracker
    /// lookups are worth retrying; repository failures are configuration
    /// problems.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Tracker { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::RepoNotFound(_) | AppError::CommitNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::InvalidPath(_) | AppError::Config(_) => StatusCode::BAD_REQUEST,
            AppError::TargetExists(_) => StatusCode::CONFLICT,
            AppError::Tracker { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
