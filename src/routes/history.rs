use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::config::ReduceOptions;
use crate::error::{AppError, Result};
use crate::git::SharedRepo;
use crate::models::{FileHistory, ReducedHistory};

pub fn routes(repo: SharedRepo) -> Router {
    Router::new()
        .route("/api/v1/history", get(get_history))
        .route("/api/v1/history/reduced", get(get_reduced_history))
        .with_state(repo)
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    path: String,
}

#[derive(Debug, Deserialize)]
struct ReducedQuery {
    path: String,
    /// Comma-separated filter words
    filter: Option<String>,
    /// Comma-separated import keywords
    import: Option<String>,
    #[serde(default)]
    hide_trivial: bool,
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default()
}

fn validate_path(path: &str) -> Result<&str> {
    let path = path.trim().trim_start_matches("./");
    if path.is_empty() || path.starts_with('/') || path.split('/').any(|part| part == "..") {
        return Err(AppError::InvalidPath(path.to_string()));
    }
    Ok(path)
}

async fn get_history(
    State(repo): State<SharedRepo>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<FileHistory>> {
    let path = validate_path(&query.path)?;
    let repo = repo.read().map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
    let history = repo.file_history(path)?;
    Ok(Json(history))
}

async fn get_reduced_history(
    State(repo): State<SharedRepo>,
    Query(query): Query<ReducedQuery>,
) -> Result<Json<ReducedHistory>> {
    let path = validate_path(&query.path)?;
    let options = ReduceOptions::new(
        split_list(query.filter.as_deref()),
        split_list(query.import.as_deref()),
    );

    let repo = repo.read().map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
    let mut reduced = repo.reduced_history(path, &options)?;
    if query.hide_trivial {
        reduced.hide_trivial(!options.filter_words.is_empty());
    }
    Ok(Json(reduced))
}
