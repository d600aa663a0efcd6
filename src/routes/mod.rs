//! API route handlers - maps HTTP endpoints to history operations.
//!
//! - `repository`: Basic repo info (GET /api/v1/repository)
//! - `history`: Rename-aware history and its reduced form
//!   (GET /api/v1/history, GET /api/v1/history/reduced)

pub mod history;
pub mod repository;

use axum::Router;

use crate::git::SharedRepo;

pub fn create_router(repo: SharedRepo) -> Router {
    Router::new()
        .merge(repository::routes(repo.clone()))
        .merge(history::routes(repo))
}
