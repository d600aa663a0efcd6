//! Rename-aware file history with trivial-commit density reduction.
//!
//! - `git`: path log, rename tracking, history reconstruction, snapshots
//! - `analysis`: line deltas, line classification, density reduction
//! - `issues`: pull request and ticket correlation
//! - `export`: JSON records for downstream tools
//! - `routes`: HTTP API over a shared repository

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod git;
pub mod issues;
pub mod models;
pub mod routes;

pub use error::{AppError, Result};
pub use git::{GitRepository, SharedRepo};
