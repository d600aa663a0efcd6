pub mod history;
pub mod log;
pub mod rename;
pub mod repository;
pub mod snapshot;

pub use repository::{GitRepository, SharedRepo};
