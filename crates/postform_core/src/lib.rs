//! Core of the post form app.
//! This crate owns storage, form state and the save/list workflow; UI shells
//! only forward input events and render the published state.

pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{ConnectionManager, DbConfig, DbError, DbLocation, DbResult};
pub use form::controller::FormController;
pub use form::draft::{DraftValidationError, FormField, PostDraft};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::post::{
    Author, AuthorId, Category, CategoryId, NewAuthor, NewCategory, NewPost, Post, PostId, PostRow,
};
pub use repo::post_repo::{PostRepository, RepoError, RepoResult, SqlitePostRepository};
pub use service::post_form::{PostFormSession, SessionError, SubmitOutcome};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
