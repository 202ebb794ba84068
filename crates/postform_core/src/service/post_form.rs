//! Post form session: save workflow and list loader.
//!
//! # Responsibility
//! - Own the connection manager, the form controller and the published post
//!   list for one screen.
//! - Validate and persist a submitted draft, then republish the list.
//!
//! # Invariants
//! - A rejected submit never touches storage or the published list.
//! - A stored submit always leaves an empty draft with the error flag
//!   cleared.
//! - The published list is ordered newest first.
//! - Submits are not deduplicated; each valid submit stores a new post.

use crate::db::{ConnectionManager, DbError};
use crate::form::controller::FormController;
use crate::form::draft::{DraftValidationError, FormField, PostDraft};
use crate::model::post::{Post, PostId, PostRow};
use crate::repo::post_repo::{PostRepository, RepoError, SqlitePostRepository};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Failure reaching or using storage from a session.
#[derive(Debug)]
pub enum SessionError {
    Db(DbError),
    Repo(RepoError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DbError> for SessionError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Result of a submit that reached a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Post stored under this id.
    Saved(PostId),
    /// Nothing stored; this field was the first empty one.
    Rejected(FormField),
}

/// State behind the post form screen.
#[derive(Debug)]
pub struct PostFormSession {
    connections: ConnectionManager,
    form: FormController,
    posts: Vec<Post>,
    posts_stale: bool,
}

impl PostFormSession {
    /// Builds a session without touching storage.
    pub fn new(connections: ConnectionManager) -> Self {
        Self {
            connections,
            form: FormController::new(),
            posts: Vec::new(),
            posts_stale: false,
        }
    }

    /// Builds a session and loads the saved posts once.
    pub fn start(connections: ConnectionManager) -> Result<Self, SessionError> {
        let mut session = Self::new(connections);
        session.refresh_posts()?;
        Ok(session)
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn draft(&self) -> &PostDraft {
        self.form.draft()
    }

    pub fn has_error(&self) -> bool {
        self.form.has_error()
    }

    pub fn set_author(&mut self, value: impl Into<String>) {
        self.form.set_author(value);
    }

    pub fn set_category(&mut self, value: impl Into<String>) {
        self.form.set_category(value);
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.form.set_title(value);
    }

    pub fn set_content(&mut self, value: impl Into<String>) {
        self.form.set_content(value);
    }

    /// Last published list, newest first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Whether the last refresh failed, leaving an older list published.
    pub fn posts_stale(&self) -> bool {
        self.posts_stale
    }

    /// Id/title/content rows of the published list.
    pub fn post_rows(&self) -> Vec<PostRow> {
        self.posts.iter().map(Post::row).collect()
    }

    pub fn connections_mut(&mut self) -> &mut ConnectionManager {
        &mut self.connections
    }

    /// Re-queries every post and publishes the result.
    ///
    /// # Errors
    /// - Connection or query failures; the previous list stays published and
    ///   [`posts_stale`](Self::posts_stale) turns true.
    pub fn refresh_posts(&mut self) -> Result<&[Post], SessionError> {
        let started_at = Instant::now();
        let conn = match self.connections.get_connection() {
            Ok(conn) => conn,
            Err(err) => {
                self.posts_stale = true;
                return Err(err.into());
            }
        };
        let posts = match SqlitePostRepository::new(conn).list_posts() {
            Ok(posts) => posts,
            Err(err) => {
                self.posts_stale = true;
                error!(
                    "event=posts_load module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        debug!(
            "event=posts_load module=service status=ok count={} duration_ms={}",
            posts.len(),
            started_at.elapsed().as_millis()
        );
        self.posts = posts;
        self.posts_stale = false;
        Ok(&self.posts)
    }

    /// Runs the save workflow for the current draft.
    ///
    /// Empty fields reject the submit and raise the error flag. Otherwise the
    /// post, a new author and a new category are stored in one transaction,
    /// the list is refreshed, and the draft is reset.
    ///
    /// Once the insert commits the submit counts as saved: a failed refresh
    /// is logged and flagged through [`posts_stale`](Self::posts_stale).
    ///
    /// # Errors
    /// - Connection or insert failures leave draft and flag untouched.
    pub fn submit(&mut self) -> Result<SubmitOutcome, SessionError> {
        let started_at = Instant::now();
        let new_post = match self.form.prepare_submit() {
            Ok(new_post) => new_post,
            Err(DraftValidationError::EmptyField(field)) => {
                info!("event=post_submit module=service status=rejected field={field}");
                return Ok(SubmitOutcome::Rejected(field));
            }
        };

        let conn = self.connections.get_connection()?;
        let created = match SqlitePostRepository::new(conn).create_post(&new_post) {
            Ok(created) => created,
            Err(err) => {
                error!(
                    "event=post_submit module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };
        info!(
            "event=post_submit module=service status=ok post_id={} author_id={} category_count={} duration_ms={}",
            created.id,
            created.author.id,
            created.categories.len(),
            started_at.elapsed().as_millis()
        );

        if let Err(err) = self.refresh_posts() {
            warn!(
                "event=posts_load module=service status=stale post_id={} error={}",
                created.id, err
            );
        }
        self.form.reset();

        Ok(SubmitOutcome::Saved(created.id))
    }

    /// Closes the owned connection.
    pub fn close(self) -> Result<(), SessionError> {
        self.connections.close()?;
        Ok(())
    }
}
