//! Post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert a post together with a fresh author and fresh categories.
//! - Read posts back with their relations resolved.
//!
//! # Invariants
//! - `create_post` is all-or-nothing: author, categories, post and junction
//!   rows commit together or not at all.
//! - Author/category rows are never looked up by name; every insert creates
//!   new rows.
//! - Lists are ordered newest first (`id DESC`).
//! - Reads tolerate posts whose categories were deleted later; such posts
//!   come back with an empty `categories` list.

use crate::db::schema::{AUTHOR_TABLE, CATEGORY_TABLE, POST_CATEGORIES_TABLE, POST_TABLE};
use crate::db::DbError;
use crate::model::post::{Author, AuthorId, Category, CategoryId, NewPost, Post, PostId};
use log::warn;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for post persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Write input breaks a record invariant.
    Validation(String),
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "invalid post: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for posts.
pub trait PostRepository {
    /// Inserts the post with its author and categories; returns the stored
    /// record.
    fn create_post(&mut self, post: &NewPost) -> RepoResult<Post>;
    /// Gets one post with relations.
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    /// Lists every post, newest first.
    fn list_posts(&self) -> RepoResult<Vec<Post>>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Wraps a schema-synchronized connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&mut self, post: &NewPost) -> RepoResult<Post> {
        if post.categories.is_empty() {
            return Err(RepoError::Validation(
                "a post needs at least one category".to_string(),
            ));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            &format!("INSERT INTO {AUTHOR_TABLE} (name) VALUES (?1);"),
            [post.author.name.as_str()],
        )?;
        let author = Author {
            id: AuthorId(tx.last_insert_rowid()),
            name: post.author.name.clone(),
        };

        let mut categories = Vec::with_capacity(post.categories.len());
        for category in &post.categories {
            tx.execute(
                &format!("INSERT INTO {CATEGORY_TABLE} (name) VALUES (?1);"),
                [category.name.as_str()],
            )?;
            categories.push(Category {
                id: CategoryId(tx.last_insert_rowid()),
                name: category.name.clone(),
            });
        }

        tx.execute(
            &format!("INSERT INTO {POST_TABLE} (title, content, author_id) VALUES (?1, ?2, ?3);"),
            params![post.title.as_str(), post.content.as_str(), author.id.get()],
        )?;
        let post_id = PostId(tx.last_insert_rowid());

        for category in &categories {
            tx.execute(
                &format!(
                    "INSERT INTO {POST_CATEGORIES_TABLE} (post_id, category_id) VALUES (?1, ?2);"
                ),
                params![post_id.get(), category.id.get()],
            )?;
        }

        tx.commit()?;

        Ok(Post {
            id: post_id,
            title: post.title.clone(),
            content: post.content.clone(),
            author,
            categories,
        })
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        let mut stmt = self.conn.prepare(&format!("{} WHERE p.id = ?1;", post_select_sql()))?;
        let mut rows = stmt.query([id.get()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_post_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn list_posts(&self) -> RepoResult<Vec<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY p.id DESC;", post_select_sql()))?;
        let mut rows = stmt.query([])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(self.conn, row)?);
        }
        Ok(posts)
    }
}

fn post_select_sql() -> String {
    format!(
        "SELECT
            p.id AS post_id,
            p.title AS title,
            p.content AS content,
            a.id AS author_id,
            a.name AS author_name
         FROM {POST_TABLE} p
         INNER JOIN {AUTHOR_TABLE} a ON a.id = p.author_id"
    )
}

fn parse_post_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Post> {
    let id = PostId(row.get("post_id")?);
    let categories = load_categories_for_post(conn, id)?;
    if categories.is_empty() {
        warn!("event=post_read module=repo status=warn post_id={id} reason=no_category");
    }

    Ok(Post {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        author: Author {
            id: AuthorId(row.get("author_id")?),
            name: row.get("author_name")?,
        },
        categories,
    })
}

fn load_categories_for_post(conn: &Connection, post_id: PostId) -> RepoResult<Vec<Category>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT c.id, c.name
         FROM {POST_CATEGORIES_TABLE} pc
         INNER JOIN {CATEGORY_TABLE} c ON c.id = pc.category_id
         WHERE pc.post_id = ?1
         ORDER BY c.id ASC;"
    ))?;
    let mut rows = stmt.query([post_id.get()])?;
    let mut categories = Vec::new();
    while let Some(row) = rows.next()? {
        categories.push(Category {
            id: CategoryId(row.get(0)?),
            name: row.get(1)?,
        });
    }
    Ok(categories)
}
