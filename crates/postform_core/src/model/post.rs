//! Author/Category/Post records.
//!
//! # Responsibility
//! - Carry persisted rows with their resolved relations.
//! - Carry not-yet-persisted rows (`New*`) from the save workflow to the
//!   repository.
//!
//! # Invariants
//! - A `Post` is created with one author and at least one category; deleting
//!   a category afterwards can leave `categories` empty on read.
//! - `New*` values carry no identifier; storage assigns it on insert.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Row id of `author`.
    AuthorId
);
row_id!(
    /// Row id of `category`.
    CategoryId
);
row_id!(
    /// Row id of `post`.
    PostId
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Persisted post with its author and categories resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author: Author,
    pub categories: Vec<Category>,
}

impl Post {
    /// Projection shown by the saved-post table.
    pub fn row(&self) -> PostRow {
        PostRow {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

/// The id/title/content triple the list UI displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRow {
    pub id: PostId,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

/// A post plus the author and categories to insert alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: NewAuthor,
    pub categories: Vec<NewCategory>,
}

impl NewPost {
    /// Builds the single-category post the form produces.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: NewAuthor {
                name: author.into(),
            },
            categories: vec![NewCategory {
                name: category.into(),
            }],
        }
    }
}
