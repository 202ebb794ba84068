//! Draft record and field metadata.

use crate::model::post::NewPost;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The four inputs of the form, in on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Author,
    Category,
    Title,
    /// Multi-line body input.
    Content,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Author,
        FormField::Category,
        FormField::Title,
        FormField::Content,
    ];

    /// Stable snake_case key shared with the UI shell.
    pub fn key(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Category => "category",
            Self::Title => "title",
            Self::Content => "content",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Author => "Enter Author",
            Self::Category => "Enter Category",
            Self::Title => "Enter Post title",
            Self::Content => "Enter Post content",
        }
    }

    pub fn is_multiline(self) -> bool {
        matches!(self, Self::Content)
    }

    /// Rows the input shows before scrolling.
    pub fn visible_lines(self) -> u8 {
        if self.is_multiline() {
            4
        } else {
            1
        }
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Submit-time validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftValidationError {
    /// First field (in on-screen order) left empty.
    EmptyField(FormField),
}

impl Display for DraftValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "field `{field}` must not be empty"),
        }
    }
}

impl Error for DraftValidationError {}

/// Current values of the four form inputs.
///
/// Fields are private; edits go through the `with_*` constructors, each of
/// which yields a new draft that differs from `self` in one field only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    author: String,
    category: String,
    title: String,
    content: String,
}

impl PostDraft {
    /// Draft with all four fields empty.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn with_author(self, value: impl Into<String>) -> Self {
        Self {
            author: value.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_category(self, value: impl Into<String>) -> Self {
        Self {
            category: value.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_title(self, value: impl Into<String>) -> Self {
        Self {
            title: value.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_content(self, value: impl Into<String>) -> Self {
        Self {
            content: value.into(),
            ..self
        }
    }

    /// Value bound to `field`, for rendering loops over [`FormField::ALL`].
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Author => &self.author,
            FormField::Category => &self.category,
            FormField::Title => &self.title,
            FormField::Content => &self.content,
        }
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|field| self.value(*field).is_empty())
    }

    /// Presence check only: whitespace counts as a value.
    pub fn first_empty_field(&self) -> Option<FormField> {
        FormField::ALL
            .into_iter()
            .find(|field| self.value(*field).is_empty())
    }

    /// Builds the post to persist, or names the first empty field.
    pub fn validate(&self) -> Result<NewPost, DraftValidationError> {
        if let Some(field) = self.first_empty_field() {
            return Err(DraftValidationError::EmptyField(field));
        }

        Ok(NewPost::new(
            self.title.as_str(),
            self.content.as_str(),
            self.author.as_str(),
            self.category.as_str(),
        ))
    }
}
