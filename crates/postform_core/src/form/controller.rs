//! Form state controller.
//!
//! Owns the current [`PostDraft`] and the error flag that drives the
//! highlighted-input styling of the UI.

use super::draft::{DraftValidationError, PostDraft};
use crate::model::post::NewPost;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormController {
    draft: PostDraft,
    error: bool,
}

impl FormController {
    /// Empty draft, error flag cleared.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &PostDraft {
        &self.draft
    }

    /// Whether the last submit was rejected for an empty field.
    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn set_author(&mut self, value: impl Into<String>) {
        self.draft = std::mem::take(&mut self.draft).with_author(value);
    }

    pub fn set_category(&mut self, value: impl Into<String>) {
        self.draft = std::mem::take(&mut self.draft).with_category(value);
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.draft = std::mem::take(&mut self.draft).with_title(value);
    }

    pub fn set_content(&mut self, value: impl Into<String>) {
        self.draft = std::mem::take(&mut self.draft).with_content(value);
    }

    /// Validates the draft for submission, raising the error flag on failure.
    ///
    /// A passing draft leaves the flag as is; it is cleared by [`reset`](Self::reset)
    /// once the post is stored.
    pub fn prepare_submit(&mut self) -> Result<NewPost, DraftValidationError> {
        self.draft.validate().inspect_err(|_| self.error = true)
    }

    /// Back to four empty fields with the error flag cleared.
    pub fn reset(&mut self) {
        self.draft = PostDraft::new();
        self.error = false;
    }
}
