//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the post form workflow to Dart via FRB.
//! - Hold the one form session the screen drives between calls.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - The session exists only between `form_open` and `form_close`.
//! - Failures come back as `ok=false` envelopes with a message.

use log::warn;
use postform_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ConnectionManager, DbConfig, FormField, PostDraft, PostFormSession, PostRow, SubmitOutcome,
};
use std::sync::{Mutex, MutexGuard, PoisonError};

const DB_PATH_ENV: &str = "POSTFORM_DB_PATH";

static FORM_SESSION: Mutex<Option<PostFormSession>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Static description of one form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFieldDescriptor {
    /// `author|category|title|content`.
    pub key: String,
    pub placeholder: String,
    pub multiline: bool,
    pub visible_lines: u8,
}

/// Current draft values plus the error flag that highlights inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormStateView {
    pub author: String,
    pub category: String,
    pub title: String,
    pub content: String,
    pub error: bool,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormActionResponse {
    pub ok: bool,
    pub message: String,
}

/// Response envelope for draft reads and edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStateResponse {
    pub ok: bool,
    pub state: FormStateView,
    pub message: String,
}

/// Response envelope for submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmitResponse {
    /// Whether a post was stored.
    pub ok: bool,
    pub post_id: Option<i64>,
    /// Key of the first empty field when the submit was rejected.
    pub rejected_field: Option<String>,
    /// Draft after the submit (empty on success).
    pub state: FormStateView,
    pub message: String,
}

/// One row of the saved-post table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRowView {
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// Saved-post table, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListResponse {
    pub ok: bool,
    pub items: Vec<PostRowView>,
    pub message: String,
}

/// Lists the form inputs in on-screen order.
#[flutter_rust_bridge::frb(sync)]
pub fn form_fields() -> Vec<FormFieldDescriptor> {
    FormField::ALL
        .into_iter()
        .map(|field| FormFieldDescriptor {
            key: field.key().to_string(),
            placeholder: field.placeholder().to_string(),
            multiline: field.is_multiline(),
            visible_lines: field.visible_lines(),
        })
        .collect()
}

/// Opens the form session and loads saved posts.
///
/// Input semantics:
/// - `db_path`: SQLite file path. Blank falls back to `POSTFORM_DB_PATH`,
///   then `<temp dir>/expo.sqlite3`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Replaces (and closes) any session that is already open.
#[flutter_rust_bridge::frb(sync)]
pub fn form_open(db_path: String) -> FormActionResponse {
    let config = resolve_db_config(db_path.as_str());
    let mut slot = lock_session();
    if let Some(previous) = slot.take() {
        if let Err(err) = previous.close() {
            warn!("event=form_open module=ffi status=warn close_previous_error={err}");
        }
    }

    match PostFormSession::start(ConnectionManager::new(config)) {
        Ok(session) => {
            let count = session.posts().len();
            *slot = Some(session);
            FormActionResponse {
                ok: true,
                message: format!("Form opened with {count} saved post(s)."),
            }
        }
        Err(err) => FormActionResponse {
            ok: false,
            message: format!("form_open failed: {err}"),
        },
    }
}

/// Closes the form session and its database handle.
#[flutter_rust_bridge::frb(sync)]
pub fn form_close() -> FormActionResponse {
    let Some(session) = lock_session().take() else {
        return FormActionResponse {
            ok: true,
            message: "Form was not open.".to_string(),
        };
    };

    match session.close() {
        Ok(()) => FormActionResponse {
            ok: true,
            message: "Form closed.".to_string(),
        },
        Err(err) => FormActionResponse {
            ok: false,
            message: format!("form_close failed: {err}"),
        },
    }
}

/// Returns current draft values and error flag.
#[flutter_rust_bridge::frb(sync)]
pub fn form_state() -> FormStateResponse {
    edit_draft("form_state", |_| {})
}

#[flutter_rust_bridge::frb(sync)]
pub fn form_set_author(value: String) -> FormStateResponse {
    edit_draft("form_set_author", |session| session.set_author(value))
}

#[flutter_rust_bridge::frb(sync)]
pub fn form_set_category(value: String) -> FormStateResponse {
    edit_draft("form_set_category", |session| session.set_category(value))
}

#[flutter_rust_bridge::frb(sync)]
pub fn form_set_title(value: String) -> FormStateResponse {
    edit_draft("form_set_title", |session| session.set_title(value))
}

#[flutter_rust_bridge::frb(sync)]
pub fn form_set_content(value: String) -> FormStateResponse {
    edit_draft("form_set_content", |session| session.set_content(value))
}

/// Submits the current draft.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Rejected drafts return `ok=false`, `rejected_field`, and `state.error=true`.
/// - Storage failures return `ok=false` with the unchanged draft.
#[flutter_rust_bridge::frb(sync)]
pub fn form_submit() -> FormSubmitResponse {
    let mut slot = lock_session();
    let Some(session) = slot.as_mut() else {
        return FormSubmitResponse {
            ok: false,
            post_id: None,
            rejected_field: None,
            state: FormStateView::default(),
            message: not_open_message("form_submit"),
        };
    };

    let result = session.submit();
    let state = state_view(session.draft(), session.has_error());
    match result {
        Ok(SubmitOutcome::Saved(post_id)) => FormSubmitResponse {
            ok: true,
            post_id: Some(post_id.get()),
            rejected_field: None,
            state,
            message: if session.posts_stale() {
                "Post saved; saved-post list could not be refreshed.".to_string()
            } else {
                "Post saved.".to_string()
            },
        },
        Ok(SubmitOutcome::Rejected(field)) => FormSubmitResponse {
            ok: false,
            post_id: None,
            rejected_field: Some(field.key().to_string()),
            state,
            message: "All fields are required.".to_string(),
        },
        Err(err) => FormSubmitResponse {
            ok: false,
            post_id: None,
            rejected_field: None,
            state,
            message: format!("form_submit failed: {err}"),
        },
    }
}

/// Returns the saved-post table as last published by the session.
#[flutter_rust_bridge::frb(sync)]
pub fn form_posts() -> PostListResponse {
    let slot = lock_session();
    let Some(session) = slot.as_ref() else {
        return PostListResponse {
            ok: false,
            items: Vec::new(),
            message: not_open_message("form_posts"),
        };
    };

    let items = session
        .post_rows()
        .into_iter()
        .map(to_post_row_view)
        .collect::<Vec<_>>();
    let message = if items.is_empty() {
        "No saved posts.".to_string()
    } else {
        format!("{} saved post(s).", items.len())
    };
    PostListResponse {
        ok: true,
        items,
        message,
    }
}

fn lock_session() -> MutexGuard<'static, Option<PostFormSession>> {
    // Poisoning is ignored: session fields are replaced whole, never partially.
    FORM_SESSION.lock().unwrap_or_else(PoisonError::into_inner)
}

fn edit_draft(
    operation: &str,
    edit: impl FnOnce(&mut PostFormSession),
) -> FormStateResponse {
    let mut slot = lock_session();
    match slot.as_mut() {
        Some(session) => {
            edit(session);
            FormStateResponse {
                ok: true,
                state: state_view(session.draft(), session.has_error()),
                message: String::new(),
            }
        }
        None => FormStateResponse {
            ok: false,
            state: FormStateView::default(),
            message: not_open_message(operation),
        },
    }
}

fn state_view(draft: &PostDraft, error: bool) -> FormStateView {
    FormStateView {
        author: draft.author().to_string(),
        category: draft.category().to_string(),
        title: draft.title().to_string(),
        content: draft.content().to_string(),
        error,
    }
}

fn to_post_row_view(row: PostRow) -> PostRowView {
    PostRowView {
        id: row.id.get(),
        title: row.title,
        content: row.content,
    }
}

fn not_open_message(operation: &str) -> String {
    format!("{operation} failed: form is not open; call form_open first")
}

fn resolve_db_config(db_path: &str) -> DbConfig {
    db_config_with_fallback(db_path, std::env::var(DB_PATH_ENV).ok())
}

fn db_config_with_fallback(db_path: &str, env_value: Option<String>) -> DbConfig {
    let trimmed = db_path.trim();
    if !trimmed.is_empty() {
        return DbConfig::file(trimmed);
    }
    if let Some(raw) = env_value {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return DbConfig::file(trimmed);
        }
    }
    DbConfig::default_in(std::env::temp_dir())
}
