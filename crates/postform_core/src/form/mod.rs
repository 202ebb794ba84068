//! Draft state behind the four-field post form.
//!
//! # Responsibility
//! - Hold the in-progress field values and the submit error flag.
//! - Turn a complete draft into a `NewPost`.
//!
//! # Invariants
//! - Field edits never validate; validation happens on submit only.
//! - Every edit replaces the draft with a new value touching one field.

pub mod controller;
pub mod draft;
