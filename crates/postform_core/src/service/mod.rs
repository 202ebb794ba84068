//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate form state, repository calls and the post snapshot into the
//!   single-screen post form workflow.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod post_form;
