//! Persisted record types for the post form.
//!
//! # Responsibility
//! - Define the Author, Category and Post records plus their write-side
//!   shapes.
//!
//! # Invariants
//! - Identifiers are assigned by storage and increase monotonically.
//! - Records are immutable once persisted.

pub mod post;
