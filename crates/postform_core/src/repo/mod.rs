//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the post data access contract used by the save workflow and the
//!   list loader.
//! - Isolate SQLite query details from session orchestration.
//!
//! # Invariants
//! - A post and its related rows are written in one transaction.
//! - Read paths return every stored post, even one left without categories.

pub mod post_repo;
