//! Flutter-facing bindings for the post form core.

pub mod api;
