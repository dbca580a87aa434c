//! Flutter-facing bindings for checknote core.

pub mod api;
