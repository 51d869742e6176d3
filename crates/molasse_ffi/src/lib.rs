//! Flutter-facing bindings over `molasse_core`.

pub mod api;
