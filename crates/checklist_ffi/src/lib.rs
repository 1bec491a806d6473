//! Host-facing bindings for the checklist core.

pub mod api;
