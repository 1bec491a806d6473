//! Core use-case services.
//!
//! # Responsibility
//! - Drive checklist transitions and snapshot persistence for hosts.
//! - Keep FFI/UI layers decoupled from storage details.

pub mod checklist_service;
