//! Library crate for userlist-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - Remote user collection types and HTTP backend (`api`)
//! - Application state, user list controller and update loop (`app`)
//! - Error and result types (`error`)
//! - Name filtering and pagination helpers (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `userlist-manager` binary and by tests.
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod error;
pub mod search;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
