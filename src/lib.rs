//! Library crate for rbac-admin.
//!
//! This crate exposes the building blocks of the TUI:
//! - Entity model shared by every layer (`model`)
//! - Entity stores and their transport seam (`store`)
//! - Session gate (`auth`) and the owning state container (`context`)
//! - Search, sort and derived list views (`search`, `sort`, `view`)
//! - Field-level form validation (`form`)
//! - Application state and update loop (`app`)
//! - Error and result types (`error`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `rbac-admin` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod auth;
pub mod context;
pub mod error;
pub mod form;
pub mod model;
pub mod search;
pub mod sort;
pub mod store;
pub mod ui;
pub mod view;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{AdminError, AdminResult, DynError, Result};
pub use context::AdminContext;
