//! # docportal
//!
//! A small document portal: admins upload files with a title, students
//! browse and download them. Usable as a standalone binary or as a library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::PathBuf;
//! use docportal::server::{AppState, create_router};
//! use docportal::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/portal.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), PathBuf::from("./data")));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the CLI module. Disable with `default-features = false`.

pub mod accounts;
pub mod auth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod documents;
pub mod error;
pub mod portal;
pub mod server;
pub mod session;
pub mod store;
pub mod types;
