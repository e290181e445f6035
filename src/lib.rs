//! # Studyflow
//!
//! Terminal client for the Studyflow scheduling service: sign in, describe
//! the study tasks you have and how long you have for them, get back an
//! ordered schedule, and step through it one task at a time recording what
//! actually happened (complete, skip, defer, extend).
//!
//! All scheduling intelligence lives server-side; this client owns session
//! persistence, the request/response shapes, and the traversal state
//! machine that walks the generated schedule.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install
//! cargo install studyflow
//!
//! # Open the TUI
//! study
//!
//! # Or sign in from the command line first
//! studyflow login --username me --password secret
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod app;
pub mod core;
pub mod tui;

pub use api::{ApiClient, ApiError, ApiResult, UserInfo};
pub use app::{App, AppMode};
pub use core::{
    Config, Session, SessionStore, Task, TaskAction, Traversal, TraversalError, TraversalState,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "studyflow";

/// Short alias
pub const APP_ALIAS: &str = "study";
