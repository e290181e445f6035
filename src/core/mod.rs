//! Core functionality: configuration, session persistence, and the
//! schedule traversal engine.

mod config;
mod session;
mod traversal;

pub use config::{Config, GeneralConfig, ServerConfig, UiConfig};
pub use session::{Session, SessionStore};
pub use traversal::{Task, TaskAction, Traversal, TraversalError, TraversalState};
