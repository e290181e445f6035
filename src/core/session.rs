//! Session persistence.
//!
//! A single file-backed slot holding the authenticated session. The store
//! is an explicit dependency: whoever constructs the app decides where the
//! session lives, which keeps the token flow visible and testable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// An authenticated session with the scheduling service.
///
/// Token and user id travel together: a persisted session either
/// deserializes completely or counts as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token.
    pub token: String,

    /// Server-side user identifier.
    pub user_id: i64,
}

/// File-backed store for the current session.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    current: Option<Session>,
}

impl SessionStore {
    /// Open the store at `path`, rehydrating a previously persisted
    /// session if one is present and well-formed.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = load_session(&path);
        Self { path, current }
    }

    /// Default session file location.
    ///
    /// `STUDYFLOW_DATA_DIR` overrides the platform data directory, which
    /// the integration tests rely on.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let data_dir = match std::env::var_os("STUDYFLOW_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
                .join("studyflow"),
        };
        Ok(data_dir.join("session.toml"))
    }

    /// The active session, if any.
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Store and persist a new session.
    ///
    /// The file is written via a temp-file rename so the on-disk copy is
    /// never partial; the in-memory slot only updates once the write
    /// succeeded.
    pub fn persist(&mut self, session: Session) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&session)?;
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;

        self.current = Some(session);
        Ok(())
    }

    /// Clear both the persisted and in-memory copies.
    ///
    /// If removing the file fails neither copy changes, so the two can
    /// never disagree.
    pub fn clear(&mut self) -> anyhow::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.current = None;
        Ok(())
    }
}

fn load_session(path: &Path) -> Option<Session> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!("Ignoring malformed session file {}: {e}", path.display());
            None
        }
    }
}
