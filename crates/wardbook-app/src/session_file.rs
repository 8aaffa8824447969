// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::warn;
use wardbook_model::Session;

/// Durable signed-in state: one JSON file holding one [`Session`]. Absence
/// of the file means signed out. Freshness is not this type's concern; the
/// bootstrap reconciles it against the live service session.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the persisted session. A file that exists but does not hold a
    /// valid session shape is cleared and treated as signed out.
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "session file unreadable");
                return None;
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "session file corrupt, clearing");
                self.clear();
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(session).map_err(io::Error::other)?;
        fs::write(&self.path, bytes)
    }

    pub fn clear(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %err, "session file removal failed");
            }
        }
    }
}
