//! Persistent login session.
//!
//! After a successful login the user id and bearer token are written to a
//! small TOML file under the platform data directory, so the next launch
//! can skip the login step. On startup the stored token is re-validated
//! against the service:
//!
//! - a 401 means the token is dead, so the stored session is deleted and
//!   the user must log in again;
//! - any other failure (server down, flaky network) keeps the stored
//!   claims so a transient outage does not log the user out.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use termboard_api::user::AuthUser;

use crate::api::{ApiClient, ApiError};

/// Errors from reading or writing the session file.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to read or write the session file.
    #[error("session file {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The session file is not valid TOML.
    #[error("failed to parse session file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The session could not be serialized.
    #[error("failed to encode session: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// A logged-in user's claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Server-assigned user id.
    pub user_id: String,
    /// Account email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Bearer token for authenticated requests.
    pub token: String,
}

impl From<AuthUser> for Session {
    fn from(user: AuthUser) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            name: user.name,
            token: user.token,
        }
    }
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default location, `<data_dir>/termboard/session.toml`.
    /// `None` when the platform has no data directory.
    #[must_use]
    pub fn default_location() -> Option<Self> {
        let path = dirs::data_dir()?.join("termboard").join("session.toml");
        Some(Self::at(path))
    }

    /// Store at an explicit path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the session lives on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored session, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(toml::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Writes the session, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the file cannot be written.
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = toml::to_string_pretty(session)?;
        std::fs::write(&self.path, contents).map_err(io_err)
    }

    /// Deletes the stored session. Missing file is fine.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// Re-validates the stored session against the service.
///
/// Returns the session to use, or `None` if the user must log in.
///
/// # Errors
///
/// Returns [`SessionError`] only for session file problems; service
/// failures are absorbed per the policy described in the module docs.
pub async fn resolve_session(
    api: &ApiClient,
    store: &SessionStore,
) -> Result<Option<Session>, SessionError> {
    let Some(stored) = store.load()? else {
        return Ok(None);
    };

    let authed = api.with_token(&stored.token);
    match authed.current_user(&stored.user_id).await {
        Ok(user) => {
            let refreshed = Session::from(user);
            if refreshed != stored {
                store.save(&refreshed)?;
            }
            Ok(Some(refreshed))
        }
        Err(ApiError::Unauthorized) => {
            tracing::info!(user_id = %stored.user_id, "stored session rejected, logging out");
            store.clear()?;
            Ok(None)
        }
        Err(e) => {
            // Transient failure: keep the stored claims rather than
            // forcing a re-login while the service is unreachable.
            tracing::warn!(error = %e, "session re-validation failed, keeping stored session");
            Ok(Some(stored))
        }
    }
}

/// Logs in with credentials and persists the resulting session.
///
/// # Errors
///
/// Returns the service error on bad credentials or transport failure;
/// [`SessionError`] is logged but not fatal, since a session that cannot
/// be persisted still works for this run.
pub async fn login_and_store(
    api: &ApiClient,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> Result<Session, ApiError> {
    let credentials = termboard_api::user::Credentials {
        email: email.to_string(),
        password: password.to_string(),
    };
    let user = api.login(&credentials).await?;
    let session = Session::from(user);
    if let Err(e) = store.save(&session) {
        tracing::warn!(error = %e, "failed to persist session");
    }
    tracing::info!(user_id = %session.user_id, "logged in");
    Ok(session)
}
