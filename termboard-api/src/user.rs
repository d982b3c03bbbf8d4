//! Authentication payloads and the authenticated-user record.

use serde::{Deserialize, Serialize};

/// Payload for `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password, sent only over the login round trip.
    pub password: String,
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Account email, unique.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// The authenticated identity returned by `POST /auth/login` and
/// `GET /auth/user/{id}`: the claims plus the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Server-assigned user id.
    pub id: String,
    /// Account email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Opaque bearer token for subsequent requests.
    pub token: String,
}
