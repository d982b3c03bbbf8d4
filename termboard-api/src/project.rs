//! Project model and wire payloads for project CRUD.

use serde::{Deserialize, Serialize};

/// A project as stored by the service. Owns zero or more tasks; task
/// deletion on project removal is the service's concern, not the client's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Server-assigned opaque identifier.
    pub id: String,
    /// Project name, non-empty.
    pub name: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User ids with access to this project.
    #[serde(default)]
    pub invited_users: Vec<String>,
}

/// Payload for `POST /projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    /// Project name, non-empty.
    pub name: String,
    /// User ids invited at creation.
    #[serde(default)]
    pub invited_users: Vec<String>,
}

/// Partial-update payload for `PUT /projects/{projectId}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    /// New name, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement invited-user list, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_users: Option<Vec<String>>,
}

/// Response body of `GET /projects/{userId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectsResponse {
    /// All projects the requested user can access.
    pub projects: Vec<Project>,
}
