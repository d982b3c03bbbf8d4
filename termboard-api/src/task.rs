//! Task model: status and priority enumerations plus the wire payloads
//! for task CRUD.
//!
//! `TaskStatus` and `TaskPriority` are closed enumerations. The service
//! transmits them as fixed display strings ("Yet To Start", "low", ...);
//! any other string is a deserialization error. Rejecting bad values at
//! construction time keeps a task from silently vanishing off the board
//! while still existing server-side.

use serde::{Deserialize, Serialize};

/// Status of a task, i.e. which board column it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Task has not been started.
    #[serde(rename = "Yet To Start")]
    YetToStart,
    /// Task is actively being worked on.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Task has been completed.
    #[serde(rename = "Completed")]
    Completed,
}

impl TaskStatus {
    /// All statuses in board-column order.
    pub const ALL: [Self; 3] = [Self::YetToStart, Self::InProgress, Self::Completed];

    /// The exact string the service uses for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::YetToStart => "Yet To Start",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// The column to the right of this one, if any.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::YetToStart => Some(Self::InProgress),
            Self::InProgress => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// The column to the left of this one, if any.
    #[must_use]
    pub const fn prev(&self) -> Option<Self> {
        match self {
            Self::YetToStart => None,
            Self::InProgress => Some(Self::YetToStart),
            Self::Completed => Some(Self::InProgress),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Yet To Start" => Ok(Self::YetToStart),
            "In Progress" => Ok(Self::InProgress),
            "Completed" => Ok(Self::Completed),
            other => Err(UnknownValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

impl TaskPriority {
    /// All priorities, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// The exact string the service uses for this priority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(UnknownValue {
                field: "priority",
                value: other.to_string(),
            }),
        }
    }
}

/// A string that is not a member of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value: {value:?}")]
pub struct UnknownValue {
    /// Which field the value was offered for.
    pub field: &'static str,
    /// The offending string.
    pub value: String,
}

/// A task as stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned opaque identifier, immutable.
    pub id: String,
    /// Task title, non-empty.
    pub title: String,
    /// Free-form description, may be empty.
    #[serde(default)]
    pub description: String,
    /// Task priority.
    pub priority: TaskPriority,
    /// Task status (board column).
    pub status: TaskStatus,
    /// Owning project, immutable after creation.
    pub project_id: String,
}

/// Payload for `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Task title, non-empty.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Task priority.
    pub priority: TaskPriority,
    /// Initial status.
    pub status: TaskStatus,
    /// Owning project.
    pub project_id: String,
}

/// Partial-update payload for `PUT /tasks/{projectId}/{taskId}`.
///
/// Fields left as `None` are omitted from the request body and unchanged
/// server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New priority, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// New status, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// A patch that changes only the status. This is the drag-and-drop
    /// commit shape: nothing else may ride along.
    #[must_use]
    pub const fn status_only(status: TaskStatus) -> Self {
        Self {
            title: None,
            description: None,
            priority: None,
            status: Some(status),
        }
    }

    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }
}

/// Response body of `GET /tasks/{projectId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksResponse {
    /// All tasks belonging to the requested project.
    #[serde(rename = "projectTasks")]
    pub project_tasks: Vec<Task>,
}
