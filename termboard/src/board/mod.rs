//! Board state: the three-column task partition and the reconciler that
//! keeps it aligned with the server.

pub mod partition;
pub mod reconciler;

pub use partition::BoardPartition;
pub use reconciler::{BoardReconciler, LoadTicket, PendingDrop, TaskDraft};

use crate::api::ApiError;

/// Errors from board operations.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// A task was submitted with an empty title. Checked before any
    /// request is issued.
    #[error("task title must not be empty")]
    TitleEmpty,

    /// An operation needs a project but none is loaded.
    #[error("no project loaded")]
    NoProject,

    /// The service call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}
