use storedash_client::{ApiError, DeleteConflict};
use storedash_core::{OrderError, ValidationErrors};
use thiserror::Error;

/// Why a synchronizer or page action did not complete.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The server call failed; the store kept its confirmed state.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The draft failed client-side checks; nothing was sent.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// A previous change to this entity has not resolved yet.
    #[error("a change to {label} {id} is still in progress")]
    Busy { label: &'static str, id: String },

    #[error("{label} {id} not found")]
    NotFound { label: &'static str, id: String },

    /// The entity is in a state whose status cannot be changed.
    #[error("{0}")]
    Frozen(String),

    #[error("no delete is awaiting confirmation")]
    NothingStaged,

    #[error("no form is open")]
    FormNotOpen,

    /// The page was unmounted before the response arrived.
    #[error("page is no longer mounted")]
    Unmounted,

    #[error(transparent)]
    Order(#[from] OrderError),
}

impl SyncError {
    /// The conflict dialog payload, when a delete was blocked.
    #[must_use]
    pub fn conflict(&self) -> Option<&DeleteConflict> {
        match self {
            SyncError::Api(ApiError::Conflict(conflict)) => Some(conflict),
            _ => None,
        }
    }
}
