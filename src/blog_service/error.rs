//! Error types for the blog service.

use crate::framework::Status;
use crate::store::{ObjectIdError, StoreError};
use thiserror::Error;

/// Errors that can occur during blog operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BlogError {
    /// The identifier is not a well-formed store id.
    #[error("Cannot parse id: {0}")]
    InvalidId(#[from] ObjectIdError),

    /// The identifier is well-formed but no post has it.
    #[error("Blog not found: {0}")]
    NotFound(String),

    /// The store failed.
    #[error("Blog store error: {0}")]
    Store(#[from] StoreError),
}

impl From<BlogError> for Status {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::InvalidId(_) => Status::invalid_argument("Cannot parse id"),
            BlogError::NotFound(_) => {
                Status::not_found("Cannot find blog with the provided id")
            }
            BlogError::Store(e) => Status::internal(format!("internal error: {e}")),
        }
    }
}
