//! # Call Status
//!
//! Every call that does not complete successfully terminates with a [`Status`]:
//! a [`Code`] naming the failure class plus a human readable message.
//! Handlers, clients and streams all speak this one error type so a caller can
//! match on the code without caring which side of the call produced it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure classes a call can terminate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Code {
    /// The caller cancelled the call explicitly or abandoned it.
    Cancelled,
    /// A request field (usually an identifier) could not be parsed.
    InvalidArgument,
    /// The caller's deadline elapsed before the call completed.
    DeadlineExceeded,
    /// A well-formed identifier matched no record.
    NotFound,
    /// Store or server failure not attributable to the caller.
    Internal,
    /// The call could not be delivered because the server is gone.
    Unavailable,
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Code::Cancelled => "cancelled",
            Code::InvalidArgument => "invalid_argument",
            Code::DeadlineExceeded => "deadline_exceeded",
            Code::NotFound => "not_found",
            Code::Internal => "internal",
            Code::Unavailable => "unavailable",
        };
        f.write_str(name)
    }
}

/// Terminal error outcome of a call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(Code::Cancelled, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, message)
    }

    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(Code::DeadlineExceeded, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(Code::Unavailable, message)
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_includes_code_and_message() {
        let status = Status::not_found("Cannot find blog with the provided id");
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(
            status.to_string(),
            "not_found: Cannot find blog with the provided id"
        );
    }
}
