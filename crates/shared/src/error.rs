use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of failure kinds reported by the authentication backend.
///
/// Codes this client does not know about deserialize as [`ErrorCode::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    EmailFormatInvalid,
    PasswordFormatInvalid,
    EmailEmpty,
    PasswordEmpty,
    UserUnauthorized,
    ServerUnavailable,
    Transport,
    Internal,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    pub code: ErrorCode,
    pub message: String,
}

impl RemoteError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Transport, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unknown, message)
    }
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct RemoteException {
    pub code: ErrorCode,
    pub message: String,
}

impl From<RemoteError> for RemoteException {
    fn from(value: RemoteError) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}
