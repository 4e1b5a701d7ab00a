//! Error types for encoding, decoding, and client calls.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::codec::WireFormat;

/// Error while encoding a model object to its wire form.
///
/// Encoding failures are local: they are raised before (or, for the
/// compression stage, while) producing the request body, and never leave a
/// partial submission behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("number value {value} is not finite")]
    NonFiniteNumber { value: f64 },

    #[error("wall-clock time {datetime} does not exist in the local system timezone")]
    InvalidLocalTime { datetime: NaiveDateTime },

    #[error("deflate compression failed: {0}")]
    CompressionFailed(String),
}

/// Error while decoding a server response body.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON in response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown value type tag: {found:?}")]
    UnknownValueKind { found: String },
}

/// Connection-level transport failure (refused connection, timeout,
/// interrupted body transfer).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error returned by client operations.
///
/// Every failure is fatal to the single call in progress; the client never
/// retries and retains no partial submission state.
#[derive(Debug, Error)]
pub enum Error {
    #[error("encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("decoding response failed: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{endpoint} is not available on servers speaking {format:?}")]
    NotImplemented {
        endpoint: &'static str,
        format: WireFormat,
    },
}
