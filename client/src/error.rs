//! Client error type.

use transport::{RpcError, TransportError};
use types::DecodeError;

/// Everything a facade call can fail with.
///
/// Each layer's error is carried unmodified, so callers can match on the
/// daemon's raw error code through [`ClientError::rpc_code`].
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// The request never produced a JSON-RPC envelope.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The daemon answered with an error object.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The result did not have the expected shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// An argument was rejected before any request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The client could not be built from configuration.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl ClientError {
    /// The daemon's error code, for [`ClientError::Rpc`].
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            ClientError::Rpc(err) => Some(err.code),
            _ => None,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ClientError::InvalidArgument(msg.into())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self { ClientError::Transport(err.into()) }
}

/// Type alias for client results.
pub type Result<T> = std::result::Result<T, ClientError>;
