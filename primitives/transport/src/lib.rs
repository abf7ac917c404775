#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `bitcoind-rpc-transport`: JSON-RPC plumbing
//!
//! This crate defines the **transport abstraction** used by the
//! `bitcoind-rpc` client and the JSON-RPC envelope types that travel over it.
//!
//! ## Core Concepts
//!
//! ### `Transport` Trait
//! Sends one [`JsonRpcRequest`] and returns the decoded [`JsonRpcResponse`]
//! envelope. Backends such as `bitcoind-rpc-http` perform the actual I/O.
//! Calls are blocking: a call returns once the round trip completes, fails,
//! or times out.
//!
//! ### Error classification
//! A transport never interprets the daemon's answer. The envelope is handed
//! back untouched and [`JsonRpcResponse::into_result`] splits it into either
//! the raw `result` value or an [`RpcError`] carrying the daemon's numeric
//! code and message. Network-level failures are reported separately as
//! [`TransportError`].
//!
//! ### Wallet routing
//! Bitcoin Core routes wallet RPCs through `/wallet/<name>`.
//! [`Transport::for_wallet`] derives a sibling transport bound to that path
//! which shares the parent's connection pool and request id counter.
//!
//! ## Example
//! ```no_run
//! use transport::{DynTransport, JsonRpcRequest, TransportError};
//!
//! fn demo(transport: DynTransport) -> Result<(), Box<dyn std::error::Error>> {
//!     let request = JsonRpcRequest::new(transport.next_id(), "getblockcount", vec![]);
//!     let height = transport.send(&request)?.into_result()?;
//!     println!("height = {}", height);
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod codes;

/// Type alias for structured error handling in transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Canonical error type for all transport implementations.
///
/// Each variant corresponds to a distinct communication or parsing failure
/// mode. Errors reported by the daemon itself are *not* transport errors,
/// see [`RpcError`].
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// An HTTP-level failure (connection refused, reset, TLS, ...).
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The server answered with a non-success status and no JSON-RPC error body.
    #[error("HTTP status {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The (possibly empty) response body.
        body: String,
    },

    /// Failure to serialize or deserialize a JSON payload.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The response did not conform to the expected JSON-RPC envelope format.
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// The response id does not correlate with the request that was sent.
    #[error("Response id {received} does not match request id {expected}")]
    IdMismatch {
        /// Id of the request that was sent.
        expected: u64,
        /// Id found in the response envelope.
        received: Value,
    },

    /// Any other error not covered by the specific variants above.
    #[error("Other error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self { TransportError::Serialization(err.to_string()) }
}

/// An error object reported by the daemon in a JSON-RPC response.
///
/// The binding keeps the raw numeric code and message. Callers that expect a
/// particular failure match on [`RpcError::code`] (see [`codes`] for the
/// common ones) rather than on a dedicated error type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("RPC error {code}: {message}")]
pub struct RpcError {
    /// The JSON-RPC error code.
    pub code: i64,
    /// The human readable message.
    pub message: String,
}

impl RpcError {
    /// Builds an `RpcError` from a raw JSON-RPC `error` object.
    ///
    /// Objects that do not carry an integer `code` and string `message` are
    /// still reported, with code [`codes::UNKNOWN`] and the raw JSON as
    /// message, so no daemon failure is ever lost.
    pub fn from_error_object(error: &Value) -> Self {
        let code = error.get("code").and_then(Value::as_i64);
        let message = error.get("message").and_then(Value::as_str);
        match (code, message) {
            (Some(code), Some(message)) => Self { code, message: message.to_string() },
            (Some(code), None) => Self { code, message: error.to_string() },
            _ => Self { code: codes::UNKNOWN, message: error.to_string() },
        }
    }

    /// Returns `true` if this error carries the given code.
    pub fn is(&self, code: i64) -> bool { self.code == code }
}

/// A single JSON-RPC request.
///
/// Immutable once built; a fresh request is constructed for every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: String,
    params: Vec<Value>,
}

impl JsonRpcRequest {
    /// Creates a JSON-RPC 2.0 request with positional parameters.
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self { jsonrpc: "2.0", id, method: method.into(), params }
    }

    /// The request id.
    pub fn id(&self) -> u64 { self.id }

    /// The RPC method name.
    pub fn method(&self) -> &str { &self.method }

    /// The ordered parameter list.
    pub fn params(&self) -> &[Value] { &self.params }
}

/// A JSON-RPC response envelope as returned by the daemon.
///
/// Fields correspond to the `{result, error, id}` members of the envelope.
/// A `null` member deserializes to `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcResponse {
    /// The value returned by the RPC call, if successful.
    #[serde(default)]
    pub result: Option<Value>,
    /// The error object returned by the server, if any.
    #[serde(default)]
    pub error: Option<Value>,
    /// The identifier correlating request and response.
    #[serde(default)]
    pub id: Value,
}

impl JsonRpcResponse {
    /// Builds a success envelope.
    pub fn success(id: u64, result: Value) -> Self {
        Self { result: Some(result), error: None, id: Value::from(id) }
    }

    /// Builds an error envelope.
    pub fn failure(id: u64, code: i64, message: impl Into<String>) -> Self {
        let error = serde_json::json!({ "code": code, "message": message.into() });
        Self { result: None, error: Some(error), id: Value::from(id) }
    }

    /// Returns `true` if the envelope carries a non-null `error` member.
    pub fn is_error(&self) -> bool { self.error.as_ref().is_some_and(|e| !e.is_null()) }

    /// Checks that this response answers `request`.
    ///
    /// Error envelopes are exempt: the daemon answers unparsable requests with
    /// a `null` id.
    pub fn check_id(&self, request: &JsonRpcRequest) -> Result<()> {
        if self.is_error() || self.id.as_u64() == Some(request.id()) {
            Ok(())
        } else {
            Err(TransportError::IdMismatch { expected: request.id(), received: self.id.clone() })
        }
    }

    /// Classifies the envelope.
    ///
    /// A non-null `error` always wins over `result` and becomes an
    /// [`RpcError`]. Otherwise the raw `result` is returned; a missing or
    /// `null` result yields [`Value::Null`], which is what the daemon sends
    /// for calls with no return value.
    pub fn into_result(self) -> std::result::Result<Value, RpcError> {
        match self.error {
            Some(error) if !error.is_null() => {
                let error = RpcError::from_error_object(&error);
                tracing::warn!(
                    code = error.code,
                    message = %error.message,
                    "daemon reported an error"
                );
                Err(error)
            }
            _ => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// The base transport trait.
///
/// Implementations must be safe to share between threads; a single transport
/// is typically shared by a base client and every wallet-scoped client
/// derived from it.
pub trait Transport: Send + Sync {
    /// Sends a single request and returns the decoded response envelope.
    ///
    /// A JSON-RPC error envelope is a successful *transport* outcome and must
    /// be returned as `Ok`, even when it arrives with a non-2xx HTTP status.
    fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse>;

    /// Returns the endpoint this transport posts to, including any wallet path.
    fn endpoint(&self) -> &str;

    /// Allocates the id for the next request.
    fn next_id(&self) -> u64;

    /// Derives a transport that targets `<base endpoint>/wallet/<name>`.
    ///
    /// Always resolves against the base endpoint, so deriving from an already
    /// wallet-scoped transport re-targets rather than nests.
    fn for_wallet(&self, wallet: &str) -> DynTransport;

    /// Builds a request for `method`, sends it and classifies the answer.
    ///
    /// The outer `Result` is the transport outcome; the inner one is the
    /// daemon's, as split by [`JsonRpcResponse::into_result`].
    fn call(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<std::result::Result<Value, RpcError>> {
        let request = JsonRpcRequest::new(self.next_id(), method, params);
        Ok(self.send(&request)?.into_result())
    }
}

/// Type alias for a shared, dynamically dispatched transport instance.
pub type DynTransport = Arc<dyn Transport>;

/// A shared, monotonically increasing request id counter.
///
/// Clones share the same counter, so ids stay unique across a base transport
/// and the wallet transports derived from it.
#[derive(Debug, Clone, Default)]
pub struct RequestIds(Arc<AtomicU64>);

impl RequestIds {
    /// Returns the next id, starting at 1.
    pub fn next(&self) -> u64 { self.0.fetch_add(1, Ordering::Relaxed) + 1 }
}

/// Transport configuration for the HTTP backend.
///
/// Built once and handed to the transport at construction; wallet-scoped
/// transports derive from it.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use transport::{Auth, TransportConfig};
///
/// let config = TransportConfig::new("http://127.0.0.1:18443")
///     .with_auth(Auth::basic("rpcuser", "rpcpassword"))
///     .with_timeout(Duration::from_secs(15));
/// assert_eq!(config.endpoint, "http://127.0.0.1:18443");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    /// Base endpoint URL, without any wallet path.
    pub endpoint: String,
    /// Authentication settings.
    pub auth: Auth,
    /// Per-call timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    /// Creates an unauthenticated configuration with no timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), auth: Auth::None, timeout: None }
    }

    /// Sets the authentication method.
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Authentication for RPC connections.
#[derive(Clone, PartialEq)]
pub enum Auth {
    /// No credentials.
    None,
    /// HTTP basic authentication (`rpcuser` / `rpcpassword`).
    Basic {
        /// RPC username.
        user: String,
        /// RPC password.
        password: String,
    },
    /// Credentials read from a Bitcoin Core `.cookie` file.
    CookieFile(PathBuf),
}

impl Auth {
    /// Shorthand for [`Auth::Basic`].
    pub fn basic(user: impl Into<String>, password: impl Into<String>) -> Self {
        Auth::Basic { user: user.into(), password: password.into() }
    }

    /// Resolves the credentials to a `(user, password)` pair.
    ///
    /// For [`Auth::CookieFile`] this reads the file, whose single line has
    /// the form `user:password`.
    ///
    /// # Errors
    /// Returns `TransportError::Other` if the cookie file cannot be read, is
    /// empty, or has no colon.
    pub fn credentials(&self) -> Result<Option<(String, String)>> {
        match self {
            Auth::None => Ok(None),
            Auth::Basic { user, password } => Ok(Some((user.clone(), password.clone()))),
            Auth::CookieFile(path) => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    TransportError::Other(format!("Failed to read cookie file: {}", e))
                })?;
                let line = contents
                    .lines()
                    .next()
                    .filter(|line| !line.is_empty())
                    .ok_or_else(|| TransportError::Other("Cookie file is empty".to_string()))?;
                let (user, password) = line.split_once(':').ok_or_else(|| {
                    TransportError::Other("Invalid cookie file format: missing colon".to_string())
                })?;
                Ok(Some((user.to_string(), password.to_string())))
            }
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .field("password", &"<redacted>")
                .finish(),
            Auth::CookieFile(path) => f.debug_tuple("CookieFile").field(path).finish(),
        }
    }
}
