#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `bitcoind-rpc-http`: HTTP Transport Backend
//!
//! This crate provides a concrete HTTP-based implementation of the
//! [`transport::Transport`] trait, carrying JSON-RPC requests to Bitcoin Core.
//!
//! ## Overview
//!
//! - Implements [`HttpTransport`], a thin wrapper over [`reqwest::blocking::Client`]
//! - Supports unauthenticated, user/password and cookie-file authentication
//! - Routes wallet calls to `/wallet/<name>` through [`Transport::for_wallet`]
//! - Applies a per-call timeout, reported as [`TransportError::Timeout`]
//!
//! ## Example
//! ```no_run
//! use bitcoind_rpc_http::HttpTransport;
//! use transport::{JsonRpcRequest, Transport};
//!
//! let transport = HttpTransport::with_auth("http://127.0.0.1:18443", "rpcuser", "rpcpassword")?;
//! let request = JsonRpcRequest::new(transport.next_id(), "getblockchaininfo", vec![]);
//! let info = transport.send(&request)?.into_result()?;
//! println!("{:#?}", info);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;
use std::sync::Arc;

use reqwest::Url;
use serde_json::Value;
use transport::{
    Auth, DynTransport, JsonRpcRequest, JsonRpcResponse, RequestIds, Result, Transport,
    TransportConfig, TransportError,
};

/// A concrete implementation of the [`Transport`] trait using blocking HTTP.
///
/// `HttpTransport` performs no result typing; it posts the request and
/// returns the response envelope. A JSON-RPC error body is returned as `Ok`
/// even when the daemon sends it with a 404 or 500 status, so the caller
/// sees the daemon's code and message.
///
/// Clones, and wallet transports derived through [`Transport::for_wallet`],
/// share the connection pool and the request id counter.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    /// Base endpoint, without any wallet path.
    base: Url,
    /// URL requests are posted to.
    url: Url,
    /// Display form of `url`.
    endpoint: String,
    auth: Option<(String, String)>,
    ids: RequestIds,
}

impl HttpTransport {
    /// Builds a transport from an explicit configuration.
    ///
    /// Cookie-file credentials are read once, here.
    ///
    /// # Errors
    /// - [`TransportError::InvalidFormat`] if the endpoint is not an absolute HTTP(S) URL
    /// - [`TransportError::Other`] if the cookie file is unreadable or malformed
    /// - [`TransportError::Http`] if the HTTP client cannot be initialised
    pub fn from_config(config: &TransportConfig) -> Result<Self> {
        logging::trace("HTTP", &format!("→ initializing HTTP transport for {}", config.endpoint));

        let base = Url::parse(&config.endpoint).map_err(|e| {
            TransportError::InvalidFormat(format!("invalid endpoint {}: {}", config.endpoint, e))
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(TransportError::InvalidFormat(format!(
                "invalid endpoint {}: expected an http(s) URL",
                config.endpoint
            )));
        }

        let auth = config.auth.credentials()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self {
            client,
            url: base.clone(),
            base,
            endpoint: config.endpoint.clone(),
            auth,
            ids: RequestIds::default(),
        })
    }

    /// Constructs an unauthenticated transport targeting `url`.
    ///
    /// # Example
    /// ```
    /// use bitcoind_rpc_http::HttpTransport;
    /// use transport::Transport;
    ///
    /// let transport = HttpTransport::new("http://127.0.0.1:18443")?;
    /// assert_eq!(transport.endpoint(), "http://127.0.0.1:18443");
    /// # Ok::<(), transport::TransportError>(())
    /// ```
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::from_config(&TransportConfig::new(url))
    }

    /// Constructs a transport with basic authentication.
    pub fn with_auth(
        url: impl Into<String>,
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Result<Self> {
        Self::from_config(&TransportConfig::new(url).with_auth(Auth::basic(user, pass)))
    }

    /// Constructs a transport using credentials from a Bitcoin Core cookie file.
    ///
    /// The cookie file format is a single line containing `username:password`.
    ///
    /// # Example
    /// ```no_run
    /// use bitcoind_rpc_http::HttpTransport;
    ///
    /// let transport = HttpTransport::from_cookie_file(
    ///     "http://127.0.0.1:18443",
    ///     "/home/user/.bitcoin/regtest/.cookie",
    /// )?;
    /// # Ok::<(), transport::TransportError>(())
    /// ```
    pub fn from_cookie_file(url: impl Into<String>, cookie_path: impl AsRef<Path>) -> Result<Self> {
        let auth = Auth::CookieFile(cookie_path.as_ref().to_path_buf());
        Self::from_config(&TransportConfig::new(url).with_auth(auth))
    }

    fn wallet_url(&self, wallet: &str) -> Url {
        let mut url = self.base.clone();
        // `from_config` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("wallet").push(wallet);
        }
        url
    }

    fn request_failed(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            tracing::error!(
                endpoint = %self.endpoint,
                "HTTP Transport - Request timed out: {}",
                err
            );
            TransportError::Timeout(err.to_string())
        } else {
            tracing::error!(endpoint = %self.endpoint, "HTTP Transport - Request failed: {}", err);
            TransportError::Http(err.to_string())
        }
    }
}

impl Transport for HttpTransport {
    /// Posts a single JSON-RPC request and returns the response envelope.
    ///
    /// # Errors
    /// - [`TransportError::Http`] if the connection fails
    /// - [`TransportError::Timeout`] if the configured timeout elapses
    /// - [`TransportError::Status`] for a non-2xx status without a JSON-RPC error body
    /// - [`TransportError::Serialization`] if the body is not JSON
    /// - [`TransportError::InvalidFormat`] if the body is not a JSON-RPC envelope
    /// - [`TransportError::IdMismatch`] if a success envelope answers another request
    fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        tracing::debug!(
            method = request.method(),
            id = request.id(),
            endpoint = %self.endpoint,
            "→ POST"
        );

        let mut req = self.client.post(self.url.clone()).json(request);
        if let Some((u, p)) = &self.auth {
            req = req.basic_auth(u, Some(p));
        }
        let resp = req.send().map_err(|e| self.request_failed(e))?;

        let status = resp.status();
        let text = resp.text().map_err(|e| self.request_failed(e))?;
        tracing::trace!(status = status.as_u16(), body = %text, "← response");

        let body = serde_json::from_str::<Value>(&text);
        let is_envelope = body.as_ref().is_ok_and(|v| {
            v.is_object() && (v.get("result").is_some() || v.get("error").is_some())
        });

        match body {
            Ok(_) if is_envelope => {}
            _ if !status.is_success() => {
                tracing::error!(status = status.as_u16(), "HTTP Transport - Unexpected status");
                return Err(TransportError::Status { status: status.as_u16(), body: text });
            }
            Ok(_) => return Err(TransportError::InvalidFormat(text)),
            Err(e) => {
                return Err(TransportError::Serialization(format!("{} (body: {})", e, text)))
            }
        }

        // Decoded from the text rather than the `Value` above: a `Value` round trip
        // rewrites small numbers such as 0.00000546 in exponent form.
        let response: JsonRpcResponse = serde_json::from_str(&text)?;
        if !status.is_success() && !response.is_error() {
            return Err(TransportError::Status { status: status.as_u16(), body: text });
        }
        response.check_id(request)?;
        Ok(response)
    }

    /// Returns the URL requests are posted to, including any wallet path.
    fn endpoint(&self) -> &str { &self.endpoint }

    fn next_id(&self) -> u64 { self.ids.next() }

    fn for_wallet(&self, wallet: &str) -> DynTransport {
        let url = self.wallet_url(wallet);
        logging::trace("HTTP", &format!("→ deriving wallet transport for {}", url));
        Arc::new(Self {
            client: self.client.clone(),
            base: self.base.clone(),
            endpoint: url.to_string(),
            url,
            auth: self.auth.clone(),
            ids: self.ids.clone(),
        })
    }
}
