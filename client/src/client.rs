//! The client handle, construction and the shared call path.

use std::path::Path;
use std::sync::Arc;

use config::{Config, RpcConfig};
use http_transport::HttpTransport;
use serde::Serialize;
use serde_json::Value;
use transport::{DynTransport, TransportConfig};
use types::DecodeError;

use crate::error::{ClientError, Result};

/// A typed Bitcoin Core RPC client.
///
/// A `Client` is either the base client, whose requests go to the configured
/// endpoint, or a wallet client obtained through [`Client::for_wallet`],
/// whose requests go to `<endpoint>/wallet/<name>`. Both share one
/// transport, so cloning and deriving are cheap.
///
/// Every call blocks until the daemon answers, the transport fails or the
/// configured timeout elapses.
#[derive(Clone)]
pub struct Client {
    transport: DynTransport,
    wallet: Option<String>,
}

impl Client {
    /// Wraps an existing transport as a base client.
    pub fn new(transport: DynTransport) -> Self { Self { transport, wallet: None } }

    /// Builds a base client over HTTP.
    pub fn from_transport_config(config: &TransportConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::from_config(config)?)))
    }

    /// Builds a client from connection settings.
    ///
    /// The cookie file, when set, takes precedence over user and password.
    /// When a wallet is configured the returned client is scoped to it.
    pub fn from_config(config: &RpcConfig) -> Result<Self> {
        logging::trace("CLIENT", &format!("→ connecting to {}", config.url));
        let client = Self::from_transport_config(&config.transport_config())?;
        Ok(match &config.wallet {
            Some(wallet) => client.for_wallet(wallet),
            None => client,
        })
    }

    /// Loads a TOML configuration file, applies `RPC_*` environment
    /// overrides and builds a client from the result.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Config::from_file(path)?;
        config.rpc.apply_env()?;
        Self::from_config(&config.rpc)
    }

    /// Derives a client whose requests are routed to `wallet`.
    ///
    /// The derived client shares this client's transport. Deriving from a
    /// wallet client re-targets; paths never nest.
    pub fn for_wallet(&self, wallet: &str) -> Self {
        Self { transport: self.transport.for_wallet(wallet), wallet: Some(wallet.to_string()) }
    }

    /// The wallet this client is scoped to, if any.
    pub fn wallet(&self) -> Option<&str> { self.wallet.as_deref() }

    /// The endpoint requests are posted to.
    pub fn endpoint(&self) -> &str { self.transport.endpoint() }

    /// The underlying transport.
    pub fn transport(&self) -> &DynTransport { &self.transport }

    /// Calls any RPC and returns its raw result.
    ///
    /// A daemon error is returned as [`ClientError::Rpc`]; a `null` result
    /// is [`Value::Null`].
    pub fn call_raw(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        Ok(self.transport.call(method, params)??)
    }

    /// Calls an RPC and decodes its result.
    pub(crate) fn call<T>(
        &self,
        method: &str,
        params: Vec<Value>,
        decode: impl FnOnce(Value) -> std::result::Result<T, DecodeError>,
    ) -> Result<T> {
        let value = self.call_raw(method, params)?;
        decode(value).map_err(|err| {
            tracing::warn!(method, error = %err, "result did not decode");
            ClientError::Decode(err)
        })
    }
}

/// Converts an argument into a JSON parameter.
pub(crate) fn param<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Converts a count into a parameter the daemon reads as a 32-bit signed integer.
///
/// Larger values are rejected locally; the daemon would answer "JSON integer
/// out of range".
pub(crate) fn int_param(name: &str, value: u64) -> Result<Value> {
    i32::try_from(value)
        .map(Value::from)
        .map_err(|_| ClientError::invalid(format!("{} {} is out of range", name, value)))
}

/// Drops trailing `null` parameters so the daemon applies its defaults.
pub(crate) fn positional(mut params: Vec<Value>) -> Vec<Value> {
    while params.last().is_some_and(Value::is_null) {
        params.pop();
    }
    params
}
