// SPDX-License-Identifier: CC0-1.0

//! `bitcoind-rpc` umbrella crate.
//!
//! Re-exports the workspace member crates under one name:
//!
//! - [`client`]: the typed [`Client`] facade
//! - [`types`]: result records and the decoder
//! - [`transport`]: the JSON-RPC envelope and the [`transport::Transport`] trait
//! - [`http`]: the blocking HTTP backend
//! - [`config`] and [`logging`]: TOML settings and `tracing` setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![warn(deprecated_in_future)]
#![doc(test(attr(warn(unused))))]

pub use client::{self, Client, ClientError};
pub use http_transport as http;
pub use {config, logging, transport, types};

/// Miscellaneous metadata about the workspace.
pub mod meta {
    /// Version string for the umbrella crate, as reported by Cargo.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
