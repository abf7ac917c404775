#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `bitcoind-rpc-client`: Typed Bitcoin Core wallet client
//!
//! [`Client`] turns Bitcoin Core's wallet RPCs into typed method calls.
//! Each method builds the positional parameters, sends one JSON-RPC request
//! through a [`transport::Transport`], and decodes the result into a record
//! from the `bitcoind-rpc-types` crate.
//!
//! Failures keep their origin:
//! - [`ClientError::Transport`]: no JSON-RPC answer (network, timeout, HTTP status)
//! - [`ClientError::Rpc`]: the daemon's own error, with its raw code
//! - [`ClientError::Decode`]: the answer did not have the expected shape
//! - [`ClientError::InvalidArgument`]: rejected locally, nothing was sent
//!
//! ## Wallets
//!
//! A node can have several wallets loaded. [`Client::for_wallet`] derives a
//! client whose requests go to `/wallet/<name>`; the base client keeps
//! handling node-level calls such as [`Client::list_wallets`].
//!
//! ```no_run
//! use client::Client;
//! use config::RpcConfig;
//!
//! let node = Client::from_config(&RpcConfig::default())?;
//! node.create_wallet("alice")?;
//!
//! let alice = node.for_wallet("alice");
//! let address = alice.get_new_address(Some("savings"), None)?;
//! node.generate_to_address(101, &address)?;
//! println!("balance: {}", alice.get_balance()?);
//! # Ok::<(), client::ClientError>(())
//! ```

mod address;
mod chain;
mod client;
mod error;
mod options;
mod wallet;

pub use client::Client;
pub use error::{ClientError, Result};
pub use options::{AddressType, CreateWalletOptions, EstimateMode, SendOptions};
