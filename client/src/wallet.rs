//! Coins, transactions, balances and wallet lifecycle.

use std::collections::BTreeSet;

use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, Amount, BlockHash, Txid};
use serde_json::{json, Value};
use types::amount::amount_to_json;
use types::{
    decode, decode_amount, decode_list, decode_string_set, decode_txid, decode_wallet_dir,
    TransactionsSinceBlock, Unspent, WalletInfo, WalletLoad, WalletTransaction, WalletUnload,
};

use crate::client::{int_param, param, positional, Client};
use crate::error::{ClientError, Result};
use crate::options::{CreateWalletOptions, SendOptions};

impl Client {
    /// `listunspent`: coins with `min_conf..=max_conf` confirmations.
    ///
    /// An empty `addresses` slice lists coins of every address. The daemon
    /// reads both bounds as 32-bit signed integers, so a `max_conf` above
    /// `i32::MAX` is sent as `i32::MAX`.
    pub fn list_unspent(
        &self,
        min_conf: u32,
        max_conf: u32,
        addresses: &[Address<NetworkUnchecked>],
    ) -> Result<Vec<Unspent>> {
        if min_conf > max_conf {
            return Err(ClientError::invalid(format!(
                "min_conf {} is greater than max_conf {}",
                min_conf, max_conf
            )));
        }
        let max_conf = max_conf.min(i32::MAX as u32);
        let mut params = vec![int_param("min_conf", min_conf.into())?, json!(max_conf)];
        if !addresses.is_empty() {
            params.push(param(addresses)?);
        }
        self.call("listunspent", params, decode_list)
    }

    /// `listsinceblock`: wallet transactions since `block`, or all of them.
    pub fn list_since_block(
        &self,
        block: Option<&BlockHash>,
        target_confirmations: u32,
        include_watch_only: bool,
    ) -> Result<TransactionsSinceBlock> {
        if target_confirmations == 0 {
            return Err(ClientError::invalid("target_confirmations must be at least 1"));
        }
        let block = match block {
            Some(hash) => param(hash)?,
            None => Value::Null,
        };
        let params = vec![
            block,
            int_param("target_confirmations", target_confirmations.into())?,
            json!(include_watch_only),
        ];
        self.call("listsinceblock", params, decode)
    }

    /// `listtransactions`: the most recent `count` entries after skipping
    /// `skip`, for one label or, with `None`, for all.
    pub fn list_transactions(
        &self,
        label: Option<&str>,
        count: usize,
        skip: usize,
    ) -> Result<Vec<WalletTransaction>> {
        let params = vec![
            json!(label.unwrap_or("*")),
            int_param("count", count as u64)?,
            int_param("skip", skip as u64)?,
        ];
        self.call("listtransactions", params, decode_list)
    }

    /// `sendtoaddress` with the daemon's defaults.
    pub fn send_to_address(
        &self,
        address: &Address<NetworkUnchecked>,
        amount: Amount,
    ) -> Result<Txid> {
        self.send_to_address_with(address, amount, &SendOptions::default())
    }

    /// `sendtoaddress` with explicit options.
    pub fn send_to_address_with(
        &self,
        address: &Address<NetworkUnchecked>,
        amount: Amount,
        options: &SendOptions,
    ) -> Result<Txid> {
        if amount == Amount::ZERO || amount > Amount::MAX_MONEY {
            return Err(ClientError::invalid(format!("cannot send {}", amount)));
        }
        let conf_target = match options.conf_target {
            Some(target) => int_param("conf_target", target.into())?,
            None => Value::Null,
        };
        let params = vec![
            param(address)?,
            amount_to_json(amount)?,
            json!(options.comment),
            json!(options.comment_to),
            flag(options.subtract_fee_from_amount),
            json!(options.replaceable),
            conf_target,
            json!(options.estimate_mode.map(|mode| mode.as_str())),
            json!(options.avoid_reuse),
            json!(options.fee_rate),
        ];
        self.call("sendtoaddress", positional(params), decode_txid)
    }

    /// `getbalance`: the trusted balance.
    pub fn get_balance(&self) -> Result<Amount> { self.call("getbalance", vec![], decode_amount) }

    /// `getbalance` counting only coins with at least `min_conf` confirmations.
    pub fn get_balance_with(&self, min_conf: u32) -> Result<Amount> {
        let params = vec![json!("*"), int_param("min_conf", min_conf.into())?];
        self.call("getbalance", params, decode_amount)
    }

    /// `getwalletinfo`.
    pub fn get_wallet_info(&self) -> Result<WalletInfo> {
        self.call("getwalletinfo", vec![], decode)
    }

    /// `listwallets`: names of the loaded wallets.
    pub fn list_wallets(&self) -> Result<BTreeSet<String>> {
        self.call("listwallets", vec![], decode_string_set)
    }

    /// `listwalletdir`: names of the wallets on disk, loaded or not.
    pub fn list_wallet_dir(&self) -> Result<BTreeSet<String>> {
        self.call("listwalletdir", vec![], decode_wallet_dir)
    }

    /// `createwallet` with the daemon's defaults. The new wallet is loaded.
    pub fn create_wallet(&self, name: &str) -> Result<WalletLoad> {
        self.create_wallet_with(name, &CreateWalletOptions::default())
    }

    /// `createwallet` with explicit options.
    pub fn create_wallet_with(
        &self,
        name: &str,
        options: &CreateWalletOptions,
    ) -> Result<WalletLoad> {
        let params = vec![
            json!(name),
            flag(options.disable_private_keys),
            flag(options.blank),
            json!(options.passphrase),
            flag(options.avoid_reuse),
            json!(options.descriptors),
            json!(options.load_on_startup),
            flag(options.external_signer),
        ];
        let loaded: WalletLoad = self.call("createwallet", positional(params), decode)?;
        log_warnings(&loaded.name, &loaded.all_warnings());
        Ok(loaded)
    }

    /// `loadwallet`.
    pub fn load_wallet(&self, name: &str) -> Result<WalletLoad> {
        let loaded: WalletLoad = self.call("loadwallet", vec![json!(name)], decode)?;
        log_warnings(&loaded.name, &loaded.all_warnings());
        Ok(loaded)
    }

    /// `unloadwallet`.
    pub fn unload_wallet(&self, name: &str) -> Result<WalletUnload> {
        let unloaded: WalletUnload = self.call("unloadwallet", vec![json!(name)], decode)?;
        log_warnings(name, &unloaded.all_warnings());
        Ok(unloaded)
    }
}

/// `true` or `null`; the daemon reads `null` as its default of `false`.
fn flag(set: bool) -> Value {
    if set {
        Value::Bool(true)
    } else {
        Value::Null
    }
}

fn log_warnings(wallet: &str, warnings: &[&str]) {
    for warning in warnings {
        tracing::warn!(wallet, "{}", warning);
    }
}
