//! Wallet transaction records (`listsinceblock`, `listtransactions`).

use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, BlockHash, SignedAmount, Txid};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{check_mandatory, decode_list, from_value, DecodeError, DomainRecord};

/// The category of a wallet transaction entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionCategory {
    /// Transactions sent.
    Send,
    /// Non-coinbase transactions received.
    Receive,
    /// Coinbase transactions received with more than 100 confirmations.
    Generate,
    /// Coinbase transactions received with 100 or fewer confirmations.
    Immature,
    /// Orphaned coinbase transactions received.
    Orphan,
}

/// BIP125 replaceability as reported by the wallet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bip125Replaceable {
    /// Signals replaceability.
    Yes,
    /// Does not signal.
    No,
    /// Unconfirmed ancestors make it unknowable.
    Unknown,
}

/// One transaction entry of `listsinceblock` or `listtransactions`.
///
/// `amount` and `fee` are signed: negative for [`TransactionCategory::Send`].
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct WalletTransaction {
    /// Whether a watch-only address is involved.
    #[serde(rename = "involvesWatchonly", default, skip_serializing_if = "Option::is_none")]
    pub involves_watch_only: Option<bool>,
    /// The address involved, absent for some outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address<NetworkUnchecked>>,
    /// The entry category.
    pub category: TransactionCategory,
    /// Signed amount.
    #[serde(with = "crate::amount::signed_btc")]
    pub amount: SignedAmount,
    /// Label of the address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Output index.
    pub vout: u32,
    /// Fee paid, negative, for sends only.
    #[serde(
        default,
        with = "crate::amount::opt_signed_btc",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee: Option<SignedAmount>,
    /// Number of confirmations; negative when conflicted.
    pub confirmations: i64,
    /// Whether this is a coinbase output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<bool>,
    /// Whether an unconfirmed transaction is trusted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted: Option<bool>,
    /// Hash of the containing block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockhash: Option<BlockHash>,
    /// Height of the containing block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockheight: Option<u64>,
    /// Index of the transaction in its block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockindex: Option<u32>,
    /// Block time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocktime: Option<u64>,
    /// The transaction id.
    pub txid: Txid,
    /// Hex witness transaction id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wtxid: Option<String>,
    /// Conflicting transactions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub walletconflicts: Vec<Txid>,
    /// Transaction that replaced this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced_by_txid: Option<Txid>,
    /// Transaction this one replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaces_txid: Option<Txid>,
    /// Wallet comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Wallet `to` comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Transaction time.
    pub time: u64,
    /// Time the wallet received the transaction.
    pub timereceived: u64,
    /// BIP125 replaceability.
    #[serde(rename = "bip125-replaceable", default, skip_serializing_if = "Option::is_none")]
    pub bip125_replaceable: Option<Bip125Replaceable>,
    /// Whether the transaction was abandoned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abandoned: Option<bool>,
    /// Descriptors the output's script derives from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_descs: Vec<String>,
}

impl DomainRecord for WalletTransaction {
    const NAME: &'static str = "WalletTransaction";
    const MANDATORY: &'static [&'static str] =
        &["category", "amount", "vout", "confirmations", "txid", "time", "timereceived"];
}

/// Result of `listsinceblock`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransactionsSinceBlock {
    /// Transactions affecting the wallet since the given block.
    pub transactions: Vec<WalletTransaction>,
    /// Transactions removed by a reorg; only sent when requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<WalletTransaction>,
    /// Hash of the block `target_confirmations - 1` below the tip.
    pub lastblock: BlockHash,
}

impl<'de> Deserialize<'de> for TransactionsSinceBlock {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(value).map_err(serde::de::Error::custom)
    }
}

impl DomainRecord for TransactionsSinceBlock {
    const NAME: &'static str = "TransactionsSinceBlock";
    const MANDATORY: &'static [&'static str] = &["transactions", "lastblock"];

    fn from_json(value: Value) -> Result<Self, DecodeError> {
        check_mandatory::<Self>(&value)?;
        let member = |name: &str| value.get(name).cloned().unwrap_or(Value::Null);

        let removed = match member("removed") {
            Value::Null => Vec::new(),
            removed => decode_list(removed)?,
        };

        Ok(Self {
            transactions: decode_list(member("transactions"))?,
            removed,
            lastblock: from_value(Self::NAME, member("lastblock"))?,
        })
    }
}
