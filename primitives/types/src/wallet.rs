//! Wallet records: coins, wallet state and wallet lifecycle results.

use std::collections::BTreeSet;

use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, Amount, BlockHash, ScriptBuf, Txid};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::decode::{
    check_mandatory, decode_list, from_value, json_kind, DecodeError, DomainRecord,
};

/// One entry of `listunspent`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Unspent {
    /// Id of the transaction that created the output.
    pub txid: Txid,
    /// Output index.
    pub vout: u32,
    /// Address the output pays to, absent for non-standard scripts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address<NetworkUnchecked>>,
    /// Label of the address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// The output's locking script.
    #[serde(rename = "scriptPubKey")]
    pub script_pubkey: ScriptBuf,
    /// Output value.
    #[serde(with = "crate::amount::btc")]
    pub amount: Amount,
    /// Number of confirmations.
    pub confirmations: u32,
    /// Number of in-mempool ancestors, for unconfirmed outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestorcount: Option<u32>,
    /// Virtual size of in-mempool ancestors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestorsize: Option<u64>,
    /// Fees of in-mempool ancestors, in satoshis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestorfees: Option<u64>,
    /// Hex redeem script, for P2SH outputs.
    #[serde(rename = "redeemScript", default, skip_serializing_if = "Option::is_none")]
    pub redeem_script: Option<String>,
    /// Hex witness script, for P2WSH outputs.
    #[serde(rename = "witnessScript", default, skip_serializing_if = "Option::is_none")]
    pub witness_script: Option<String>,
    /// Whether the wallet holds the keys to spend the output.
    pub spendable: bool,
    /// Whether the wallet knows how to spend the output, ignoring missing keys.
    pub solvable: bool,
    /// Whether the address was used before.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reused: Option<bool>,
    /// Output descriptor, if solvable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Descriptors the output's script derives from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_descs: Vec<String>,
    /// Whether the output is considered safe to spend.
    pub safe: bool,
}

impl DomainRecord for Unspent {
    const NAME: &'static str = "Unspent";
    const MANDATORY: &'static [&'static str] = &[
        "txid",
        "vout",
        "scriptPubKey",
        "amount",
        "confirmations",
        "spendable",
        "solvable",
        "safe",
    ];
}

/// Whether a wallet is rescanning, as reported by `getwalletinfo`.
///
/// The daemon sends `false` when idle and an object while scanning.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ScanningStatus {
    /// No rescan in progress.
    #[default]
    Idle,
    /// A rescan is running.
    Scanning {
        /// Seconds elapsed since the scan started.
        duration: u64,
        /// Progress between 0 and 1.
        progress: f64,
    },
}

impl<'de> Deserialize<'de> for ScanningStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Bool(false) | Value::Null => Ok(ScanningStatus::Idle),
            Value::Object(scan) => {
                let duration = scan
                    .get("duration")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| de::Error::missing_field("duration"))?;
                let progress = scan
                    .get("progress")
                    .and_then(Value::as_f64)
                    .ok_or_else(|| de::Error::missing_field("progress"))?;
                Ok(ScanningStatus::Scanning { duration, progress })
            }
            other => Err(de::Error::custom(format!("unexpected scanning status {}", other))),
        }
    }
}

impl Serialize for ScanningStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScanningStatus::Idle => serializer.serialize_bool(false),
            ScanningStatus::Scanning { duration, progress } => {
                serde_json::json!({ "duration": duration, "progress": progress })
                    .serialize(serializer)
            }
        }
    }
}

/// Tip the wallet has processed up to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LastProcessedBlock {
    /// Hash of the block.
    pub hash: BlockHash,
    /// Height of the block.
    pub height: u64,
}

/// Result of `getwalletinfo`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct WalletInfo {
    /// Name of the wallet.
    #[serde(rename = "walletname")]
    pub wallet_name: String,
    /// Wallet version.
    #[serde(rename = "walletversion")]
    pub wallet_version: u32,
    /// Database format (`bdb` or `sqlite`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Trusted confirmed balance, dropped by newer daemons.
    #[serde(default, with = "crate::amount::opt_btc", skip_serializing_if = "Option::is_none")]
    pub balance: Option<Amount>,
    /// Untrusted pending balance, dropped by newer daemons.
    #[serde(default, with = "crate::amount::opt_btc", skip_serializing_if = "Option::is_none")]
    pub unconfirmed_balance: Option<Amount>,
    /// Immature coinbase balance, dropped by newer daemons.
    #[serde(default, with = "crate::amount::opt_btc", skip_serializing_if = "Option::is_none")]
    pub immature_balance: Option<Amount>,
    /// Number of transactions in the wallet.
    #[serde(rename = "txcount")]
    pub tx_count: u64,
    /// Creation time of the oldest pre-generated key.
    #[serde(rename = "keypoololdest", default, skip_serializing_if = "Option::is_none")]
    pub keypool_oldest: Option<u64>,
    /// Number of pre-generated external keys.
    #[serde(rename = "keypoolsize")]
    pub keypool_size: u64,
    /// Number of pre-generated internal (change) keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keypoolsize_hd_internal: Option<u64>,
    /// Time until which the wallet stays unlocked, for encrypted wallets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_until: Option<u64>,
    /// Configured transaction fee rate per kvB.
    #[serde(default, with = "crate::amount::opt_btc", skip_serializing_if = "Option::is_none")]
    pub paytxfee: Option<Amount>,
    /// Hash160 of the HD seed, for legacy wallets.
    #[serde(rename = "hdseedid", default, skip_serializing_if = "Option::is_none")]
    pub hd_seed_id: Option<String>,
    /// Whether private keys are enabled.
    pub private_keys_enabled: bool,
    /// Whether the wallet avoids address reuse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid_reuse: Option<bool>,
    /// Rescan state.
    #[serde(default)]
    pub scanning: ScanningStatus,
    /// Whether the wallet uses descriptors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptors: Option<bool>,
    /// Whether the wallet uses an external signer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_signer: Option<bool>,
    /// Whether the wallet was created blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blank: Option<bool>,
    /// Earliest key creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthtime: Option<u64>,
    /// Last block the wallet processed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastprocessedblock: Option<LastProcessedBlock>,
}

impl DomainRecord for WalletInfo {
    const NAME: &'static str = "WalletInfo";
    const MANDATORY: &'static [&'static str] =
        &["walletname", "walletversion", "txcount", "keypoolsize", "private_keys_enabled"];
}

/// Result of `createwallet` and `loadwallet`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct WalletLoad {
    /// Name of the created or loaded wallet.
    pub name: String,
    /// Single warning string, sent by older daemons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Warnings, sent by newer daemons.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl WalletLoad {
    /// All non-empty warnings, whichever field the daemon used.
    pub fn all_warnings(&self) -> Vec<&str> {
        collect_warnings(self.warning.as_deref(), &self.warnings)
    }
}

impl DomainRecord for WalletLoad {
    const NAME: &'static str = "WalletLoad";
    const MANDATORY: &'static [&'static str] = &["name"];
}

/// Result of `unloadwallet`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WalletUnload {
    /// Single warning string, sent by older daemons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Warnings, sent by newer daemons.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl WalletUnload {
    /// All non-empty warnings, whichever field the daemon used.
    pub fn all_warnings(&self) -> Vec<&str> {
        collect_warnings(self.warning.as_deref(), &self.warnings)
    }
}

impl DomainRecord for WalletUnload {
    const NAME: &'static str = "WalletUnload";
    const MANDATORY: &'static [&'static str] = &[];

    /// Daemons before 0.21 answer `unloadwallet` with `null`.
    fn from_json(value: Value) -> Result<Self, DecodeError> {
        if value.is_null() {
            return Ok(WalletUnload::default());
        }
        check_mandatory::<Self>(&value)?;
        from_value(Self::NAME, value)
    }
}

fn collect_warnings<'a>(warning: Option<&'a str>, warnings: &'a [String]) -> Vec<&'a str> {
    warning
        .into_iter()
        .chain(warnings.iter().map(String::as_str))
        .filter(|w| !w.is_empty())
        .collect()
}

/// One entry of `listwalletdir`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct WalletDirEntry {
    /// Wallet name, relative to the wallet directory.
    pub name: String,
}

impl DomainRecord for WalletDirEntry {
    const NAME: &'static str = "WalletDirEntry";
    const MANDATORY: &'static [&'static str] = &["name"];
}

/// Decodes `listwalletdir`, `{"wallets": [{"name": ...}, ...]}`, into a set of names.
pub fn decode_wallet_dir(value: Value) -> Result<BTreeSet<String>, DecodeError> {
    let wallets = match value {
        Value::Object(mut object) => object.remove("wallets").ok_or(DecodeError::MissingField {
            record: WalletDirEntry::NAME,
            field: "wallets",
        })?,
        other => {
            return Err(DecodeError::UnexpectedShape {
                record: WalletDirEntry::NAME,
                expected: "object",
                found: json_kind(&other),
            })
        }
    };
    Ok(decode_list::<WalletDirEntry>(wallets)?.into_iter().map(|entry| entry.name).collect())
}
