//! Address-related records.

use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, ScriptBuf};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::decode::{decode, json_kind, DecodeError, DomainRecord};

/// Result of `getaddressinfo`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AddressInfo {
    /// The address being described.
    pub address: Address<NetworkUnchecked>,
    /// The locking script of the address.
    #[serde(rename = "scriptPubKey")]
    pub script_pubkey: ScriptBuf,
    /// Whether the wallet owns the address.
    #[serde(rename = "ismine")]
    pub is_mine: bool,
    /// Whether the address is watch-only. Dropped by descriptor-only daemons.
    #[serde(rename = "iswatchonly", default, skip_serializing_if = "Option::is_none")]
    pub is_watch_only: Option<bool>,
    /// Whether the wallet knows how to spend coins sent to this address.
    pub solvable: bool,
    /// Output descriptor, if solvable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Descriptor the address was derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_desc: Option<String>,
    /// Whether the address is a script address.
    #[serde(rename = "isscript")]
    pub is_script: bool,
    /// Whether the address is used for change outputs.
    #[serde(rename = "ischange")]
    pub is_change: bool,
    /// Whether the address is a witness address.
    #[serde(rename = "iswitness")]
    pub is_witness: bool,
    /// Witness version, for witness addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness_version: Option<u8>,
    /// Hex witness program, for witness addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness_program: Option<String>,
    /// Script type, for script addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Hex redeem script, for P2SH addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    /// Public keys of a multisig redeem script.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pubkeys: Vec<String>,
    /// Number of signatures required by a multisig script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigsrequired: Option<u32>,
    /// Hex public key, for single-key addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<String>,
    /// Whether the public key is compressed.
    #[serde(rename = "iscompressed", default, skip_serializing_if = "Option::is_none")]
    pub is_compressed: Option<bool>,
    /// Key creation time, in seconds since epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    /// HD derivation path.
    #[serde(rename = "hdkeypath", default, skip_serializing_if = "Option::is_none")]
    pub hd_key_path: Option<String>,
    /// Hash160 of the HD seed.
    #[serde(rename = "hdseedid", default, skip_serializing_if = "Option::is_none")]
    pub hd_seed_id: Option<String>,
    /// Fingerprint of the master key.
    #[serde(rename = "hdmasterfingerprint", default, skip_serializing_if = "Option::is_none")]
    pub hd_master_fingerprint: Option<String>,
    /// Deprecated single label, still sent by older daemons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Labels associated with the address.
    pub labels: Vec<String>,
}

impl DomainRecord for AddressInfo {
    const NAME: &'static str = "AddressInfo";
    const MANDATORY: &'static [&'static str] = &[
        "address",
        "scriptPubKey",
        "ismine",
        "solvable",
        "isscript",
        "ischange",
        "iswitness",
        "labels",
    ];
}

/// Result of `validateaddress`.
///
/// Only `isvalid` is always present; the rest is filled in for valid addresses,
/// `error` for invalid ones.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AddressValidation {
    /// Whether the address is valid for the daemon's network.
    #[serde(rename = "isvalid")]
    pub is_valid: bool,
    /// The validated address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address<NetworkUnchecked>>,
    /// The locking script of the address.
    #[serde(rename = "scriptPubKey", default, skip_serializing_if = "Option::is_none")]
    pub script_pubkey: Option<ScriptBuf>,
    /// Whether the address is a script address.
    #[serde(rename = "isscript", default, skip_serializing_if = "Option::is_none")]
    pub is_script: Option<bool>,
    /// Whether the address is a witness address.
    #[serde(rename = "iswitness", default, skip_serializing_if = "Option::is_none")]
    pub is_witness: Option<bool>,
    /// Witness version, for witness addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness_version: Option<u8>,
    /// Hex witness program, for witness addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness_program: Option<String>,
    /// Why the address is invalid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Character positions of likely typos.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_locations: Vec<u32>,
}

impl DomainRecord for AddressValidation {
    const NAME: &'static str = "AddressValidation";
    const MANDATORY: &'static [&'static str] = &["isvalid"];
}

/// Result of `addmultisigaddress` and `createmultisig`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MultiSig {
    /// The P2SH / P2WSH address.
    pub address: Address<NetworkUnchecked>,
    /// Hex redeem script.
    #[serde(rename = "redeemScript")]
    pub redeem_script: String,
    /// Output descriptor for the multisig.
    #[serde(rename = "descriptor", default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,
    /// Warnings emitted while creating the multisig.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl DomainRecord for MultiSig {
    const NAME: &'static str = "MultiSig";
    const MANDATORY: &'static [&'static str] = &["address", "redeemScript"];
}

/// What an address in the wallet's address book is used for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressPurpose {
    /// A receiving address generated by this wallet.
    Receive,
    /// A destination this wallet has sent to.
    Send,
    /// A refund address.
    Refund,
    /// A purpose this binding does not know about yet, with the daemon's string.
    Unknown(String),
}

impl AddressPurpose {
    /// The daemon's spelling of the purpose.
    pub fn as_str(&self) -> &str {
        match self {
            AddressPurpose::Receive => "receive",
            AddressPurpose::Send => "send",
            AddressPurpose::Refund => "refund",
            AddressPurpose::Unknown(other) => other.as_str(),
        }
    }
}

impl From<String> for AddressPurpose {
    fn from(purpose: String) -> Self {
        match purpose.as_str() {
            "receive" => AddressPurpose::Receive,
            "send" => AddressPurpose::Send,
            "refund" => AddressPurpose::Refund,
            _ => AddressPurpose::Unknown(purpose),
        }
    }
}

impl<'de> Deserialize<'de> for AddressPurpose {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(AddressPurpose::from)
    }
}

impl Serialize for AddressPurpose {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One entry of `getaddressesbylabel`.
///
/// The daemon answers with a map `{ "<address>": { "purpose": ... } }`;
/// [`decode_labeled_addresses`] flattens it into these records.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LabeledAddress {
    /// The address.
    pub address: Address<NetworkUnchecked>,
    /// The label that was queried.
    pub label: String,
    /// What the address is used for.
    pub purpose: AddressPurpose,
}

impl DomainRecord for LabeledAddress {
    const NAME: &'static str = "LabeledAddress";
    const MANDATORY: &'static [&'static str] = &["address", "label", "purpose"];
}

/// Decodes the result of `getaddressesbylabel <label>`.
///
/// Entries come out sorted by address. An empty map yields an empty `Vec`.
pub fn decode_labeled_addresses(
    label: &str,
    value: Value,
) -> Result<Vec<LabeledAddress>, DecodeError> {
    let entries = match value {
        Value::Object(entries) => entries,
        other => {
            return Err(DecodeError::UnexpectedShape {
                record: LabeledAddress::NAME,
                expected: "object",
                found: json_kind(&other),
            })
        }
    };

    entries
        .into_iter()
        .map(|(address, entry)| {
            let mut flat = match entry {
                Value::Object(fields) => fields,
                other => {
                    return Err(DecodeError::UnexpectedShape {
                        record: LabeledAddress::NAME,
                        expected: "object",
                        found: json_kind(&other),
                    })
                }
            };
            flat.insert("address".to_string(), Value::String(address));
            flat.insert("label".to_string(), Value::String(label.to_string()));
            decode(Value::Object(flat))
        })
        .collect()
}

/// Re-encodes labeled addresses in the daemon's map shape.
pub fn encode_labeled_addresses(addresses: &[LabeledAddress]) -> Value {
    let mut map = Map::new();
    for entry in addresses {
        map.insert(
            entry.address.clone().assume_checked().to_string(),
            serde_json::json!({ "purpose": entry.purpose.as_str() }),
        );
    }
    Value::Object(map)
}
