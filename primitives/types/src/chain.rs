//! Chain records used alongside wallet calls.

use bitcoin::{BlockHash, Txid};
use serde::{Deserialize, Serialize};

use crate::decode::DomainRecord;

/// Result of `getblock <hash> 1`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BlockInfo {
    /// The block hash.
    pub hash: BlockHash,
    /// Confirmations; `-1` if the block is not on the main chain.
    pub confirmations: i64,
    /// Serialized size in bytes.
    pub size: u64,
    /// Size without witness data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strippedsize: Option<u64>,
    /// BIP141 block weight.
    pub weight: u64,
    /// Block height.
    pub height: u64,
    /// Block version.
    pub version: i32,
    /// Block version in hex.
    #[serde(rename = "versionHex", default, skip_serializing_if = "Option::is_none")]
    pub version_hex: Option<String>,
    /// Merkle root, hex.
    pub merkleroot: String,
    /// Transaction ids in block order.
    pub tx: Vec<Txid>,
    /// Block time.
    pub time: u64,
    /// Median time past.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mediantime: Option<u64>,
    /// Header nonce.
    pub nonce: u32,
    /// Compact difficulty target, hex.
    pub bits: String,
    /// Difficulty.
    pub difficulty: f64,
    /// Cumulative chain work, hex.
    pub chainwork: String,
    /// Number of transactions.
    #[serde(rename = "nTx")]
    pub n_tx: u64,
    /// Hash of the previous block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previousblockhash: Option<BlockHash>,
    /// Hash of the next block on the main chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nextblockhash: Option<BlockHash>,
}

impl DomainRecord for BlockInfo {
    const NAME: &'static str = "BlockInfo";
    const MANDATORY: &'static [&'static str] = &[
        "hash",
        "confirmations",
        "size",
        "weight",
        "height",
        "version",
        "merkleroot",
        "tx",
        "time",
        "nonce",
        "bits",
        "difficulty",
        "chainwork",
        "nTx",
    ];
}
