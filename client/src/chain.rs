//! Block and mining calls used alongside the wallet.

use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, BlockHash};
use serde_json::json;
use types::{decode, decode_block_hash, decode_block_hashes, decode_u64, BlockInfo};

use crate::client::{int_param, param, Client};
use crate::error::{ClientError, Result};

impl Client {
    /// `generatetoaddress`: mines `nblocks` blocks paying to `address`.
    /// Regtest only.
    pub fn generate_to_address(
        &self,
        nblocks: u32,
        address: &Address<NetworkUnchecked>,
    ) -> Result<Vec<BlockHash>> {
        if nblocks == 0 {
            return Err(ClientError::invalid("nblocks must be at least 1"));
        }
        let params = vec![int_param("nblocks", nblocks.into())?, param(address)?];
        self.call("generatetoaddress", params, decode_block_hashes)
    }

    /// `getblockcount`: height of the active chain tip.
    pub fn get_block_count(&self) -> Result<u64> { self.call("getblockcount", vec![], decode_u64) }

    /// `getblockhash`.
    pub fn get_block_hash(&self, height: u64) -> Result<BlockHash> {
        self.call("getblockhash", vec![int_param("height", height)?], decode_block_hash)
    }

    /// `getblock` at verbosity 1.
    pub fn get_block(&self, hash: &BlockHash) -> Result<BlockInfo> {
        self.call("getblock", vec![param(hash)?, json!(1)], decode)
    }

    /// `getbestblockhash`.
    pub fn get_best_block_hash(&self) -> Result<BlockHash> {
        self.call("getbestblockhash", vec![], decode_block_hash)
    }
}
