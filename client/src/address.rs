//! Addresses, labels and multisig.

use bitcoin::address::NetworkUnchecked;
use bitcoin::Address;
use serde_json::{json, Value};
use types::{
    decode, decode_address, decode_labeled_addresses, decode_strings, AddressInfo,
    AddressValidation, LabeledAddress, MultiSig,
};

use crate::client::{param, positional, Client};
use crate::error::{ClientError, Result};
use crate::options::AddressType;

impl Client {
    /// `getnewaddress`: a fresh receiving address, optionally labelled.
    pub fn get_new_address(
        &self,
        label: Option<&str>,
        address_type: Option<AddressType>,
    ) -> Result<Address<NetworkUnchecked>> {
        let params = vec![json!(label), json!(address_type.map(AddressType::as_str))];
        self.call("getnewaddress", positional(params), decode_address)
    }

    /// `getrawchangeaddress`: a fresh change address.
    pub fn get_raw_change_address(
        &self,
        address_type: Option<AddressType>,
    ) -> Result<Address<NetworkUnchecked>> {
        let params = vec![json!(address_type.map(AddressType::as_str))];
        self.call("getrawchangeaddress", positional(params), decode_address)
    }

    /// `getaddressinfo`.
    pub fn get_address_info(&self, address: &Address<NetworkUnchecked>) -> Result<AddressInfo> {
        self.call("getaddressinfo", vec![param(address)?], decode)
    }

    /// `validateaddress`. Takes a string, since the point is to check one.
    pub fn validate_address(&self, address: &str) -> Result<AddressValidation> {
        self.call("validateaddress", vec![json!(address)], decode)
    }

    /// `addmultisigaddress`: adds an `n_required`-of-`keys` multisig to the wallet.
    ///
    /// `keys` are hex public keys or wallet addresses.
    pub fn add_multisig_address(
        &self,
        n_required: usize,
        keys: &[&str],
        label: Option<&str>,
    ) -> Result<MultiSig> {
        check_multisig(n_required, keys)?;
        let params = vec![json!(n_required), json!(keys), json!(label)];
        self.call("addmultisigaddress", positional(params), decode)
    }

    /// `createmultisig`: builds an `n_required`-of-`keys` multisig without
    /// touching any wallet. `keys` are hex public keys.
    pub fn create_multisig(&self, n_required: usize, keys: &[&str]) -> Result<MultiSig> {
        check_multisig(n_required, keys)?;
        self.call("createmultisig", vec![json!(n_required), json!(keys)], decode)
    }

    /// `setlabel`.
    pub fn set_label(&self, address: &Address<NetworkUnchecked>, label: &str) -> Result<()> {
        self.call_raw("setlabel", vec![param(address)?, json!(label)]).map(drop)
    }

    /// `getaddressesbylabel`, flattened into one entry per address.
    pub fn get_addresses_by_label(&self, label: &str) -> Result<Vec<LabeledAddress>> {
        self.call("getaddressesbylabel", vec![json!(label)], |value: Value| {
            decode_labeled_addresses(label, value)
        })
    }

    /// `listlabels`.
    pub fn list_labels(&self) -> Result<Vec<String>> {
        self.call("listlabels", vec![], decode_strings)
    }
}

fn check_multisig(n_required: usize, keys: &[&str]) -> Result<()> {
    if keys.is_empty() {
        return Err(ClientError::invalid("multisig needs at least one key"));
    }
    if n_required == 0 || n_required > keys.len() {
        return Err(ClientError::invalid(format!(
            "multisig needs between 1 and {} signatures, got {}",
            keys.len(),
            n_required
        )));
    }
    Ok(())
}
