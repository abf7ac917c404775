//! Optional arguments for the calls that take many of them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Address type for `getnewaddress` and `getrawchangeaddress`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressType {
    /// P2PKH.
    Legacy,
    /// P2WPKH nested in P2SH.
    P2shSegwit,
    /// Native segwit v0 (P2WPKH).
    Bech32,
    /// Segwit v1 (P2TR).
    Bech32m,
}

impl AddressType {
    /// The daemon's name for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            AddressType::Legacy => "legacy",
            AddressType::P2shSegwit => "p2sh-segwit",
            AddressType::Bech32 => "bech32",
            AddressType::Bech32m => "bech32m",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Fee estimation mode for `sendtoaddress`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateMode {
    /// Let the daemon choose.
    Unset,
    /// Estimate from a shorter horizon, reacting faster to fee changes.
    Economical,
    /// Estimate from a longer horizon.
    Conservative,
}

impl EstimateMode {
    /// The daemon's name for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            EstimateMode::Unset => "unset",
            EstimateMode::Economical => "economical",
            EstimateMode::Conservative => "conservative",
        }
    }
}

/// Optional arguments of `sendtoaddress`, in positional order.
///
/// Unset fields are sent as `null`, which the daemon reads as its default.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Wallet-local comment.
    pub comment: Option<String>,
    /// Wallet-local name of the recipient.
    pub comment_to: Option<String>,
    /// Deduct the fee from the sent amount.
    pub subtract_fee_from_amount: bool,
    /// Signal BIP125 replaceability.
    pub replaceable: Option<bool>,
    /// Confirmation target in blocks.
    pub conf_target: Option<u32>,
    /// Fee estimation mode.
    pub estimate_mode: Option<EstimateMode>,
    /// Avoid spending from dirty addresses.
    pub avoid_reuse: Option<bool>,
    /// Explicit fee rate in sat/vB.
    pub fee_rate: Option<u64>,
}

/// Optional arguments of `createwallet`, in positional order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CreateWalletOptions {
    /// Create a watch-only wallet.
    pub disable_private_keys: bool,
    /// Create a wallet without keys or seed.
    pub blank: bool,
    /// Encrypt the wallet with this passphrase.
    pub passphrase: Option<String>,
    /// Track dirty addresses and avoid reusing them.
    pub avoid_reuse: bool,
    /// Create a descriptor wallet; `None` keeps the daemon's default.
    pub descriptors: Option<bool>,
    /// Add or remove the wallet from the startup list.
    pub load_on_startup: Option<bool>,
    /// Use an external signer.
    pub external_signer: bool,
}

impl fmt::Debug for CreateWalletOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateWalletOptions")
            .field("disable_private_keys", &self.disable_private_keys)
            .field("blank", &self.blank)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("avoid_reuse", &self.avoid_reuse)
            .field("descriptors", &self.descriptors)
            .field("load_on_startup", &self.load_on_startup)
            .field("external_signer", &self.external_signer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_serde() {
        let types = [
            AddressType::Legacy,
            AddressType::P2shSegwit,
            AddressType::Bech32,
            AddressType::Bech32m,
        ];
        for ty in types {
            assert_eq!(serde_json::to_value(ty).expect("serialize"), ty.as_str());
        }
        for mode in [EstimateMode::Unset, EstimateMode::Economical, EstimateMode::Conservative] {
            assert_eq!(serde_json::to_value(mode).expect("serialize"), mode.as_str());
        }
    }

    #[test]
    fn test_passphrase_redacted() {
        let options =
            CreateWalletOptions { passphrase: Some("hunter2".to_string()), ..Default::default() };
        assert!(!format!("{:?}", options).contains("hunter2"));
    }
}
