#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Typed results for Bitcoin Core wallet RPCs.
//!
//! This crate holds the domain records the `bitcoind-rpc` client returns and
//! the decoder that builds them from raw JSON-RPC results. It knows nothing
//! about transports; everything here is a pure `serde_json::Value` to record
//! mapping.
//!
//! Decoding rules:
//! - unknown members are ignored, so newer daemons keep working;
//! - a missing or `null` mandatory member is a [`DecodeError::MissingField`]
//!   naming the member;
//! - BTC amounts are exact ([`bitcoin::Amount`] / [`bitcoin::SignedAmount`]),
//!   parsed from the number's decimal text, never through `f64`;
//! - lists decode element by element and `[]` is an empty `Vec`.
//!
//! Records also implement `Serialize`, producing the daemon's JSON shape
//! back, with amounts written as exact eight-place decimals.

use serde_json::Value;

/// Exact BTC amount encoding and `serde` adapters.
pub mod amount;
/// Address, label and multisig records.
pub mod address;
/// Block records.
pub mod chain;
/// The decoder and its error type.
pub mod decode;
/// Wallet transaction records.
pub mod transaction;
/// Coin, wallet state and wallet lifecycle records.
pub mod wallet;

pub use address::{
    decode_labeled_addresses, encode_labeled_addresses, AddressInfo, AddressPurpose,
    AddressValidation, LabeledAddress, MultiSig,
};
pub use chain::BlockInfo;
pub use decode::{
    decode, decode_address, decode_amount, decode_block_hash, decode_block_hashes, decode_list,
    decode_string_set, decode_strings, decode_txid, decode_u64, DecodeError, DomainRecord,
};
pub use transaction::{
    Bip125Replaceable, TransactionCategory, TransactionsSinceBlock, WalletTransaction,
};
pub use wallet::{
    decode_wallet_dir, LastProcessedBlock, ScanningStatus, Unspent, WalletDirEntry, WalletInfo,
    WalletLoad, WalletUnload,
};

macro_rules! records {
    ($($variant:ident),+ $(,)?) => {
        /// Names the record shapes this crate can decode.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum RecordKind {
            $(
                #[doc = concat!("See [`", stringify!($variant), "`].")]
                $variant,
            )+
        }

        impl RecordKind {
            /// Every record kind.
            pub const ALL: &'static [RecordKind] = &[$(RecordKind::$variant),+];

            /// Record name used in error reports.
            pub fn name(self) -> &'static str {
                match self {
                    $(RecordKind::$variant => <$variant as DomainRecord>::NAME,)+
                }
            }

            /// JSON members that must be present and non-null.
            pub fn mandatory_fields(self) -> &'static [&'static str] {
                match self {
                    $(RecordKind::$variant => <$variant as DomainRecord>::MANDATORY,)+
                }
            }
        }

        /// A decoded record of any supported shape.
        #[derive(Clone, Debug, PartialEq)]
        pub enum Record {
            $(
                #[doc = concat!("A decoded [`", stringify!($variant), "`].")]
                $variant($variant),
            )+
        }

        impl Record {
            /// Decodes `value` as a record of the given kind.
            pub fn decode(kind: RecordKind, value: Value) -> Result<Record, DecodeError> {
                match kind {
                    $(RecordKind::$variant => decode::<$variant>(value).map(Record::$variant),)+
                }
            }

            /// The kind of this record.
            pub fn kind(&self) -> RecordKind {
                match self {
                    $(Record::$variant(_) => RecordKind::$variant,)+
                }
            }

            /// Encodes the record back into the daemon's JSON shape.
            pub fn to_json(&self) -> Result<Value, serde_json::Error> {
                match self {
                    $(Record::$variant(record) => serde_json::to_value(record),)+
                }
            }
        }
    };
}

records! {
    AddressInfo,
    AddressValidation,
    BlockInfo,
    LabeledAddress,
    MultiSig,
    TransactionsSinceBlock,
    Unspent,
    WalletInfo,
    WalletLoad,
    WalletTransaction,
    WalletUnload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_metadata() {
        assert_eq!(RecordKind::ALL.len(), 11);
        assert_eq!(RecordKind::Unspent.name(), "Unspent");
        assert!(RecordKind::WalletInfo.mandatory_fields().contains(&"walletname"));
        assert!(RecordKind::WalletUnload.mandatory_fields().is_empty());
    }

    #[test]
    fn test_unload_accepts_null() {
        let record = Record::decode(RecordKind::WalletUnload, Value::Null).expect("null unload");
        assert_eq!(record, Record::WalletUnload(WalletUnload::default()));
        assert_eq!(record.kind(), RecordKind::WalletUnload);
    }
}
