//! Daemon-shaped fixtures shared by the decoder tests.

#![allow(dead_code)]

use serde_json::Value;
use types::RecordKind;

/// Parses JSON text, keeping amounts exact.
pub fn parse(text: &str) -> Value { serde_json::from_str(text).expect("fixture is valid JSON") }

/// A full daemon response for `kind`, with every member the record knows about.
pub fn fixture(kind: RecordKind) -> Value {
    let text = match kind {
        RecordKind::AddressInfo => include_str!("../fixtures/address_info.json"),
        RecordKind::AddressValidation => include_str!("../fixtures/address_validation.json"),
        RecordKind::BlockInfo => include_str!("../fixtures/block_info.json"),
        RecordKind::LabeledAddress => include_str!("../fixtures/labeled_address.json"),
        RecordKind::MultiSig => include_str!("../fixtures/multisig.json"),
        RecordKind::TransactionsSinceBlock =>
            include_str!("../fixtures/transactions_since_block.json"),
        RecordKind::Unspent => include_str!("../fixtures/unspent.json"),
        RecordKind::WalletInfo => include_str!("../fixtures/wallet_info.json"),
        RecordKind::WalletLoad => include_str!("../fixtures/wallet_load.json"),
        RecordKind::WalletTransaction => include_str!("../fixtures/wallet_transaction.json"),
        RecordKind::WalletUnload => include_str!("../fixtures/wallet_unload.json"),
    };
    parse(text)
}

/// `fixture(kind)` reduced to its mandatory members.
pub fn mandatory_only(kind: RecordKind) -> Value {
    let mut value = fixture(kind);
    value
        .as_object_mut()
        .expect("fixtures are objects")
        .retain(|name, _| kind.mandatory_fields().contains(&name.as_str()));
    value
}

/// `fixture(kind)` without `field`.
pub fn without(kind: RecordKind, field: &str) -> Value {
    let mut value = fixture(kind);
    value.as_object_mut().expect("fixtures are objects").remove(field);
    value
}

/// `fixture(kind)` with `field` set to `null`.
pub fn nulled(kind: RecordKind, field: &str) -> Value {
    let mut value = fixture(kind);
    value.as_object_mut().expect("fixtures are objects").insert(field.to_string(), Value::Null);
    value
}
