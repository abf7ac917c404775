//! Result decoding.
//!
//! Every domain record implements [`DomainRecord`], which names the record
//! and lists the JSON members that must be present and non-null. [`decode`]
//! checks those members first, so a missing field is reported by name, then
//! hands the object to `serde`. Unknown members are ignored.

use std::collections::BTreeSet;

use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, Amount, BlockHash, Txid};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Errors raised while turning a JSON result into a typed value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A mandatory member is absent or `null`.
    #[error("{record}: missing mandatory field `{field}`")]
    MissingField {
        /// Record being decoded.
        record: &'static str,
        /// JSON member name.
        field: &'static str,
    },

    /// The JSON value has the wrong kind (e.g. an array where an object was expected).
    #[error("{record}: expected {expected}, found {found}")]
    UnexpectedShape {
        /// Record being decoded.
        record: &'static str,
        /// Expected JSON kind.
        expected: &'static str,
        /// JSON kind that was found.
        found: &'static str,
    },

    /// A member is present but could not be converted.
    #[error("{record}: {reason}")]
    Invalid {
        /// Record being decoded.
        record: &'static str,
        /// Underlying conversion failure.
        reason: String,
    },
}

/// A typed view of one JSON object returned by the daemon.
pub trait DomainRecord: DeserializeOwned {
    /// Record name used in error reports.
    const NAME: &'static str;

    /// JSON members that must be present and non-null.
    const MANDATORY: &'static [&'static str];

    /// Decodes one record from a JSON value.
    ///
    /// The default checks [`Self::MANDATORY`] and then deserializes. Records
    /// that nest other records override this to decode their children
    /// through [`decode_list`], so errors name the innermost record.
    fn from_json(value: Value) -> Result<Self, DecodeError> {
        check_mandatory::<Self>(&value)?;
        from_value(Self::NAME, value)
    }
}

/// Decodes a single record.
pub fn decode<T: DomainRecord>(value: Value) -> Result<T, DecodeError> { T::from_json(value) }

/// Decodes an array of records element by element.
///
/// `[]` yields an empty `Vec`; `null` or any non-array value is an error.
pub fn decode_list<T: DomainRecord>(value: Value) -> Result<Vec<T>, DecodeError> {
    match value {
        Value::Array(items) => items.into_iter().map(T::from_json).collect(),
        other => Err(DecodeError::UnexpectedShape {
            record: T::NAME,
            expected: "array",
            found: json_kind(&other),
        }),
    }
}

/// Verifies that `value` is an object carrying every mandatory member of `T`.
pub fn check_mandatory<T: DomainRecord>(value: &Value) -> Result<(), DecodeError> {
    let object = value.as_object().ok_or_else(|| DecodeError::UnexpectedShape {
        record: T::NAME,
        expected: "object",
        found: json_kind(value),
    })?;

    match T::MANDATORY.iter().find(|field| object.get(**field).map_or(true, Value::is_null)) {
        Some(field) => Err(DecodeError::MissingField { record: T::NAME, field: *field }),
        None => Ok(()),
    }
}

/// Runs `serde` on a value, tagging failures with `record`.
pub(crate) fn from_value<T: DeserializeOwned>(
    record: &'static str,
    value: Value,
) -> Result<T, DecodeError> {
    serde_json::from_value(value)
        .map_err(|e| DecodeError::Invalid { record, reason: e.to_string() })
}

/// Decodes a non-null scalar result.
fn decode_scalar<T: DeserializeOwned>(
    record: &'static str,
    value: Value,
) -> Result<T, DecodeError> {
    if value.is_null() {
        return Err(DecodeError::UnexpectedShape { record, expected: "a value", found: "null" });
    }
    from_value(record, value)
}

/// Decodes a BTC amount such as the result of `getbalance`.
pub fn decode_amount(value: Value) -> Result<Amount, DecodeError> {
    #[derive(serde::Deserialize)]
    struct Btc(#[serde(with = "crate::amount::btc")] Amount);

    decode_scalar::<Btc>("Amount", value).map(|Btc(amount)| amount)
}

/// Decodes a transaction id.
pub fn decode_txid(value: Value) -> Result<Txid, DecodeError> { decode_scalar("Txid", value) }

/// Decodes a block hash.
pub fn decode_block_hash(value: Value) -> Result<BlockHash, DecodeError> {
    decode_scalar("BlockHash", value)
}

/// Decodes an address of any network.
pub fn decode_address(value: Value) -> Result<Address<NetworkUnchecked>, DecodeError> {
    decode_scalar("Address", value)
}

/// Decodes a non-negative integer such as a block count.
pub fn decode_u64(value: Value) -> Result<u64, DecodeError> { decode_scalar("u64", value) }

/// Decodes an array of block hashes (`generatetoaddress`).
pub fn decode_block_hashes(value: Value) -> Result<Vec<BlockHash>, DecodeError> {
    decode_scalar("BlockHash list", value)
}

/// Decodes an array of strings (`listlabels`).
pub fn decode_strings(value: Value) -> Result<Vec<String>, DecodeError> {
    decode_scalar("String list", value)
}

/// Decodes an array of strings into a set (`listwallets`).
pub fn decode_string_set(value: Value) -> Result<BTreeSet<String>, DecodeError> {
    decode_strings(value).map(|names| names.into_iter().collect())
}

/// Returns the JSON kind of `value`, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Probe {
        name: String,
        #[allow(dead_code)]
        extra: Option<u32>,
    }

    impl DomainRecord for Probe {
        const NAME: &'static str = "Probe";
        const MANDATORY: &'static [&'static str] = &["name"];
    }

    #[test]
    fn test_missing_and_null_fields() {
        assert_eq!(
            decode::<Probe>(json!({"extra": 1})).expect_err("missing"),
            DecodeError::MissingField { record: "Probe", field: "name" }
        );
        assert_eq!(
            decode::<Probe>(json!({"name": null})).expect_err("null"),
            DecodeError::MissingField { record: "Probe", field: "name" }
        );
    }

    #[test]
    fn test_shape_errors() {
        assert_eq!(
            decode::<Probe>(json!([1])).expect_err("array"),
            DecodeError::UnexpectedShape { record: "Probe", expected: "object", found: "array" }
        );
        assert_eq!(
            decode_list::<Probe>(Value::Null).expect_err("null list"),
            DecodeError::UnexpectedShape { record: "Probe", expected: "array", found: "null" }
        );
        assert!(matches!(
            decode::<Probe>(json!({"name": 5})),
            Err(DecodeError::Invalid { record: "Probe", .. })
        ));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let probe: Probe = decode(json!({"name": "x", "added_in_v31": [1, 2]})).expect("decode");
        assert_eq!(probe.name, "x");
    }

    #[test]
    fn test_lists() {
        assert!(decode_list::<Probe>(json!([])).expect("empty").is_empty());

        let probes: Vec<Probe> =
            decode_list(json!([{"name": "a"}, {"name": "b", "extra": 2}])).expect("list");
        assert_eq!(probes.len(), 2);

        assert_eq!(
            decode_list::<Probe>(json!([{"name": "a"}, {}])).expect_err("second element"),
            DecodeError::MissingField { record: "Probe", field: "name" }
        );
    }

    #[test]
    fn test_scalars() {
        let one_sat: Value = serde_json::from_str("0.00000001").expect("json");
        assert_eq!(decode_amount(one_sat).expect("amount"), Amount::from_sat(1));
        assert!(decode_amount(Value::Null).is_err());
        assert_eq!(decode_u64(json!(105)).expect("count"), 105);

        let set = decode_string_set(json!(["b", "a", "b"])).expect("set");
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["a".to_string(), "b".to_string()]);

        let hash = "0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206";
        assert_eq!(decode_block_hash(json!(hash)).expect("hash").to_string(), hash);
        assert!(decode_txid(json!("not-a-txid")).is_err());
    }
}
