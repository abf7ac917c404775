//! Exact BTC amount encoding.
//!
//! Bitcoin Core writes amounts as JSON numbers with eight decimal places
//! (`"amount": 50.00000000`). Reading them through `f64` can lose precision,
//! so amounts are taken from the number's original text (serde_json is built
//! with `arbitrary_precision`) and parsed straight into satoshis.
//!
//! The submodules are meant for `#[serde(with = "...")]`:
//!
//! ```
//! use bitcoin::Amount;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Balance {
//!     #[serde(with = "types::amount::btc")]
//!     value: Amount,
//! }
//!
//! let balance: Balance = serde_json::from_str(r#"{"value": 0.00000001}"#).unwrap();
//! assert_eq!(balance.value, Amount::from_sat(1));
//! ```

use std::borrow::Cow;
use std::str::FromStr;

use bitcoin::{Amount, Denomination, SignedAmount};
use serde_json::{Number, Value};

const SATS_PER_BTC: u64 = 100_000_000;

/// Formats a satoshi count as a BTC decimal string with eight places.
fn format_btc(negative: bool, sats: u64) -> String {
    let sign = if negative { "-" } else { "" };
    format!("{}{}.{:08}", sign, sats / SATS_PER_BTC, sats % SATS_PER_BTC)
}

/// Renders an amount as Bitcoin Core prints it, e.g. `"0.00010000"`.
pub fn amount_to_btc_string(amount: Amount) -> String { format_btc(false, amount.to_sat()) }

/// Renders a signed amount as Bitcoin Core prints it, e.g. `"-0.00001410"`.
pub fn signed_amount_to_btc_string(amount: SignedAmount) -> String {
    let sats = amount.to_sat();
    format_btc(sats < 0, sats.unsigned_abs())
}

/// Largest exponent worth expanding; anything beyond is far outside the 21M BTC range.
const MAX_EXPONENT: i64 = 32;

/// Rewrites exponent notation such as `5.46e-6` as plain decimal text (`0.00000546`).
///
/// serde_json prints small numbers that way once they have passed through a
/// [`Value`]. The digits are shifted as text, so nothing is rounded. Text
/// without an exponent, or one that is not a plain decimal mantissa, comes
/// back unchanged and is left for the amount parser to reject.
fn expand_exponent(text: &str) -> Cow<'_, str> {
    let Some((mantissa, exponent)) = text.split_once(['e', 'E']) else {
        return Cow::Borrowed(text);
    };
    let exponent = match exponent.parse::<i64>() {
        Ok(exponent) if exponent.abs() <= MAX_EXPONENT => exponent,
        _ => return Cow::Borrowed(text),
    };
    let (sign, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if int.is_empty() || !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return Cow::Borrowed(text);
    }

    let digits = [int, frac].concat();
    let point = int.len() as i64 + exponent;
    let (whole, fraction) = if point <= 0 {
        (String::new(), format!("{}{}", "0".repeat(point.unsigned_abs() as usize), digits))
    } else if point as usize >= digits.len() {
        let padding = "0".repeat(point as usize - digits.len());
        (format!("{}{}", digits, padding), String::new())
    } else {
        let (whole, fraction) = digits.split_at(point as usize);
        (whole.to_string(), fraction.to_string())
    };

    let whole = match whole.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    Cow::Owned(match fraction.trim_end_matches('0') {
        "" => format!("{}{}", sign, whole),
        fraction => format!("{}{}.{}", sign, whole, fraction),
    })
}

/// Parses BTC decimal text into an [`Amount`].
///
/// Exponent notation is accepted when it denotes a whole number of satoshis.
/// Rejects negative values and more than eight decimal places.
pub fn parse_btc(text: &str) -> Result<Amount, bitcoin::amount::ParseAmountError> {
    Amount::from_str_in(&expand_exponent(text), Denomination::Bitcoin)
}

/// Parses BTC decimal text into a [`SignedAmount`].
pub fn parse_signed_btc(text: &str) -> Result<SignedAmount, bitcoin::amount::ParseAmountError> {
    SignedAmount::from_str_in(&expand_exponent(text), Denomination::Bitcoin)
}

/// Encodes an amount as an exact JSON number, for use as an RPC parameter.
pub fn amount_to_json(amount: Amount) -> Result<Value, serde_json::Error> {
    Number::from_str(&amount_to_btc_string(amount)).map(Value::Number)
}

/// Encodes a signed amount as an exact JSON number.
pub fn signed_amount_to_json(amount: SignedAmount) -> Result<Value, serde_json::Error> {
    Number::from_str(&signed_amount_to_btc_string(amount)).map(Value::Number)
}

/// `serde` adapter for a mandatory [`Amount`] in BTC.
pub mod btc {
    use bitcoin::Amount;
    use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Number;

    /// Deserializes an amount from the exact text of a JSON number.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let number = Number::deserialize(deserializer)?;
        super::parse_btc(&number.to_string())
            .map_err(|e| de::Error::custom(format!("invalid BTC amount {}: {}", number, e)))
    }

    /// Serializes an amount as an exact JSON number.
    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        super::amount_to_json(*amount).map_err(ser::Error::custom)?.serialize(serializer)
    }
}

/// `serde` adapter for a mandatory [`SignedAmount`] in BTC.
pub mod signed_btc {
    use bitcoin::SignedAmount;
    use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Number;

    /// Deserializes a signed amount from the exact text of a JSON number.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<SignedAmount, D::Error> {
        let number = Number::deserialize(deserializer)?;
        super::parse_signed_btc(&number.to_string())
            .map_err(|e| de::Error::custom(format!("invalid BTC amount {}: {}", number, e)))
    }

    /// Serializes a signed amount as an exact JSON number.
    pub fn serialize<S: Serializer>(
        amount: &SignedAmount,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        super::signed_amount_to_json(*amount).map_err(ser::Error::custom)?.serialize(serializer)
    }
}

/// `serde` adapter for an optional [`Amount`] in BTC. Pair with `#[serde(default)]`.
pub mod opt_btc {
    use bitcoin::Amount;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    struct Wrapped(#[serde(with = "super::btc")] Amount);

    /// Deserializes `null` as `None`, a number as `Some`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Amount>, D::Error> {
        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(amount)| amount))
    }

    /// Serializes `None` as `null`.
    pub fn serialize<S: Serializer>(
        amount: &Option<Amount>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match amount {
            Some(amount) => super::btc::serialize(amount, serializer),
            None => serializer.serialize_none(),
        }
    }
}

/// `serde` adapter for an optional [`SignedAmount`] in BTC. Pair with `#[serde(default)]`.
pub mod opt_signed_btc {
    use bitcoin::SignedAmount;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    struct Wrapped(#[serde(with = "super::signed_btc")] SignedAmount);

    /// Deserializes `null` as `None`, a number as `Some`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SignedAmount>, D::Error> {
        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(amount)| amount))
    }

    /// Serializes `None` as `null`.
    pub fn serialize<S: Serializer>(
        amount: &Option<SignedAmount>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match amount {
            Some(amount) => super::signed_btc::serialize(amount, serializer),
            None => serializer.serialize_none(),
        }
    }
}
