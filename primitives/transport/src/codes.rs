//! Well-known Bitcoin Core JSON-RPC error codes.
//!
//! Not a closed set: the daemon may report codes that are not listed here and
//! [`crate::RpcError`] keeps whatever it receives.

/// Placeholder for error objects that carry no integer code.
pub const UNKNOWN: i64 = 0;

/// `std::exception` thrown in command handling.
pub const RPC_MISC_ERROR: i64 = -1;
/// Unexpected type was passed as parameter.
pub const RPC_TYPE_ERROR: i64 = -3;
/// Unspecified problem with the wallet (key not found etc.).
pub const RPC_WALLET_ERROR: i64 = -4;
/// Invalid address or key.
pub const RPC_INVALID_ADDRESS_OR_KEY: i64 = -5;
/// Not enough funds in wallet or account.
pub const RPC_WALLET_INSUFFICIENT_FUNDS: i64 = -6;
/// Invalid, missing or duplicate parameter.
pub const RPC_INVALID_PARAMETER: i64 = -8;
/// Invalid label name.
pub const RPC_WALLET_INVALID_LABEL_NAME: i64 = -11;
/// Invalid wallet specified.
pub const RPC_WALLET_NOT_FOUND: i64 = -18;
/// No wallet specified while several are loaded.
pub const RPC_WALLET_NOT_SPECIFIED: i64 = -19;
/// This same wallet is already loaded.
pub const RPC_WALLET_ALREADY_LOADED: i64 = -35;
/// There is already a wallet with the same name.
pub const RPC_WALLET_ALREADY_EXISTS: i64 = -36;

/// The request was not a valid JSON-RPC request object.
pub const RPC_INVALID_REQUEST: i64 = -32600;
/// The method does not exist.
pub const RPC_METHOD_NOT_FOUND: i64 = -32601;
/// Invalid method parameters.
pub const RPC_INVALID_PARAMS: i64 = -32602;
/// The request body could not be parsed.
pub const RPC_PARSE_ERROR: i64 = -32700;
