//! Wire conventions of the Anacreon (Hexarc) HTTP/JSON API.
//!
//! Everything here works on untyped [`serde_json::Value`] trees so it can sit
//! underneath the typed model in `anacreon_schema`:
//!
//! * [`naming`] converts between `snake_case` Rust field names and the API's
//!   `lowerCamelCase` keys, where the `id` token is always written `ID`.
//! * [`ip_integer`] encodes and decodes integers that do not fit in 31 bits,
//!   which the server ships as `["AEON2011:ipInteger:v1", "<base64>"]`.
//! * [`envelope`] recognises the 4-string error envelope the server returns
//!   instead of a state update when an action is rejected.

pub mod envelope;
pub mod ip_integer;
pub mod naming;

pub use envelope::{check_error_envelope, ApiError};
pub use ip_integer::{
    decode_ip_integer, decode_large_integers, encode_ip_integer, encode_large_integers,
    IP_INTEGER_SENTINEL, MAX_PLAIN_INTEGER,
};
pub use naming::{to_snake_name, to_wire_name};

use thiserror::Error;

/// Error returned when a wire value cannot be converted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("ipInteger payload is not valid base64: {0}")]
    InvalidBase64(String),
    #[error("ipInteger payload has {len} bytes, shorter than the 6 byte header")]
    TruncatedIpInteger { len: usize },
    #[error("ipInteger magnitude does not fit in a signed 64-bit integer")]
    IntegerOverflow,
}
