//! Hexarc `ipInteger` encoding.
//!
//! Integers whose magnitude exceeds `2^31 - 1` are not sent as JSON numbers.
//! The server wraps them as `["AEON2011:ipInteger:v1", "<base64 blob>"]`
//! where the blob is:
//!
//! | bytes | contents |
//! |-------|----------|
//! | 0..4  | sign tag, `IP1+` or `IP1-`, byte-reversed |
//! | 4..6  | size field, big endian, always 1024 when we encode, ignored on decode |
//! | 6..   | unsigned big-endian magnitude |
//!
//! Resource and fleet counts pass this threshold routinely in late game, so the
//! conversion is applied to every number of every payload in both directions.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Number, Value};

use crate::WireError;

pub const IP_INTEGER_SENTINEL: &str = "AEON2011:ipInteger:v1";

/// Largest magnitude that is still sent as a plain JSON number.
pub const MAX_PLAIN_INTEGER: i64 = i32::MAX as i64;

const POSITIVE_TAG: [u8; 4] = *b"IP1+";
const NEGATIVE_TAG: [u8; 4] = *b"IP1-";
const SIZE_FIELD: u16 = 1024;
const HEADER_LEN: usize = 6;
const NARROW_MAGNITUDE_LEN: usize = 6;
const WIDE_MAGNITUDE_LEN: usize = 1023;

/// Encodes an integer for the wire: a plain number when it fits in 31 bits,
/// an ipInteger pair otherwise.
pub fn encode_ip_integer(value: i64) -> Value {
    if value.unsigned_abs() <= MAX_PLAIN_INTEGER as u64 {
        return Value::from(value);
    }
    pack(value < 0, value.unsigned_abs())
}

fn pack(negative: bool, magnitude: u64) -> Value {
    let tag = if negative { NEGATIVE_TAG } else { POSITIVE_TAG };
    let width = if magnitude < (1u64 << (8 * NARROW_MAGNITUDE_LEN)) {
        NARROW_MAGNITUDE_LEN
    } else {
        WIDE_MAGNITUDE_LEN
    };

    let magnitude_bytes = magnitude.to_be_bytes();
    let mut blob = Vec::with_capacity(HEADER_LEN + width);
    blob.extend(tag.iter().rev());
    blob.extend_from_slice(&SIZE_FIELD.to_be_bytes());
    if width >= magnitude_bytes.len() {
        blob.resize(HEADER_LEN + width - magnitude_bytes.len(), 0);
        blob.extend_from_slice(&magnitude_bytes);
    } else {
        blob.extend_from_slice(&magnitude_bytes[magnitude_bytes.len() - width..]);
    }

    Value::Array(vec![
        Value::from(IP_INTEGER_SENTINEL),
        Value::from(STANDARD.encode(blob)),
    ])
}

/// Decodes an ipInteger pair.
///
/// Returns `Ok(None)` when `value` does not have the ipInteger shape or carries
/// an unknown sign tag; such values are left for the caller to keep as they are.
pub fn decode_ip_integer(value: &Value) -> Result<Option<i64>, WireError> {
    let Value::Array(items) = value else {
        return Ok(None);
    };
    if items.len() != 2 || items[0].as_str() != Some(IP_INTEGER_SENTINEL) {
        return Ok(None);
    }
    let Some(encoded) = items[1].as_str() else {
        return Ok(None);
    };

    let blob = STANDARD
        .decode(encoded)
        .map_err(|err| WireError::InvalidBase64(err.to_string()))?;
    if blob.len() < HEADER_LEN {
        return Err(WireError::TruncatedIpInteger { len: blob.len() });
    }

    let mut tag = [0u8; 4];
    tag.copy_from_slice(&blob[0..4]);
    tag.reverse();
    let negative = match tag {
        POSITIVE_TAG => false,
        NEGATIVE_TAG => true,
        _ => return Ok(None),
    };

    let mut magnitude: u64 = 0;
    for &byte in &blob[HEADER_LEN..] {
        if magnitude >> 56 != 0 {
            return Err(WireError::IntegerOverflow);
        }
        magnitude = (magnitude << 8) | u64::from(byte);
    }

    let signed = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    i64::try_from(signed)
        .map(Some)
        .map_err(|_| WireError::IntegerOverflow)
}

/// Replaces every ipInteger pair inside `value` with a plain JSON number.
pub fn decode_large_integers(value: &mut Value) -> Result<(), WireError> {
    if let Some(decoded) = decode_ip_integer(value)? {
        *value = Value::from(decoded);
        return Ok(());
    }
    match value {
        Value::Array(items) => items.iter_mut().try_for_each(decode_large_integers),
        Value::Object(map) => map.values_mut().try_for_each(decode_large_integers),
        _ => Ok(()),
    }
}

/// Replaces every integer outside the 31-bit range inside `value` with its
/// ipInteger pair. Floating point numbers are left untouched.
pub fn encode_large_integers(value: &mut Value) {
    let replacement = match value {
        Value::Number(number) => encode_number(number),
        Value::Array(items) => {
            items.iter_mut().for_each(encode_large_integers);
            None
        }
        Value::Object(map) => {
            map.values_mut().for_each(encode_large_integers);
            None
        }
        _ => None,
    };
    if let Some(replacement) = replacement {
        *value = replacement;
    }
}

fn encode_number(number: &Number) -> Option<Value> {
    if let Some(signed) = number.as_i64() {
        (signed.unsigned_abs() > MAX_PLAIN_INTEGER as u64)
            .then(|| pack(signed < 0, signed.unsigned_abs()))
    } else {
        number.as_u64().map(|unsigned| pack(false, unsigned))
    }
}
