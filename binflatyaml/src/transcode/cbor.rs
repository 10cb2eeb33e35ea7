//! CBOR transcoding: write decoded pairs as a CBOR map.
//!
//! Mapping from pair values to CBOR:
//!   - Value::Null           -> CBOR null (simple value 22)
//!   - Value::Bool           -> CBOR bool (simple values 20/21)
//!   - Value::Int / Long     -> CBOR integer (smallest encoding that fits)
//!   - Value::Float / Double -> CBOR float
//!   - Value::String         -> CBOR text string
//!   - Value::List           -> CBOR array (determinate length)
//!
//! The top-level map has one text-string key per pair, in emission order.

use ciborium::value::Value as CborValue;
use libflatyaml::Value;

use super::widen_float;

/// Encode pairs as CBOR bytes.
pub fn encode(pairs: &[(String, Value)]) -> Result<Vec<u8>, String> {
    let map = pairs
        .iter()
        .map(|(key, value)| (CborValue::Text(key.clone()), value_to_cbor(value)))
        .collect();
    let mut buf = Vec::new();
    ciborium::ser::into_writer(&CborValue::Map(map), &mut buf)
        .map_err(|e| format!("CBOR encode error: {}", e))?;
    Ok(buf)
}

fn value_to_cbor(value: &Value) -> CborValue {
    match value {
        Value::Null => CborValue::Null,
        Value::Bool(b) => CborValue::Bool(*b),
        Value::Int(n) => CborValue::Integer((*n).into()),
        Value::Long(n) => CborValue::Integer((*n).into()),
        Value::Float(f) => CborValue::Float(widen_float(*f)),
        Value::Double(f) => CborValue::Float(*f),
        Value::String(s) => CborValue::Text(s.clone()),
        Value::List(items) => CborValue::Array(items.iter().map(value_to_cbor).collect()),
    }
}
