//! TOML transcoding: write decoded pairs as a flat TOML table.
//!
//! Mapping from pair values to TOML:
//!   - Value::Null           -> error (TOML has no null)
//!   - Value::Bool           -> TOML boolean
//!   - Value::Int / Long     -> TOML integer
//!   - Value::Float / Double -> TOML float
//!   - Value::String         -> TOML string
//!   - Value::List           -> TOML array (null elements error)
//!
//! Dotted keys are written quoted (`"server.port" = 8080`) so the table
//! stays flat.

use libflatyaml::Value;
use toml_edit::DocumentMut;

use super::widen_float;

/// Encode pairs as a TOML string.
pub fn encode(pairs: &[(String, Value)]) -> Result<String, String> {
    let mut doc = DocumentMut::new();
    for (key, value) in pairs {
        let toml_value = value_to_toml(value).map_err(|e| format!("{} (key `{}`)", e, key))?;
        doc.insert(key, toml_edit::Item::Value(toml_value));
    }
    Ok(doc.to_string())
}

fn value_to_toml(value: &Value) -> Result<toml_edit::Value, String> {
    match value {
        Value::Null => Err("TOML has no null type".to_string()),
        Value::Bool(b) => Ok(toml_edit::Value::from(*b)),
        Value::Int(n) => Ok(toml_edit::Value::from(i64::from(*n))),
        Value::Long(n) => Ok(toml_edit::Value::from(*n)),
        Value::Float(f) => Ok(toml_edit::Value::from(widen_float(*f))),
        Value::Double(f) => Ok(toml_edit::Value::from(*f)),
        Value::String(s) => Ok(toml_edit::Value::from(s.as_str())),
        Value::List(items) => {
            let mut arr = toml_edit::Array::new();
            for item in items {
                arr.push(value_to_toml(item)?);
            }
            Ok(toml_edit::Value::Array(arr))
        }
    }
}
