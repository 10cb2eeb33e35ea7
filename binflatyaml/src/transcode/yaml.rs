//! YAML transcoding: write decoded pairs as a YAML mapping.
//!
//! Mapping from pair values to YAML:
//!   - Value::Null           -> YAML null
//!   - Value::Bool           -> YAML bool
//!   - Value::Int / Long     -> YAML integer
//!   - Value::Float / Double -> YAML float
//!   - Value::String         -> YAML string
//!   - Value::List           -> YAML sequence
//!
//! Keys keep their dots, so `server.port: 8080` is a single key.

use libflatyaml::Value;

use super::widen_float;

/// Encode pairs as a YAML string.
pub fn encode(pairs: &[(String, Value)]) -> Result<String, String> {
    let mut map = serde_yaml::Mapping::new();
    for (key, value) in pairs {
        map.insert(serde_yaml::Value::String(key.clone()), value_to_yaml(value));
    }
    serde_yaml::to_string(&serde_yaml::Value::Mapping(map))
        .map_err(|e| format!("YAML encode error: {}", e))
}

fn value_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Int(n) => serde_yaml::Value::Number(serde_yaml::Number::from(i64::from(*n))),
        Value::Long(n) => serde_yaml::Value::Number(serde_yaml::Number::from(*n)),
        Value::Float(f) => serde_yaml::Value::Number(serde_yaml::Number::from(widen_float(*f))),
        Value::Double(f) => serde_yaml::Value::Number(serde_yaml::Number::from(*f)),
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::List(items) => serde_yaml::Value::Sequence(items.iter().map(value_to_yaml).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_keeps_order_and_dots() {
        let pairs = vec![
            ("server.port".to_string(), Value::Int(8080)),
            ("name".to_string(), Value::from("x")),
            ("ratio".to_string(), Value::Float(0.1)),
            ("tags".to_string(), Value::List(vec![Value::Null, Value::from("a")])),
        ];
        let out = encode(&pairs).unwrap();
        assert_eq!(
            out,
            "server.port: 8080\nname: x\nratio: 0.1\ntags:\n- null\n- a\n"
        );
    }
}
