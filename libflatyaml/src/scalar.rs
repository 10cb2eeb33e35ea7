//! Scalar resolution: quote boundaries and primitive type inference.
//!
//! Quoting is a delimiter convention only. A token whose first and last
//! characters are the same quote character is a string; nothing inside
//! it is unescaped.

use crate::value::{Value, ValueType};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

// ============================================================================
// Quote Resolution
// ============================================================================

/// Interior of a quote-delimited token, if `t` is one.
///
/// `t` must already be trimmed.
fn quoted_interior(t: &str) -> Option<&str> {
    let bytes = t.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let first = bytes[0];
    if (first == b'\'' || first == b'"') && bytes[bytes.len() - 1] == first {
        Some(&t[1..t.len() - 1])
    } else {
        None
    }
}

/// Check whether a token is quote-delimited once trimmed.
pub fn is_quoted(raw: &str) -> bool {
    quoted_interior(raw.trim()).is_some()
}

/// Trim `raw` and remove one matching pair of surrounding quotes.
///
/// The interior is returned verbatim. Mismatched or lone quotes are
/// left in place.
pub fn adjust_value_quotes(raw: &str) -> &str {
    let t = raw.trim();
    quoted_interior(t).unwrap_or(t)
}

// ============================================================================
// Type Inference
// ============================================================================

impl ValueType {
    /// Classify a single scalar token.
    pub fn of(raw: &str) -> ValueType {
        let v = raw.trim();

        if is_quoted(v) {
            return ValueType::String;
        }
        if v == "~" || v.eq_ignore_ascii_case("null") {
            return ValueType::Null;
        }
        if v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false") {
            return ValueType::Boolean;
        }
        if is_integer_pattern(v) {
            return integer_type(v);
        }
        if is_decimal_pattern(v) {
            return decimal_type(v);
        }
        ValueType::String
    }
}

/// Check if string matches integer pattern: -?\d+
fn is_integer_pattern(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Check if string matches decimal pattern: -?\d+\.\d+
fn is_decimal_pattern(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    match s.split_once('.') {
        Some((before, after)) => is_digits(before) && is_digits(after),
        None => false,
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// 32-bit when it fits, 64-bit otherwise. Beyond 64 bits the literal
/// stays a string rather than being truncated.
fn integer_type(s: &str) -> ValueType {
    match s.parse::<BigInt>() {
        Ok(n) if n.to_i32().is_some() => ValueType::Integer,
        Ok(n) if n.to_i64().is_some() => ValueType::Long,
        _ => ValueType::String,
    }
}

/// Single precision when the `f32` reading renders back to the same
/// shortest decimal as the `f64` reading; double precision otherwise.
fn decimal_type(s: &str) -> ValueType {
    let double = match s.parse::<f64>() {
        Ok(d) if d.is_finite() => d,
        _ => return ValueType::String,
    };
    match s.parse::<f32>() {
        Ok(single) if single.is_finite() && single.to_string() == double.to_string() => {
            ValueType::Float
        }
        _ => ValueType::Double,
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert a token to the representation of `ty`.
///
/// A token that cannot be read as `ty` falls back to its unquoted text.
pub fn scalar_to_value(raw: &str, ty: ValueType) -> Value {
    let v = raw.trim();
    let converted = match ty {
        ValueType::Null => Some(Value::Null),
        ValueType::Boolean => Some(Value::Bool(v.eq_ignore_ascii_case("true"))),
        ValueType::Integer => v.parse().ok().map(Value::Int),
        ValueType::Long => v.parse().ok().map(Value::Long),
        ValueType::Float => v.parse().ok().map(Value::Float),
        ValueType::Double => v.parse().ok().map(Value::Double),
        ValueType::String => None,
    };
    converted.unwrap_or_else(|| Value::String(adjust_value_quotes(raw).to_string()))
}

/// Classify and convert a single token.
pub fn resolve_scalar(raw: &str) -> Value {
    scalar_to_value(raw, ValueType::of(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_value_quotes_unquoted() {
        assert_eq!(adjust_value_quotes("test1 test2 test3"), "test1 test2 test3");
        let once = adjust_value_quotes("plain");
        assert_eq!(adjust_value_quotes(once), once);
    }

    #[test]
    fn test_adjust_value_quotes_matching_pairs() {
        assert_eq!(adjust_value_quotes("'test'"), "test");
        assert_eq!(
            adjust_value_quotes("  'test1 test2 test3'  "),
            "test1 test2 test3"
        );
        assert_eq!(
            adjust_value_quotes("  \"test1 test2 test3\"  "),
            "test1 test2 test3"
        );
        assert_eq!(adjust_value_quotes("''"), "");
    }

    #[test]
    fn test_adjust_value_quotes_mismatched() {
        assert_eq!(adjust_value_quotes("\"test'"), "\"test'");
        assert_eq!(
            adjust_value_quotes("  \"test1 test2 test3'  "),
            "\"test1 test2 test3'"
        );
        assert_eq!(adjust_value_quotes("'"), "'");
    }

    #[test]
    fn test_adjust_value_quotes_keeps_interior() {
        assert_eq!(adjust_value_quotes("  \"don't\"  "), "don't");
        assert_eq!(adjust_value_quotes("  \"don\"t\"  "), "don\"t");
        assert_eq!(adjust_value_quotes("  'don\"t'  "), "don\"t");
        assert_eq!(adjust_value_quotes("  '  don\"t  '  "), "  don\"t  ");
        assert_eq!(adjust_value_quotes("  'don't'  "), "don't");
    }

    #[test]
    fn test_value_type_strings() {
        assert_eq!(ValueType::of("Test"), ValueType::String);
        assert_eq!(ValueType::of("'1'"), ValueType::String);
        assert_eq!(ValueType::of("\"1\""), ValueType::String);
        assert_eq!(ValueType::of("'null'"), ValueType::String);
        assert_eq!(ValueType::of("\"true\""), ValueType::String);
        assert_eq!(ValueType::of("+1"), ValueType::String);
        assert_eq!(ValueType::of("1."), ValueType::String);
        assert_eq!(ValueType::of(".5"), ValueType::String);
        assert_eq!(ValueType::of("1.2.3"), ValueType::String);
        assert_eq!(ValueType::of(""), ValueType::String);
    }

    #[test]
    fn test_value_type_integers() {
        assert_eq!(ValueType::of("1"), ValueType::Integer);
        assert_eq!(ValueType::of("-1"), ValueType::Integer);
        assert_eq!(ValueType::of("  1  "), ValueType::Integer);
        assert_eq!(ValueType::of(" 2147483647 "), ValueType::Integer);
        assert_eq!(ValueType::of("-2147483648"), ValueType::Integer);
        assert_eq!(ValueType::of(" 2147483648 "), ValueType::Long);
        assert_eq!(ValueType::of("328497587923456443"), ValueType::Long);
        assert_eq!(ValueType::of("9223372036854775807"), ValueType::Long);
    }

    #[test]
    fn test_value_type_integer_beyond_64_bits_is_string() {
        assert_eq!(ValueType::of("9223372036854775808"), ValueType::String);
        assert_eq!(
            resolve_scalar("123456789012345678901234567890"),
            Value::String("123456789012345678901234567890".into())
        );
    }

    #[test]
    fn test_value_type_decimals() {
        assert_eq!(ValueType::of("  123.0  "), ValueType::Float);
        assert_eq!(ValueType::of("  -123.45  "), ValueType::Float);
        assert_eq!(ValueType::of("1.1"), ValueType::Float);
        assert_eq!(ValueType::of("0.1234567891234"), ValueType::Double);
        assert_eq!(
            ValueType::of(" 83724850283478572378234895342345492312345.3 "),
            ValueType::Double
        );
    }

    #[test]
    fn test_value_type_decimal_beyond_f64_is_string() {
        let huge = format!("{}.5", "9".repeat(400));
        assert_eq!(ValueType::of(&huge), ValueType::String);
    }

    #[test]
    fn test_value_type_keywords() {
        assert_eq!(ValueType::of(" tRuE "), ValueType::Boolean);
        assert_eq!(ValueType::of(" FaLSe "), ValueType::Boolean);
        assert_eq!(ValueType::of("  ~  "), ValueType::Null);
        assert_eq!(ValueType::of("  nUlL  "), ValueType::Null);
    }

    #[test]
    fn test_resolve_scalar() {
        assert_eq!(resolve_scalar("42"), Value::Int(42));
        assert_eq!(resolve_scalar("2147483648"), Value::Long(2_147_483_648));
        assert_eq!(resolve_scalar("1.5"), Value::Float(1.5));
        assert_eq!(resolve_scalar("TRUE"), Value::Bool(true));
        assert_eq!(resolve_scalar("False"), Value::Bool(false));
        assert_eq!(resolve_scalar("~"), Value::Null);
        assert_eq!(resolve_scalar("'42'"), Value::String("42".into()));
        assert_eq!(resolve_scalar(" red "), Value::String("red".into()));
    }

    #[test]
    fn test_scalar_to_value_widens() {
        assert_eq!(scalar_to_value("1", ValueType::Long), Value::Long(1));
        assert_eq!(scalar_to_value("1", ValueType::Float), Value::Float(1.0));
        assert_eq!(scalar_to_value("1", ValueType::Double), Value::Double(1.0));
        assert_eq!(scalar_to_value("1", ValueType::String), Value::String("1".into()));
    }
}
