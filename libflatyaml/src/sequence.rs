//! Sequence type inference.
//!
//! Every element is classified on its own, nulls are set aside, and the
//! remaining types are merged with `merge_types`. Numeric types widen
//! `Int -> Long -> Float -> Double`; any other disagreement is `String`.

use crate::scalar::scalar_to_value;
use crate::value::{SequenceType, Value, ValueType};

impl SequenceType {
    /// Classify a list of raw element tokens.
    pub fn of<S: AsRef<str>>(items: &[S]) -> SequenceType {
        let mut contains_null = false;
        let mut merged: Option<ValueType> = None;

        for item in items {
            match ValueType::of(item.as_ref()) {
                ValueType::Null => contains_null = true,
                ty => {
                    merged = Some(match merged {
                        Some(acc) => merge_types(acc, ty),
                        None => ty,
                    })
                }
            }
        }

        SequenceType {
            contains_null,
            element_type: merged.unwrap_or(ValueType::String),
        }
    }
}

/// Merge two non-null element types.
fn merge_types(a: ValueType, b: ValueType) -> ValueType {
    use ValueType::*;

    match (a, b) {
        _ if a == b => a,
        (Integer, Long) | (Long, Integer) => Long,
        (Double, Integer | Long | Float) | (Integer | Long | Float, Double) => Double,
        (Float, Integer | Long) | (Integer | Long, Float) => Float,
        _ => String,
    }
}

/// Convert raw tokens to values sharing the sequence's element type.
///
/// Null tokens stay `Value::Null` in their slot.
pub fn sequence_to_values<S: AsRef<str>>(items: &[S], seq: SequenceType) -> Vec<Value> {
    items
        .iter()
        .map(|item| {
            let raw = item.as_ref();
            if ValueType::of(raw) == ValueType::Null {
                Value::Null
            } else {
                scalar_to_value(raw, seq.element_type)
            }
        })
        .collect()
}

/// Classify and convert a list of tokens into a `Value::List`.
pub fn resolve_sequence<S: AsRef<str>>(items: &[S]) -> Value {
    let seq = SequenceType::of(items);
    Value::List(sequence_to_values(items, seq))
}
