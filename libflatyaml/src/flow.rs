//! Flow collections: `[a, b, c]` and `{a: 1, b: 2}` on a single line.

use crate::pairs::{split_entry, Entry};
use crate::scalar::is_quoted;

/// Strip the expected outer delimiters and split the interior on `,`.
///
/// A delimiter that is not the expected one stays attached to the first
/// or last element. Elements are trimmed but not unquoted. An empty
/// interior yields one empty element.
pub fn flow_collection_to_list(raw: &str, open: char, close: char) -> Vec<String> {
    let s = raw.trim();
    let s = s.strip_prefix(open).unwrap_or(s);
    let s = s.strip_suffix(close).unwrap_or(s);
    s.split(',').map(|token| token.trim().to_string()).collect()
}

/// Whether a split collection is the explicitly empty one.
pub fn is_empty_collection(elements: &[String]) -> bool {
    elements.len() == 1 && elements[0].is_empty()
}

/// Whether the value token opens a flow sequence.
pub fn is_flow_sequence(value: &str) -> bool {
    value.starts_with('[')
}

/// Whether the value token opens a flow mapping.
pub fn is_flow_mapping(value: &str) -> bool {
    value.starts_with('{')
}

/// Whether a split element is itself an unquoted flow collection.
pub fn is_nested_collection(element: &str) -> bool {
    !is_quoted(element) && (is_flow_sequence(element) || is_flow_mapping(element))
}

/// Split the elements of a flow mapping into entries.
///
/// An element without `:` yields `None` in its slot so the caller can
/// report it.
pub fn flow_mapping_entries(elements: &[String]) -> Vec<Option<Entry<'_>>> {
    elements.iter().map(|element| split_entry(element)).collect()
}
