//! Flat YAML decoder.
//!
//! Decodes a practical subset of YAML (block mappings, block and flow
//! sequences, flow mappings, block scalars, comments) into a stream of
//! dotted key/value pairs whose values carry an inferred type.
//!
//! ```text
//! server:
//!   port: 8080          ->  server.port  = 8080 (Int)
//!   hosts: [a, b]       ->  server.hosts = [a, b] (List of String)
//! ```
//!
//! # Decoding Pipeline
//!
//! The decoder operates in three phases, one line at a time:
//!
//! 1. **Scanner**: Measures each raw line, rejecting tab indentation and
//!    classifying it as blank, comment, document marker, sequence item or
//!    mapping entry.
//!
//! 2. **Indentation Stack**: Tracks the open nesting path and closes
//!    levels when a line is indented at or below them.
//!
//! 3. **Walker**: Splits entries into key and value, infers types and
//!    hands every leaf to the consumer as soon as it is known.

mod block;
mod error;
mod flow;
mod indent;
mod options;
mod pairs;
mod scalar;
mod scanner;
mod sequence;
mod value;
mod walker;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub use error::{DecodeContext, DecodeError, Result};
pub use flow::flow_collection_to_list;
pub use indent::{Indentation, IndentationStack};
pub use options::DecodeOptions;
pub use pairs::{is_key_valid, value_from_separated_parts};
pub use scalar::{adjust_value_quotes, resolve_scalar};
pub use scanner::leading_space_count;
pub use sequence::resolve_sequence;
pub use value::{SequenceType, Value, ValueType};
pub use walker::Decoder;

/// Decode a document held in memory.
///
/// # Example
///
/// ```
/// use libflatyaml::{decode, Value};
///
/// let mut pairs = Vec::new();
/// decode("colors:\n  primary: red\n", |key, value| pairs.push((key, value))).unwrap();
/// assert_eq!(pairs, vec![("colors.primary".to_string(), Value::from("red"))]);
/// ```
pub fn decode<F>(input: &str, on_item: F) -> Result<()>
where
    F: FnMut(String, Value),
{
    decode_lines(input.lines(), DecodeOptions::default(), on_item)
}

/// Decode a document supplied as a sequence of lines.
pub fn decode_lines<I, F>(lines: I, options: DecodeOptions, on_item: F) -> Result<()>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    F: FnMut(String, Value),
{
    let mut decoder = Decoder::new(options, on_item);
    for line in lines {
        decoder.feed_line(line.as_ref())?;
    }
    decoder.finish()
}

/// Decode a document read line by line from `reader`.
///
/// A read failure surfaces as [`DecodeError::SourceUnavailable`].
pub fn decode_reader<R, F>(reader: R, options: DecodeOptions, on_item: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(String, Value),
{
    let name = options
        .source_name
        .clone()
        .unwrap_or_else(|| "<input>".to_string());
    let mut decoder = Decoder::new(options, on_item);
    for line in reader.lines() {
        let line = line.map_err(|e| DecodeError::source_unavailable(name.as_str(), e))?;
        decoder.feed_line(&line)?;
    }
    decoder.finish()
}

/// Decode the file at `path`, naming it in error locations.
pub fn decode_file<P, F>(path: P, on_item: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnMut(String, Value),
{
    let path = path.as_ref();
    let name = path.display().to_string();
    let file = File::open(path).map_err(|e| DecodeError::source_unavailable(name.as_str(), e))?;
    let options = DecodeOptions::default().with_source_name(name);
    decode_reader(BufReader::new(file), options, on_item)
}

/// Render a pair as one `key | value | type` line.
///
/// Line breaks inside string values are written as `\n`.
pub fn format_pair(key: &str, value: &Value) -> String {
    let text = value.to_string().replace('\n', "\\n");
    format!("{} | {} | {}", key, text, value.type_name())
}

/// Decode a document and collect the pairs in emission order.
pub fn decode_to_vec(input: &str) -> Result<Vec<(String, Value)>> {
    let mut pairs = Vec::new();
    decode(input, |key, value| pairs.push((key, value)))?;
    Ok(pairs)
}
