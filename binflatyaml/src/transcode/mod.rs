//! Transcoding of decoded pairs into other formats.
//!
//! Every encoder receives the pairs in emission order and writes one
//! top-level entry per pair, with the dotted key kept whole.

pub mod cbor;
pub mod toml;
pub mod yaml;

/// Widen a single-precision value without exposing binary noise
/// (`0.1f32` becomes `0.1`, not `0.10000000149011612`).
pub fn widen_float(f: f32) -> f64 {
    f.to_string().parse().unwrap_or(f64::from(f))
}
