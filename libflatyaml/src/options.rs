//! Configuration options for decoding.

/// Options for controlling a decode pass.
///
/// # Examples
///
/// ```
/// use libflatyaml::DecodeOptions;
///
/// let opts = DecodeOptions::default()
///     .with_source_name("settings.yaml")
///     .with_empty_keys(false);
/// assert!(!opts.emit_empty_keys);
/// ```
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Name of the source, used in error locations.
    ///
    /// Default: `None`
    pub source_name: Option<String>,

    /// Emit `null` for a key that has neither an inline value nor
    /// nested content.
    ///
    /// Default: `true`
    pub emit_empty_keys: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            source_name: None,
            emit_empty_keys: true,
        }
    }
}

impl DecodeOptions {
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn with_empty_keys(mut self, emit: bool) -> Self {
        self.emit_empty_keys = emit;
        self
    }
}
