//! Phase 3: Document walker
//!
//! The walker consumes scanned lines in order and keeps the indentation
//! stack in step with them. It handles:
//! - Block mappings: `key:` opens a level, `key: value` emits a leaf
//! - Block sequences: scalar items are buffered and emitted as one list,
//!   mapping items nest under their zero-based index
//! - Flow collections: `[a, b]` and `{a: 1}` are resolved on the spot
//! - Block scalars: `|` and `>` collect the deeper lines that follow
//!
//! Every leaf is delivered as a fully-qualified dotted key and a typed
//! value through the consumer callback.

use log::{debug, trace, warn};

use crate::block::{BlockHeader, BlockScalar};
use crate::error::{DecodeContext, DecodeError, Result};
use crate::flow::{
    flow_collection_to_list, flow_mapping_entries, is_empty_collection, is_flow_mapping,
    is_flow_sequence, is_nested_collection,
};
use crate::indent::{Indentation, IndentationStack, MappingItems};
use crate::options::DecodeOptions;
use crate::pairs::{is_key_valid, is_mapping_entry, item_value, split_entry};
use crate::scalar::resolve_scalar;
use crate::scanner::{scan_line, LineKind, ScanLine};
use crate::sequence::resolve_sequence;
use crate::value::Value;

/// Token used for an item written as a bare `-`.
const EMPTY_ITEM: &str = "~";

/// A single decode pass.
///
/// Owns all parser state; create one per document.
pub struct Decoder<F>
where
    F: FnMut(String, Value),
{
    ctx: DecodeContext,
    emit_empty_keys: bool,
    indentation: IndentationStack,
    /// Raw tokens of the block sequence being gathered.
    active_sequence: Vec<String>,
    /// Indentation of the `-` markers of the gathered sequence.
    sequence_width: Option<usize>,
    block: Option<BlockScalar>,
    root_width: Option<usize>,
    line_num: usize,
    seen_content: bool,
    ended: bool,
    halted: bool,
    emitted: usize,
    on_item: F,
}

impl<F> Decoder<F>
where
    F: FnMut(String, Value),
{
    pub fn new(options: DecodeOptions, on_item: F) -> Self {
        Self {
            ctx: DecodeContext::new(options.source_name.as_deref()),
            emit_empty_keys: options.emit_empty_keys,
            indentation: IndentationStack::new(),
            active_sequence: Vec::new(),
            sequence_width: None,
            block: None,
            root_width: None,
            line_num: 0,
            seen_content: false,
            ended: false,
            halted: false,
            emitted: 0,
            on_item,
        }
    }

    /// Process the next line of the document.
    ///
    /// The first error halts the pass; pairs already delivered stay
    /// delivered.
    pub fn feed_line(&mut self, raw: &str) -> Result<()> {
        self.check_halted()?;
        let line_num = self.line_num;
        self.line_num += 1;

        if line_num == 0 {
            debug!("decoding {}", self.source_label());
        }
        if self.ended {
            return Ok(());
        }

        let result = self.process(raw, line_num);
        if result.is_err() {
            self.halted = true;
        }
        result
    }

    /// Flush pending sequences, block scalars and open keys.
    pub fn finish(mut self) -> Result<()> {
        self.check_halted()?;
        self.finish_block();
        if self.sequence_width.is_some() {
            self.apply_gathered_sequence_values();
        }
        self.close_levels(0);
        self.indentation.clear();
        debug!(
            "decoded {} pairs from {} lines of {}",
            self.emitted,
            self.line_num,
            self.source_label()
        );
        Ok(())
    }

    fn check_halted(&self) -> Result<()> {
        if self.halted {
            return Err(DecodeError::malformed("decoder halted by an earlier error"));
        }
        Ok(())
    }

    fn source_label(&self) -> &str {
        self.ctx.source_name.as_deref().unwrap_or("<input>")
    }

    fn process(&mut self, raw: &str, line_num: usize) -> Result<()> {
        if let Some(block) = self.block.as_mut() {
            if block.accept(raw) {
                return Ok(());
            }
            self.finish_block();
        }

        let line = scan_line(raw, line_num, &self.ctx)?;
        let result = match line.kind() {
            LineKind::Blank | LineKind::Comment => Ok(()),
            LineKind::DocumentStart => {
                if self.seen_content {
                    warn!(
                        "second document in {} ignored; multi-document streams are not supported",
                        self.source_label()
                    );
                    self.ended = true;
                }
                Ok(())
            }
            LineKind::DocumentEnd => {
                self.ended = true;
                Ok(())
            }
            LineKind::SequenceItem => {
                self.seen_content = true;
                self.sequence_item(&line)
            }
            LineKind::Entry => {
                self.seen_content = true;
                self.entry_line(line.indent, line.text)
            }
        };
        result.map_err(|e| e.with_location(&self.ctx, line.line_num, line.indent))
    }

    // ========================================================================
    // Mapping entries
    // ========================================================================

    /// Handle a `key: value` or `key:` line at `width`.
    fn entry_line(&mut self, width: usize, text: &str) -> Result<()> {
        if self.sequence_width.is_some() {
            self.apply_gathered_sequence_values();
        }
        self.close_levels(width);
        self.claim_child_slot(width)?;

        let entry = split_entry(text)
            .ok_or_else(|| DecodeError::malformed("expected `key: value` or `key:`"))?;
        if !is_key_valid(entry.key) {
            return Err(DecodeError::unresolvable_key(entry.key));
        }
        self.resolve_entry(width, entry.key, &entry.value)
    }

    /// Record `width` as the child indentation of the enclosing level,
    /// or check it against the one already recorded.
    fn claim_child_slot(&mut self, width: usize) -> Result<()> {
        let slot = match self.indentation.top_mut() {
            Some(top) => {
                if top.mapping_items.is_some() {
                    return Err(DecodeError::malformed(format!(
                        "expected a sequence item under `{}`",
                        top.key
                    )));
                }
                &mut top.child_width
            }
            None => &mut self.root_width,
        };
        match *slot {
            None => {
                *slot = Some(width);
                Ok(())
            }
            Some(expected) if expected == width => Ok(()),
            Some(expected) => Err(DecodeError::malformed(format!(
                "indentation of {} does not match sibling indentation of {}",
                width, expected
            ))),
        }
    }

    /// Dispatch on the shape of an entry's value token.
    fn resolve_entry(&mut self, width: usize, key: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            self.indentation.push(Indentation::new(key, width));
            return Ok(());
        }

        let full_key = self.indentation.key_with_nesting(Some(key));

        if let Some(header) = BlockHeader::parse(value) {
            self.block = Some(BlockScalar::new(full_key, width, header));
            return Ok(());
        }
        if is_flow_sequence(value) {
            return self.emit_flow_sequence(full_key, value);
        }
        if is_flow_mapping(value) {
            return self.emit_flow_mapping(full_key, value);
        }

        self.emit(full_key, resolve_scalar(value));
        Ok(())
    }

    /// Close levels a line at `width` ends.
    ///
    /// A closed key that never received content is emitted as null.
    /// Only the innermost closed level can be childless: pushing above a
    /// level always claims its child slot first.
    fn close_levels(&mut self, width: usize) {
        let closed = self.indentation.adjust(width);
        let childless = closed.first().map_or(false, Indentation::is_childless);
        if !childless || !self.emit_empty_keys {
            return;
        }

        let mut key = self.indentation.key_with_nesting(None);
        for level in closed.iter().rev() {
            if !key.is_empty() {
                key.push('.');
            }
            key.push_str(&level.key);
        }
        self.emit(key, Value::Null);
    }

    // ========================================================================
    // Block sequences
    // ========================================================================

    /// Handle a `- item` line.
    fn sequence_item(&mut self, line: &ScanLine<'_>) -> Result<()> {
        let width = line.indent;
        let (content_col, content) = line
            .item_content()
            .ok_or_else(|| DecodeError::malformed("expected a sequence item"))?;
        if content == "-" || content.starts_with("- ") {
            return Err(DecodeError::malformed(
                "nested block sequences are not supported",
            ));
        }
        let mapping = is_mapping_entry(content);
        if !mapping && BlockHeader::parse(&item_value(line.text)).is_some() {
            return Err(DecodeError::malformed(
                "block scalar items are not supported",
            ));
        }

        if let Some(item_width) = self.sequence_width {
            if width == item_width {
                if mapping {
                    return Err(DecodeError::malformed(
                        "mapping item in a sequence of scalars",
                    ));
                }
                let token = self.item_token(line.text);
                self.active_sequence.push(token);
                return Ok(());
            }
            self.apply_gathered_sequence_values();
        }

        // Items may sit at the same indentation as their key
        self.close_levels(width + 1);

        let top = self
            .indentation
            .top_mut()
            .ok_or_else(|| DecodeError::malformed("sequence item without an open key"))?;

        if let Some(items) = top.mapping_items {
            if items.item_width != width {
                return Err(DecodeError::malformed(
                    "sequence item indentation does not match its siblings",
                ));
            }
            if !mapping {
                return Err(DecodeError::malformed(
                    "scalar item in a sequence of mappings",
                ));
            }
            top.mapping_items = Some(MappingItems {
                next_index: items.next_index + 1,
                ..items
            });
            return self.open_mapping_item(items.next_index, width, content_col, content);
        }

        if !top.is_childless() {
            return Err(DecodeError::malformed(format!(
                "sequence item under `{}`, which already has content",
                top.key
            )));
        }
        top.child_width = Some(width);

        if mapping {
            top.mapping_items = Some(MappingItems {
                item_width: width,
                next_index: 1,
            });
            return self.open_mapping_item(0, width, content_col, content);
        }

        self.sequence_width = Some(width);
        let token = self.item_token(line.text);
        self.active_sequence.push(token);
        Ok(())
    }

    /// Raw token of a scalar item.
    fn item_token(&self, text: &str) -> String {
        let token = item_value(text);
        if token.is_empty() {
            return EMPTY_ITEM.to_string();
        }
        if is_nested_collection(&token) {
            warn!(
                "flow collection inside a block sequence of {} kept as a string",
                self.source_label()
            );
        }
        token
    }

    /// Open the level of a mapping item and process its first entry.
    fn open_mapping_item(
        &mut self,
        index: usize,
        width: usize,
        content_col: usize,
        content: &str,
    ) -> Result<()> {
        let mut level = Indentation::new(index.to_string(), width + 1);
        level.child_width = Some(content_col);
        self.indentation.push(level);
        self.entry_line(content_col, content)
    }

    /// Emit the gathered sequence under the key on top of the stack,
    /// then clear the buffer and close that key.
    pub(crate) fn apply_gathered_sequence_values(&mut self) {
        if !self.active_sequence.is_empty() {
            let key = self.indentation.key_with_nesting(None);
            let items = std::mem::take(&mut self.active_sequence);
            debug!("sequence {} gathered {} items", key, items.len());
            self.emit(key, resolve_sequence(&items));
        }
        self.sequence_width = None;
        self.indentation.pop();
    }

    // ========================================================================
    // Flow collections and block scalars
    // ========================================================================

    fn emit_flow_sequence(&mut self, key: String, value: &str) -> Result<()> {
        if !value.ends_with(']') {
            return Err(DecodeError::malformed(
                "flow sequence is missing its closing `]`",
            ));
        }
        let elements = flow_collection_to_list(value, '[', ']');
        if is_empty_collection(&elements) {
            self.emit(key, Value::List(Vec::new()));
            return Ok(());
        }
        if elements.iter().any(|e| is_nested_collection(e)) {
            return Err(DecodeError::malformed(
                "nested flow collections are not supported",
            ));
        }
        self.emit(key, resolve_sequence(&elements));
        Ok(())
    }

    fn emit_flow_mapping(&mut self, key: String, value: &str) -> Result<()> {
        if !value.ends_with('}') {
            return Err(DecodeError::malformed(
                "flow mapping is missing its closing `}`",
            ));
        }
        let elements = flow_collection_to_list(value, '{', '}');
        if is_empty_collection(&elements) {
            warn!("empty flow mapping for {} has no pairs to emit", key);
            return Ok(());
        }

        for (element, entry) in elements.iter().zip(flow_mapping_entries(&elements)) {
            let entry = entry.ok_or_else(|| {
                DecodeError::malformed(format!("flow mapping entry `{}` has no `:`", element))
            })?;
            if !is_key_valid(entry.key) {
                return Err(DecodeError::unresolvable_key(entry.key));
            }
            if is_nested_collection(&entry.value) {
                return Err(DecodeError::malformed(
                    "nested flow collections are not supported",
                ));
            }
            let value = if entry.value.is_empty() {
                Value::Null
            } else {
                resolve_scalar(&entry.value)
            };
            self.emit(format!("{}.{}", key, entry.key), value);
        }
        Ok(())
    }

    fn finish_block(&mut self) {
        if let Some(block) = self.block.take() {
            debug!("block scalar {} closed", block.key);
            let text = block.render();
            self.emit(block.key, Value::String(text));
        }
    }

    fn emit(&mut self, key: String, value: Value) {
        trace!("{} = {:?}", key, value);
        self.emitted += 1;
        (self.on_item)(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(input: &str) -> Vec<(String, Value)> {
        let mut pairs = Vec::new();
        let mut decoder = Decoder::new(DecodeOptions::default(), |k, v| pairs.push((k, v)));
        for line in input.lines() {
            decoder.feed_line(line).unwrap();
        }
        decoder.finish().unwrap();
        pairs
    }

    fn decode_err(input: &str) -> String {
        let mut decoder = Decoder::new(DecodeOptions::default(), |_, _| {});
        for line in input.lines() {
            if let Err(e) = decoder.feed_line(line) {
                return e.to_string();
            }
        }
        match decoder.finish() {
            Err(e) => e.to_string(),
            Ok(()) => panic!("expected an error for {:?}", input),
        }
    }

    fn pair(key: &str, value: impl Into<Value>) -> (String, Value) {
        (key.to_string(), value.into())
    }

    #[test]
    fn test_apply_gathered_sequence_values_pops_owner() {
        let mut decoder = Decoder::new(DecodeOptions::default(), |_, _| {});
        for (key, width) in [("a", 2), ("6", 4), ("c", 6), ("d", 7)] {
            decoder.indentation.push(Indentation::new(key, width));
        }
        decoder
            .active_sequence
            .extend(["key1", "key2", "key3"].map(String::from));

        decoder.apply_gathered_sequence_values();

        assert!(decoder.active_sequence.is_empty());
        let keys: Vec<&str> = decoder
            .indentation
            .levels()
            .iter()
            .map(|l| l.key.as_str())
            .collect();
        assert_eq!(keys, vec!["a", "6", "c"]);
    }

    #[test]
    fn test_apply_gathered_sequence_values_emits_under_owner() {
        let mut pairs = Vec::new();
        let mut decoder = Decoder::new(DecodeOptions::default(), |k, v| pairs.push((k, v)));
        decoder.indentation.push(Indentation::new("a", 2));
        decoder.active_sequence.push("key1".to_string());

        decoder.apply_gathered_sequence_values();

        assert!(decoder.active_sequence.is_empty());
        assert!(decoder.indentation.is_empty());
        drop(decoder);
        assert_eq!(pairs, vec![pair("a", vec![Value::from("key1")])]);
    }

    #[test]
    fn test_apply_gathered_sequence_values_on_empty_state() {
        let mut decoder = Decoder::new(DecodeOptions::default(), |_, _| {});
        decoder.apply_gathered_sequence_values();
        assert!(decoder.active_sequence.is_empty());
        assert!(decoder.indentation.is_empty());
    }

    #[test]
    fn test_nested_mapping() {
        assert_eq!(decode("colors:\n  primary: red\n"), vec![pair("colors.primary", "red")]);
    }

    #[test]
    fn test_nested_siblings() {
        let input = "a:\n  b: 1\n  c:\n    d: true\n  e: 2.5\nf: ~\n";
        assert_eq!(
            decode(input),
            vec![
                pair("a.b", 1),
                pair("a.c.d", true),
                pair("a.e", 2.5f32),
                pair("f", Value::Null),
            ]
        );
    }

    #[test]
    fn test_block_sequence() {
        let input = "list:\n  - item1\n  - item2\n  - item3\nnext: 1\n";
        assert_eq!(
            decode(input),
            vec![
                pair(
                    "list",
                    vec![
                        Value::from("item1"),
                        Value::from("item2"),
                        Value::from("item3")
                    ]
                ),
                pair("next", 1),
            ]
        );
    }

    #[test]
    fn test_block_sequence_at_key_indentation() {
        let input = "ports:\n- 80\n- null\n- 443\nhost: x\n";
        assert_eq!(
            decode(input),
            vec![
                pair("ports", vec![Value::Int(80), Value::Null, Value::Int(443)]),
                pair("host", "x"),
            ]
        );
    }

    #[test]
    fn test_block_sequence_at_end_of_input() {
        let input = "outer:\n  inner:\n    - 1\n    - 2.5\n";
        assert_eq!(
            decode(input),
            vec![pair(
                "outer.inner",
                vec![Value::Float(1.0), Value::Float(2.5)]
            )]
        );
    }

    #[test]
    fn test_empty_item_is_null() {
        assert_eq!(
            decode("xs:\n  -\n  - 1\n"),
            vec![pair("xs", vec![Value::Null, Value::Int(1)])]
        );
    }

    #[test]
    fn test_sequence_of_mappings() {
        let input = "\
servers:
  - name: alpha
    port: 8080
  - name: beta
    tags: [a, b]
done: true
";
        assert_eq!(
            decode(input),
            vec![
                pair("servers.0.name", "alpha"),
                pair("servers.0.port", 8080),
                pair("servers.1.name", "beta"),
                pair("servers.1.tags", vec![Value::from("a"), Value::from("b")]),
                pair("done", true),
            ]
        );
    }

    #[test]
    fn test_sequence_inside_mapping_item() {
        let input = "\
jobs:
- id: 1
  steps:
    - build
    - test
- id: 2
";
        assert_eq!(
            decode(input),
            vec![
                pair("jobs.0.id", 1),
                pair(
                    "jobs.0.steps",
                    vec![Value::from("build"), Value::from("test")]
                ),
                pair("jobs.1.id", 2),
            ]
        );
    }

    #[test]
    fn test_flow_collections() {
        let input = "nums: [1, 2, 3]\nempty: []\npoint: {x: 1, y: -2, label: 'p'}\nnone: {}\n";
        assert_eq!(
            decode(input),
            vec![
                pair("nums", vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
                pair("empty", Value::List(vec![])),
                pair("point.x", 1),
                pair("point.y", -2),
                pair("point.label", "p"),
            ]
        );
    }

    #[test]
    fn test_flow_mapping_empty_value_is_null() {
        assert_eq!(
            decode("m: {a: , b: 1}\n"),
            vec![pair("m.a", Value::Null), pair("m.b", 1)]
        );
    }

    #[test]
    fn test_flow_comment_marker_inside_quotes() {
        assert_eq!(
            decode("m: {a: '#x', b: 1}\ntags: ['#a', b] # note\n"),
            vec![
                pair("m.a", "#x"),
                pair("m.b", 1),
                pair("tags", vec![Value::from("#a"), Value::from("b")]),
            ]
        );
    }

    #[test]
    fn test_unterminated_flow_collections() {
        assert_eq!(
            decode_err("m: {a: 1, b: 2"),
            "Malformed line (flow mapping is missing its closing `}`) at line 1"
        );
        assert_eq!(
            decode_err("ok: 1\nxs: [1, 2 # trailing"),
            "Malformed line (flow sequence is missing its closing `]`) at line 2"
        );
    }

    #[test]
    fn test_block_scalars() {
        let input = "\
script: |
  echo one
  echo two
summary: >-
  folded
  text
after: 1
";
        assert_eq!(
            decode(input),
            vec![
                pair("script", "echo one\necho two\n"),
                pair("summary", "folded text"),
                pair("after", 1),
            ]
        );
    }

    #[test]
    fn test_block_scalar_at_end_of_input() {
        assert_eq!(
            decode("a:\n  note: |\n    x\n\n    y\n"),
            vec![pair("a.note", "x\n\ny\n")]
        );
    }

    #[test]
    fn test_empty_keys() {
        assert_eq!(
            decode("a:\nb:\n  c:\nd: 1\n"),
            vec![
                pair("a", Value::Null),
                pair("b.c", Value::Null),
                pair("d", 1)
            ]
        );

        let mut pairs = Vec::new();
        let options = DecodeOptions::default().with_empty_keys(false);
        let mut decoder = Decoder::new(options, |k, v| pairs.push((k, v)));
        decoder.feed_line("a:").unwrap();
        decoder.feed_line("d: 1").unwrap();
        decoder.finish().unwrap();
        assert_eq!(pairs, vec![pair("d", 1)]);
    }

    #[test]
    fn test_comments_and_quotes() {
        let input = "\
# heading
name: 'Ada # not a comment'  # trailing
motto: \"don't panic\"
plain: value # comment
   # indented comment
";
        assert_eq!(
            decode(input),
            vec![
                pair("name", "Ada # not a comment"),
                pair("motto", "don't panic"),
                pair("plain", "value"),
            ]
        );
    }

    #[test]
    fn test_document_markers() {
        assert_eq!(decode("---\na: 1\n...\nb: 2\n"), vec![pair("a", 1)]);
        assert_eq!(decode("a: 1\n---\nb: 2\n"), vec![pair("a", 1)]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            decode_err("1st: value"),
            "Unresolvable key \"1st\" at line 1"
        );
        assert_eq!(
            decode_err("a:\n  _b: 1"),
            "Unresolvable key \"_b\" at line 2"
        );
        assert_eq!(
            decode_err("just a scalar"),
            "Malformed line (expected `key: value` or `key:`) at line 1"
        );
        assert_eq!(
            decode_err("- item"),
            "Malformed line (sequence item without an open key) at line 1"
        );
        assert_eq!(
            decode_err("a:\n  b: 1\n    c: 2"),
            "Malformed line (indentation of 4 does not match sibling indentation of 2) at line 3"
        );
        assert_eq!(
            decode_err("a:\n\tb: 1"),
            "Tab not allowed in indentation (use spaces) at line 2"
        );
        assert_eq!(
            decode_err("a: [[1], [2]]"),
            "Malformed line (nested flow collections are not supported) at line 1"
        );
    }

    #[test]
    fn test_unsupported_sequence_items() {
        assert_eq!(
            decode_err("xs:\n  - |\n    text"),
            "Malformed line (block scalar items are not supported) at line 2"
        );
        assert_eq!(
            decode_err("xs:\n  - >-\n    text"),
            "Malformed line (block scalar items are not supported) at line 2"
        );
        assert_eq!(
            decode_err("xs:\n  - - a\n  - b"),
            "Malformed line (nested block sequences are not supported) at line 2"
        );
        assert_eq!(
            decode_err("xs:\n  - a\n  - -"),
            "Malformed line (nested block sequences are not supported) at line 3"
        );
    }

    #[test]
    fn test_mixed_sequence_errors() {
        assert_eq!(
            decode_err("xs:\n  - a\n  - k: v"),
            "Malformed line (mapping item in a sequence of scalars) at line 3"
        );
        assert_eq!(
            decode_err("xs:\n  - k: v\n  - a"),
            "Malformed line (scalar item in a sequence of mappings) at line 3"
        );
        assert_eq!(
            decode_err("xs:\n  - k: v\n  z: 1"),
            "Malformed line (expected a sequence item under `xs`) at line 3"
        );
    }

    #[test]
    fn test_error_halts_pass() {
        let mut pairs = Vec::new();
        let mut decoder = Decoder::new(DecodeOptions::default(), |k, v| pairs.push((k, v)));
        decoder.feed_line("a: 1").unwrap();
        assert!(decoder.feed_line("9: bad").is_err());
        assert!(decoder.feed_line("b: 2").is_err());
        assert!(decoder.finish().is_err());
        assert_eq!(pairs, vec![pair("a", 1)]);
    }
}
