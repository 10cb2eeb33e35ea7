//! Phase 1: Scanner
//!
//! The scanner measures one raw line at a time. It performs:
//! - Indentation counting (spaces only)
//! - Tab-indentation rejection
//! - Sequence marker extraction (the "- " prefix)
//! - Blank, comment and document-marker classification

use crate::error::{DecodeContext, DecodeError, Result};

/// A single line after scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanLine<'a> {
    /// Content after indent, without trailing whitespace.
    pub text: &'a str,
    /// Number of leading spaces.
    pub indent: usize,
    /// Zero-based line number for error reporting.
    pub line_num: usize,
}

/// Coarse classification of a scanned line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace only.
    Blank,
    /// Full-line comment.
    Comment,
    /// `---` document start marker.
    DocumentStart,
    /// `...` document end marker.
    DocumentEnd,
    /// `- item` sequence entry.
    SequenceItem,
    /// Anything else: a mapping entry or an error.
    Entry,
}

/// Count contiguous space characters at the start of a line.
///
/// Tabs are not indentation and stop the count.
pub fn leading_space_count(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

/// Drop a trailing carriage return left over from CRLF input.
pub fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Scan a raw line into indentation and content.
pub fn scan_line<'a>(raw: &'a str, line_num: usize, ctx: &DecodeContext) -> Result<ScanLine<'a>> {
    let raw = strip_line_ending(raw);
    let indent = leading_space_count(raw);
    let rest = &raw[indent..];

    // Whitespace-only lines never carry indentation meaning
    if rest.starts_with('\t') && !rest.trim().is_empty() {
        return Err(DecodeError::TabIndentation(String::new()).with_location(ctx, line_num, indent));
    }

    Ok(ScanLine {
        text: rest.trim_end(),
        indent,
        line_num,
    })
}

impl<'a> ScanLine<'a> {
    /// Classify the line.
    pub fn kind(&self) -> LineKind {
        let text = self.text;
        if text.is_empty() {
            LineKind::Blank
        } else if text.starts_with('#') {
            LineKind::Comment
        } else if self.indent == 0 && is_marker(text, "---") {
            LineKind::DocumentStart
        } else if self.indent == 0 && is_marker(text, "...") {
            LineKind::DocumentEnd
        } else if text == "-" || text.starts_with("- ") {
            LineKind::SequenceItem
        } else {
            LineKind::Entry
        }
    }

    /// Column where an item's content starts, and the content itself.
    ///
    /// `"-   a: 1"` at indent 2 yields `(6, "a: 1")`.
    pub fn item_content(&self) -> Option<(usize, &'a str)> {
        let after = self.text.strip_prefix('-')?;
        if !after.is_empty() && !after.starts_with(' ') {
            return None;
        }
        let gap = leading_space_count(after);
        Some((self.indent + 1 + gap, &after[gap..]))
    }
}

/// A marker line is the marker alone or followed by a comment.
fn is_marker(text: &str, marker: &str) -> bool {
    match text.strip_prefix(marker) {
        Some(rest) => rest.is_empty() || rest.trim_start().starts_with('#'),
        None => false,
    }
}
