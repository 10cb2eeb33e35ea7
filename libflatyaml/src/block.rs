//! Block scalars: multi-line strings introduced by `|` or `>`.

use crate::scanner::{leading_space_count, strip_line_ending};

/// How content lines are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// `|`: line breaks are kept.
    Literal,
    /// `>`: line breaks between text lines become spaces.
    Folded,
}

/// What happens to the final line break and trailing blank lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chomping {
    /// Single trailing newline.
    Clip,
    /// `-`: no trailing newline.
    Strip,
    /// `+`: trailing blank lines are kept.
    Keep,
}

/// Parsed block scalar header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub style: BlockStyle,
    pub chomping: Chomping,
}

impl BlockHeader {
    /// Parse a value token such as `|`, `>-` or `|+`.
    pub fn parse(token: &str) -> Option<BlockHeader> {
        let mut chars = token.chars();
        let style = match chars.next()? {
            '|' => BlockStyle::Literal,
            '>' => BlockStyle::Folded,
            _ => return None,
        };
        let chomping = match chars.next() {
            None => Chomping::Clip,
            Some('-') => Chomping::Strip,
            Some('+') => Chomping::Keep,
            Some(_) => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(BlockHeader { style, chomping })
    }
}

/// A block scalar being accumulated.
#[derive(Debug, Clone)]
pub struct BlockScalar {
    /// Fully-qualified key the string is emitted under.
    pub key: String,
    /// Indentation of the line holding the header.
    pub parent_width: usize,
    header: BlockHeader,
    content_width: Option<usize>,
    lines: Vec<String>,
}

impl BlockScalar {
    pub fn new(key: String, parent_width: usize, header: BlockHeader) -> Self {
        Self {
            key,
            parent_width,
            header,
            content_width: None,
            lines: Vec::new(),
        }
    }

    /// Offer the next raw line.
    ///
    /// Returns `false` when the line is not part of the scalar, leaving
    /// it for the caller.
    pub fn accept(&mut self, raw: &str) -> bool {
        let raw = strip_line_ending(raw);
        if raw.trim().is_empty() {
            self.lines.push(String::new());
            return true;
        }

        let indent = leading_space_count(raw);
        if indent <= self.parent_width {
            return false;
        }

        // The first content line fixes the indentation to strip
        let base = *self.content_width.get_or_insert(indent);
        self.lines.push(raw[indent.min(base)..].to_string());
        true
    }

    /// Join the accumulated lines according to style and chomping.
    pub fn render(&self) -> String {
        let end = self
            .lines
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(0, |i| i + 1);
        let (body, trailing) = self.lines.split_at(end);

        let mut text = match self.header.style {
            BlockStyle::Literal => body.join("\n"),
            BlockStyle::Folded => fold_lines(body),
        };

        match self.header.chomping {
            Chomping::Strip => {}
            Chomping::Clip => {
                if !body.is_empty() {
                    text.push('\n');
                }
            }
            Chomping::Keep => {
                if !body.is_empty() {
                    text.push('\n');
                }
                text.extend(trailing.iter().map(|_| '\n'));
            }
        }
        text
    }
}

/// Fold text lines into one paragraph per blank-line run.
///
/// More-indented lines keep their surrounding line breaks.
fn fold_lines(lines: &[String]) -> String {
    let mut out = String::new();
    let mut prev: Option<&str> = None;

    for line in lines {
        if let Some(p) = prev {
            if line.is_empty() {
                out.push('\n');
            } else if p.is_empty() {
                // The blank line already produced the break
            } else if is_more_indented(p) || is_more_indented(line) {
                out.push('\n');
            } else {
                out.push(' ');
            }
        }
        out.push_str(line);
        prev = Some(line);
    }

    out
}

fn is_more_indented(line: &str) -> bool {
    line.starts_with(' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(header: &str, lines: &[&str]) -> String {
        let header = BlockHeader::parse(header).unwrap();
        let mut scalar = BlockScalar::new("k".into(), 0, header);
        for line in lines {
            assert!(scalar.accept(line), "rejected {:?}", line);
        }
        scalar.render()
    }

    #[test]
    fn test_header_parse() {
        assert_eq!(
            BlockHeader::parse("|"),
            Some(BlockHeader {
                style: BlockStyle::Literal,
                chomping: Chomping::Clip
            })
        );
        assert_eq!(
            BlockHeader::parse(">-"),
            Some(BlockHeader {
                style: BlockStyle::Folded,
                chomping: Chomping::Strip
            })
        );
        assert_eq!(BlockHeader::parse("|+").map(|h| h.chomping), Some(Chomping::Keep));
        assert_eq!(BlockHeader::parse("|2"), None);
        assert_eq!(BlockHeader::parse("||"), None);
        assert_eq!(BlockHeader::parse("text"), None);
    }

    #[test]
    fn test_literal() {
        assert_eq!(block("|", &["  one", "  two", "    three"]), "one\ntwo\n  three\n");
        assert_eq!(block("|-", &["  one", "  two"]), "one\ntwo");
        assert_eq!(block("|+", &["  one", "", ""]), "one\n\n\n");
        assert_eq!(block("|", &["  one", "", ""]), "one\n");
    }

    #[test]
    fn test_folded() {
        assert_eq!(block(">", &["  one", "  two", "", "  three"]), "one two\nthree\n");
        assert_eq!(block(">-", &["  a", "    code", "  b"]), "a\n  code\nb");
    }

    #[test]
    fn test_accept_stops_at_parent_width() {
        let header = BlockHeader::parse("|").unwrap();
        let mut scalar = BlockScalar::new("k".into(), 2, header);
        assert!(scalar.accept("    body"));
        assert!(!scalar.accept("  next: 1"));
        assert!(!scalar.accept("top: 1"));
        assert_eq!(scalar.render(), "body\n");
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(block("|", &[]), "");
        assert_eq!(block(">", &[""]), "");
    }
}
