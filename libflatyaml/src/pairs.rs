//! Key/value extraction from `key: value` lines and `- item` lines.

/// Comment marker.
const COMMENT: char = '#';

/// A mapping entry reduced to its key and raw value token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'a> {
    pub key: &'a str,
    pub value: String,
}

/// Rebuild the value of a line that was split on `join_delimiter`.
///
/// The first part is the key and is dropped. Parts are kept untrimmed so
/// the delimiter keeps its natural spacing; the first part holding a
/// comment marker is cut at the marker and ends the value. The joined
/// result is trimmed once.
pub fn value_from_separated_parts<S: AsRef<str>>(parts: &[S], join_delimiter: &str) -> String {
    if parts.len() < 2 {
        return String::new();
    }

    let mut fragments: Vec<&str> = Vec::with_capacity(parts.len() - 1);
    for part in &parts[1..] {
        let part = part.as_ref();
        if let Some(pos) = part.find(COMMENT) {
            fragments.push(&part[..pos]);
            break;
        }
        fragments.push(part);
    }

    fragments.join(join_delimiter).trim().to_string()
}

/// Keys start with an ASCII letter and continue with ASCII letters,
/// digits, `_`, `-` or `.`.
pub fn is_key_valid(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        }
        _ => false,
    }
}

/// A leading quoted token whose closing quote is followed only by
/// whitespace or a comment.
///
/// Returns the token including its quotes.
fn quoted_token(rest: &str) -> Option<&str> {
    let rest = rest.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    rest.match_indices(quote)
        .skip(1)
        .map(|(pos, _)| pos)
        .find(|&pos| {
            let tail = rest[pos + 1..].trim_start();
            tail.is_empty() || tail.starts_with(COMMENT)
        })
        .map(|pos| &rest[..=pos])
}

/// A flow collection token cut at the first comment marker outside
/// a quoted element.
///
/// A quote only opens an element right after `[`, `{`, `,` or `:`, so
/// apostrophes inside plain words are left alone.
fn flow_token(rest: &str) -> Option<&str> {
    let rest = rest.trim();
    if !rest.starts_with(|c: char| c == '[' || c == '{') {
        return None;
    }

    let mut quote: Option<char> = None;
    let mut prev = ' ';
    for (pos, c) in rest.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == COMMENT => return Some(rest[..pos].trim_end()),
            None if (c == '\'' || c == '"') && matches!(prev, '[' | '{' | ',' | ':') => {
                quote = Some(c)
            }
            None => {}
        }
        if !c.is_whitespace() {
            prev = c;
        }
    }
    Some(rest)
}

/// Split a `key: value` line.
///
/// Returns `None` when the line has no `:` at all.
pub fn split_entry(text: &str) -> Option<Entry<'_>> {
    let (key, rest) = text.split_once(':')?;
    let value = if let Some(token) = quoted_token(rest) {
        token.to_string()
    } else if let Some(token) = flow_token(rest) {
        token.to_string()
    } else {
        let parts: Vec<&str> = text.split(':').collect();
        value_from_separated_parts(&parts, ":")
    };
    Some(Entry {
        key: key.trim(),
        value,
    })
}

/// Raw token of a `- item` line (the text must start with `-`).
pub fn item_value(text: &str) -> String {
    let rest = text.strip_prefix('-').unwrap_or(text);
    if let Some(token) = quoted_token(rest) {
        return token.to_string();
    }
    let parts: Vec<&str> = text.split("- ").collect();
    value_from_separated_parts(&parts, "- ")
}

/// Whether item content is itself a `key: value` entry.
pub fn is_mapping_entry(content: &str) -> bool {
    match content.split_once(':') {
        Some((key, rest)) => {
            (rest.is_empty() || rest.starts_with(' ')) && is_key_valid(key.trim())
        }
        None => false,
    }
}
