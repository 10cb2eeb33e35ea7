//! Phase 2: Indentation tracking
//!
//! The indentation stack records the currently open nesting path as
//! `(key, width)` pairs, outermost first. Widths are strictly increasing
//! from bottom to top; `adjust` is the only way levels are closed.

/// Bookkeeping for a key whose value is a block sequence of mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingItems {
    /// Indentation of the `-` markers.
    pub item_width: usize,
    /// Index the next item will receive.
    pub next_index: usize,
}

/// One open nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indentation {
    /// Mapping key, or the index of a sequence item.
    pub key: String,
    /// Leading-space count of the line that opened the level.
    pub width: usize,
    /// Indentation of the first nested line, once one has been seen.
    pub child_width: Option<usize>,
    /// Set when the level's value is a sequence of mappings.
    pub mapping_items: Option<MappingItems>,
}

impl Indentation {
    pub fn new(key: impl Into<String>, width: usize) -> Self {
        Self {
            key: key.into(),
            width,
            child_width: None,
            mapping_items: None,
        }
    }

    /// A level that was opened but never received nested content.
    pub fn is_childless(&self) -> bool {
        self.child_width.is_none()
    }
}

/// Stack of open nesting levels, owned by one decode pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndentationStack {
    levels: Vec<Indentation>,
}

impl IndentationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new level on top of the stack.
    pub fn push(&mut self, level: Indentation) {
        debug_assert!(
            self.levels.last().map_or(true, |top| top.width < level.width),
            "indentation widths must be strictly increasing"
        );
        self.levels.push(level);
    }

    /// Close every level whose width is not strictly smaller than `width`.
    ///
    /// Returns the closed levels, innermost first.
    pub fn adjust(&mut self, width: usize) -> Vec<Indentation> {
        let mut closed = Vec::new();
        while let Some(level) = self.pop_closed(width) {
            closed.push(level);
        }
        closed
    }

    /// Pop the top level if a line at `width` closes it.
    pub fn pop_closed(&mut self, width: usize) -> Option<Indentation> {
        match self.levels.last() {
            Some(top) if top.width >= width => self.levels.pop(),
            _ => None,
        }
    }

    pub fn pop(&mut self) -> Option<Indentation> {
        self.levels.pop()
    }

    pub fn top(&self) -> Option<&Indentation> {
        self.levels.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Indentation> {
        self.levels.last_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[Indentation] {
        &self.levels
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }

    /// Fully-qualified key: open level keys joined with `.`, outermost
    /// first, followed by `leaf` when given.
    pub fn key_with_nesting(&self, leaf: Option<&str>) -> String {
        let mut parts: Vec<&str> = self.levels.iter().map(|l| l.key.as_str()).collect();
        if let Some(leaf) = leaf {
            parts.push(leaf);
        }
        parts.join(".")
    }
}
