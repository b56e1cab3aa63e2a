//! Source-located dotted keys, threaded through every stage of the core so
//! diagnostics can always point at the segment that caused them.

use std::fmt;

/// A source position, one-based like most editors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A value paired with the position it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Located<T> {
    pub position: Position,
    pub value: T,
}

impl<T> Located<T> {
    pub fn new(position: Position, value: T) -> Self {
        Self { position, value }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Located<U> {
        Located {
            position: self.position,
            value: f(self.value),
        }
    }
}

/// A non-empty dotted key, e.g. `a.b.c`. Each segment carries its own
/// position so an error under a multi-segment key names the exact
/// offending part, not just the head.
#[derive(Debug, Clone, PartialEq)]
pub struct Key(Vec<Located<String>>);

impl Key {
    /// Builds a key from its segments. Panics on an empty vector: a key
    /// with zero segments cannot come out of the parser.
    pub fn new(segments: Vec<Located<String>>) -> Self {
        assert!(!segments.is_empty(), "Key must have at least one segment");
        Self(segments)
    }

    pub fn single(segment: Located<String>) -> Self {
        Self(vec![segment])
    }

    pub fn segments(&self) -> &[Located<String>] {
        &self.0
    }

    pub fn head(&self) -> &Located<String> {
        &self.0[0]
    }

    /// The key with its first segment removed, or `None` if this was the
    /// last segment.
    pub fn into_split_first(mut self) -> (Located<String>, Option<Key>) {
        let head = self.0.remove(0);
        if self.0.is_empty() {
            (head, None)
        } else {
            (head, Some(self))
        }
    }

    pub fn dotted(&self) -> String {
        self.0
            .iter()
            .map(|s| s.value.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}
