//! Semantic error values and their human-readable rendering, plus the
//! `MatchMessage` scope-path shape the (ambient, deliberately thin)
//! decoder collaborator uses to report validation failures.

use std::fmt;

use crate::key::{Located, Position};

/// The three ways a key interaction can be rejected. Every one of these
/// is terminal: the core never attempts partial recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AlreadyAssigned,
    ClosedTable,
    ImplicitlyTable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SemanticError {
    pub key: String,
    pub kind: ErrorKind,
}

impl SemanticError {
    pub fn new(key: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            key: key.into(),
            kind,
        }
    }
}

pub type LocatedSemanticError = Located<SemanticError>;

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted = quote_key(&self.key);
        match self.kind {
            ErrorKind::AlreadyAssigned => write!(f, "key error: {quoted} is already assigned"),
            ErrorKind::ClosedTable => write!(f, "key error: {quoted} is a closed table"),
            ErrorKind::ImplicitlyTable => write!(
                f,
                "key error: {quoted} is already implicitly defined to be a table"
            ),
        }
    }
}

/// Renders a `Located<SemanticError>` the way the `decode` CLI reports a
/// failure to the user: `<line>:<column>: <message>`.
pub fn render_located(err: &Located<SemanticError>) -> String {
    format!("{}: {}", err.position, err.value)
}

/// A bare TOML key needs no quoting; anything else is rendered as a
/// double-quoted string with the usual escapes.
fn quote_key(key: &str) -> String {
    let bare = regex::Regex::new(r"^[A-Za-z0-9_-]+$").expect("static pattern is valid");
    if bare.is_match(key) {
        format!("\"{key}\"")
    } else {
        format!("\"{}\"", escape_for_message(key))
    }
}

fn escape_for_message(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// One segment of a `MatchMessage` scope path: a table key or an array
/// index, mirroring how the value tree itself is indexed.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeSegment {
    Key(String),
    Index(usize),
}

/// Emitted by the decoder collaborator (see `crate::decode`) when a
/// `Value` does not match the shape a caller asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchMessage {
    pub scope: Vec<ScopeSegment>,
    pub text: String,
}

impl MatchMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            scope: Vec::new(),
            text: text.into(),
        }
    }

    /// Prepends a scope segment, innermost first; callers build these up
    /// as they unwind out of nested `from_table` calls.
    pub fn nest(mut self, segment: ScopeSegment) -> Self {
        self.scope.insert(0, segment);
        self
    }
}

impl fmt::Display for MatchMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in top", self.text)?;
        for segment in &self.scope {
            match segment {
                ScopeSegment::Key(k) => write!(f, ".{k}")?,
                ScopeSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

/// Source-position helper so callers don't have to reach into
/// `crate::key` just to build one.
pub fn at(line: usize, column: usize) -> Position {
    Position::new(line, column)
}
