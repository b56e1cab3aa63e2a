//! Character-level scanning. The lexer is context-sensitive on purpose:
//! TOML's grammar uses `.` both to join dotted-key segments and inside
//! float literals, so a single flat pre-scan can't tell `a.b` (a key)
//! from `1.5` (a value) apart without knowing which position it's in.
//! Instead of tokenizing ambiguously and backtracking, the parser asks
//! for a key token or a value token at each point, and this module reads
//! exactly the grammar that position allows.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::key::{Located, Position};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    BareKey(String),
    Str(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    TimeOfDay(NaiveTime),
    ZonedTime(DateTime<FixedOffset>),
    LocalDateTime(NaiveDateTime),
    LocalDate(NaiveDate),
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Dot,
    Comma,
    Equals,
    Newline,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub position: Position,
    pub message: String,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

impl std::error::Error for LexError {}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Non-consuming look at the next significant character, skipping
    /// spaces/tabs/comments first. Used by the parser to decide which
    /// grammar production to take without committing to a token.
    pub fn peek_char(&mut self) -> Option<char> {
        self.skip_line_trivia();
        self.peek()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            position: self.position(),
            message: message.into(),
        }
    }

    /// Skips spaces, tabs, and `#` comments, stopping at (without
    /// consuming) a newline or end of input.
    pub fn skip_line_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') => {
                    self.bump();
                }
                Some('#') => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.bump();
                    }
                }
                Some('\r') if self.peek_at(1) == Some('\n') => break,
                _ => break,
            }
        }
    }

    /// Skips line trivia plus any number of blank/comment-only lines.
    /// Used between top-level expressions, where blank lines are
    /// insignificant.
    pub fn skip_all_trivia(&mut self) {
        loop {
            self.skip_line_trivia();
            match self.peek() {
                Some('\n') => {
                    self.bump();
                }
                Some('\r') if self.peek_at(1) == Some('\n') => {
                    self.bump();
                    self.bump();
                }
                _ => break,
            }
        }
    }

    pub fn at_eof(&self) -> bool {
        self.peek().is_none()
    }

    /// Consumes one newline (`\n` or `\r\n`) if present; returns whether
    /// it did.
    pub fn eat_newline(&mut self) -> bool {
        match self.peek() {
            Some('\n') => {
                self.bump();
                true
            }
            Some('\r') if self.peek_at(1) == Some('\n') => {
                self.bump();
                self.bump();
                true
            }
            _ => false,
        }
    }

    /// Reads one key segment: a bare key or a quoted (basic/literal,
    /// single-line only) string used as a key.
    pub fn read_key_segment(&mut self) -> Result<Located<String>, LexError> {
        self.skip_line_trivia();
        let position = self.position();
        let segment = match self.peek() {
            Some('"') => self.read_quoted_string(false)?,
            Some('\'') => self.read_literal_string(false)?,
            Some(c) if is_bare_key_char(c) => self.read_bare_run(),
            Some(c) => return Err(self.error(format!("unexpected character '{c}' in key"))),
            None => return Err(self.error("expected a key, found end of input")),
        };
        Ok(Located::new(position, segment))
    }

    fn read_bare_run(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if is_bare_key_char(c) {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    /// Reads punctuation relevant between key segments and around
    /// headers/assignments: `.`, `=`, `[`, `]`, `{`, `}`, `,`, a newline,
    /// or end of input. Line trivia is skipped first.
    pub fn read_punct(&mut self) -> Result<Located<Token>, LexError> {
        self.skip_line_trivia();
        let position = self.position();
        let token = match self.peek() {
            None => Token::Eof,
            Some('\n') => {
                self.bump();
                Token::Newline
            }
            Some('\r') if self.peek_at(1) == Some('\n') => {
                self.bump();
                self.bump();
                Token::Newline
            }
            Some('.') => {
                self.bump();
                Token::Dot
            }
            Some('=') => {
                self.bump();
                Token::Equals
            }
            Some('[') => {
                self.bump();
                Token::LBracket
            }
            Some(']') => {
                self.bump();
                Token::RBracket
            }
            Some('{') => {
                self.bump();
                Token::LBrace
            }
            Some('}') => {
                self.bump();
                Token::RBrace
            }
            Some(',') => {
                self.bump();
                Token::Comma
            }
            Some(c) => return Err(self.error(format!("unexpected character '{c}'"))),
        };
        Ok(Located::new(position, token))
    }

    /// Reads one value: string, number, boolean, date/time, or the
    /// opening punctuation of an array/inline table (the parser drives
    /// those structures itself).
    pub fn read_value_token(&mut self) -> Result<Located<Token>, LexError> {
        self.skip_line_trivia();
        let position = self.position();
        let token = match self.peek() {
            Some('"') => Token::Str(self.read_quoted_string(true)?),
            Some('\'') => Token::Str(self.read_literal_string(true)?),
            Some('[') => {
                self.bump();
                Token::LBracket
            }
            Some('{') => {
                self.bump();
                Token::LBrace
            }
            Some(c) if c == '+' || c == '-' || c.is_ascii_digit() || c.is_alphabetic() => {
                let raw = self.read_bare_value_run();
                classify_value(&raw, position)?
            }
            Some(c) => return Err(self.error(format!("unexpected character '{c}' in value"))),
            None => return Err(self.error("expected a value, found end of input")),
        };
        Ok(Located::new(position, token))
    }

    /// Reads the maximal run of characters an unquoted value (number,
    /// boolean, or date/time) can be made of.
    fn read_bare_value_run(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '_' | ':' | 'Z') {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn read_quoted_string(&mut self, allow_multiline: bool) -> Result<String, LexError> {
        debug_assert_eq!(self.peek(), Some('"'));
        let multiline = allow_multiline && self.peek_at(1) == Some('"') && self.peek_at(2) == Some('"');
        if multiline {
            self.bump();
            self.bump();
            self.bump();
            // A newline immediately after the opening delimiter is trimmed.
            self.eat_newline();
            self.read_basic_body(true)
        } else {
            self.bump();
            self.read_basic_body(false)
        }
    }

    fn read_basic_body(&mut self, multiline: bool) -> Result<String, LexError> {
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some('"') if multiline => {
                    if self.peek_at(1) == Some('"') && self.peek_at(2) == Some('"') {
                        self.bump();
                        self.bump();
                        self.bump();
                        return Ok(out);
                    }
                    out.push('"');
                    self.bump();
                }
                Some('"') => {
                    self.bump();
                    return Ok(out);
                }
                Some('\\') => {
                    self.bump();
                    self.read_escape(multiline, &mut out)?;
                }
                Some('\n') if !multiline => return Err(self.error("newline in single-line string")),
                Some(c) => {
                    out.push(c);
                    self.bump();
                }
            }
        }
    }

    fn read_escape(&mut self, multiline: bool, out: &mut String) -> Result<(), LexError> {
        match self.peek() {
            // Line-ending backslash: consume all trailing whitespace and
            // newlines, matching TOML's multi-line basic-string rule.
            Some('\n') if multiline => {
                while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                    self.bump();
                }
            }
            Some('b') => {
                out.push('\u{8}');
                self.bump();
            }
            Some('t') => {
                out.push('\t');
                self.bump();
            }
            Some('n') => {
                out.push('\n');
                self.bump();
            }
            Some('f') => {
                out.push('\u{c}');
                self.bump();
            }
            Some('r') => {
                out.push('\r');
                self.bump();
            }
            Some('"') => {
                out.push('"');
                self.bump();
            }
            Some('\\') => {
                out.push('\\');
                self.bump();
            }
            Some('u') => {
                self.bump();
                self.read_unicode_escape(4, out)?;
            }
            Some('U') => {
                self.bump();
                self.read_unicode_escape(8, out)?;
            }
            Some(c) => return Err(self.error(format!("invalid escape sequence '\\{c}'"))),
            None => return Err(self.error("unterminated escape sequence")),
        }
        Ok(())
    }

    fn read_unicode_escape(&mut self, digits: usize, out: &mut String) -> Result<(), LexError> {
        let mut hex = String::with_capacity(digits);
        for _ in 0..digits {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.bump();
                }
                _ => return Err(self.error("invalid unicode escape")),
            }
        }
        let code = u32::from_str_radix(&hex, 16).map_err(|_| self.error("invalid unicode escape"))?;
        let ch = char::from_u32(code).ok_or_else(|| self.error("invalid unicode scalar value"))?;
        out.push(ch);
        Ok(())
    }

    fn read_literal_string(&mut self, allow_multiline: bool) -> Result<String, LexError> {
        debug_assert_eq!(self.peek(), Some('\''));
        let multiline =
            allow_multiline && self.peek_at(1) == Some('\'') && self.peek_at(2) == Some('\'');
        if multiline {
            self.bump();
            self.bump();
            self.bump();
            self.eat_newline();
        } else {
            self.bump();
        }

        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some('\'') if multiline => {
                    if self.peek_at(1) == Some('\'') && self.peek_at(2) == Some('\'') {
                        self.bump();
                        self.bump();
                        self.bump();
                        return Ok(out);
                    }
                    out.push('\'');
                    self.bump();
                }
                Some('\'') => {
                    self.bump();
                    return Ok(out);
                }
                Some('\n') if !multiline => return Err(self.error("newline in single-line string")),
                Some(c) => {
                    out.push(c);
                    self.bump();
                }
            }
        }
    }
}

fn is_bare_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Classifies a raw unquoted run read in value position into a bool,
/// integer, float, or one of the four date/time shapes.
fn classify_value(raw: &str, position: Position) -> Result<Token, LexError> {
    match raw {
        "true" => return Ok(Token::Bool(true)),
        "false" => return Ok(Token::Bool(false)),
        _ => {}
    }

    if let Some(token) = try_float(raw) {
        return Ok(token);
    }
    if let Some(token) = try_integer(raw) {
        return Ok(token);
    }
    if let Some(token) = try_datetime(raw) {
        return Ok(token);
    }

    Err(LexError {
        position,
        message: format!("'{raw}' is not a valid value"),
    })
}

fn try_integer(raw: &str) -> Option<Token> {
    let cleaned = raw.replace('_', "");
    let (sign, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    let value = if let Some(hex) = digits.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(oct) = digits.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()?
    } else if let Some(bin) = digits.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()?
    } else {
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return None;
        }
        digits.parse::<i64>().ok()?
    };
    Some(Token::Integer(sign * value))
}

fn try_float(raw: &str) -> Option<Token> {
    match raw {
        "inf" | "+inf" => return Some(Token::Float(f64::INFINITY)),
        "-inf" => return Some(Token::Float(f64::NEG_INFINITY)),
        "nan" | "+nan" | "-nan" => return Some(Token::Float(f64::NAN)),
        _ => {}
    }
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if unsigned.starts_with("0x") || unsigned.starts_with("0o") || unsigned.starts_with("0b") {
        return None;
    }
    if !raw.contains('.') && !raw.to_ascii_lowercase().contains('e') {
        return None;
    }
    if raw.contains(':') {
        return None;
    }
    let cleaned = raw.replace('_', "");
    cleaned.parse::<f64>().ok().map(Token::Float)
}

fn try_datetime(raw: &str) -> Option<Token> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(Token::ZonedTime(dt));
    }
    // TOML allows a space instead of 'T' between date and time.
    if raw.len() > 10 && matches!(raw.as_bytes()[10], b'T' | b't' | b' ') {
        let normalized = format!("{}T{}", &raw[..10], &raw[11..]);
        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
            return Some(Token::ZonedTime(dt));
        }
        if let Ok(ndt) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Token::LocalDateTime(ndt));
        }
        if let Ok(ndt) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S") {
            return Some(Token::LocalDateTime(ndt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Token::LocalDate(date));
    }
    if let Ok(time) = NaiveTime::parse_from_str(raw, "%H:%M:%S%.f") {
        return Some(Token::TimeOfDay(time));
    }
    if let Ok(time) = NaiveTime::parse_from_str(raw, "%H:%M:%S") {
        return Some(Token::TimeOfDay(time));
    }
    None
}

/// Only used by `try_datetime`'s offset branch when chrono's own
/// RFC 3339 parser rejects an otherwise-valid TOML offset date-time
/// (e.g. a non-UTC offset spelled without a colon is never produced by
/// our lexer, so this mainly documents the fallback path for callers
/// embedding this module elsewhere).
#[allow(dead_code)]
fn utc_offset() -> FixedOffset {
    FixedOffset::east_opt(0).expect("zero offset is always valid")
}
