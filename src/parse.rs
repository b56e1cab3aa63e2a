//! Recursive-descent reader over the lexer: turns TOML source text into
//! the flat `Expr` stream the semantic core consumes. Distinct from
//! `SemanticError` — a malformed document can fail here before the core
//! ever sees it.

use std::fmt;

use crate::key::{Key, Located, Position};
use crate::lex::{LexError, Lexer, Token};
use crate::raw::{Expr, Val};

#[derive(Debug)]
pub enum ParseError {
    Lex(LexError),
    Syntax(Located<String>),
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::Lex(err)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(err) => write!(f, "{err}"),
            ParseError::Syntax(located) => write!(f, "{}: {}", located.position, located.value),
        }
    }
}

impl std::error::Error for ParseError {}

fn syntax_error(position: Position, message: impl Into<String>) -> ParseError {
    ParseError::Syntax(Located::new(position, message.into()))
}

pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    /// Parses a whole document into the flat expression stream the
    /// semantic core's `semantics` function consumes.
    pub fn parse_document(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = Vec::new();
        loop {
            self.lexer.skip_all_trivia();
            if self.lexer.at_eof() {
                break;
            }
            let expr = if self.lexer.peek_char() == Some('[') {
                self.parse_header()?
            } else {
                self.parse_keyval()?
            };
            exprs.push(expr);
            self.expect_line_end()?;
        }
        Ok(exprs)
    }

    fn expect_line_end(&mut self) -> Result<(), ParseError> {
        if self.lexer.peek_char().is_none() {
            return Ok(());
        }
        if self.lexer.eat_newline() {
            return Ok(());
        }
        Err(syntax_error(
            self.lexer.position(),
            "expected a newline or end of input after an expression",
        ))
    }

    fn parse_header(&mut self) -> Result<Expr, ParseError> {
        self.expect_punct(Token::LBracket)?;
        let is_array = self.lexer.peek_char() == Some('[');
        if is_array {
            self.expect_punct(Token::LBracket)?;
        }
        let key = self.parse_key()?;
        self.expect_punct(Token::RBracket)?;
        if is_array {
            self.expect_punct(Token::RBracket)?;
        }
        Ok(if is_array {
            Expr::ArrayTableExpr(key)
        } else {
            Expr::TableExpr(key)
        })
    }

    fn parse_keyval(&mut self) -> Result<Expr, ParseError> {
        let key = self.parse_key()?;
        self.expect_punct(Token::Equals)?;
        let val = self.parse_value()?;
        Ok(Expr::KeyValExpr(key, val))
    }

    fn parse_key(&mut self) -> Result<Key, ParseError> {
        let mut segments = vec![self.lexer.read_key_segment()?];
        while self.lexer.peek_char() == Some('.') {
            self.expect_punct(Token::Dot)?;
            segments.push(self.lexer.read_key_segment()?);
        }
        Ok(Key::new(segments))
    }

    fn parse_value(&mut self) -> Result<Val, ParseError> {
        match self.lexer.peek_char() {
            Some('[') => self.parse_array(),
            Some('{') => self.parse_inline_table(),
            _ => {
                let token = self.lexer.read_value_token()?;
                token_to_val(token)
            }
        }
    }

    /// Arrays tolerate interior newlines, comments, and a trailing comma.
    fn parse_array(&mut self) -> Result<Val, ParseError> {
        self.expect_punct(Token::LBracket)?;
        let mut items = Vec::new();
        loop {
            self.skip_array_trivia();
            if self.lexer.peek_char() == Some(']') {
                self.expect_punct(Token::RBracket)?;
                break;
            }
            items.push(self.parse_value()?);
            self.skip_array_trivia();
            match self.lexer.peek_char() {
                Some(',') => {
                    self.expect_punct(Token::Comma)?;
                }
                Some(']') => {
                    self.expect_punct(Token::RBracket)?;
                    break;
                }
                _ => {
                    return Err(syntax_error(
                        self.lexer.position(),
                        "expected ',' or ']' in array",
                    ))
                }
            }
        }
        Ok(Val::ValArray(items))
    }

    fn skip_array_trivia(&mut self) {
        self.lexer.peek_char();
        while self.lexer.eat_newline() {
            self.lexer.peek_char();
        }
    }

    /// Inline tables are closed literals: no interior newlines, and
    /// (unlike arrays) no trailing comma.
    fn parse_inline_table(&mut self) -> Result<Val, ParseError> {
        self.expect_punct(Token::LBrace)?;
        let mut entries = Vec::new();
        if self.lexer.peek_char() == Some('}') {
            self.expect_punct(Token::RBrace)?;
            return Ok(Val::ValTable(entries));
        }
        loop {
            let key = self.parse_key()?;
            self.expect_punct(Token::Equals)?;
            let val = self.parse_value()?;
            entries.push((key, val));
            match self.lexer.peek_char() {
                Some(',') => {
                    self.expect_punct(Token::Comma)?;
                }
                Some('}') => {
                    self.expect_punct(Token::RBrace)?;
                    break;
                }
                _ => {
                    return Err(syntax_error(
                        self.lexer.position(),
                        "expected ',' or '}' in inline table",
                    ))
                }
            }
        }
        Ok(Val::ValTable(entries))
    }

    fn expect_punct(&mut self, expected: Token) -> Result<Position, ParseError> {
        let located = self.lexer.read_punct()?;
        if located.value == expected {
            Ok(located.position)
        } else {
            Err(syntax_error(
                located.position,
                format!("expected {expected:?}, found {:?}", located.value),
            ))
        }
    }
}

fn token_to_val(located: Located<Token>) -> Result<Val, ParseError> {
    Ok(match located.value {
        Token::Str(s) => Val::String(s),
        Token::Integer(i) => Val::Integer(i),
        Token::Float(f) => Val::Float(f),
        Token::Bool(b) => Val::Bool(b),
        Token::TimeOfDay(t) => Val::TimeOfDay(t),
        Token::ZonedTime(t) => Val::ZonedTime(t),
        Token::LocalDateTime(t) => Val::LocalDateTime(t),
        Token::LocalDate(t) => Val::LocalDate(t),
        other => {
            return Err(syntax_error(
                located.position,
                format!("unexpected token {other:?} in value position"),
            ))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_key_assignment() {
        let mut parser = Parser::new("a.b.c = 1\n");
        let exprs = parser.parse_document().expect("parse");
        assert_eq!(exprs.len(), 1);
        match &exprs[0] {
            Expr::KeyValExpr(key, Val::Integer(1)) => {
                assert_eq!(key.dotted(), "a.b.c");
            }
            other => panic!("unexpected expr: {other:?}"),
        }
    }

    #[test]
    fn parses_table_and_array_table_headers() {
        let mut parser = Parser::new("[a.b]\nx = 1\n[[c]]\nn = 1\n");
        let exprs = parser.parse_document().expect("parse");
        assert!(matches!(&exprs[0], Expr::TableExpr(k) if k.dotted() == "a.b"));
        assert!(matches!(&exprs[2], Expr::ArrayTableExpr(k) if k.dotted() == "c"));
    }

    #[test]
    fn parses_inline_table_and_array_values() {
        let mut parser = Parser::new("t = { a = 1, b = [2, 3,] }\n");
        let exprs = parser.parse_document().expect("parse");
        match &exprs[0] {
            Expr::KeyValExpr(_, Val::ValTable(entries)) => {
                assert_eq!(entries.len(), 2);
            }
            other => panic!("unexpected expr: {other:?}"),
        }
    }

    #[test]
    fn rejects_newline_inside_inline_table() {
        let mut parser = Parser::new("t = { a = 1,\nb = 2 }\n");
        assert!(parser.parse_document().is_err());
    }
}
