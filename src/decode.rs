//! A deliberately thin stand-in for the value-to-domain-object decoder
//! named in §6 as an external collaborator. It exists only to pin down
//! the `MatchMessage` scope-path contract the core's error renderer also
//! formats; it is not a general derive-style decode framework.

use crate::error::{MatchMessage, ScopeSegment};
use crate::value::{Table, Value};

/// Implemented by domain types that can be read out of a resolved
/// `Table`. A real decoder would derive this; here it is written by
/// hand for the one or two shapes the `decode` CLI demonstrates.
pub trait FromTable: Sized {
    fn from_table(table: &Table) -> Result<Self, Vec<MatchMessage>>;
}

pub fn expect_string<'a>(table: &'a Table, key: &str) -> Result<&'a str, MatchMessage> {
    match table.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(mismatch(key, "a string", other.type_name())),
        None => Err(missing(key)),
    }
}

pub fn expect_integer(table: &Table, key: &str) -> Result<i64, MatchMessage> {
    match table.get(key) {
        Some(Value::Integer(i)) => Ok(*i),
        Some(other) => Err(mismatch(key, "an integer", other.type_name())),
        None => Err(missing(key)),
    }
}

pub fn expect_table<'a>(table: &'a Table, key: &str) -> Result<&'a Table, MatchMessage> {
    match table.get(key) {
        Some(Value::Table(t)) => Ok(t),
        Some(other) => Err(mismatch(key, "a table", other.type_name())),
        None => Err(missing(key)),
    }
}

fn mismatch(key: &str, expected: &str, found: &str) -> MatchMessage {
    MatchMessage::new(format!("expected {expected}, found {found}"))
        .nest(ScopeSegment::Key(key.to_string()))
}

fn missing(key: &str) -> MatchMessage {
    MatchMessage::new("missing key").nest(ScopeSegment::Key(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_scope_path_for_a_nested_miss() {
        let mut inner = Table::new();
        inner.insert("name".to_string(), Value::Integer(1));
        let mut outer = Table::new();
        outer.insert("person".to_string(), Value::Table(inner));

        let person = expect_table(&outer, "person").unwrap();
        let err = expect_string(person, "name").unwrap_err();
        assert_eq!(err.to_string(), "expected a string, found integer in top.name");
    }

    #[test]
    fn renders_scope_path_for_a_missing_key() {
        let table = Table::new();
        let err = expect_integer(&table, "count").unwrap_err();
        assert_eq!(err.to_string(), "missing key in top.count");
    }
}
