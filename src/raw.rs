//! The pre-semantic shapes handed to the core by the parser: scalars are
//! already typed, but tables and arrays have not yet been checked for
//! conflicts, and inline tables still remember their association-list
//! order so the inline-table validator can report overlaps in source
//! terms before it de-duplicates anything.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use crate::key::Key;

/// A raw value as produced by the parser, before semantic resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
    TimeOfDay(NaiveTime),
    ZonedTime(DateTime<FixedOffset>),
    LocalDateTime(NaiveDateTime),
    LocalDate(NaiveDate),
    /// `[ ... ]` — an inline array literal.
    ValArray(Vec<Val>),
    /// `{ ... }` — an inline table literal, still in source order.
    ValTable(Vec<(Key, Val)>),
}

/// One top-level expression out of the parser.
#[derive(Debug, Clone)]
pub enum Expr {
    KeyValExpr(Key, Val),
    TableExpr(Key),
    ArrayTableExpr(Key),
}
