//! Converts raw `Val`s into fully-resolved `Value`s. The interesting part
//! is `{ ... }` inline tables: they carry their own association-list of
//! keys, so before they can be merged into a nested `Value::Table` they
//! have to be checked for overlapping dotted prefixes the same way a
//! `[section]` block would be, except entirely within one literal.

use std::collections::BTreeMap;

use crate::error::{ErrorKind, LocatedSemanticError, SemanticError};
use crate::key::{Key, Located};
use crate::raw::Val;
use crate::value::{Table, Value};

/// Converts any `Val` to a `Value`, recursing through arrays and handing
/// inline tables off to [`convert_inline_table`].
pub fn val_to_value(val: Val) -> Result<Value, LocatedSemanticError> {
    Ok(match val {
        Val::Integer(i) => Value::Integer(i),
        Val::Float(f) => Value::Float(f),
        Val::Bool(b) => Value::Bool(b),
        Val::String(s) => Value::String(s),
        Val::TimeOfDay(t) => Value::TimeOfDay(t),
        Val::ZonedTime(t) => Value::ZonedTime(t),
        Val::LocalDateTime(t) => Value::LocalDateTime(t),
        Val::LocalDate(t) => Value::LocalDate(t),
        Val::ValArray(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(val_to_value(item)?);
            }
            Value::Array(out)
        }
        Val::ValTable(entries) => Value::Table(convert_inline_table(entries)?),
    })
}

/// Validates and merges one `{ ... }` literal's association list into a
/// value `Table`.
pub fn convert_inline_table(entries: Vec<(Key, Val)>) -> Result<Table, LocatedSemanticError> {
    if let Some(err) = detect_overlap(&entries) {
        return Err(err);
    }

    let mut converted = Vec::with_capacity(entries.len());
    for (key, val) in entries {
        converted.push((key, val_to_value(val)?));
    }
    Ok(merge_entries(converted))
}

/// Two keys overlap if one is a proper prefix of the other. Sorting by
/// segment-string first makes every potential overlap adjacent, so a
/// single pass over the sorted list finds the first one (in lexicographic
/// order, which is the order the spec asks diagnostics to use here, not
/// source order).
fn detect_overlap(entries: &[(Key, Val)]) -> Option<LocatedSemanticError> {
    let mut keys: Vec<&Key> = entries.iter().map(|(k, _)| k).collect();
    keys.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));

    for pair in keys.windows(2) {
        let (shorter, longer) = (pair[0], pair[1]);
        if is_proper_prefix(shorter, longer) {
            // The offending segment is the one inside `longer` where it
            // stops matching `shorter` and keeps going — not `shorter`'s
            // own tail, which is a different `Located<String>` entirely.
            let segment = &longer.segments()[shorter.segments().len() - 1];
            return Some(Located::new(
                segment.position,
                SemanticError::new(shorter.dotted(), ErrorKind::AlreadyAssigned),
            ));
        }
    }
    None
}

fn sort_key(key: &Key) -> Vec<&str> {
    key.segments().iter().map(|s| s.value.as_str()).collect()
}

fn is_proper_prefix(a: &Key, b: &Key) -> bool {
    let (a_segs, b_segs) = (a.segments(), b.segments());
    a_segs.len() < b_segs.len()
        && a_segs
            .iter()
            .zip(b_segs.iter())
            .all(|(x, y)| x.value == y.value)
}

/// Merges a flat list of (possibly multi-segment) keys into nested
/// tables. By the time this runs, `detect_overlap` has already ruled out
/// duplicate leaf paths and prefix collisions, so every group sharing a
/// head segment is either a single terminal entry or a set of entries
/// that all still have a remaining tail.
fn merge_entries(entries: Vec<(Key, Value)>) -> Table {
    let mut groups: BTreeMap<String, Vec<(Key, Value)>> = BTreeMap::new();
    for (key, value) in entries {
        let head = key.head().value.clone();
        groups.entry(head).or_default().push((key, value));
    }

    let mut table = Table::new();
    for (head, group) in groups {
        let rests: Vec<(Key, Value)> = group
            .into_iter()
            .map(|(key, value)| (key.into_split_first(), value))
            .map(|((_, rest), value)| (rest, value))
            .collect();

        if rests.len() == 1 && rests[0].0.is_none() {
            let (_, value) = rests.into_iter().next().unwrap();
            table.insert(head, value);
        } else {
            let subentries = rests
                .into_iter()
                .map(|(rest, value)| {
                    (
                        rest.expect("overlap check rules out a duplicate leaf here"),
                        value,
                    )
                })
                .collect();
            table.insert(head, Value::Table(merge_entries(subentries)));
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Position;

    fn seg(line: usize, col: usize, s: &str) -> Located<String> {
        Located::new(Position::new(line, col), s.to_string())
    }

    fn key(segments: &[(usize, usize, &str)]) -> Key {
        Key::new(segments.iter().map(|(l, c, s)| seg(*l, *c, s)).collect())
    }

    #[test]
    fn merges_disjoint_dotted_siblings() {
        let entries = vec![
            (key(&[(1, 1, "a"), (1, 3, "b")]), Val::Integer(1)),
            (key(&[(1, 8, "a"), (1, 10, "c")]), Val::Integer(2)),
        ];
        let table = convert_inline_table(entries).expect("no overlap");
        let a = table.get("a").unwrap().as_table().unwrap();
        assert_eq!(a.get("b"), Some(&Value::Integer(1)));
        assert_eq!(a.get("c"), Some(&Value::Integer(2)));
    }

    #[test]
    fn rejects_overlapping_prefix() {
        let entries = vec![
            (key(&[(1, 1, "a"), (1, 3, "b")]), Val::Integer(1)),
            (
                key(&[(1, 8, "a"), (1, 10, "b"), (1, 12, "c")]),
                Val::Integer(2),
            ),
        ];
        let err = convert_inline_table(entries).expect_err("overlap must be rejected");
        assert_eq!(err.value.kind, ErrorKind::AlreadyAssigned);
        // The reported position is the `b` inside the longer key `a.b.c`
        // (column 10), not the `b` of the shorter key `a.b` (column 3).
        assert_eq!(err.position, Position::new(1, 10));
    }
}
