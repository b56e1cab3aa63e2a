//! Installs a single `key.path = value` assignment into a frame map,
//! creating the `Dotted` intermediates TOML's dotted-key syntax implies
//! and rejecting any attempt to route through a table that is already
//! closed, already a value, or already an array of tables.

use crate::error::{ErrorKind, LocatedSemanticError, SemanticError};
use crate::frame::{Frame, FrameMap, TableKind};
use crate::inline::val_to_value;
use crate::key::Key;
use crate::raw::Val;

pub fn assign(key: Key, val: Val, mut frame: FrameMap) -> Result<FrameMap, LocatedSemanticError> {
    let (head, rest) = key.into_split_first();

    match rest {
        None => {
            if frame.contains_key(&head.value) {
                return Err(crate::key::Located::new(
                    head.position,
                    SemanticError::new(head.value, ErrorKind::AlreadyAssigned),
                ));
            }
            let value = val_to_value(val)?;
            frame.insert(head.value, Frame::FrameValue(value));
            Ok(frame)
        }
        Some(rest_key) => {
            let existing = frame.remove(&head.value);
            let inner = match existing {
                None => FrameMap::new(),
                Some(Frame::FrameTable(TableKind::Open, t)) => t,
                Some(Frame::FrameTable(TableKind::Dotted, t)) => t,
                Some(Frame::FrameTable(TableKind::Closed, _)) | Some(Frame::FrameArray(_)) => {
                    return Err(crate::key::Located::new(
                        head.position,
                        SemanticError::new(head.value, ErrorKind::ClosedTable),
                    ));
                }
                Some(Frame::FrameValue(_)) => {
                    return Err(crate::key::Located::new(
                        head.position,
                        SemanticError::new(head.value, ErrorKind::AlreadyAssigned),
                    ));
                }
            };
            // The result is always labelled `Dotted`, even when `inner`
            // was previously `Open`: this assignment's own provenance is
            // dotted, and it must be sealed at the end of this block
            // regardless of how its spine got here.
            let updated = assign(rest_key, val, inner)?;
            frame.insert(head.value, Frame::FrameTable(TableKind::Dotted, updated));
            Ok(frame)
        }
    }
}

/// Folds [`assign`] over a whole key/value block.
pub fn assign_all(
    kvs: Vec<(Key, Val)>,
    mut frame: FrameMap,
) -> Result<FrameMap, LocatedSemanticError> {
    for (key, val) in kvs {
        frame = assign(key, val, frame)?;
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{Located, Position};

    fn seg(s: &str) -> Located<String> {
        Located::new(Position::new(1, 1), s.to_string())
    }

    fn key(parts: &[&str]) -> Key {
        Key::new(parts.iter().map(|s| seg(s)).collect())
    }

    #[test]
    fn builds_intermediate_dotted_tables() {
        let frame = assign(key(&["a", "b", "c"]), Val::Integer(1), FrameMap::new()).unwrap();
        match frame.get("a").unwrap() {
            Frame::FrameTable(TableKind::Dotted, inner) => match inner.get("b").unwrap() {
                Frame::FrameTable(TableKind::Dotted, innermost) => {
                    assert!(matches!(
                        innermost.get("c"),
                        Some(Frame::FrameValue(crate::value::Value::Integer(1)))
                    ));
                }
                other => panic!("expected dotted table, got {other:?}"),
            },
            other => panic!("expected dotted table, got {other:?}"),
        }
    }

    #[test]
    fn rejects_reassignment_of_a_value() {
        let frame = assign(key(&["a"]), Val::Integer(1), FrameMap::new()).unwrap();
        let err = assign(key(&["a"]), Val::Integer(2), frame).unwrap_err();
        assert_eq!(err.value.kind, ErrorKind::AlreadyAssigned);
    }

    #[test]
    fn rejects_dotted_key_into_closed_table() {
        let mut frame = FrameMap::new();
        frame.insert(
            "a".to_string(),
            Frame::FrameTable(TableKind::Closed, FrameMap::new()),
        );
        let err = assign(key(&["a", "b"]), Val::Integer(1), frame).unwrap_err();
        assert_eq!(err.value.kind, ErrorKind::ClosedTable);
    }
}
