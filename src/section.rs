//! Installs one `[section]` or `[[section]]` header, walking (and where
//! necessary creating) the intermediate tables the header's dotted key
//! names, then folds the section's own key/value block into the
//! terminal table and seals any dotted intermediates it created.

use crate::dotted::assign_all;
use crate::error::{ErrorKind, LocatedSemanticError, SemanticError};
use crate::frame::{seal, Frame, FrameMap, TableKind};
use crate::gather::{KeyValBlock, SectionKind};
use crate::key::{Key, Located, Position};

pub fn open_section(
    kind: SectionKind,
    header_key: Key,
    kvs: KeyValBlock,
    frame: FrameMap,
) -> Result<FrameMap, LocatedSemanticError> {
    walk(kind, header_key, kvs, frame)
}

fn walk(
    kind: SectionKind,
    key: Key,
    kvs: KeyValBlock,
    mut frame: FrameMap,
) -> Result<FrameMap, LocatedSemanticError> {
    let (head, rest) = key.into_split_first();
    let position = head.position;
    let name = head.value;

    match rest {
        Some(rest_key) => walk_interior(kind, rest_key, kvs, frame, position, name),
        None => walk_terminal(kind, kvs, frame, position, name),
    }
}

fn walk_interior(
    kind: SectionKind,
    rest_key: Key,
    kvs: KeyValBlock,
    mut frame: FrameMap,
    position: Position,
    name: String,
) -> Result<FrameMap, LocatedSemanticError> {
    match frame.remove(&name) {
        None => {
            let inner = walk(kind, rest_key, kvs, FrameMap::new())?;
            frame.insert(name, Frame::FrameTable(TableKind::Open, inner));
            Ok(frame)
        }
        Some(Frame::FrameTable(existing_kind, inner)) => {
            let inner = walk(kind, rest_key, kvs, inner)?;
            frame.insert(name, Frame::FrameTable(existing_kind, inner));
            Ok(frame)
        }
        Some(Frame::FrameArray(mut elements)) => {
            // The array-of-tables most recently appended is the one a
            // nested header extends; elements are kept newest-first.
            let head_element = elements.remove(0);
            let updated = walk(kind, rest_key, kvs, head_element)?;
            elements.insert(0, updated);
            frame.insert(name, Frame::FrameArray(elements));
            Ok(frame)
        }
        Some(Frame::FrameValue(_)) => Err(err(position, name, ErrorKind::AlreadyAssigned)),
    }
}

fn walk_terminal(
    kind: SectionKind,
    kvs: KeyValBlock,
    mut frame: FrameMap,
    position: Position,
    name: String,
) -> Result<FrameMap, LocatedSemanticError> {
    let existing = frame.remove(&name);
    match (kind, existing) {
        (SectionKind::Table, None) => {
            let built = apply_block(kvs, FrameMap::new())?;
            frame.insert(name, Frame::FrameTable(TableKind::Closed, built));
            Ok(frame)
        }
        (SectionKind::ArrayTable, None) => {
            let built = apply_block(kvs, FrameMap::new())?;
            frame.insert(name, Frame::FrameArray(vec![built]));
            Ok(frame)
        }
        (SectionKind::Table, Some(Frame::FrameTable(TableKind::Open, t))) => {
            // Promotes the implicit supertable to an explicit, closed one.
            let built = apply_block(kvs, t)?;
            frame.insert(name, Frame::FrameTable(TableKind::Closed, built));
            Ok(frame)
        }
        (SectionKind::ArrayTable, Some(Frame::FrameTable(TableKind::Open, _))) => {
            Err(err(position, name, ErrorKind::ImplicitlyTable))
        }
        (SectionKind::ArrayTable, Some(Frame::FrameArray(mut elements))) => {
            let built = apply_block(kvs, FrameMap::new())?;
            elements.insert(0, built);
            frame.insert(name, Frame::FrameArray(elements));
            Ok(frame)
        }
        (SectionKind::Table, Some(Frame::FrameArray(_))) => {
            Err(err(position, name, ErrorKind::ClosedTable))
        }
        (_, Some(Frame::FrameTable(TableKind::Closed, _))) => {
            Err(err(position, name, ErrorKind::ClosedTable))
        }
        (_, Some(Frame::FrameTable(TableKind::Dotted, _))) => {
            unreachable!(
                "a Dotted frame for {name:?} survived past the block that created it; \
                 the section opener's caller must seal every block before moving on"
            )
        }
        (_, Some(Frame::FrameValue(_))) => Err(err(position, name, ErrorKind::AlreadyAssigned)),
    }
}

/// Folds the dotted-key assigner over a section's own key/value block,
/// then seals every dotted intermediate it produced: once this block
/// ends, the same path becomes a closed table for everyone else.
fn apply_block(kvs: KeyValBlock, frame: FrameMap) -> Result<FrameMap, LocatedSemanticError> {
    let assigned = assign_all(kvs, frame)?;
    Ok(seal(assigned))
}

fn err(position: Position, key: String, kind: ErrorKind) -> LocatedSemanticError {
    Located::new(position, SemanticError::new(key, kind))
}
