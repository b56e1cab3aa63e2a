//! Construction-time nodes. Unlike [`crate::value::Value`], a `Frame`
//! remembers *how* it came into being, which is exactly the information
//! the dotted-key assigner and section opener need to decide whether a
//! later expression may extend it.

use std::collections::BTreeMap;

use crate::value::Value;

/// Why a `FrameTable` exists. Only `Open` and `Dotted` are ever mutated
/// again after creation; `Closed` tables are a dead end for every writer
/// except the one block that built them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Created implicitly as a supertable by a later `[a.b.c]` header.
    /// Still extendable by further headers.
    Open,
    /// Created implicitly by a dotted-key assignment inside the current
    /// block. Extendable by sibling dotted keys in the same block only;
    /// must be sealed to `Closed` at the end of that block.
    Dotted,
    /// Created by an explicit header, an inline table, or a sealed
    /// dotted subtree. No further header or dotted key may touch it.
    Closed,
}

pub type FrameMap = BTreeMap<String, Frame>;

#[derive(Debug, Clone)]
pub enum Frame {
    FrameTable(TableKind, FrameMap),
    /// Elements are stored in reverse append order: `[[x]]` prepends so
    /// it can run in O(1); the finalizer reverses before building the
    /// output array. Never empty.
    FrameArray(Vec<FrameMap>),
    FrameValue(Value),
}

impl Frame {
    pub fn table(kind: TableKind, map: FrameMap) -> Self {
        Frame::FrameTable(kind, map)
    }
}

/// Seals every immediate `Dotted` frame in `map` to `Closed`, recursing
/// into the sealed subtree. Frames of any other kind pass through
/// unchanged. Applying this twice is the same as applying it once: a
/// `Closed` frame is already a fixed point.
pub fn seal(map: FrameMap) -> FrameMap {
    map.into_iter()
        .map(|(k, frame)| {
            let sealed = match frame {
                Frame::FrameTable(TableKind::Dotted, inner) => {
                    Frame::FrameTable(TableKind::Closed, seal(inner))
                }
                other => other,
            };
            (k, sealed)
        })
        .collect()
}
