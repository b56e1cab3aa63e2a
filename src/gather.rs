//! Splits the flat expression stream into the top-level key/value block
//! and the sequence of table / array-of-table sections, each carrying
//! the key/values that follow its header up to the next one.

use crate::key::Key;
use crate::raw::{Expr, Val};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Table,
    ArrayTable,
}

pub type KeyValBlock = Vec<(Key, Val)>;

#[derive(Debug)]
pub struct Section {
    pub kind: SectionKind,
    pub key: Key,
    pub kvs: KeyValBlock,
}

/// Order of key/values within each block and order of sections are both
/// preserved exactly as they appeared in `exprs`; the top block has no
/// header key by construction.
pub fn gather(exprs: Vec<Expr>) -> (KeyValBlock, Vec<Section>) {
    let mut top_kvs = KeyValBlock::new();
    let mut sections: Vec<Section> = Vec::new();

    for expr in exprs {
        match expr {
            Expr::KeyValExpr(key, val) => match sections.last_mut() {
                Some(section) => section.kvs.push((key, val)),
                None => top_kvs.push((key, val)),
            },
            Expr::TableExpr(key) => sections.push(Section {
                kind: SectionKind::Table,
                key,
                kvs: KeyValBlock::new(),
            }),
            Expr::ArrayTableExpr(key) => sections.push(Section {
                kind: SectionKind::ArrayTable,
                key,
                kvs: KeyValBlock::new(),
            }),
        }
    }

    (top_kvs, sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{Located, Position};

    fn seg(s: &str) -> Located<String> {
        Located::new(Position::new(1, 1), s.to_string())
    }

    fn key1(s: &str) -> Key {
        Key::single(seg(s))
    }

    #[test]
    fn groups_kvs_before_first_header_as_top() {
        let exprs = vec![
            Expr::KeyValExpr(key1("a"), Val::Integer(1)),
            Expr::TableExpr(key1("t")),
            Expr::KeyValExpr(key1("b"), Val::Integer(2)),
        ];
        let (top, sections) = gather(exprs);
        assert_eq!(top.len(), 1);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kvs.len(), 1);
    }

    #[test]
    fn each_header_starts_a_fresh_block() {
        let exprs = vec![
            Expr::TableExpr(key1("a")),
            Expr::KeyValExpr(key1("x"), Val::Integer(1)),
            Expr::ArrayTableExpr(key1("b")),
            Expr::KeyValExpr(key1("y"), Val::Integer(2)),
            Expr::KeyValExpr(key1("z"), Val::Integer(3)),
        ];
        let (top, sections) = gather(exprs);
        assert!(top.is_empty());
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].kind, SectionKind::Table);
        assert_eq!(sections[0].kvs.len(), 1);
        assert_eq!(sections[1].kind, SectionKind::ArrayTable);
        assert_eq!(sections[1].kvs.len(), 2);
    }
}
