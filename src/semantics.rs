//! The core's single entry point: `[Expr] -> Either<Located<SemanticError>, Table>`.
//! Everything else in this crate's `gather`/`dotted`/`section`/`inline`/
//! `finalize` modules exists to make this one function correct.

use crate::dotted::assign_all;
use crate::error::LocatedSemanticError;
use crate::finalize::finalize;
use crate::frame::{seal, FrameMap};
use crate::gather::gather;
use crate::raw::Expr;
use crate::section::open_section;
use crate::value::Table;

/// Resolves a flat expression stream into a table tree, or the first
/// semantic error encountered in source order (except inline-table
/// overlaps, which are reported in lexicographic key order — see
/// `crate::inline`).
pub fn semantics(exprs: Vec<Expr>) -> Result<Table, LocatedSemanticError> {
    let (top_kvs, sections) = gather(exprs);

    // The top-level block is itself a block for sealing purposes: any
    // dotted intermediate it creates must be closed before the first
    // section header can try to extend it.
    let mut frame = seal(assign_all(top_kvs, FrameMap::new())?);

    for section in sections {
        frame = open_section(section.kind, section.key, section.kvs, frame)?;
    }

    Ok(finalize(frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::gather::SectionKind;
    use crate::key::{Located, Position};
    use crate::raw::Val;
    use crate::value::Value;

    fn seg(s: &str) -> Located<String> {
        Located::new(Position::new(1, 1), s.to_string())
    }

    fn key(parts: &[&str]) -> crate::key::Key {
        crate::key::Key::new(parts.iter().map(|s| seg(s)).collect())
    }

    #[test]
    fn dotted_key_builds_nested_supertables() {
        // a.b.c = 1
        let exprs = vec![Expr::KeyValExpr(key(&["a", "b", "c"]), Val::Integer(1))];
        let table = semantics(exprs).expect("no error");
        let a = table.get("a").unwrap().as_table().unwrap();
        let b = a.get("b").unwrap().as_table().unwrap();
        assert_eq!(b.get("c"), Some(&Value::Integer(1)));
    }

    #[test]
    fn dotted_key_then_header_is_a_closed_table_conflict() {
        // a.b = 1
        // [a]
        let exprs = vec![
            Expr::KeyValExpr(key(&["a", "b"]), Val::Integer(1)),
            Expr::TableExpr(key(&["a"])),
        ];
        let err = semantics(exprs).expect_err("must conflict");
        assert_eq!(err.value.kind, ErrorKind::ClosedTable);
    }

    #[test]
    fn implicit_supertable_promotion() {
        // [a.b]
        // x = 1
        // [a]
        // y = 2
        let exprs = vec![
            Expr::TableExpr(key(&["a", "b"])),
            Expr::KeyValExpr(key(&["x"]), Val::Integer(1)),
            Expr::TableExpr(key(&["a"])),
            Expr::KeyValExpr(key(&["y"]), Val::Integer(2)),
        ];
        let table = semantics(exprs).expect("no error");
        let a = table.get("a").unwrap().as_table().unwrap();
        let b = a.get("b").unwrap().as_table().unwrap();
        assert_eq!(b.get("x"), Some(&Value::Integer(1)));
        assert_eq!(a.get("y"), Some(&Value::Integer(2)));
    }

    #[test]
    fn array_of_tables_preserves_source_order() {
        // [[x]]
        // n = 1
        // [[x]]
        // n = 2
        let exprs = vec![
            Expr::ArrayTableExpr(key(&["x"])),
            Expr::KeyValExpr(key(&["n"]), Val::Integer(1)),
            Expr::ArrayTableExpr(key(&["x"])),
            Expr::KeyValExpr(key(&["n"]), Val::Integer(2)),
        ];
        let table = semantics(exprs).expect("no error");
        let xs = table.get("x").unwrap().as_array().unwrap();
        assert_eq!(xs.len(), 2);
        assert_eq!(xs[0].as_table().unwrap().get("n"), Some(&Value::Integer(1)));
        assert_eq!(xs[1].as_table().unwrap().get("n"), Some(&Value::Integer(2)));
    }

    #[test]
    fn array_of_tables_over_existing_table_is_a_closed_table_error() {
        // [x]
        // [[x]]
        let exprs = vec![Expr::TableExpr(key(&["x"])), Expr::ArrayTableExpr(key(&["x"]))];
        let err = semantics(exprs).expect_err("must conflict");
        assert_eq!(err.value.kind, ErrorKind::ClosedTable);
    }

    #[test]
    fn inline_table_is_closed_to_later_headers() {
        // t = {a = 1}
        // [t]
        let exprs = vec![
            Expr::KeyValExpr(
                key(&["t"]),
                Val::ValTable(vec![(key(&["a"]), Val::Integer(1))]),
            ),
            Expr::TableExpr(key(&["t"])),
        ];
        let err = semantics(exprs).expect_err("must conflict");
        assert_eq!(err.value.kind, ErrorKind::ClosedTable);
    }

    #[test]
    fn section_kind_covers_both_variants() {
        assert_ne!(SectionKind::Table, SectionKind::ArrayTable);
    }
}
