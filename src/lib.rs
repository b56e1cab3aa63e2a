pub mod decode;
pub mod dotted;
pub mod error;
pub mod finalize;
pub mod frame;
pub mod gather;
pub mod inline;
pub mod key;
pub mod lex;
pub mod parse;
pub mod raw;
pub mod section;
pub mod semantics;
pub mod tagged;
pub mod value;

pub use error::{ErrorKind, LocatedSemanticError, MatchMessage, ScopeSegment, SemanticError};
pub use key::{Key, Located, Position};
pub use parse::{ParseError, Parser};
pub use raw::{Expr, Val};
pub use semantics::semantics;
pub use value::{Table, Value};
