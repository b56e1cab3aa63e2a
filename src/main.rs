use std::error::Error;
use std::fmt;
use std::io::{self, Read};

use toml_semantics::{semantics, Parser};
use toml_semantics::error::render_located;
use toml_semantics::tagged::table_to_tagged_json;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug)]
enum DecodeError {
    Io(io::Error),
    Parse(toml_semantics::ParseError),
    Semantic(toml_semantics::LocatedSemanticError),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Io(err) => write!(f, "{err}"),
            DecodeError::Parse(err) => write!(f, "{err}"),
            DecodeError::Semantic(err) => write!(f, "{}", render_located(err)),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        DecodeError::Io(err)
    }
}

/// Reads a TOML document from stdin, resolves it, and prints the
/// BurntSushi toml-test tagged-JSON form on stdout. Exits non-zero with
/// a `<line>:<column>: <message>` line on stderr for any lex, parse, or
/// semantic failure.
fn run() -> Result<(), Box<dyn Error>> {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;

    let mut parser = Parser::new(&source);
    let exprs = parser.parse_document().map_err(DecodeError::Parse)?;
    let table = semantics(exprs).map_err(DecodeError::Semantic)?;

    let json = table_to_tagged_json(&table);
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
