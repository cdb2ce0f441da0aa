pub mod lexer;
pub mod parser;

pub use lexer::{StatementLexer, StatementToken};
pub use parser::StatementParser;
