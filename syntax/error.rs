//! Syntax errors with source positions.

use thiserror::Error;

/// What went wrong.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SyntaxErrorKind {
    #[error("unexpected `{0}`")]
    UnexpectedToken(String),
    #[error("unexpected end of statement")]
    UnexpectedEnd,
    #[error("unknown character `{0}`")]
    UnknownCharacter(char),
    #[error("integer `{0}` is out of range")]
    IntegerOverflow(String),
    #[error("statement is not terminated by `.`")]
    UnterminatedStatement,
}

/// A token sequence that is not derivable from the grammar.
/// Positions are 1-based; the offset is in bytes from the start
/// of the scanned input.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("syntax error at line {line}, column {column}: {kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    /// Locate an error at a byte offset of `source`.
    pub fn new(source: &str, offset: usize, kind: SyntaxErrorKind) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Self {
            kind,
            offset,
            line,
            column,
        }
    }

    /// Locate an error at the start of `rest`, a suffix of `source`.
    pub fn at(source: &str, rest: &str, kind: SyntaxErrorKind) -> Self {
        Self::new(source, source.len() - rest.len(), kind)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn positions() {
        let source = "a.\n#preference(p) {\n  x ! y }.";
        let e = SyntaxError::new(source, 24, SyntaxErrorKind::UnknownCharacter('!'));
        assert_eq!((e.line, e.column), (3, 5));
        let e = SyntaxError::at(source, &source[3..], SyntaxErrorKind::UnexpectedEnd);
        assert_eq!((e.offset, e.line, e.column), (3, 2, 1));
        assert_eq!(
            e.to_string(),
            "syntax error at line 2, column 1: unexpected end of statement"
        );
    }
}
