//! Split a preference specification into passthrough code and statements.

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{anychar, satisfy},
    combinator::{not, recognize},
    multi::many0_count,
    sequence::{pair, preceded},
    IResult,
};

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::lexer::{block_comment, is_symbol_char, line_comment, raw_string, Lex};
use crate::parser::Parse;
use crate::statement::{StatementLexer, StatementParser, StatementToken};
use crate::{Statement, Token, Tokens};

/// A maximal run of ordinary code, or one statement.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Segment {
    /// Copied to the output verbatim.
    Code(String),
    Statement(Statement),
}

/// The start of a statement: `#preference` or `#optimize`
/// not followed by another symbol character.
fn marker(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((tag("#preference"), tag("#optimize"))),
        not(satisfy(is_symbol_char)),
    ))(input)
}

/// Everything up to the next marker, skipping over comments and strings.
fn code(input: &str) -> IResult<&str, &str> {
    recognize(many0_count(alt((
        block_comment,
        line_comment,
        raw_string,
        is_not("%\"#"),
        recognize(preceded(not(marker), anychar)),
    ))))(input)
}

/// Iterate over the segments of a source text. Each segment ends
/// where the next one starts, so concatenating the code segments with
/// the source text of the statements reproduces the input. Scanning
/// stops after the first error.
pub struct Scanner<'a> {
    source: &'a str,
    rest: &'a str,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
            failed: false,
        }
    }

    fn statement(&mut self) -> Result<Statement, SyntaxError> {
        let (rest, tokens) = StatementLexer::lex(self.rest).map_err(|e| {
            let at = match e {
                nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
                nom::Err::Incomplete(_) => "",
            };
            let kind = match at.chars().next() {
                // Digits lex as an integer unless they overflow.
                Some(c) if c.is_ascii_digit() => SyntaxErrorKind::IntegerOverflow(
                    at.chars().take_while(char::is_ascii_digit).collect(),
                ),
                Some(c) => SyntaxErrorKind::UnknownCharacter(c),
                None => SyntaxErrorKind::UnterminatedStatement,
            };
            SyntaxError::at(self.source, at, kind)
        })?;
        let (_, statement) = StatementParser::parse(Tokens::new(&tokens))
            .map_err(|e| match e {
                nom::Err::Error(e) | nom::Err::Failure(e) => self.unexpected(e.input),
                nom::Err::Incomplete(_) => self.unexpected(Tokens::new(&[])),
            })?;
        self.rest = rest;
        Ok(statement)
    }

    /// Blame the first token the parser could not consume.
    fn unexpected(&self, input: Tokens<'_, Token<StatementToken, &str>>) -> SyntaxError {
        match input.first() {
            Some(t) => SyntaxError::at(
                self.source,
                t.source,
                SyntaxErrorKind::UnexpectedToken(t.token.to_string()),
            ),
            None => SyntaxError::at(self.source, self.rest, SyntaxErrorKind::UnexpectedEnd),
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Segment, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        match code(self.rest) {
            Ok((rest, text)) if !text.is_empty() => {
                self.rest = rest;
                return Some(Ok(Segment::Code(String::from(text))));
            }
            _ => (),
        }
        let result = self.statement().map(Segment::Statement);
        self.failed = result.is_err();
        Some(result)
    }
}
