//! Lexical building blocks shared by the code scanner
//! and the statement tokenizer.

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_until},
    character::complete::{alpha1, alphanumeric1, anychar, char, digit1, multispace1, not_line_ending},
    combinator::{map, map_res, recognize, value},
    error::ParseError,
    multi::many0_count,
    sequence::{delimited, pair, preceded},
    IResult, Parser,
};

use crate::Symbol;

/// `%* .. *%`
pub(crate) fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(delimited(tag("%*"), take_until("*%"), tag("*%")))(input)
}

/// `% ..` up to the end of the line.
pub(crate) fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('%'), not_line_ending))(input)
}

/// Whitespace and comments, possibly none.
pub(crate) fn space(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0_count(alt((multispace1, block_comment, line_comment))),
    )(input)
}

pub(crate) fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\''
}

/// Identifiers, variables, and the anonymous `_` all look alike.
pub(crate) fn symbol(input: &str) -> IResult<&str, Symbol> {
    let (input, name) = recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_"), tag("'")))),
    ))(input)?;
    Ok((input, Symbol::new(name.to_owned())))
}

/// A string literal, quotes and escapes included.
pub(crate) fn raw_string(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('"'),
        many0_count(alt((is_not("\\\""), recognize(preceded(char('\\'), anychar))))),
        char('"'),
    ))(input)
}

/// The contents of a string literal, escapes intact.
pub(crate) fn string(input: &str) -> IResult<&str, String> {
    map(raw_string, |s| String::from(&s[1..s.len() - 1]))(input)
}

#[allow(clippy::from_str_radix_10)]
pub(crate) fn integer(input: &str) -> IResult<&str, i64> {
    map_res(digit1, |digits: &str| i64::from_str_radix(digits, 10))(input)
}

pub(crate) fn token<I, O, E, F>(mut parser: F) -> impl FnMut(I) -> IResult<I, Token<O, I>, E>
where
    I: Clone,
    O: Clone,
    E: ParseError<I>,
    F: Parser<I, O, E>,
{
    move |input: I| {
        let i = input.clone();
        let (input, t) = parser.parse(input)?;
        Ok((input, Token::new(t, i)))
    }
}

/// Define a parser combinator for a token denoted by a tag.
#[macro_export]
macro_rules! lex_token {
    ($function: ident<$ty: ty>, $tag: literal, $token: expr) => {
        pub(crate) fn $function(input: &str) -> IResult<&str, $crate::Token<$ty, &str>> {
            $crate::lexer::token(::nom::combinator::map(
                ::nom::bytes::complete::tag($tag),
                |_| $token,
            ))(input)
        }
    };
}

/// A token with source information: the input remaining
/// where the token starts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token<T: Clone, S: Clone> {
    pub token: T,
    pub source: S,
}

impl<T: Clone, S: Clone> Token<T, S> {
    pub fn new(token: T, source: S) -> Self {
        Self { token, source }
    }
}

/// A lexer, a.k.a. lexical analyzer, tokenizer.
pub trait Lex<'a> {
    type Token;

    /// Tokenize a prefix of the input, returning the rest.
    fn lex(input: &'a str) -> IResult<&'a str, Vec<Self::Token>>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn symbol() {
        assert!(super::symbol("").is_err(), "empty");
        assert!(super::symbol("123").is_err(), "symbol starts with a digit");
        assert_eq!(
            super::symbol("_123"),
            Ok(("", Symbol::from("_123"))),
            "symbol starts with an underscore"
        );
        assert_eq!(
            super::symbol("foo_bar' baz"),
            Ok((" baz", Symbol::from("foo_bar'"))),
            "symbol with underscore and prime"
        );
    }

    #[test]
    fn string() {
        assert!(super::string(r#""foo"#).is_err(), "unterminated string");
        assert_eq!(super::string(r#""""#), Ok(("", String::new())), "empty");
        assert_eq!(
            super::string(r#""foo bar" x"#),
            Ok((" x", String::from("foo bar"))),
            "simple string"
        );
        assert_eq!(
            super::string(r#""a\"b\\" x"#),
            Ok((" x", String::from(r#"a\"b\\"#))),
            "escapes are kept"
        );
    }

    #[test]
    fn integer() {
        assert!(super::integer("").is_err(), "empty");
        assert!(super::integer("X").is_err(), "invalid");
        assert!(super::integer("12345678901234567890").is_err(), "big");
        assert_eq!(super::integer("0"), Ok(("", 0)), "zero");
        assert_eq!(super::integer("123.."), Ok(("..", 123)), "decimal");
    }

    #[test]
    fn space() {
        assert_eq!(super::space(""), Ok(("", ())));
        assert_eq!(super::space("  x"), Ok(("x", ())));
        assert_eq!(super::space("% comment\n  x"), Ok(("x", ())));
        assert_eq!(super::space("%* block\n *% x"), Ok(("x", ())));
    }
}
