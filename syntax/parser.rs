//! Parse a stream of tokens with [nom](https://crates.io/crates/nom).

use nom::IResult;

use crate::{Token, Tokens};

/// An input stream to a parser.
pub type Input<'a, T> = Tokens<'a, Token<T, &'a str>>;

/// A parser over tokens lexed from a string.
pub trait Parse<'a> {
    /// The lexical (input) token type being parsed.
    type Token: Clone;

    /// The syntax tree (output) type.
    type Tree;

    /// Parse a whole token stream.
    fn parse(input: Input<'a, Self::Token>) -> IResult<Input<'a, Self::Token>, Self::Tree>;
}

/// Produce a parser combinator that recognizes a literal token.
#[macro_export]
macro_rules! parse_token {
    ($function:ident<$ty: ty>, $tag: expr) => {
        fn $function(
            input: $crate::parser::Input<'_, $ty>,
        ) -> IResult<$crate::parser::Input<'_, $ty>, $crate::parser::Input<'_, $ty>> {
            ::nom::combinator::verify(
                ::nom::bytes::complete::take(1_usize),
                |t: &$crate::parser::Input<'_, $ty>| t.tok[0].token == $tag,
            )(input)
        }
    };
}
