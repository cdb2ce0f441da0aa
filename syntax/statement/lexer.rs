//! Tokens and tokenizer for `#preference` and `#optimize` statements.

use std::fmt;

use nom::{
    branch::alt,
    character::complete::char,
    combinator::{map, map_opt},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult, InputLength,
};

use crate::lexer::{integer, space, string, symbol, token, Lex, Token};
use crate::{lex_token, Symbol};

/// Lexical element of a statement.
/// Named after how they look, not what they mean.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum StatementToken {
    Identifier(Symbol),
    Variable(Symbol),
    Anonymous,
    Integer(i64),
    String(String),
    Preference,
    Optimize,
    True,
    False,
    Infimum,
    Supremum,
    Not,
    DotDot,
    Dot,
    Comma,
    Semi,
    ColonColon,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Plus,
    Dash,
    StarStar,
    Star,
    Slash,
    Backslash,
    Caret,
    Question,
    Amp,
    BarBar,
    Bar,
    Tilde,
    At,
    GtGt,
    Eq,
    Ne,
    Lt,
    Gt,
    Leq,
    Geq,
}

impl From<Symbol> for StatementToken {
    /// Sort a symbol into an identifier, variable, or keyword.
    fn from(s: Symbol) -> Self {
        if s.name() == "not" {
            Self::Not
        } else if s.name().chars().all(|c| c == '_') {
            Self::Anonymous
        } else if s.is_variable() {
            Self::Variable(s)
        } else {
            Self::Identifier(s)
        }
    }
}

impl From<i64> for StatementToken {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl InputLength for StatementToken {
    #[inline]
    fn input_len(&self) -> usize {
        1
    }
}

impl fmt::Display for StatementToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use StatementToken::*;
        let tag = match self {
            Identifier(s) | Variable(s) => return s.fmt(f),
            Integer(i) => return i.fmt(f),
            String(s) => return f.write_fmt(format_args!("\"{s}\"")),
            Anonymous => "_",
            Preference => "#preference",
            Optimize => "#optimize",
            True => "#true",
            False => "#false",
            Infimum => "#inf",
            Supremum => "#sup",
            Not => "not",
            DotDot => "..",
            Dot => ".",
            Comma => ",",
            Semi => ";",
            ColonColon => "::",
            Colon => ":",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            Plus => "+",
            Dash => "-",
            StarStar => "**",
            Star => "*",
            Slash => "/",
            Backslash => "\\",
            Caret => "^",
            Question => "?",
            Amp => "&",
            BarBar => "||",
            Bar => "|",
            Tilde => "~",
            At => "@",
            GtGt => ">>",
            Eq => "=",
            Ne => "!=",
            Lt => "<",
            Gt => ">",
            Leq => "<=",
            Geq => ">=",
        };
        f.write_str(tag)
    }
}

macro_rules! statement_token {
    ($function: ident, $tag: literal, $token: ident) => {
        lex_token!($function<StatementToken>, $tag, StatementToken::$token);
    };
}

statement_token!(dotdot, "..", DotDot);
statement_token!(dot, ".", Dot);
statement_token!(comma, ",", Comma);
statement_token!(semi, ";", Semi);
statement_token!(coloncolon, "::", ColonColon);
statement_token!(colon, ":", Colon);
statement_token!(lparen, "(", LParen);
statement_token!(rparen, ")", RParen);
statement_token!(lbrace, "{", LBrace);
statement_token!(rbrace, "}", RBrace);
statement_token!(plus, "+", Plus);
statement_token!(dash, "-", Dash);
statement_token!(starstar, "**", StarStar);
statement_token!(star, "*", Star);
statement_token!(slash, "/", Slash);
statement_token!(backslash, "\\", Backslash);
statement_token!(caret, "^", Caret);
statement_token!(question, "?", Question);
statement_token!(amp, "&", Amp);
statement_token!(barbar, "||", BarBar);
statement_token!(bar, "|", Bar);
statement_token!(tilde, "~", Tilde);
statement_token!(at, "@", At);
statement_token!(gtgt, ">>", GtGt);
statement_token!(eqeq, "==", Eq);
statement_token!(eq, "=", Eq);
statement_token!(ne, "!=", Ne);
statement_token!(ltgt, "<>", Ne);
statement_token!(leq, "<=", Leq);
statement_token!(geq, ">=", Geq);
statement_token!(lt, "<", Lt);
statement_token!(gt, ">", Gt);

/// `#` immediately followed by a known name.
fn directive(input: &str) -> IResult<&str, Token<StatementToken, &str>> {
    token(map_opt(preceded(char('#'), symbol), |s| match s.name() {
        "preference" => Some(StatementToken::Preference),
        "optimize" => Some(StatementToken::Optimize),
        "true" => Some(StatementToken::True),
        "false" => Some(StatementToken::False),
        "inf" | "infimum" => Some(StatementToken::Infimum),
        "sup" | "supremum" => Some(StatementToken::Supremum),
        _ => None,
    }))(input)
}

/// Any token but the terminating `.`; longer tags first.
fn inner_token(input: &str) -> IResult<&str, Token<StatementToken, &str>> {
    alt((
        directive,
        alt((dotdot, coloncolon, colon, comma, semi)),
        alt((lparen, rparen, lbrace, rbrace)),
        alt((gtgt, geq, gt, leq, ltgt, lt, eqeq, eq, ne)),
        alt((starstar, star, barbar, bar)),
        alt((plus, dash, slash, backslash, caret, question, amp, tilde, at)),
        token(map(integer, StatementToken::Integer)),
        token(map(string, StatementToken::String)),
        token(map(symbol, StatementToken::from)),
    ))(input)
}

/// Statement lexer.
pub struct StatementLexer;

impl<'a> Lex<'a> for StatementLexer {
    type Token = Token<StatementToken, &'a str>;

    /// Tokenize one statement, up to and including its terminating `.`.
    /// Whatever follows the `.` is left alone.
    fn lex(input: &'a str) -> IResult<&'a str, Vec<Self::Token>> {
        map(
            pair(
                many0(delimited(space, inner_token, space)),
                preceded(space, dot),
            ),
            |(mut tokens, dot)| {
                tokens.push(dot);
                tokens
            },
        )(input)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(input: &str) -> Vec<StatementToken> {
        let (_, tokens) = StatementLexer::lex(input).expect("lexable");
        tokens.into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn optimize() {
        use StatementToken::*;
        assert_eq!(
            StatementLexer::lex("#optimize(p). x."),
            Ok((
                " x.",
                vec![
                    Token::new(Optimize, "#optimize(p). x."),
                    Token::new(LParen, "(p). x."),
                    Token::new(Identifier("p".into()), "p). x."),
                    Token::new(RParen, "). x."),
                    Token::new(Dot, ". x."),
                ]
            ))
        );
    }

    #[test]
    fn symbols() {
        use StatementToken::*;
        assert_eq!(
            kinds("a X _ _Y __ not notx."),
            vec![
                Identifier("a".into()),
                Variable("X".into()),
                Anonymous,
                Variable("_Y".into()),
                Anonymous,
                Not,
                Identifier("notx".into()),
                Dot,
            ]
        );
    }

    #[test]
    fn longest_match() {
        use StatementToken::*;
        assert_eq!(
            kinds("1..2 :: : ** * || | >> >= > <= <> < == = != ."),
            vec![
                Integer(1),
                DotDot,
                Integer(2),
                ColonColon,
                Colon,
                StarStar,
                Star,
                BarBar,
                Bar,
                GtGt,
                Geq,
                Gt,
                Leq,
                Ne,
                Lt,
                Eq,
                Eq,
                Ne,
                Dot,
            ]
        );
    }

    #[test]
    fn directives() {
        use StatementToken::*;
        assert_eq!(
            kinds("#preference #true #false #inf #supremum \"s.t\"."),
            vec![
                Preference,
                True,
                False,
                Infimum,
                Supremum,
                String("s.t".into()),
                Dot
            ]
        );
        assert!(StatementLexer::lex("#show a.").is_err());
    }

    #[test]
    fn comments() {
        use StatementToken::*;
        assert_eq!(
            kinds("#optimize(p) % line\n %* block. *% ."),
            vec![Optimize, LParen, Identifier("p".into()), RParen, Dot]
        );
    }

    #[test]
    fn unterminated() {
        assert!(StatementLexer::lex("#optimize(p)").is_err());
        assert!(StatementLexer::lex("#optimize(p) ! .").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(StatementToken::BarBar.to_string(), "||");
        assert_eq!(StatementToken::Variable("X".into()).to_string(), "X");
        assert_eq!(StatementToken::String("x".into()).to_string(), "\"x\"");
    }
}
