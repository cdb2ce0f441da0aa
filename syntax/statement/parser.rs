//! Statement parser.
//!
//! Terms use Pratt-style precedence parsing based on Monkey's
//! `parse_pratt_expr` and related routines; formulas and the
//! structure of elements are plain recursive descent.

use nom::{
    branch::alt,
    bytes::complete::take,
    combinator::{cut, eof, map, opt, success, verify},
    error::{Error, ErrorKind},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    Err, IResult,
};

use crate::{
    parse_token, Application, Atom, BinOp, Body, BooleanFormula, Condition, Constant, Element,
    ElementBuilder, ExtendedAtom, Literal, OptimizeStatement, Parse, PreferenceStatement,
    Precedence, RelOp, Statement, Symbol, Term, Tuple, UnaryOp, WeightedBody,
};

use super::lexer::StatementToken;

/// Local alias.
type Input<'a> = crate::parser::Input<'a, StatementToken>;

/// Parser for one `#preference` or `#optimize` statement,
/// including its terminating `.`.
pub struct StatementParser;

impl<'a> Parse<'a> for StatementParser {
    type Token = StatementToken;
    type Tree = Statement;

    /// Statements come out unnumbered; numbering is up to the caller.
    fn parse(input: Input<'a>) -> IResult<Input<'a>, Self::Tree> {
        terminated(statement, eof)(input)
    }
}

/// Define a parser combinator that recognizes a single token.
/// Named (mostly) after what they mean, not how they look.
macro_rules! parse_statement_token {
    ($function: ident, $token: ident) => {
        parse_token!($function<StatementToken>, StatementToken::$token);
    };
}

parse_statement_token!(preference, Preference);
parse_statement_token!(optimize, Optimize);
parse_statement_token!(r#true, True);
parse_statement_token!(r#false, False);
parse_statement_token!(infimum, Infimum);
parse_statement_token!(supremum, Supremum);
parse_statement_token!(anonymous, Anonymous);
parse_statement_token!(not, Not);
parse_statement_token!(upto, DotDot);
parse_statement_token!(end, Dot);
parse_statement_token!(comma, Comma);
parse_statement_token!(semi, Semi);
parse_statement_token!(weighs, ColonColon);
parse_statement_token!(colon, Colon);
parse_statement_token!(lparen, LParen);
parse_statement_token!(rparen, RParen);
parse_statement_token!(lbrace, LBrace);
parse_statement_token!(rbrace, RBrace);
parse_statement_token!(plus, Plus);
parse_statement_token!(minus, Dash);
parse_statement_token!(named, StarStar);
parse_statement_token!(times, Star);
parse_statement_token!(over, Slash);
parse_statement_token!(modulo, Backslash);
parse_statement_token!(xor, Caret);
parse_statement_token!(bit_or, Question);
parse_statement_token!(and, Amp);
parse_statement_token!(given, BarBar);
parse_statement_token!(bar, Bar);
parse_statement_token!(complement, Tilde);
parse_statement_token!(external, At);
parse_statement_token!(over_ranks, GtGt);
parse_statement_token!(eq, Eq);
parse_statement_token!(ne, Ne);
parse_statement_token!(lt, Lt);
parse_statement_token!(gt, Gt);
parse_statement_token!(leq, Leq);
parse_statement_token!(geq, Geq);

/// Take one token and convert it, or fail without consuming anything.
fn token_with<O>(
    input: Input<'_>,
    f: impl Fn(&StatementToken) -> Option<O>,
) -> IResult<Input<'_>, O> {
    let (rest, tokens) = take(1_usize)(input.clone())?;
    match f(&tokens.tok[0].token) {
        Some(output) => Ok((rest, output)),
        None => Err(Err::Error(Error::new(input, ErrorKind::Fail))),
    }
}

fn identifier(input: Input) -> IResult<Input, Symbol> {
    token_with(input, |t| match t {
        StatementToken::Identifier(s) => Some(s.clone()),
        _ => None,
    })
}

fn variable(input: Input) -> IResult<Input, Symbol> {
    token_with(input, |t| match t {
        StatementToken::Variable(s) => Some(s.clone()),
        _ => None,
    })
}

fn literal_constant(input: Input) -> IResult<Input, Constant> {
    token_with(input, |t| match t {
        StatementToken::Integer(i) => Some(Constant::Number(*i)),
        StatementToken::String(s) => Some(Constant::String(s.clone())),
        _ => None,
    })
}

fn constant(input: Input) -> IResult<Input, Constant> {
    alt((
        literal_constant,
        map(infimum, |_| Constant::Infimum),
        map(supremum, |_| Constant::Supremum),
    ))(input)
}

/// `(t, ..; ..)`: one or more pools of arguments.
fn arguments(input: Input) -> IResult<Input, Vec<Vec<Term>>> {
    delimited(
        lparen,
        separated_list1(semi, separated_list0(comma, term)),
        rparen,
    )(input)
}

/// A symbol with optional arguments.
fn application(input: Input) -> IResult<Input, Application<Term>> {
    map(pair(identifier, opt(arguments)), |(predicate, arguments)| {
        Application::new(predicate, arguments.unwrap_or_default())
    })(input)
}

fn tuple_term(input: Input) -> IResult<Input, Term> {
    map(
        delimited(
            lparen,
            separated_list1(
                semi,
                map(
                    pair(separated_list0(comma, term), opt(comma)),
                    |(elements, trailing)| Tuple::new(elements, trailing.is_some()),
                ),
            ),
            rparen,
        ),
        Term::Tuple,
    )(input)
}

fn unary_operation(input: Input) -> IResult<Input, Term> {
    use UnaryOp::*;
    fn unary_op(op: UnaryOp) -> Box<dyn Fn(Term) -> Term> {
        Box::new(move |term| -> Term { Term::unary_operation(op, term) })
    }
    alt((
        map(delimited(bar, term, bar), unary_op(Abs)),
        map(preceded(minus, base_term), unary_op(Neg)),
        map(preceded(complement, base_term), unary_op(Not)),
    ))(input)
}

fn base_term(input: Input) -> IResult<Input, Term> {
    alt((
        unary_operation,
        tuple_term,
        map(preceded(external, application), Term::External),
        map(application, |app| {
            if app.arguments.is_empty() {
                Term::Constant(Constant::Name(app.predicate))
            } else {
                Term::Function(app)
            }
        }),
        map(constant, Term::Constant),
        map(variable, Term::Variable),
        map(anonymous, |_| Term::Anonymous),
    ))(input)
}

fn bin_op(input: Input) -> IResult<Input, (Precedence, Option<BinOp>)> {
    alt((
        map(upto, |_| (Precedence::Interval, None)),
        map(xor, |_| (Precedence::Xor, Some(BinOp::Xor))),
        map(bit_or, |_| (Precedence::Or, Some(BinOp::Or))),
        map(plus, |_| (Precedence::Additive, Some(BinOp::Add))),
        map(minus, |_| (Precedence::Additive, Some(BinOp::Sub))),
        map(times, |_| (Precedence::Multiplicative, Some(BinOp::Mul))),
        map(over, |_| (Precedence::Multiplicative, Some(BinOp::Div))),
        map(modulo, |_| (Precedence::Multiplicative, Some(BinOp::Mod))),
        map(named, |_| (Precedence::Exponentiation, Some(BinOp::Pow))),
        success((Precedence::Lowest, None)),
    ))(input)
}

fn infix(input: Input, left: Term) -> IResult<Input, Term> {
    let (input, (precedence, bin_op)) = bin_op(input)?;
    match (precedence, bin_op) {
        (_, Some(op)) => {
            let (input, right) = pratt_left(input, precedence)?;
            Ok((input, Term::binary_operation(left, op, right)))
        }
        (Precedence::Interval, None) => {
            let (input, right) = pratt_left(input, precedence)?;
            Ok((input, Term::interval(left, right)))
        }
        (_, None) => Err(Err::Error(Error::new(input, ErrorKind::Fail))),
    }
}

fn pratt_right(input: Input, precedence: Precedence, left: Term) -> IResult<Input, Term> {
    let (_, (peek, _)) = bin_op(input.clone())?;
    if peek > precedence || (peek == precedence && peek.is_right_assoc()) {
        let (input, left) = infix(input, left)?;
        pratt_right(input, precedence, left)
    } else {
        Ok((input, left))
    }
}

fn pratt_left(input: Input, precedence: Precedence) -> IResult<Input, Term> {
    let (input, left) = base_term(input)?;
    pratt_right(input, precedence, left)
}

fn term(input: Input) -> IResult<Input, Term> {
    pratt_left(input, Precedence::Lowest)
}

/// An application, possibly classically negated.
fn atom(input: Input) -> IResult<Input, Atom> {
    map(pair(opt(minus), application), |(classical, application)| {
        if classical.is_some() {
            Atom::classical(application)
        } else {
            Atom::new(application)
        }
    })(input)
}

fn rel_op(input: Input) -> IResult<Input, RelOp> {
    alt((
        map(eq, |_| RelOp::Eq),
        map(ne, |_| RelOp::Ne),
        map(lt, |_| RelOp::Lt),
        map(gt, |_| RelOp::Gt),
        map(leq, |_| RelOp::Leq),
        map(geq, |_| RelOp::Geq),
    ))(input)
}

fn comparison(input: Input) -> IResult<Input, ExtendedAtom> {
    map(tuple((term, rel_op, term)), |(l, op, r)| {
        ExtendedAtom::comparison(l, op, r)
    })(input)
}

fn extended_atom(input: Input) -> IResult<Input, ExtendedAtom> {
    alt((
        comparison,
        map(r#true, |_| ExtendedAtom::True),
        map(r#false, |_| ExtendedAtom::False),
        map(atom, ExtendedAtom::Atom),
    ))(input)
}

fn literal(input: Input) -> IResult<Input, Literal> {
    alt((
        map(preceded(pair(not, not), extended_atom), Literal::DoubleNegative),
        map(preceded(not, extended_atom), Literal::Negative),
        map(extended_atom, Literal::Positive),
    ))(input)
}

/// `: l1, .., ln`
fn body(input: Input) -> IResult<Input, Body> {
    preceded(colon, separated_list1(comma, literal))(input)
}

/// A parenthesized bare atom is not a formula.
fn primary(input: Input) -> IResult<Input, BooleanFormula> {
    alt((
        map(comparison, BooleanFormula::Atom),
        verify(delimited(lparen, formula, rparen), |f: &BooleanFormula| {
            !f.is_atom()
        }),
        map(extended_atom, BooleanFormula::Atom),
    ))(input)
}

fn negation(input: Input) -> IResult<Input, BooleanFormula> {
    alt((map(preceded(not, negation), BooleanFormula::neg), primary))(input)
}

fn conjunction(input: Input) -> IResult<Input, BooleanFormula> {
    map(separated_list1(and, negation), |fs| {
        fold_left(fs, BooleanFormula::and)
    })(input)
}

fn formula(input: Input) -> IResult<Input, BooleanFormula> {
    map(separated_list1(bar, conjunction), |fs| {
        fold_left(fs, BooleanFormula::or)
    })(input)
}

/// `separated_list1` never yields an empty list.
fn fold_left(
    fs: Vec<BooleanFormula>,
    op: fn(BooleanFormula, BooleanFormula) -> BooleanFormula,
) -> BooleanFormula {
    let mut fs = fs.into_iter();
    let first = fs
        .next()
        .unwrap_or(BooleanFormula::Atom(ExtendedAtom::True));
    fs.fold(first, op)
}

fn formulas(input: Input) -> IResult<Input, Vec<BooleanFormula>> {
    separated_list1(comma, formula)(input)
}

/// `**name`
fn naming(input: Input) -> IResult<Input, Application<Term>> {
    preceded(named, application)(input)
}

fn condition(input: Input) -> IResult<Input, Condition> {
    alt((
        map(naming, Condition::Naming),
        map(formulas, Condition::Formulas),
        success(Condition::default()),
    ))(input)
}

fn weighted_body(input: Input) -> IResult<Input, WeightedBody> {
    alt((
        map(
            separated_pair(separated_list1(comma, term), weighs, condition),
            |(weight, condition)| WeightedBody::new(Some(weight), condition),
        ),
        map(preceded(weighs, condition), |condition| {
            WeightedBody::new(None, condition)
        }),
        map(naming, |name| WeightedBody::new(None, Condition::Naming(name))),
        map(formulas, |fs| WeightedBody::new(None, Condition::Formulas(fs))),
    ))(input)
}

/// `{ b1; ..; bn }` or a lone weighted body.
fn set(input: Input) -> IResult<Input, Vec<WeightedBody>> {
    alt((
        delimited(lbrace, separated_list1(semi, weighted_body), rbrace),
        map(weighted_body, |body| vec![body]),
    ))(input)
}

fn element(input: Input) -> IResult<Input, Element> {
    let (input, head) = set(input)?;
    let (input, rest) = many0(preceded(over_ranks, set))(input)?;
    let (input, condition_set) = opt(preceded(given, set))(input)?;
    let (input, element_body) = opt(body)(input)?;
    let mut builder = rest
        .into_iter()
        .fold(ElementBuilder::new(head), ElementBuilder::set);
    if let Some(condition) = condition_set {
        builder = builder.condition(condition);
    }
    if let Some(body) = element_body {
        builder = builder.body(body);
    }
    Ok((input, builder.build()))
}

fn elements(input: Input) -> IResult<Input, Vec<Element>> {
    delimited(
        lbrace,
        separated_list0(semi, element),
        rbrace,
    )(input)
}

/// `(name, kind) { elements } : body.`
fn preference_statement(input: Input) -> IResult<Input, Statement> {
    map(
        tuple((
            delimited(lparen, separated_pair(term, comma, term), rparen),
            elements,
            opt(body),
            end,
        )),
        |((name, kind), elements, body, _)| {
            Statement::Preference(PreferenceStatement {
                number: 0,
                name,
                kind,
                elements,
                body,
            })
        },
    )(input)
}

/// `(name) : body.`
fn optimize_statement(input: Input) -> IResult<Input, Statement> {
    map(
        tuple((delimited(lparen, term, rparen), opt(body), end)),
        |(name, body, _)| Statement::Optimize(OptimizeStatement { name, body }),
    )(input)
}

fn statement(input: Input) -> IResult<Input, Statement> {
    alt((
        preceded(preference, cut(preference_statement)),
        preceded(optimize, cut(optimize_statement)),
    ))(input)
}

#[cfg(test)]
mod test {
    use crate::*;

    use super::*;

    /// Lex `source`, then run `parser` over all of its tokens.
    fn parse_with<O>(
        source: &str,
        mut parser: impl FnMut(Input) -> IResult<Input, O>,
    ) -> Option<O> {
        let (_, tokens) = StatementLexer::lex(source).ok()?;
        let input = Tokens::new(&tokens);
        let (rest, output) = parser(input).ok()?;
        (rest.tok.len() == 1 && rest.tok[0].token == StatementToken::Dot).then_some(output)
    }

    fn term_str(source: &str) -> Option<String> {
        parse_with(&format!("{source}."), term).map(|t| t.to_string())
    }

    fn formula_str(source: &str) -> Option<String> {
        parse_with(&format!("{source}."), formula).map(|f| f.to_string())
    }

    fn statement_str(source: &str) -> Option<Statement> {
        let (_, tokens) = StatementLexer::lex(source).ok()?;
        let (_, statement) = StatementParser::parse(Tokens::new(&tokens)).ok()?;
        Some(statement)
    }

    fn x() -> Term {
        var!(X)
    }

    #[test]
    fn arithmetic() {
        assert_eq!(
            parse_with("1+2*3.", term),
            Some(Term::binary_operation(
                num!(1),
                BinOp::Add,
                Term::binary_operation(num!(2), BinOp::Mul, num!(3))
            ))
        );
        assert_eq!(
            parse_with("1-2-3.", term),
            Some(Term::binary_operation(
                Term::binary_operation(num!(1), BinOp::Sub, num!(2)),
                BinOp::Sub,
                num!(3)
            )),
            "left associative"
        );
        assert_eq!(
            parse_with("2**3**X.", term),
            Some(Term::binary_operation(
                num!(2),
                BinOp::Pow,
                Term::binary_operation(num!(3), BinOp::Pow, x())
            )),
            "right associative"
        );
        assert_eq!(
            parse_with("1..X+1.", term),
            Some(Term::interval(
                num!(1),
                Term::binary_operation(x(), BinOp::Add, num!(1))
            ))
        );
    }

    #[test]
    fn terms_render() {
        assert_eq!(term_str("f(X, g(1;2), \"s\")").as_deref(), Some("f(X,g(1;2),\"s\")"));
        assert_eq!(term_str("|X - 1| \\ 2").as_deref(), Some("|X-1|\\2"));
        assert_eq!(term_str("-X ^ ~Y ? 3").as_deref(), Some("-X^~Y?3"));
        assert_eq!(term_str("(1, X)").as_deref(), Some("(1,X)"));
        assert_eq!(term_str("(X,)").as_deref(), Some("(X,)"));
        assert_eq!(term_str("@f(X, _)").as_deref(), Some("@f(X,_)"));
        assert_eq!(term_str("#inf").as_deref(), Some("#inf"));
        assert_eq!(term_str("p()").as_deref(), Some("p()"));
        assert_eq!(term_str("f(").as_deref(), None);
    }

    #[test]
    fn formulas() {
        assert_eq!(
            parse_with("a & not b | c.", formula),
            Some(bf_or!(
                bf_and!(leaf!(atom!(a)), bf_not!(leaf!(atom!(b)))),
                leaf!(atom!(c))
            ))
        );
        assert_eq!(
            parse_with("a & b & c.", formula),
            Some(bf_and!(
                bf_and!(leaf!(atom!(a)), leaf!(atom!(b))),
                leaf!(atom!(c))
            ))
        );
        assert_eq!(
            parse_with("not (a | -b(X)).", formula),
            Some(bf_not!(bf_or!(leaf!(atom!(a)), leaf!(atom!(-b(x()))))))
        );
        assert_eq!(formula_str("X < Y | #false").as_deref(), Some("X<Y | #false"));
        assert_eq!(formula_str("not not a").as_deref(), Some("not not a"));
        assert_eq!(formula_str("(X) != 2").as_deref(), Some("(X)!=2"));
        assert_eq!(formula_str("(a)"), None, "parenthesized atom");
    }

    #[test]
    fn weighted_bodies() {
        assert_eq!(
            parse_with("X :: a(X).", weighted_body),
            Some(wbody!([x()] :: formulas!(leaf!(atom!(a(x()))))))
        );
        assert_eq!(
            parse_with("1, X :: .", weighted_body),
            Some(wbody!([num!(1), x()] :: Condition::default()))
        );
        assert_eq!(
            parse_with("**p(1).", weighted_body),
            Some(wbody!(Condition::Naming(app!(p(num!(1))))))
        );
        assert_eq!(
            parse_with("a, b | c.", weighted_body),
            Some(wbody!(formulas!(
                leaf!(atom!(a)),
                bf_or!(leaf!(atom!(b)), leaf!(atom!(c)))
            )))
        );
    }

    #[test]
    fn element_structure() {
        let e = parse_with("{a; b} >> c || X :: d(X) : e, not f.", element).expect("element");
        assert_eq!(e.sets.len(), 2);
        assert_eq!(e.condition.len(), 1);
        assert_eq!(
            e.body,
            Some(vec![Literal::Positive(atom!(e)), Literal::Negative(atom!(f))])
        );
        assert_eq!(e.variables, vec![sym!(X)]);
        assert_eq!(e.to_string(), "{ a; b } >> { c } || { X :: d(X) } : e, not f");
    }

    #[test]
    fn body_literals() {
        assert_eq!(
            parse_with(": not not a, X < 2, #true.", body),
            Some(vec![
                Literal::DoubleNegative(atom!(a)),
                Literal::Positive(cmp!(x(), Lt, num!(2))),
                Literal::Positive(ExtendedAtom::True),
            ])
        );
    }

    #[test]
    fn preference_statements() {
        let s = statement_str("#preference(p, less(weight)) { X :: a(X); b } : dom.")
            .expect("preference");
        let Statement::Preference(p) = &s else {
            panic!("expected a preference statement");
        };
        assert_eq!(p.name, name!(p));
        assert_eq!(p.kind, Term::Function(app!(less(name!(weight)))));
        assert_eq!(p.elements.len(), 2);
        assert_eq!(p.body, Some(vec![Literal::Positive(atom!(dom))]));
        assert_eq!(
            s.to_string(),
            "#preference(p,less(weight)) { { X :: a(X) }; { b } } : dom."
        );
        assert!(statement_str("#preference(p, aso) { }.").is_some());
        assert!(statement_str("#preference(p, aso) { a; }.").is_none());
        assert!(statement_str("#preference(p, aso) { ; }.").is_none());
        assert!(statement_str("#preference(p, aso) { a;; b }.").is_none());
        assert!(statement_str("#preference(p, aso) { a >> }.").is_none());
        assert!(statement_str("#preference(p) { a }.").is_none());
    }

    #[test]
    fn optimize_statements() {
        assert_eq!(
            statement_str("#optimize(p)."),
            Some(Statement::Optimize(OptimizeStatement {
                name: name!(p),
                body: None
            }))
        );
        assert_eq!(
            statement_str("#optimize(p) : q, not r.").map(|s| s.to_string()),
            Some(String::from("#optimize(p) : q, not r."))
        );
        assert!(statement_str("#optimize(p) q.").is_none());
    }
}
