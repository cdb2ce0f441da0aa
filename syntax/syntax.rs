//! Syntactic elements of preference specifications.
//!
//! A specification is an ordinary logic program interleaved with
//! `#preference` and `#optimize` statements. The statements are built
//! from the terms, atoms, and comparisons of the host language, plus
//! _boolean formulas_ over them and _weighted bodies_ that group those
//! formulas into the ranked sets of a preference element. The scanner
//! splits an input into passthrough code and parsed statements; the
//! translator gives the statements their meaning.

mod collectors;
mod error;
mod lexer;
mod parser;
mod scanner;
mod statement;
mod tokens;
mod visit;

use std::fmt;

pub use collectors::IsGround;
pub use error::{SyntaxError, SyntaxErrorKind};
pub use lexer::{Lex, Token};
pub use parser::Parse;
pub use scanner::{Scanner, Segment};
pub use statement::{StatementLexer, StatementParser, StatementToken};
pub use tokens::Tokens;
pub use visit::*;

use collectors::{NameCollector, PredicateCollector, VariableCollector};

/// Uninterpreted element that names itself, a predicate, or a variable.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: String) -> Self {
        Symbol(name)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Variables start with an upper-case letter,
    /// possibly after some underscores.
    pub fn is_variable(&self) -> bool {
        self.0
            .trim_start_matches('_')
            .chars()
            .next()
            .is_some_and(char::is_uppercase)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(String::from(s))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uninterpreted element that represents itself.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Constant {
    Name(Symbol),
    Number(i64),
    /// The raw contents of a string literal, escapes intact.
    String(String),
    Infimum,
    Supremum,
}

impl From<&str> for Constant {
    fn from(s: &str) -> Self {
        Self::Name(Symbol::from(s))
    }
}

impl From<Symbol> for Constant {
    fn from(s: Symbol) -> Self {
        Self::Name(s)
    }
}

impl From<i64> for Constant {
    fn from(i: i64) -> Self {
        Self::Number(i)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(s) => s.fmt(f),
            Self::Number(i) => i.fmt(f),
            Self::String(s) => f.write_fmt(format_args!("\"{s}\"")),
            Self::Infimum => f.write_str("#inf"),
            Self::Supremum => f.write_str("#sup"),
        }
    }
}

/// Arithmetic relational operators: equal, not equal, less than,
/// greater than, less than or equal to, greater than or equal to.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Leq,
    Geq,
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RelOp::*;
        f.write_str(match self {
            Eq => "=",
            Ne => "!=",
            Lt => "<",
            Gt => ">",
            Leq => "<=",
            Geq => ">=",
        })
    }
}

/// Unary (prefix) operations: absolute value, numeric negation,
/// and bitwise complement.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum UnaryOp {
    Abs,
    Neg,
    Not,
}

/// [Pratt style](https://en.wikipedia.org/wiki/Operator-precedence_parser#Pratt_parsing)
/// precedence levels for terms, loosest first.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    Interval,
    Xor,
    Or,
    Additive,
    Multiplicative,
    Exponentiation,
}

impl Precedence {
    fn is_right_assoc(&self) -> bool {
        matches!(self, Precedence::Exponentiation)
    }
}

/// Binary (infix) arithmetic operations: bitwise exclusive or (`^`),
/// bitwise or (`?`), addition, subtraction, multiplication, division,
/// modulo (`\`), and exponentiation (`**`).
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum BinOp {
    Xor,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinOp::*;
        f.write_str(match self {
            Xor => "^",
            Or => "?",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "\\",
            Pow => "**",
        })
    }
}

/// One `;`-separated alternative of a parenthesized tuple term.
/// A trailing comma makes `(t,)` a one-element tuple.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Tuple {
    pub elements: Vec<Term>,
    pub trailing_comma: bool,
}

impl Tuple {
    pub fn new(elements: impl IntoIterator<Item = Term>, trailing_comma: bool) -> Self {
        Self {
            elements: elements.into_iter().collect(),
            trailing_comma,
        }
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.elements, ","))?;
        if self.trailing_comma {
            f.write_str(",")?;
        }
        Ok(())
    }
}

/// Interpreted element of the host language. Terms are compared by
/// structure but only ever reproduced through their textual rendering,
/// which contains no whitespace (e.g., `1+X`, `f(X..Y)`).
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Term {
    Constant(Constant),
    Variable(Symbol),
    Anonymous,
    Function(Application<Term>),
    /// A call to an external function: `@f(..)`.
    External(Application<Term>),
    Tuple(Vec<Tuple>),
    Interval(Box<Term>, Box<Term>),
    UnaryOperation(UnaryOp, Box<Term>),
    BinaryOperation(Box<Term>, BinOp, Box<Term>),
}

impl Term {
    /// Boxing constructor.
    pub fn interval(x: Term, y: Term) -> Self {
        Self::Interval(Box::new(x), Box::new(y))
    }

    /// Boxing constructor.
    pub fn unary_operation(op: UnaryOp, x: Term) -> Self {
        Self::UnaryOperation(op, Box::new(x))
    }

    /// Boxing constructor.
    pub fn binary_operation(x: Term, op: BinOp, y: Term) -> Self {
        Self::BinaryOperation(Box::new(x), op, Box::new(y))
    }
}

impl<T: Into<Constant>> From<T> for Term {
    fn from(t: T) -> Self {
        Self::Constant(t.into())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Term::*;
        use UnaryOp::*;
        match self {
            Constant(x) => x.fmt(f),
            Variable(x) => x.fmt(f),
            Anonymous => f.write_str("_"),
            Function(x) => x.fmt(f),
            External(x) => f.write_fmt(format_args!("@{x}")),
            Tuple(x) => f.write_fmt(format_args!("({})", join(x, ";"))),
            Interval(x, y) => f.write_fmt(format_args!("{x}..{y}")),
            UnaryOperation(Abs, x) => f.write_fmt(format_args!("|{x}|")),
            UnaryOperation(Neg, x) => f.write_fmt(format_args!("-{x}")),
            UnaryOperation(Not, x) => f.write_fmt(format_args!("~{x}")),
            BinaryOperation(x, op, y) => f.write_fmt(format_args!("{x}{op}{y}")),
        }
    }
}

/// A symbol applied to `;`-separated pools of `,`-separated arguments.
/// No pools at all means no parentheses: `p` rather than `p()`.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Application<T> {
    pub predicate: Symbol,
    pub arguments: Vec<Vec<T>>,
}

impl<T> Application<T> {
    pub fn new(predicate: Symbol, arguments: impl IntoIterator<Item = Vec<T>>) -> Self {
        Self {
            predicate,
            arguments: arguments.into_iter().collect(),
        }
    }
}

impl<T> fmt::Display for Application<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Application {
            predicate,
            arguments,
        } = self;
        if arguments.is_empty() {
            predicate.fmt(f)
        } else {
            f.write_fmt(format_args!(
                "{}({})",
                predicate,
                arguments
                    .iter()
                    .map(|pool| join(pool, ","))
                    .collect::<Vec<_>>()
                    .join(";")
            ))
        }
    }
}

/// A predicate application, possibly classically (strongly) negated
/// with a leading `-`.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Atom {
    pub classical: bool,
    pub application: Application<Term>,
}

impl Atom {
    pub fn new(application: Application<Term>) -> Self {
        Self {
            classical: false,
            application,
        }
    }

    pub fn classical(application: Application<Term>) -> Self {
        Self {
            classical: true,
            application,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.classical {
            f.write_str("-")?;
        }
        self.application.fmt(f)
    }
}

/// The leaves of boolean formulas: the two boolean constants,
/// an atom, or a comparison between two terms.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ExtendedAtom {
    True,
    False,
    Atom(Atom),
    Comparison(Box<Term>, RelOp, Box<Term>),
}

impl ExtendedAtom {
    /// Boxing constructor.
    pub fn comparison(x: Term, op: RelOp, y: Term) -> Self {
        Self::Comparison(Box::new(x), op, Box::new(y))
    }
}

impl From<Atom> for ExtendedAtom {
    fn from(atom: Atom) -> Self {
        Self::Atom(atom)
    }
}

impl fmt::Display for ExtendedAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => f.write_str("#true"),
            Self::False => f.write_str("#false"),
            Self::Atom(atom) => atom.fmt(f),
            Self::Comparison(x, op, y) => f.write_fmt(format_args!("{x}{op}{y}")),
        }
    }
}

/// An extended atom or its single or double negation as failure.
/// Statement and element bodies are conjunctions of these.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Literal {
    Positive(ExtendedAtom),
    Negative(ExtendedAtom),
    DoubleNegative(ExtendedAtom),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Literal::*;
        match self {
            Positive(atom) => atom.fmt(f),
            Negative(atom) => f.write_fmt(format_args!("not {atom}")),
            DoubleNegative(atom) => f.write_fmt(format_args!("not not {atom}")),
        }
    }
}

/// A conjunction of literals guarding a statement or an element.
pub type Body = Vec<Literal>;

/// Render a body as the comma-separated literals of a rule body.
pub fn format_body(body: &[Literal]) -> String {
    body.iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Negation (`not`), conjunction (`&`), and disjunction (`|`)
/// over extended atoms.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum BooleanFormula {
    Atom(ExtendedAtom),
    Neg(Box<BooleanFormula>),
    And(Box<BooleanFormula>, Box<BooleanFormula>),
    Or(Box<BooleanFormula>, Box<BooleanFormula>),
}

impl BooleanFormula {
    /// Boxing constructor.
    pub fn neg(f: BooleanFormula) -> Self {
        Self::Neg(Box::new(f))
    }

    /// Boxing constructor.
    pub fn and(f: BooleanFormula, g: BooleanFormula) -> Self {
        Self::And(Box::new(f), Box::new(g))
    }

    /// Boxing constructor.
    pub fn or(f: BooleanFormula, g: BooleanFormula) -> Self {
        Self::Or(Box::new(f), Box::new(g))
    }

    /// Is this a bare (unnegated, unparenthesizable) atom?
    pub fn is_atom(&self) -> bool {
        matches!(self, Self::Atom(ExtendedAtom::Atom(_)))
    }
}

impl From<ExtendedAtom> for BooleanFormula {
    fn from(atom: ExtendedAtom) -> Self {
        Self::Atom(atom)
    }
}

impl fmt::Display for BooleanFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn operand(f: &BooleanFormula) -> String {
            match f {
                BooleanFormula::And(..) | BooleanFormula::Or(..) => format!("({f})"),
                _ => f.to_string(),
            }
        }
        match self {
            Self::Atom(atom) => atom.fmt(f),
            Self::Neg(x) => f.write_fmt(format_args!("not {}", operand(x))),
            Self::And(x, y) => f.write_fmt(format_args!("{} & {}", operand(x), operand(y))),
            Self::Or(x, y) => f.write_fmt(format_args!("{} | {}", operand(x), operand(y))),
        }
    }
}

/// The right-hand side of a weighted body: either a conjunction of
/// boolean formulas, or a reference (`**name`) to another statement.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Condition {
    Formulas(Vec<BooleanFormula>),
    Naming(Application<Term>),
}

impl Default for Condition {
    /// A missing right-hand side means `#true`.
    fn default() -> Self {
        Self::Formulas(vec![BooleanFormula::Atom(ExtendedAtom::True)])
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Formulas(formulas) => f.write_str(&join(formulas, ", ")),
            Self::Naming(name) => f.write_fmt(format_args!("**{name}")),
        }
    }
}

/// One alternative within a set of a preference element: an optional
/// weight (a term vector) and a condition.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct WeightedBody {
    pub weight: Option<Vec<Term>>,
    pub condition: Condition,
}

impl WeightedBody {
    pub fn new(weight: Option<Vec<Term>>, condition: Condition) -> Self {
        Self { weight, condition }
    }
}

impl fmt::Display for WeightedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.weight {
            Some(weight) => f.write_fmt(format_args!("{} :: {}", join(weight, ","), self.condition)),
            None => self.condition.fmt(f),
        }
    }
}

/// One clause of a preference statement: a hierarchy of sets
/// `S1 >> S2 >> ..`, an optional condition set `|| S0`, and an optional
/// body `: B`. The variables, predicates, and naming references of the
/// sets are collected once, when the element is built.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Element {
    pub sets: Vec<Vec<WeightedBody>>,
    pub condition: Vec<WeightedBody>,
    pub body: Option<Body>,
    pub variables: Vec<Symbol>,
    pub predicates: Vec<Atom>,
    pub names: Vec<Application<Term>>,
}

impl Element {
    /// The weighted bodies of all sets followed by the condition set.
    pub fn weighted_bodies(&self) -> impl Iterator<Item = &WeightedBody> {
        self.sets.iter().flatten().chain(self.condition.iter())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn set(bodies: &[WeightedBody]) -> String {
            format!("{{ {} }}", join(bodies, "; "))
        }
        f.write_str(
            &self
                .sets
                .iter()
                .map(|s| set(s))
                .collect::<Vec<_>>()
                .join(" >> "),
        )?;
        if !self.condition.is_empty() {
            f.write_fmt(format_args!(" || {}", set(&self.condition)))?;
        }
        if let Some(body) = &self.body {
            f.write_fmt(format_args!(" : {}", format_body(body)))?;
        }
        Ok(())
    }
}

/// Accumulates the sets of one element while it is being parsed.
#[derive(Clone, Debug, Default)]
pub struct ElementBuilder {
    sets: Vec<Vec<WeightedBody>>,
    condition: Vec<WeightedBody>,
    body: Option<Body>,
}

impl ElementBuilder {
    pub fn new(head: Vec<WeightedBody>) -> Self {
        Self {
            sets: vec![head],
            ..Self::default()
        }
    }

    /// Add the next (lower-ranked) set of the hierarchy.
    pub fn set(mut self, set: Vec<WeightedBody>) -> Self {
        self.sets.push(set);
        self
    }

    pub fn condition(mut self, condition: Vec<WeightedBody>) -> Self {
        self.condition = condition;
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Finish the element, collecting what its sets mention.
    pub fn build(self) -> Element {
        let mut element = Element {
            sets: self.sets,
            condition: self.condition,
            body: self.body,
            variables: Vec::new(),
            predicates: Vec::new(),
            names: Vec::new(),
        };
        let mut variables = VariableCollector::default();
        let mut predicates = PredicateCollector::default();
        let mut names = NameCollector::default();
        for body in element.weighted_bodies() {
            variables.visit_weighted_body(body);
            predicates.visit_weighted_body(body);
            names.visit_weighted_body(body);
        }
        element.variables = variables.into_inner();
        element.predicates = predicates.into_inner();
        element.names = names.into_inner();
        element
    }
}

/// `#preference(name, kind) { elements } : body.`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PreferenceStatement {
    /// Position among the preference statements of a run, from 1.
    pub number: usize,
    pub name: Term,
    pub kind: Term,
    pub elements: Vec<Element>,
    pub body: Option<Body>,
}

/// `#optimize(name) : body.`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OptimizeStatement {
    pub name: Term,
    pub body: Option<Body>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Statement {
    Preference(PreferenceStatement),
    Optimize(OptimizeStatement),
}

impl Statement {
    pub fn body(&self) -> Option<&Body> {
        match self {
            Self::Preference(s) => s.body.as_ref(),
            Self::Optimize(s) => s.body.as_ref(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preference(s) => f.write_fmt(format_args!(
                "#preference({},{}) {{ {} }}",
                s.name,
                s.kind,
                join(&s.elements, "; ")
            ))?,
            Self::Optimize(s) => f.write_fmt(format_args!("#optimize({})", s.name))?,
        }
        if let Some(body) = self.body() {
            f.write_fmt(format_args!(" : {}", format_body(body)))?;
        }
        f.write_str(".")
    }
}

fn join<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

/// These constructor macros can make tests involving syntactic elements
/// much more readable. They are *not* intended as a public interface, and
/// *should* be behind `#[cfg(test)]`, but [cargo can't currently export
/// test code across crates](https://github.com/rust-lang/cargo/issues/8379).
#[cfg(any(test, feature = "macros"))]
mod macros {
    #[macro_export]
    macro_rules! sym {
        ($name: ident) => {
            Symbol::from(stringify!($name))
        };
    }

    #[macro_export]
    macro_rules! var {
        ($name: ident) => {
            Term::Variable(sym!($name))
        };
    }

    #[macro_export]
    macro_rules! name {
        ($name: ident) => {
            Term::Constant(Constant::Name(sym!($name)))
        };
    }

    #[macro_export]
    macro_rules! num {
        ($n: literal) => {
            Term::Constant(Constant::Number($n))
        };
    }

    #[macro_export]
    macro_rules! app {
        ($pred: ident) => {
            Application::new(sym!($pred), [])
        };
        ($pred: ident($($arg: expr),*)) => {
            Application::new(sym!($pred), [vec![$($arg),*]])
        };
    }

    #[macro_export]
    macro_rules! atom {
        (-$pred: ident $(($($arg: expr),*))?) => {
            ExtendedAtom::Atom(Atom::classical(app!($pred $(($($arg),*))?)))
        };
        ($pred: ident $(($($arg: expr),*))?) => {
            ExtendedAtom::Atom(Atom::new(app!($pred $(($($arg),*))?)))
        };
    }

    #[macro_export]
    macro_rules! cmp {
        ($l: expr, $op: ident, $r: expr) => {
            ExtendedAtom::comparison($l, RelOp::$op, $r)
        };
    }

    #[macro_export]
    macro_rules! leaf {
        ($atom: expr) => {
            BooleanFormula::Atom($atom)
        };
    }

    #[macro_export]
    macro_rules! bf_not {
        ($f: expr) => {
            BooleanFormula::neg($f)
        };
    }

    #[macro_export]
    macro_rules! bf_and {
        ($f: expr, $g: expr) => {
            BooleanFormula::and($f, $g)
        };
    }

    #[macro_export]
    macro_rules! bf_or {
        ($f: expr, $g: expr) => {
            BooleanFormula::or($f, $g)
        };
    }

    #[macro_export]
    macro_rules! formulas {
        ($($f: expr),+ $(,)?) => {
            Condition::Formulas(vec![$($f),+])
        };
    }

    #[macro_export]
    macro_rules! wbody {
        ([$($w: expr),+] :: $cond: expr) => {
            WeightedBody::new(Some(vec![$($w),+]), $cond)
        };
        ($cond: expr) => {
            WeightedBody::new(None, $cond)
        };
    }
}
