//! Walk a syntax tree, i.e., visit every sub-element.

use super::*;

/// Walk a shared borrow of a syntactic element.
///
/// We follow [the standard Rust visitor
/// pattern](https://rust-unofficial.github.io/patterns/patterns/behavioural/visitor.html).
/// The methods in this trait are hooks to be overridden.
/// By default, they all call out to walker functions that
/// in turn call back into the visitor to continue the walk.
pub trait Visit<'a> {
    fn visit_constant(&mut self, _c: &'a Constant) {}
    fn visit_variable(&mut self, _s: &'a Symbol) {}
    fn visit_term(&mut self, t: &'a Term) {
        visit_term(self, t)
    }
    fn visit_function(&mut self, f: &'a Application<Term>) {
        visit_function(self, f)
    }
    fn visit_atom(&mut self, a: &'a Atom) {
        visit_atom(self, a)
    }
    fn visit_naming_atom(&mut self, n: &'a Application<Term>) {
        visit_function(self, n)
    }
    fn visit_relation(&mut self, l: &'a Term, op: RelOp, r: &'a Term) {
        visit_relation(self, l, op, r)
    }
    fn visit_extended_atom(&mut self, a: &'a ExtendedAtom) {
        visit_extended_atom(self, a)
    }
    fn visit_literal(&mut self, l: &'a Literal) {
        visit_literal(self, l)
    }
    fn visit_formula(&mut self, f: &'a BooleanFormula) {
        visit_formula(self, f)
    }
    fn visit_weighted_body(&mut self, b: &'a WeightedBody) {
        visit_weighted_body(self, b)
    }
}

pub fn visit_term<'a, V: Visit<'a> + ?Sized>(v: &mut V, t: &'a Term) {
    match t {
        Term::Constant(c) => v.visit_constant(c),
        Term::Variable(s) => v.visit_variable(s),
        Term::Anonymous => (),
        Term::Function(f) | Term::External(f) => v.visit_function(f),
        Term::Tuple(tuples) => {
            for t in tuples.iter().flat_map(|tuple| &tuple.elements) {
                v.visit_term(t);
            }
        }
        Term::Interval(x, y) | Term::BinaryOperation(x, _, y) => {
            v.visit_term(x);
            v.visit_term(y);
        }
        Term::UnaryOperation(_, x) => v.visit_term(x),
    }
}

pub fn visit_function<'a, V: Visit<'a> + ?Sized>(v: &mut V, function: &'a Application<Term>) {
    for arg in function.arguments.iter().flatten() {
        v.visit_term(arg);
    }
}

pub fn visit_atom<'a, V: Visit<'a> + ?Sized>(v: &mut V, atom: &'a Atom) {
    visit_function(v, &atom.application)
}

pub fn visit_relation<'a, V: Visit<'a> + ?Sized>(
    v: &mut V,
    left: &'a Term,
    _op: RelOp,
    right: &'a Term,
) {
    v.visit_term(left);
    v.visit_term(right);
}

pub fn visit_extended_atom<'a, V: Visit<'a> + ?Sized>(v: &mut V, atom: &'a ExtendedAtom) {
    match atom {
        ExtendedAtom::True | ExtendedAtom::False => (),
        ExtendedAtom::Atom(a) => v.visit_atom(a),
        ExtendedAtom::Comparison(l, op, r) => v.visit_relation(l, *op, r),
    }
}

pub fn visit_literal<'a, V: Visit<'a> + ?Sized>(v: &mut V, literal: &'a Literal) {
    match literal {
        Literal::Positive(a) | Literal::Negative(a) | Literal::DoubleNegative(a) => {
            v.visit_extended_atom(a)
        }
    }
}

pub fn visit_formula<'a, V: Visit<'a> + ?Sized>(v: &mut V, formula: &'a BooleanFormula) {
    match formula {
        BooleanFormula::Atom(a) => v.visit_extended_atom(a),
        BooleanFormula::Neg(f) => v.visit_formula(f),
        BooleanFormula::And(f, g) | BooleanFormula::Or(f, g) => {
            v.visit_formula(f);
            v.visit_formula(g);
        }
    }
}

pub fn visit_weighted_body<'a, V: Visit<'a> + ?Sized>(v: &mut V, body: &'a WeightedBody) {
    for w in body.weight.iter().flatten() {
        v.visit_term(w);
    }
    match &body.condition {
        Condition::Formulas(formulas) => {
            for f in formulas {
                v.visit_formula(f);
            }
        }
        Condition::Naming(n) => v.visit_naming_atom(n),
    }
}
