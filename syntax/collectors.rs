//! What an element mentions, collected by [visitors](Visit),
//! and a groundness test.

use super::*;

/// The distinct variables of whatever it visits,
/// in order of first occurrence.
#[derive(Default)]
pub(crate) struct VariableCollector(Vec<Symbol>);

impl VariableCollector {
    pub(crate) fn into_inner(self) -> Vec<Symbol> {
        self.0
    }
}

impl<'a> Visit<'a> for VariableCollector {
    fn visit_variable(&mut self, s: &'a Symbol) {
        if !self.0.contains(s) {
            self.0.push(s.clone());
        }
    }
}

/// The distinct atoms of formulas, not counting naming references.
#[derive(Default)]
pub(crate) struct PredicateCollector(Vec<Atom>);

impl PredicateCollector {
    pub(crate) fn into_inner(self) -> Vec<Atom> {
        self.0
    }
}

impl<'a> Visit<'a> for PredicateCollector {
    fn visit_atom(&mut self, a: &'a Atom) {
        if !self.0.contains(a) {
            self.0.push(a.clone());
        }
    }
}

/// Naming references (`**name`), duplicates included.
#[derive(Default)]
pub(crate) struct NameCollector(Vec<Application<Term>>);

impl NameCollector {
    pub(crate) fn into_inner(self) -> Vec<Application<Term>> {
        self.0
    }
}

impl<'a> Visit<'a> for NameCollector {
    fn visit_naming_atom(&mut self, n: &'a Application<Term>) {
        self.0.push(n.clone());
    }
}

struct ContainsVariableVisitor(bool);

impl<'a> Visit<'a> for ContainsVariableVisitor {
    fn visit_variable(&mut self, _s: &'a Symbol) {
        self.0 = true;
    }
}

/// Determine if an element is variable-free.
/// The anonymous variable `_` does not count.
pub trait IsGround {
    fn is_ground(&self) -> bool;
}

impl IsGround for Atom {
    fn is_ground(&self) -> bool {
        let mut visitor = ContainsVariableVisitor(false);
        visitor.visit_atom(self);
        !visitor.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn f(args: Vec<Term>) -> Term {
        Term::Function(Application::new(Symbol::from("f"), [args]))
    }

    fn p(args: Vec<Term>) -> Atom {
        Atom::new(Application::new(Symbol::from("p"), [args]))
    }

    #[test]
    fn variables_in_order() {
        let x = Term::Variable(Symbol::from("X"));
        let y = Term::Variable(Symbol::from("Y"));
        let t = f(vec![y.clone(), Term::binary_operation(x, BinOp::Add, y)]);
        let mut collector = VariableCollector::default();
        collector.visit_term(&t);
        assert_eq!(collector.into_inner(), vec![Symbol::from("Y"), Symbol::from("X")]);
    }

    #[test]
    fn body_variables() {
        let lt = ExtendedAtom::comparison(
            Term::Variable(Symbol::from("A")),
            RelOp::Lt,
            Term::Constant(Constant::Number(3)),
        );
        let mut collector = VariableCollector::default();
        for l in [Literal::Negative(lt), Literal::Positive(ExtendedAtom::True)] {
            collector.visit_literal(&l);
        }
        assert_eq!(collector.into_inner(), vec![Symbol::from("A")]);
    }

    #[test]
    fn ground_atoms() {
        assert!(!p(vec![Term::Variable(Symbol::from("X"))]).is_ground());
        assert!(p(vec![Term::Anonymous, Term::from("a")]).is_ground());
    }
}
