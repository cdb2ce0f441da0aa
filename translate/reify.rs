//! Reify boolean formulas as terms.
//!
//! A weighted body is a conjunction of boolean formulas. Each formula
//! is either a _literal_ (an extended atom under zero, one, or two
//! negations) or a _compound_ formula. Both reify to a term built from
//! the constructors `atom`, `cmp`, `neg`, `and`, and `or`; the body as
//! a whole reifies to the left-nested conjunction of its formulas.
//!
//! Literals can be tested directly in a rule body. Compound formulas
//! can't, so they are asserted as boolean formulas (`bf/1`) and their
//! satisfaction (`sat/1`) is left to the axiom schema, seeded by one
//! `sat/1` rule per extended atom that occurs inside them.

use std::cell::OnceCell;

use prefer_syntax::{BooleanFormula, Condition, ExtendedAtom, WeightedBody};

use crate::Namespace;

/// Reify an extended atom: its term and its literal text.
pub fn reify_extended_atom(atom: &ExtendedAtom, ns: &Namespace) -> (String, String) {
    match atom {
        ExtendedAtom::True => (format!("atom({})", ns.name("true")), ns.name("true")),
        ExtendedAtom::False => (format!("atom({})", ns.name("false")), ns.name("false")),
        ExtendedAtom::Atom(a) => (format!("atom({a})"), a.to_string()),
        ExtendedAtom::Comparison(x, op, y) => (format!("cmp(\"{op}\",{x},{y})"), format!("{x}{op}{y}")),
    }
}

/// One reified formula.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Reified {
    /// A literal, with the text that tests it in a rule body.
    Literal { term: String, literal: String },
    Compound { term: String },
}

impl Reified {
    pub fn term(&self) -> &str {
        match self {
            Self::Literal { term, .. } | Self::Compound { term } => term,
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, Self::Compound { .. })
    }

    /// The condition under which the formula holds.
    fn antecedent(&self, ns: &Namespace) -> String {
        match self {
            Self::Literal { literal, .. } => literal.clone(),
            Self::Compound { term } => format!("{}({term})", ns.name("sat")),
        }
    }
}

/// Strip up to two negations from an extended atom.
/// Two negations cancel.
fn literal(formula: &BooleanFormula, ns: &Namespace) -> Option<Reified> {
    use BooleanFormula::*;
    let (atom, negated) = match formula {
        Atom(a) => (a, false),
        Neg(f) => match f.as_ref() {
            Atom(a) => (a, true),
            Neg(g) => match g.as_ref() {
                Atom(a) => (a, false),
                _ => return None,
            },
            _ => return None,
        },
        _ => return None,
    };
    let (term, literal) = reify_extended_atom(atom, ns);
    Some(if negated {
        Reified::Literal {
            term: format!("neg({term})"),
            literal: format!("not {literal}"),
        }
    } else {
        Reified::Literal { term, literal }
    })
}

/// Render a compound formula, collecting the distinct extended atoms
/// it mentions in order of first occurrence.
fn compound(
    formula: &BooleanFormula,
    ns: &Namespace,
    atoms: &mut Vec<(String, String)>,
) -> String {
    match formula {
        BooleanFormula::Atom(a) => {
            let reified = reify_extended_atom(a, ns);
            let term = reified.0.clone();
            if !atoms.contains(&reified) {
                atoms.push(reified);
            }
            term
        }
        BooleanFormula::Neg(f) => format!("neg({})", compound(f, ns, atoms)),
        BooleanFormula::And(f, g) => {
            let f = compound(f, ns, atoms);
            let g = compound(g, ns, atoms);
            format!("and({f},{g})")
        }
        BooleanFormula::Or(f, g) => {
            let f = compound(f, ns, atoms);
            let g = compound(g, ns, atoms);
            format!("or({f},{g})")
        }
    }
}

/// The reification of a conjunction of formulas.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Analysis {
    pub formulas: Vec<Reified>,
    pub conjunction: String,
    /// Extended atoms inside compound formulas: (term, literal) pairs.
    pub atoms: Vec<(String, String)>,
}

impl Analysis {
    pub fn new(formulas: &[BooleanFormula], ns: &Namespace) -> Self {
        let mut atoms = Vec::new();
        let formulas = formulas
            .iter()
            .map(|f| {
                literal(f, ns).unwrap_or_else(|| Reified::Compound {
                    term: compound(f, ns, &mut atoms),
                })
            })
            .collect::<Vec<_>>();
        let mut terms = formulas.iter().map(|f| f.term().to_owned());
        let first = terms
            .next()
            .unwrap_or_else(|| reify_extended_atom(&ExtendedAtom::True, ns).0);
        let conjunction = terms.fold(first, |f, g| format!("and({f},{g})"));
        Self {
            formulas,
            conjunction,
            atoms,
        }
    }

    pub fn has_compound(&self) -> bool {
        self.formulas.iter().any(Reified::is_compound)
    }
}

/// `, guard` or nothing.
fn and_guard(guard: &str) -> String {
    if guard.is_empty() {
        String::new()
    } else {
        format!(", {guard}")
    }
}

/// ` :- guard` or nothing.
fn if_guard(guard: &str) -> String {
    if guard.is_empty() {
        String::new()
    } else {
        format!(" :- {guard}")
    }
}

/// The reification of one weighted body, analyzed on first use.
/// Naming bodies have nothing to analyze.
pub struct Reification<'a> {
    body: &'a WeightedBody,
    ns: &'a Namespace,
    analysis: OnceCell<Option<Analysis>>,
}

impl<'a> Reification<'a> {
    pub fn new(body: &'a WeightedBody, ns: &'a Namespace) -> Self {
        Self {
            body,
            ns,
            analysis: OnceCell::new(),
        }
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis
            .get_or_init(|| match &self.body.condition {
                Condition::Formulas(formulas) => Some(Analysis::new(formulas, self.ns)),
                Condition::Naming(_) => None,
            })
            .as_ref()
    }

    pub fn is_compound(&self) -> bool {
        self.analysis().is_some_and(Analysis::has_compound)
    }

    /// `for(Conjunction)` or `name(Atom)`.
    pub fn body_term(&self) -> String {
        match (&self.body.condition, self.analysis()) {
            (Condition::Naming(name), _) => format!("name({name})"),
            (_, Some(analysis)) => format!("for({})", analysis.conjunction),
            (_, None) => String::from("for()"),
        }
    }

    /// A lone weight as is, several as a tuple, none as `()`.
    pub fn weight_term(&self) -> String {
        match self.body.weight.as_deref() {
            None | Some([]) => String::from("()"),
            Some([w]) => w.to_string(),
            Some(ws) => format!(
                "({})",
                ws.iter()
                    .map(|w| w.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            ),
        }
    }

    /// `holds(Conjunction,0) :- antecedents, guard.`
    pub fn holds(&self, guard: &str) -> String {
        let Some(analysis) = self.analysis() else {
            return String::new();
        };
        format!(
            "{}({},0) :- {}{}.\n",
            self.ns.name("holds"),
            analysis.conjunction,
            analysis
                .formulas
                .iter()
                .map(|f| f.antecedent(self.ns))
                .collect::<Vec<_>>()
                .join(", "),
            and_guard(guard),
        )
    }

    /// `bf(Compound) :- guard.` for each compound formula.
    pub fn bf(&self, guard: &str) -> String {
        let Some(analysis) = self.analysis() else {
            return String::new();
        };
        analysis
            .formulas
            .iter()
            .filter(|f| f.is_compound())
            .map(|f| format!("{}({}){}.\n", self.ns.name("bf"), f.term(), if_guard(guard)))
            .collect()
    }

    /// `sat(Atom) :- literal, guard.` for each extended atom
    /// inside a compound formula.
    pub fn sat(&self, guard: &str) -> String {
        let Some(analysis) = self.analysis() else {
            return String::new();
        };
        analysis
            .atoms
            .iter()
            .map(|(term, literal)| {
                format!(
                    "{}({term}) :- {literal}{}.\n",
                    self.ns.name("sat"),
                    and_guard(guard)
                )
            })
            .collect()
    }
}
