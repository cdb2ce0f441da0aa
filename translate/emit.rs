//! Serialize statements as facts and rules.

use prefer_syntax::{
    format_body, Element, IsGround as _, OptimizeStatement, PreferenceStatement, Statement,
    WeightedBody,
};
use prefer_tracer::{trace, Trace};

use crate::reify::Reification;
use crate::Namespace;

/// Domain atoms for the distinct non-ground atoms of an element,
/// which the element collected from its sets and condition set.
pub fn domain_guard(element: &Element, ns: &Namespace) -> Vec<String> {
    element
        .predicates
        .iter()
        .filter(|atom| !atom.is_ground())
        .map(|atom| format!("{}({atom})", ns.name("dom")))
        .collect()
}

/// Join the non-empty parts of a rule body.
fn conjoin<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn arrow(guard: &str) -> String {
    if guard.is_empty() {
        String::new()
    } else {
        format!(" :- {guard}")
    }
}

/// Turns statements into text under one namespace, noting whether
/// any of them needs the satisfiability axioms.
pub struct Emitter<'a> {
    ns: &'a Namespace,
    trace: Trace,
    formulas: bool,
}

impl<'a> Emitter<'a> {
    pub fn new(ns: &'a Namespace, trace: Trace) -> Self {
        Self {
            ns,
            trace,
            formulas: false,
        }
    }

    /// Has any emitted body asserted a compound boolean formula?
    pub fn uses_formulas(&self) -> bool {
        self.formulas
    }

    pub fn statement(&mut self, statement: &Statement) -> String {
        let text = match statement {
            Statement::Preference(s) => self.preference(s),
            Statement::Optimize(s) => self.optimize(s),
        };
        trace!(self.trace, Emit, "Emitted {statement} as:\n{text}");
        text
    }

    fn optimize(&self, s: &OptimizeStatement) -> String {
        let body = s.body.as_deref().map(format_body).unwrap_or_default();
        format!("{}({}){}.\n", self.ns.name("optimize"), s.name, arrow(&body))
    }

    fn preference(&mut self, s: &PreferenceStatement) -> String {
        let body = s.body.as_deref().map(format_body).unwrap_or_default();
        let mut out = format!(
            "{}({},{}){}.\n",
            self.ns.name("preference"),
            s.name,
            s.kind,
            arrow(&body)
        );
        for (index, element) in s.elements.iter().enumerate() {
            out += &self.element(s, index + 1, element, &body);
        }
        out
    }

    fn element(
        &mut self,
        s: &PreferenceStatement,
        index: usize,
        element: &Element,
        statement_body: &str,
    ) -> String {
        let guard = match &element.body {
            Some(body) => format_body(body),
            None => domain_guard(element, self.ns).join(", "),
        };
        let guard = conjoin([guard.as_str(), statement_body]);
        let variables = element
            .variables
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let fact = |set: usize, body: &Reification<'_>| {
            format!(
                "{}({},(({},{}),({})),{},{},{}){}.\n",
                self.ns.name("preference"),
                s.name,
                s.number,
                index,
                variables,
                set,
                body.body_term(),
                body.weight_term(),
                arrow(&guard)
            )
        };

        let mut out = String::new();
        let mut formulas = false;
        for (set, bodies) in element.sets.iter().enumerate() {
            for body in bodies {
                let r = self.reify(body);
                out += &fact(set + 1, &r);
                out += &r.holds(&guard);
                out += &r.bf(&guard);
                out += &r.sat(&guard);
                out += "\n";
                formulas |= r.is_compound();
            }
        }
        for body in &element.condition {
            let r = self.reify(body);
            out += &fact(0, &r);
            out += "\n";
        }
        self.formulas |= formulas;
        out
    }

    fn reify<'b>(&'b self, body: &'b WeightedBody) -> Reification<'b> {
        let r = Reification::new(body, self.ns);
        trace!(self.trace, Reify, "Reified {body} as {}", r.body_term());
        r
    }
}

#[cfg(test)]
mod test {
    use prefer_syntax::*;

    use super::*;

    fn element() -> Element {
        ElementBuilder::new(vec![
            wbody!(formulas!(leaf!(atom!(a(var!(X)))), leaf!(atom!(b)))),
            wbody!(formulas!(leaf!(atom!(a(var!(X)))))),
        ])
        .condition(vec![wbody!(formulas!(leaf!(atom!(c(Term::Anonymous)))))])
        .build()
    }

    #[test]
    fn domain_guards() {
        let ns = Namespace::new(2);
        assert_eq!(domain_guard(&element(), &ns), vec!["__dom(a(X))"]);
    }

    #[test]
    fn optimize() {
        let ns = Namespace::new(1);
        let mut emitter = Emitter::new(&ns, Trace::none());
        let s = Statement::Optimize(OptimizeStatement {
            name: name!(x),
            body: None,
        });
        assert_eq!(emitter.statement(&s), "_optimize(x).\n");
        assert!(!emitter.uses_formulas());
    }

    #[test]
    fn guards_conjoin_statement_body() {
        let ns = Namespace::new(1);
        let mut emitter = Emitter::new(&ns, Trace::none());
        let s = Statement::Preference(PreferenceStatement {
            number: 3,
            name: name!(p),
            kind: name!(aso),
            elements: vec![element()],
            body: Some(vec![Literal::Negative(atom!(s))]),
        });
        assert_eq!(
            emitter.statement(&s),
            "_preference(p,aso) :- not s.\n\
             _preference(p,((3,1),(X)),1,for(and(atom(a(X)),atom(b))),()) :- _dom(a(X)), not s.\n\
             _holds(and(atom(a(X)),atom(b)),0) :- a(X), b, _dom(a(X)), not s.\n\
             \n\
             _preference(p,((3,1),(X)),1,for(atom(a(X))),()) :- _dom(a(X)), not s.\n\
             _holds(atom(a(X)),0) :- a(X), _dom(a(X)), not s.\n\
             \n\
             _preference(p,((3,1),(X)),0,for(atom(c(_))),()) :- _dom(a(X)), not s.\n\
             \n"
        );
        assert!(!emitter.uses_formulas());
    }

    #[test]
    fn compound_sets_the_flag() {
        let ns = Namespace::new(1);
        let mut emitter = Emitter::new(&ns, Trace::none());
        let element = ElementBuilder::new(vec![wbody!(formulas!(bf_not!(bf_and!(
            leaf!(atom!(a)),
            leaf!(atom!(b))
        ))))])
        .body(vec![Literal::Positive(atom!(d))])
        .build();
        let s = Statement::Preference(PreferenceStatement {
            number: 1,
            name: name!(p),
            kind: name!(aso),
            elements: vec![element],
            body: None,
        });
        assert_eq!(
            emitter.statement(&s),
            "_preference(p,aso).\n\
             _preference(p,((1,1),()),1,for(neg(and(atom(a),atom(b)))),()) :- d.\n\
             _holds(neg(and(atom(a),atom(b))),0) :- _sat(neg(and(atom(a),atom(b)))), d.\n\
             _bf(neg(and(atom(a),atom(b)))) :- d.\n\
             _sat(atom(a)) :- a, d.\n\
             _sat(atom(b)) :- b, d.\n\
             \n"
        );
        assert!(emitter.uses_formulas());
    }
}
