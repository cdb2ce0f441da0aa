//! A program is the ordered sequence of passthrough code and statements
//! scanned from one or more inputs, assembled into one output text.

use std::fmt;

use prefer_syntax::{Scanner, Segment, Statement, SyntaxError};
use prefer_tracer::{trace, Trace};

use crate::emit::Emitter;
use crate::Namespace;

/// Closes the previous input's scope between files.
const SECTION: &str = "\n#program base.\n";

/// The satisfiability axioms for reified boolean formulas,
/// with `_` standing for the namespace prefix.
const AXIOMS: &str = "
_sat(and(X,Y)) :- _sat(X), _sat(Y), _bf(and(X,Y)).
_sat(or (X,Y)) :- _sat(X),          _bf(or (X,Y)).
_sat(or (X,Y)) :- _sat(Y),          _bf(or (X,Y)).
_sat(neg(X  )) :- not _sat(X),      _bf(neg(X  )).
_bf(X) :- _bf(and(X,Y)).
_bf(Y) :- _bf(and(X,Y)).
_bf(X) :- _bf(or (X,Y)).
_bf(Y) :- _bf(or (X,Y)).
_bf(X) :- _bf(neg(X  )).
_true.
";

/// The axioms under a given namespace.
pub fn axioms(ns: &Namespace) -> String {
    AXIOMS.replace('_', ns.prefix())
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program {
    segments: Vec<Segment>,
    preferences: usize,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Append a segment. Preference statements are numbered
    /// in order of appearance, from 1.
    pub fn push(&mut self, segment: Segment) {
        let segment = match segment {
            Segment::Statement(Statement::Preference(mut s)) => {
                self.preferences += 1;
                s.number = self.preferences;
                Segment::Statement(Statement::Preference(s))
            }
            segment => segment,
        };
        self.segments.push(segment);
    }

    /// Scan a source text and append its segments. Nothing is
    /// appended if the text has a syntax error.
    pub fn scan(&mut self, text: &str, trace: Trace) -> Result<(), SyntaxError> {
        let segments = Scanner::new(text).collect::<Result<Vec<_>, _>>()?;
        for segment in segments {
            match &segment {
                Segment::Code(code) => trace!(trace, Scan, "Passing through {} bytes", code.len()),
                Segment::Statement(s) => trace!(trace, Parse, "Parsed statement: {s}"),
            }
            self.push(segment);
        }
        Ok(())
    }

    /// Start a new program section, as between input files.
    pub fn section(&mut self) {
        self.push(Segment::Code(String::from(SECTION)));
    }

    /// Concatenate the code and the emitted statements, then the
    /// axioms if any statement reified a compound formula.
    pub fn assemble(&self, ns: &Namespace, trace: Trace) -> String {
        let mut emitter = Emitter::new(ns, trace);
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Code(code) => out += code,
                Segment::Statement(s) => out += &emitter.statement(s),
            }
        }
        if emitter.uses_formulas() {
            trace!(trace, Emit, "Appending satisfiability axioms");
            out += &axioms(ns);
        }
        out
    }
}

impl fmt::Display for Program {
    /// The program as scanned, statements in surface syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Code(code) => f.write_str(code)?,
                Segment::Statement(s) => s.fmt(f)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scan(text: &str) -> Program {
        let mut program = Program::new();
        program.scan(text, Trace::none()).expect("scannable");
        program
    }

    #[test]
    fn numbering() {
        let mut program = scan("#preference(p,aso) { a }. #optimize(p).");
        program.section();
        program.scan("#preference(q,aso) { b }.", Trace::none()).expect("scannable");
        let numbers = program
            .segments()
            .iter()
            .filter_map(|s| match s {
                Segment::Statement(Statement::Preference(p)) => Some(p.number),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn sections() {
        let mut program = scan("a.");
        program.section();
        program.scan("b.", Trace::none()).expect("scannable");
        assert_eq!(
            program.assemble(&Namespace::new(1), Trace::none()),
            "a.\n#program base.\nb."
        );
    }

    #[test]
    fn syntax_errors_append_nothing() {
        let mut program = scan("a.\n");
        assert!(program.scan("b. #optimize(p", Trace::none()).is_err());
        assert_eq!(program.segments().len(), 1);
    }

    #[test]
    fn display_round_trips_code() {
        let program = scan("a. % #optimize\n#optimize( p ) : q.\n");
        assert_eq!(program.to_string(), "a. % #optimize\n#optimize(p) : q.\n");
    }

    #[test]
    fn axioms_take_the_prefix() {
        let text = axioms(&Namespace::new(2));
        assert!(text.starts_with("\n__sat(and(X,Y)) :- __sat(X), __sat(Y), __bf(and(X,Y)).\n"));
        assert!(text.ends_with("\n__true.\n"));
        assert_eq!(axioms(&Namespace::new(0)).lines().last(), Some("true."));
    }
}
