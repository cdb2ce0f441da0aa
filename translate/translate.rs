//! Translate preference specifications into plain logic programs.
//!
//! Every `#preference` and `#optimize` statement becomes a handful of
//! facts and rules over a few internal predicates (`preference/2`,
//! `preference/5`, `optimize/1`, `holds/2`, `bf/1`, `sat/1`, `dom/1`),
//! whose names carry a configurable prefix of underscores so they
//! can't clash with the user's own. Everything else passes through
//! unchanged.

mod emit;
mod program;
mod reify;

use std::fs::read_to_string;
use std::io;
use std::path::Path;

use thiserror::Error;

use prefer_syntax::SyntaxError;
use prefer_tracer::{trace, Trace};

pub use emit::{domain_guard, Emitter};
pub use program::{axioms, Program};
pub use reify::{reify_extended_atom, Analysis, Reification, Reified};

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("{path}: {source}")]
    SyntaxInFile { path: String, source: SyntaxError },
    #[error("reading {path}: {source}")]
    Io { path: String, source: io::Error },
}

/// Per-run settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// How many underscores prefix the internal names.
    pub underscores: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { underscores: 1 }
    }
}

/// The prefix that sets internal names apart.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    pub fn new(underscores: usize) -> Self {
        Self {
            prefix: "_".repeat(underscores),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// An internal name: `holds` becomes `_holds`.
    pub fn name(&self, base: &str) -> String {
        format!("{}{base}", self.prefix)
    }
}

impl From<Config> for Namespace {
    fn from(config: Config) -> Self {
        Self::new(config.underscores)
    }
}

/// The translation entry points. A translator holds no state between
/// runs, so one may serve many inputs.
#[derive(Clone, Copy)]
pub struct Translator {
    config: Config,
    trace: Trace,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Translator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            trace: Trace::none(),
        }
    }

    pub fn with_trace(self, trace: Trace) -> Self {
        Self { trace, ..self }
    }

    /// Translate one source text.
    pub fn translate_str(&self, text: &str) -> Result<String, TranslateError> {
        let mut program = Program::new();
        program.scan(text, self.trace)?;
        Ok(self.assemble(&program))
    }

    /// Translate several files as one program, each in its own section.
    /// Preference statements are numbered across all of them.
    pub fn translate_files<P: AsRef<Path>>(
        &self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<String, TranslateError> {
        let sources = paths
            .into_iter()
            .map(|path| {
                let path = path.as_ref().display().to_string();
                trace!(self.trace, Scan, "Reading {path}");
                match read_to_string(&path) {
                    Ok(text) => Ok((path, text)),
                    Err(source) => Err(TranslateError::Io { path, source }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.translate_sources(sources)
    }

    /// Translate already-read inputs, given as (name, text) pairs,
    /// as [`translate_files`](Self::translate_files) does.
    pub fn translate_sources<S: AsRef<str>>(
        &self,
        sources: impl IntoIterator<Item = (String, S)>,
    ) -> Result<String, TranslateError> {
        let mut program = Program::new();
        for (i, (path, text)) in sources.into_iter().enumerate() {
            if i > 0 {
                program.section();
            }
            program
                .scan(text.as_ref(), self.trace)
                .map_err(|source| TranslateError::SyntaxInFile { path, source })?;
        }
        Ok(self.assemble(&program))
    }

    fn assemble(&self, program: &Program) -> String {
        program.assemble(&Namespace::from(self.config), self.trace)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn namespaces() {
        assert_eq!(Namespace::new(0).name("sat"), "sat");
        assert_eq!(Namespace::new(3).name("sat"), "___sat");
        assert_eq!(Namespace::from(Config::default()).prefix(), "_");
    }

    #[test]
    fn syntax_errors_carry_positions() {
        let e = Translator::default()
            .translate_str("a.\n#optimize(p) : q")
            .expect_err("unterminated");
        assert_eq!(
            e.to_string(),
            "syntax error at line 2, column 17: statement is not terminated by `.`"
        );
    }

    #[test]
    fn missing_files() {
        let e = Translator::default()
            .translate_files(["/nonexistent/prefer/input.lp"])
            .expect_err("missing");
        assert!(matches!(e, TranslateError::Io { .. }));
        assert!(e.to_string().starts_with("reading /nonexistent/prefer/input.lp: "));
    }

    #[test]
    fn named_sources() {
        let translator = Translator::new(Config { underscores: 0 });
        assert_eq!(
            translator
                .translate_sources([
                    (String::from("a.lp"), "a."),
                    (String::from("<stdin>"), "#optimize(p)."),
                ])
                .expect("translatable"),
            "a.\n#program base.\noptimize(p).\n"
        );
        let e = translator
            .translate_sources([(String::from("<stdin>"), "#optimize(p")])
            .expect_err("unterminated");
        assert_eq!(
            e.to_string(),
            "<stdin>: syntax error at line 1, column 13: statement is not terminated by `.`"
        );
    }
}
