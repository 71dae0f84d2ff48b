//! shimmyformula: micro-templating for short, human-readable formulas.
//!
//! A formula is plain text with variable references and conditional
//! blocks, rendered against a small set of string bindings and named
//! alias flags. It is meant for composing notification lines and similar
//! one-liners where parts of the sentence come and go with the data.
//!
//! Supported subset:
//! - Literals.
//! - `$name`: replaced by the value bound to `name`.
//! - `$[ primary ]`: rendered only when every variable directly inside
//!   `primary` is bound; otherwise renders empty.
//! - `$[ primary ## fallback ]`: as above, but renders `fallback` instead
//!   of empty.
//! - `$[:alias: primary ## fallback ]`: additionally requires `alias` to
//!   be activated for `primary` to be considered.
//!
//! Not supported:
//! - Loops, arithmetic, filters or includes.
//! - Dotted or indexed lookups.
//!
//! Resolution is one level deep: a block only looks at its own bare
//! variable references. A nested block that falls back never causes its
//! parent to fall back.
//!
//! Malformed formulas never produce an error. An unterminated `$[` and
//! everything after it is emitted verbatim, as is a `$` that does not
//! start a reference.
//!
//! ```
//! use shimmyformula::Renderer;
//!
//! let mut renderer = Renderer::new();
//! renderer.assign("name", "Stan").unwrap();
//! let out = renderer.execute("Please wait, $name: we're calling $[$other ## another guy]", true, true);
//! assert_eq!(out, "Please wait, Stan: we're calling another guy");
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod postprocess;
pub mod syntax;

pub use ast::{Formula, Node};
pub use error::{FormulaError, Result};
pub use eval::{Evaluator, Rendered, SymbolTable};
pub use syntax::Syntax;

use tracing::debug;

/// Renders formulas against its own bindings.
///
/// Bindings persist across calls until [`Renderer::reset`] or an
/// `execute` with `reset_on_finish` set. Each renderer is independent;
/// nothing is shared between instances.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    syntax: Syntax,
    symbols: SymbolTable,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom delimiters instead of `$`, `[`, `]`, `:` and `##`.
    pub fn with_syntax(syntax: Syntax) -> Self {
        Self {
            syntax,
            symbols: SymbolTable::new(),
        }
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Set or overwrite a variable. Empty names are rejected.
    pub fn assign(&mut self, variable: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.symbols.assign(variable, value)
    }

    /// Assign several variables, stopping at the first empty name.
    pub fn assign_all<I, K, V>(&mut self, bindings: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        bindings
            .into_iter()
            .try_for_each(|(name, value)| self.symbols.assign(name, value))
    }

    /// Set or overwrite an alias flag. Empty names are rejected.
    pub fn activate(&mut self, alias: impl Into<String>, flag: bool) -> Result<()> {
        self.symbols.activate(alias, flag)
    }

    /// Drop every variable and alias flag.
    pub fn reset(&mut self) {
        debug!("resetting formula bindings");
        self.symbols.clear();
    }

    pub fn parse(&self, formula: &str) -> Formula {
        parser::parse(formula, &self.syntax)
    }

    /// Render `formula` without touching the bindings.
    pub fn render(&self, formula: &str, collapse_spaces: bool) -> String {
        let nodes = self.parse(formula);
        // Top level has no fallback, so its verdict is irrelevant.
        let Rendered { text, .. } = Evaluator::new(&self.symbols).render(&nodes);
        postprocess::postprocess(text, collapse_spaces)
    }

    /// Render `formula`, optionally collapsing whitespace, and optionally
    /// clear all bindings afterwards.
    pub fn execute(
        &mut self,
        formula: &str,
        collapse_spaces: bool,
        reset_on_finish: bool,
    ) -> String {
        debug!(formula, collapse_spaces, reset_on_finish, "executing formula");
        let output = self.render(formula, collapse_spaces);
        if reset_on_finish {
            self.reset();
        }
        output
    }
}
