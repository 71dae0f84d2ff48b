use crate::ast::*;
use crate::error::{FormulaError, Result};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Variable bindings and alias activation flags for one renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    variables: HashMap<String, String>,
    aliases: HashMap<String, bool>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or overwrite a variable binding.
    pub fn assign(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(FormulaError::EmptyIdentifier { kind: "variable" });
        }
        self.variables.insert(name, value.into());
        Ok(())
    }

    /// Set or overwrite an alias activation flag.
    pub fn activate(&mut self, alias: impl Into<String>, flag: bool) -> Result<()> {
        let alias = alias.into();
        if alias.is_empty() {
            return Err(FormulaError::EmptyIdentifier { kind: "alias" });
        }
        self.aliases.insert(alias, flag);
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// An alias never activated counts as inactive.
    pub fn is_active(&self, alias: &str) -> bool {
        self.aliases.get(alias).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.aliases.is_empty()
    }

    pub fn clear(&mut self) {
        self.variables.clear();
        self.aliases.clear();
    }
}

/// Output of rendering one node sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Every variable reference directly in the sequence was bound.
    /// Nested blocks never clear this.
    pub resolved: bool,
}

pub struct Evaluator<'a> {
    table: &'a SymbolTable,
}

impl<'a> Evaluator<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        Self { table }
    }

    pub fn render(&self, nodes: &[Node]) -> Rendered {
        let mut text = String::new();
        let mut resolved = true;

        for node in nodes {
            match node {
                Node::Literal(s) => text.push_str(s),
                Node::VariableRef(name) => match self.table.variable(name) {
                    Some(value) => text.push_str(value),
                    None => resolved = false,
                },
                Node::Block {
                    alias,
                    primary,
                    fallback,
                } => {
                    let block = self.render_block(alias.as_deref(), primary, fallback.as_deref());
                    text.push_str(&block);
                }
            }
        }

        Rendered { text, resolved }
    }

    fn render_block(
        &self,
        alias: Option<&str>,
        primary: &[Node],
        fallback: Option<&[Node]>,
    ) -> String {
        let gated_off = alias.is_some_and(|alias| !self.table.is_active(alias));

        if !gated_off {
            let rendered = self.render(primary);
            if rendered.resolved {
                trace!(?alias, "block primary resolved");
                return rendered.text;
            }
        }

        debug!(?alias, gated_off, has_fallback = fallback.is_some(), "block falls back");
        // The fallback is emitted whether or not it resolved.
        fallback.map(|nodes| self.render(nodes).text).unwrap_or_default()
    }
}
