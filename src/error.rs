//! Error types for shimmyformula.
//!
//! Rendering never fails: malformed formulas and missing bindings degrade to
//! literal text or fallbacks. Errors only come from the setter API and from
//! building a custom [`Syntax`](crate::Syntax).

use thiserror::Error;

/// Main error type for shimmyformula operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    /// `assign` or `activate` was called with an empty name
    #[error("Empty {kind} identifier")]
    EmptyIdentifier {
        /// Either "variable" or "alias"
        kind: &'static str,
    },

    /// Delimiters of a custom syntax collide or cannot be scanned
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type alias for shimmyformula operations
pub type Result<T> = std::result::Result<T, FormulaError>;
