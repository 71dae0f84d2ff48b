use crate::error::{FormulaError, Result};

/// Identifier characters: letters, digits and underscore.
pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_ident_char)
}

/// Delimiters recognized by the scanner.
///
/// The default is the classic formula grammar:
///
/// ```text
/// $name                      variable reference
/// $[ primary ## fallback ]   block with optional fallback
/// $[:alias: primary ]        block gated on an alias
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    sigil: char,
    open: char,
    close: char,
    alias_marker: char,
    divider: String,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            sigil: '$',
            open: '[',
            close: ']',
            alias_marker: ':',
            divider: "##".to_string(),
        }
    }
}

impl Syntax {
    /// Build a custom syntax, rejecting delimiters the scanner could not
    /// tell apart from identifiers, whitespace or each other.
    pub fn new(
        sigil: char,
        open: char,
        close: char,
        alias_marker: char,
        divider: impl Into<String>,
    ) -> Result<Self> {
        let divider = divider.into();

        for (role, c) in [
            ("sigil", sigil),
            ("open", open),
            ("close", close),
            ("alias marker", alias_marker),
        ] {
            if is_ident_char(c) || c.is_whitespace() {
                return Err(FormulaError::InvalidSyntax(format!(
                    "{role} delimiter {c:?} must not be an identifier or whitespace character"
                )));
            }
        }

        let singles = [sigil, open, close, alias_marker];
        for (i, a) in singles.iter().enumerate() {
            if singles[i + 1..].contains(a) {
                return Err(FormulaError::InvalidSyntax(format!(
                    "delimiter {a:?} is used for more than one role"
                )));
            }
        }

        if divider.is_empty() {
            return Err(FormulaError::InvalidSyntax("divider must not be empty".into()));
        }
        if divider.starts_with(sigil) {
            return Err(FormulaError::InvalidSyntax(format!(
                "divider {divider:?} must not start with the sigil {sigil:?}"
            )));
        }
        if divider.contains(&format!("{sigil}{open}")) {
            return Err(FormulaError::InvalidSyntax(format!(
                "divider {divider:?} must not contain the block opener \"{sigil}{open}\""
            )));
        }
        if divider.contains(close) {
            return Err(FormulaError::InvalidSyntax(format!(
                "divider {divider:?} must not contain the close delimiter {close:?}"
            )));
        }

        Ok(Self {
            sigil,
            open,
            close,
            alias_marker,
            divider,
        })
    }

    pub fn sigil(&self) -> char {
        self.sigil
    }

    pub fn open(&self) -> char {
        self.open
    }

    pub fn close(&self) -> char {
        self.close
    }

    pub fn alias_marker(&self) -> char {
        self.alias_marker
    }

    pub fn divider(&self) -> &str {
        &self.divider
    }

    /// True when `s` begins with `sigil` immediately followed by `open`.
    pub(crate) fn starts_block(&self, s: &str) -> bool {
        let mut chars = s.chars();
        chars.next() == Some(self.sigil) && chars.next() == Some(self.open)
    }

    /// Byte length of the two-character block opener.
    pub(crate) fn block_open_len(&self) -> usize {
        self.sigil.len_utf8() + self.open.len_utf8()
    }
}
