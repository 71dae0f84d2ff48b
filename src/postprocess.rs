//! Whitespace normalization applied to a fully rendered formula.
//!
//! Blocks that render empty leave doubled spaces, or a space stranded before
//! punctuation (`saved it $[in $folder].` becomes `saved it .`). Collapsing
//! cleans both up.

const SENTENCE_PUNCTUATION: [char; 6] = ['.', ',', ';', ':', '!', '?'];

/// Return `text` unchanged unless `collapse_spaces` is set.
pub fn postprocess(text: String, collapse_spaces: bool) -> String {
    if collapse_spaces {
        collapse(&text)
    } else {
        text
    }
}

/// Collapse whitespace runs of two or more chars into one space, trim both
/// ends, then drop a space sitting right before sentence punctuation.
pub fn collapse(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() && chars.peek().is_some_and(|n| n.is_whitespace()) {
            while chars.next_if(|n| n.is_whitespace()).is_some() {}
            collapsed.push(' ');
        } else {
            collapsed.push(c);
        }
    }

    let trimmed = collapsed.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut chars = trimmed.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ' ' && chars.peek().is_some_and(|n| SENTENCE_PUNCTUATION.contains(n)) {
            continue;
        }
        out.push(c);
    }
    out
}
