use crate::syntax::{is_ident_char, is_identifier, Syntax};
use tracing::{debug, trace};

/// Deepest block nesting the scanner enters. A block opened below this
/// depth is emitted as literal text, span and all, which keeps parsing and
/// evaluation recursion bounded.
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Var(String), // $name

    // Blocks
    BlockStart { alias: Option<String> }, // $[ or $[:alias:
    Divider,                              // ##
    BlockEnd,                             // ]
}

/// An open block: where its matching close sits and whether its own
/// divider has been seen yet.
#[derive(Debug, Clone, Copy)]
struct Frame {
    close_at: usize,
    divided: bool,
}

/// Cursor-based scanner over a formula.
///
/// Block boundaries are resolved eagerly: when `$[` is met, the matching
/// close is located by depth counting before the block is entered. A block
/// without a match is emitted as literal text through the end of input, so
/// the token stream is always well nested.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    syntax: &'a Syntax,
    cursor: usize,
    frames: Vec<Frame>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str, syntax: &'a Syntax) -> Self {
        Self {
            input,
            syntax,
            cursor: 0,
            frames: Vec::new(),
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    fn advance(&mut self, n: usize) {
        self.cursor += n;
    }

    pub fn next_token(&mut self) -> Option<Token> {
        let token = self.scan();
        if let Some(token) = &token {
            trace!(?token, cursor = self.cursor, depth = self.frames.len(), "scanned");
        }
        token
    }

    fn scan(&mut self) -> Option<Token> {
        let rest = self.remaining();
        if rest.is_empty() {
            return None;
        }

        if let Some(frame) = self.frames.last() {
            if self.cursor == frame.close_at {
                self.frames.pop();
                self.advance(self.syntax.close().len_utf8());
                return Some(Token::BlockEnd);
            }
        }

        if self.at_divider(self.cursor) {
            if let Some(frame) = self.frames.last_mut() {
                frame.divided = true;
            }
            self.advance(self.syntax.divider().len());
            return Some(Token::Divider);
        }

        if self.syntax.starts_block(rest) {
            return Some(self.open_block());
        }

        if let Some(name) = self.identifier_after_sigil(self.cursor) {
            self.advance(self.syntax.sigil().len_utf8() + name.len());
            return Some(Token::Var(name.to_string()));
        }

        // Literal run. The first char is always taken, which is how a
        // sigil with nothing scannable after it ends up verbatim.
        let end = self.text_end();
        let text = self.input[self.cursor..end].to_string();
        self.cursor = end;
        Some(Token::Text(text))
    }

    fn open_block(&mut self) -> Token {
        let open_at = self.cursor;
        let content_start = open_at + self.syntax.block_open_len();

        match self.find_close(content_start) {
            Some(close_at) if self.frames.len() >= MAX_DEPTH => {
                debug!(open_at, max_depth = MAX_DEPTH, "block nested too deep, span is literal");
                let end = close_at + self.syntax.close().len_utf8();
                let text = self.input[open_at..end].to_string();
                self.cursor = end;
                Token::Text(text)
            }
            Some(close_at) => {
                self.cursor = content_start;
                let alias = self.scan_alias(close_at);
                self.frames.push(Frame {
                    close_at,
                    divided: false,
                });
                Token::BlockStart { alias }
            }
            None => {
                trace!(open_at, "unterminated block, rest of input is literal");
                let text = self.remaining().to_string();
                self.cursor = self.input.len();
                Token::Text(text)
            }
        }
    }

    /// Byte offset of the close matching a block whose content starts at `from`.
    fn find_close(&self, from: usize) -> Option<usize> {
        let close = self.syntax.close();
        let mut depth = 1usize;
        let mut pos = from;

        while pos < self.input.len() {
            let rest = &self.input[pos..];
            if self.syntax.starts_block(rest) {
                depth += 1;
                pos += self.syntax.block_open_len();
                continue;
            }
            let c = rest.chars().next()?;
            if c == close {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            pos += c.len_utf8();
        }
        None
    }

    /// Consume `:alias:` at the cursor when it names a valid identifier
    /// inside the block's own span.
    fn scan_alias(&mut self, close_at: usize) -> Option<String> {
        let input = self.input;
        let marker = self.syntax.alias_marker();
        let body = &input[self.cursor..close_at];
        let after = body.strip_prefix(marker)?;
        let end = after.find(marker)?;
        let name = &after[..end];
        if !is_identifier(name) {
            return None;
        }
        self.advance(marker.len_utf8() * 2 + name.len());
        Some(name.to_string())
    }

    fn identifier_after_sigil(&self, pos: usize) -> Option<&'a str> {
        let input = self.input;
        let after = input[pos..].strip_prefix(self.syntax.sigil())?;
        let len = after
            .find(|c: char| !is_ident_char(c))
            .unwrap_or(after.len());
        if len == 0 {
            None
        } else {
            Some(&after[..len])
        }
    }

    /// The divider only counts inside a block, at that block's own depth,
    /// and only once per block.
    fn at_divider(&self, pos: usize) -> bool {
        match self.frames.last() {
            Some(frame) if !frame.divided => {
                self.input[pos..frame.close_at].starts_with(self.syntax.divider())
            }
            _ => false,
        }
    }

    fn starts_token(&self, pos: usize) -> bool {
        self.syntax.starts_block(&self.input[pos..])
            || self.identifier_after_sigil(pos).is_some()
            || self.at_divider(pos)
    }

    fn text_end(&self) -> usize {
        let limit = self
            .frames
            .last()
            .map_or(self.input.len(), |frame| frame.close_at);

        let mut chars = self.input[self.cursor..].char_indices();
        // Skip the first char unconditionally.
        chars.next();

        for (offset, _) in chars {
            let pos = self.cursor + offset;
            if pos >= limit || self.starts_token(pos) {
                return pos.min(limit);
            }
        }
        limit
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(input: &str) -> Vec<Token> {
        let syntax = Syntax::default();
        Tokenizer::new(input, &syntax).collect()
    }

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    fn var(s: &str) -> Token {
        Token::Var(s.to_string())
    }

    fn open(alias: Option<&str>) -> Token {
        Token::BlockStart {
            alias: alias.map(str::to_string),
        }
    }

    #[test]
    fn plain_text_is_one_token() {
        assert_eq!(lex("Hello world"), vec![text("Hello world")]);
    }

    #[test]
    fn variable_stops_at_non_identifier_char() {
        assert_eq!(
            lex("Hello, $name!"),
            vec![text("Hello, "), var("name"), text("!")]
        );
    }

    #[test]
    fn block_with_divider() {
        assert_eq!(
            lex("$[$anotherName ## another guy]"),
            vec![
                open(None),
                var("anotherName"),
                text(" "),
                Token::Divider,
                text(" another guy"),
                Token::BlockEnd,
            ]
        );
    }

    #[test]
    fn alias_and_nested_divider_belongs_to_inner_block() {
        assert_eq!(
            lex("$[:target: for $[$targetName ## you]]"),
            vec![
                open(Some("target")),
                text(" for "),
                open(None),
                var("targetName"),
                text(" "),
                Token::Divider,
                text(" you"),
                Token::BlockEnd,
                Token::BlockEnd,
            ]
        );
    }

    #[test]
    fn divider_outside_blocks_is_text() {
        assert_eq!(lex("a ## b"), vec![text("a ## b")]);
    }

    #[test]
    fn second_divider_is_text() {
        assert_eq!(
            lex("$[a##b##c]"),
            vec![
                open(None),
                text("a"),
                Token::Divider,
                text("b##c"),
                Token::BlockEnd,
            ]
        );
    }

    #[test]
    fn unterminated_block_is_text_to_end() {
        assert_eq!(
            lex("Hi $name $[oops $x"),
            vec![text("Hi "), var("name"), text(" "), text("$[oops $x")]
        );
    }

    #[test]
    fn lone_sigil_is_text() {
        assert_eq!(lex("a $ b $"), vec![text("a $ b $")]);
    }

    #[test]
    fn stray_close_is_text() {
        assert_eq!(lex("a] $[b]]"), vec![
            text("a] "),
            open(None),
            text("b"),
            Token::BlockEnd,
            text("]"),
        ]);
    }

    #[test]
    fn invalid_alias_is_content() {
        assert_eq!(
            lex("$[:not an alias: x]"),
            vec![open(None), text(":not an alias: x"), Token::BlockEnd]
        );
        assert_eq!(lex("$[:open x]"), vec![open(None), text(":open x"), Token::BlockEnd]);
    }

    #[test]
    fn empty_block() {
        assert_eq!(lex("$[]"), vec![open(None), Token::BlockEnd]);
    }

    #[test]
    fn multibyte_text_around_blocks() {
        assert_eq!(
            lex("$[«$comment»]"),
            vec![open(None), text("«"), var("comment"), text("»"), Token::BlockEnd]
        );
    }

    #[test]
    fn blocks_past_max_depth_are_text() {
        let depth = MAX_DEPTH + 2;
        let formula = format!("{}x{}", "$[".repeat(depth), "]".repeat(depth));
        let tokens = lex(&formula);

        let opens = tokens
            .iter()
            .filter(|t| matches!(t, Token::BlockStart { .. }))
            .count();
        assert_eq!(opens, MAX_DEPTH);
        assert!(tokens.contains(&text("$[$[x]]")));
    }

    #[test]
    fn custom_syntax() {
        let syntax = Syntax::new('%', '{', '}', '@', "||").unwrap();
        let tokens: Vec<Token> = Tokenizer::new("%{@on@ %x || y} $[z]", &syntax).collect();
        assert_eq!(
            tokens,
            vec![
                open(Some("on")),
                text(" "),
                var("x"),
                text(" "),
                Token::Divider,
                text(" y"),
                Token::BlockEnd,
                text(" $[z]"),
            ]
        );
    }
}
