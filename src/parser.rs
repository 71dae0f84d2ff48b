use crate::ast::*;
use crate::lexer::{Token, Tokenizer};
use crate::syntax::Syntax;
use std::collections::VecDeque;

/// Where a node sequence stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    TopLevel,
    Primary,
    Fallback,
}

pub struct Parser<'a> {
    lexer: Tokenizer<'a>,
    buffer: VecDeque<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, syntax: &'a Syntax) -> Self {
        Self {
            lexer: Tokenizer::new(input, syntax),
            buffer: VecDeque::new(),
        }
    }

    fn peek(&mut self) -> Option<&Token> {
        if self.buffer.is_empty() {
            let token = self.lexer.next_token()?;
            self.buffer.push_back(token);
        }
        self.buffer.front()
    }

    fn consume(&mut self) -> Option<Token> {
        if self.buffer.is_empty() {
            self.lexer.next_token()
        } else {
            self.buffer.pop_front()
        }
    }

    /// Parse the whole input. Never fails: the tokenizer already turned
    /// anything malformed into text.
    pub fn parse(&mut self) -> Formula {
        self.parse_sequence(Region::TopLevel)
    }

    fn parse_sequence(&mut self, region: Region) -> Vec<Node> {
        let mut nodes = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some(Token::BlockEnd) if region != Region::TopLevel => break,
                Some(Token::Divider) if region == Region::Primary => break,
                _ => {}
            }

            match self.consume() {
                Some(Token::Text(s)) => push_literal(&mut nodes, &s),
                Some(Token::Var(name)) => nodes.push(Node::VariableRef(name)),
                Some(Token::BlockStart { alias }) => nodes.push(self.parse_block(alias)),
                // Only emitted inside blocks, so unreachable at top level.
                Some(Token::Divider) | Some(Token::BlockEnd) | None => {}
            }
        }
        nodes
    }

    fn parse_block(&mut self, alias: Option<String>) -> Node {
        let primary = self.parse_sequence(Region::Primary);

        let fallback = match self.peek() {
            Some(Token::Divider) => {
                self.consume(); // ##
                Some(self.parse_sequence(Region::Fallback))
            }
            _ => None,
        };

        // ]
        if let Some(Token::BlockEnd) = self.peek() {
            self.consume();
        }

        Node::Block {
            alias,
            primary,
            fallback,
        }
    }
}

fn push_literal(nodes: &mut Vec<Node>, text: &str) {
    if let Some(Node::Literal(prev)) = nodes.last_mut() {
        prev.push_str(text);
    } else {
        nodes.push(Node::Literal(text.to_string()));
    }
}

/// Scan and parse `input` with the given syntax.
pub fn parse(input: &str, syntax: &Syntax) -> Formula {
    Parser::new(input, syntax).parse()
}
