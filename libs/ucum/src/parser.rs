//! Unit-code parser
//!
//! Recursive descent over the unit-algebra grammar:
//!
//! ```text
//! start        := "/" term | term
//! term         := term OPERATOR component | component
//! component    := annotatable | factor
//! annotatable  := simple_unit exponent?
//! exponent     := SIGN? DIGIT+
//! factor       := DIGIT+
//! OPERATOR     := "." | "/"
//! SIGN         := "-"
//! ```
//!
//! `simple_unit` is resolved by the ordered matchers in [`crate::symbols`].
//! Whitespace is insignificant and skipped before parsing; reported byte
//! offsets refer to the original input.

use crate::ast::{Component, Operator, ParseTree, SimpleUnit, TermNode};
use crate::error::{Error, Result};
use crate::symbols;

/// Parses a unit code into its parse tree. Never partially parses: any input
/// that does not reduce to `start` is a syntax error.
pub fn parse(input: &str) -> Result<ParseTree> {
    Parser::new(input).parse()
}

/// Checks that `input` is a syntactically valid unit code.
pub fn validate(input: &str) -> Result<()> {
    parse(input).map(|_| ())
}

struct Parser<'a> {
    source: &'a str,
    /// Input with whitespace removed.
    text: String,
    /// Byte offset in `source` for every byte of `text`.
    offsets: Vec<usize>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut offsets = Vec::with_capacity(source.len());
        for (offset, c) in source.char_indices() {
            if c.is_whitespace() {
                continue;
            }
            text.push(c);
            offsets.extend(std::iter::repeat(offset).take(c.len_utf8()));
        }
        Self {
            source,
            text,
            offsets,
            pos: 0,
        }
    }

    fn error(&self, message: &'static str) -> Error {
        Error::Syntax {
            input: self.source.to_string(),
            pos: self
                .offsets
                .get(self.pos)
                .copied()
                .unwrap_or(self.source.len()),
            message,
        }
    }

    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse(mut self) -> Result<ParseTree> {
        if self.text.is_empty() {
            return Err(self.error("empty unit code"));
        }
        let leading_slash = self.eat(b'/');
        let term = self.parse_term()?;
        Ok(ParseTree {
            source: self.source.to_string(),
            leading_slash,
            term,
        })
    }

    fn parse_term(&mut self) -> Result<TermNode> {
        let mut term = TermNode::Component(self.parse_component()?);
        loop {
            let op = match self.peek() {
                None => return Ok(term),
                Some(b'.') => Operator::Multiply,
                Some(b'/') => Operator::Divide,
                Some(_) => return Err(self.error("expected '.' or '/'")),
            };
            self.pos += 1;
            let rhs = self.parse_component()?;
            term = TermNode::Operation {
                lhs: Box::new(term),
                op,
                rhs,
            };
        }
    }

    fn parse_component(&mut self) -> Result<Component> {
        match self.peek() {
            None => Err(self.error("expected a unit or factor")),
            Some(b) if b.is_ascii_digit() => self.parse_factor(),
            Some(_) => self.parse_annotatable(),
        }
    }

    fn parse_factor(&mut self) -> Result<Component> {
        let digits = self.read_digits();
        digits
            .parse::<u64>()
            .map(Component::Factor)
            .map_err(|_| self.error("factor out of range"))
    }

    fn parse_annotatable(&mut self) -> Result<Component> {
        let reading = symbols::best_reading(self.rest(), continues_unit)
            .ok_or_else(|| self.error("unknown unit symbol"))?;
        self.pos += reading.len;
        let unit = SimpleUnit {
            prefix: reading.prefix,
            symbol: reading.symbol,
            class: reading.class,
        };
        let exponent = self.parse_exponent()?;
        Ok(Component::Unit { unit, exponent })
    }

    fn parse_exponent(&mut self) -> Result<Option<i32>> {
        let start = self.pos;
        let signed = self.eat(b'-');
        let digits = self.read_digits();
        if digits.is_empty() {
            if signed {
                return Err(self.error("exponent sign must be followed by digits"));
            }
            return Ok(None);
        }
        self.text[start..self.pos]
            .parse::<i32>()
            .map(Some)
            .map_err(|_| self.error("exponent out of range"))
    }

    fn read_digits(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.text[start..self.pos].to_string()
    }
}

/// What may legally follow a unit symbol: an exponent, an operator, or the end.
fn continues_unit(rest: &str) -> bool {
    match rest.as_bytes().first() {
        None => true,
        Some(b) => b.is_ascii_digit() || matches!(b, b'.' | b'/' | b'-'),
    }
}
