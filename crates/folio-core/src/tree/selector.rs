//! A small CSS selector subset.
//!
//! Supported: type selectors, `*`, `#id`, `.class`, `[attr]`, `[attr="value"]`,
//! compounds of those, joined by descendant (whitespace) and child (`>`)
//! combinators.

use super::{NodeId, TreeError, TreeResult, VisualTree};

/// How a compound relates to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Any ancestor.
    Descendant,
    /// Direct parent.
    Child,
}

/// One compound selector, e.g. `div.block[data-page="2"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    /// Check whether a single node satisfies this compound.
    pub fn matches<T: VisualTree + ?Sized>(&self, tree: &T, node: NodeId) -> bool {
        if let Some(tag) = &self.tag {
            if tree.tag(node) != Some(tag.as_str()) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if tree.attribute(node, "id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| tree.has_class(node, class)) {
            return false;
        }
        self.attributes.iter().all(|(name, expected)| {
            match (tree.attribute(node, name), expected) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == *expected,
            }
        })
    }
}

/// A parsed selector: compounds left to right, each with the combinator
/// linking it to the previous compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<(Combinator, Compound)>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> TreeResult<Self> {
        Parser::new(input).parse()
    }

    pub fn parts(&self) -> &[(Combinator, Compound)] {
        &self.parts
    }

    /// Check whether `node` matches the full selector.
    pub fn matches<T: VisualTree + ?Sized>(&self, tree: &T, node: NodeId) -> bool {
        self.matches_from(tree, node, self.parts.len() - 1)
    }

    fn matches_from<T: VisualTree + ?Sized>(&self, tree: &T, node: NodeId, index: usize) -> bool {
        let (combinator, compound) = &self.parts[index];
        if !compound.matches(tree, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => tree
                .parent(node)
                .is_some_and(|parent| self.matches_from(tree, parent, index - 1)),
            Combinator::Descendant => {
                let mut ancestor = tree.parent(node);
                while let Some(current) = ancestor {
                    if self.matches_from(tree, current, index - 1) {
                        return true;
                    }
                    ancestor = tree.parent(current);
                }
                false
            }
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
        }
    }

    fn error(&self, reason: impl Into<String>) -> TreeError {
        TreeError::InvalidSelector {
            selector: self.input.to_string(),
            reason: reason.into(),
        }
    }

    fn parse(mut self) -> TreeResult<Selector> {
        let mut parts = Vec::new();
        let mut combinator = Combinator::Descendant;

        loop {
            let had_space = self.skip_whitespace();
            match self.chars.peek() {
                None => break,
                Some('>') => {
                    if parts.is_empty() {
                        return Err(self.error("selector starts with a combinator"));
                    }
                    self.chars.next();
                    combinator = Combinator::Child;
                    self.skip_whitespace();
                }
                Some(_) if had_space || parts.is_empty() => {}
                Some(&c) => return Err(self.error(format!("unexpected character '{}'", c))),
            }
            let compound = self.compound()?;
            parts.push((combinator, compound));
            combinator = Combinator::Descendant;
        }

        if parts.is_empty() {
            return Err(self.error("empty selector"));
        }
        Ok(Selector { parts })
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
            skipped = true;
        }
        skipped
    }

    fn compound(&mut self) -> TreeResult<Compound> {
        let mut compound = Compound::default();
        let mut empty = true;

        match self.chars.peek() {
            Some('*') => {
                self.chars.next();
                empty = false;
            }
            Some(c) if is_ident_char(*c) => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
                empty = false;
            }
            _ => {}
        }

        loop {
            match self.chars.peek() {
                Some('#') => {
                    self.chars.next();
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.chars.next();
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.chars.next();
                    compound.attributes.push(self.attribute()?);
                }
                _ => break,
            }
            empty = false;
        }

        if empty {
            return Err(match self.chars.peek() {
                Some(&c) => self.error(format!("unexpected character '{}'", c)),
                None => self.error("dangling combinator"),
            });
        }
        Ok(compound)
    }

    fn ident(&mut self) -> TreeResult<String> {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            ident.push(c);
            self.chars.next();
        }
        if ident.is_empty() {
            return Err(self.error("expected an identifier"));
        }
        Ok(ident)
    }

    fn attribute(&mut self) -> TreeResult<(String, Option<String>)> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();
        let value = match self.chars.next() {
            Some(']') => return Ok((name, None)),
            Some('=') => {
                self.skip_whitespace();
                self.attribute_value()?
            }
            _ => return Err(self.error("malformed attribute selector")),
        };
        self.skip_whitespace();
        match self.chars.next() {
            Some(']') => Ok((name, Some(value))),
            _ => Err(self.error("unterminated attribute selector")),
        }
    }

    fn attribute_value(&mut self) -> TreeResult<String> {
        match self.chars.peek().copied() {
            Some(quote @ ('"' | '\'')) => {
                self.chars.next();
                let mut value = String::new();
                loop {
                    match self.chars.next() {
                        Some(c) if c == quote => return Ok(value),
                        Some(c) => value.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
            }
            _ => self.ident(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
