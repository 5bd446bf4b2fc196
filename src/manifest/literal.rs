// src/manifest/literal.rs

//! Reader for the literal subset of Python expressions
//!
//! Legacy `setup.py` files declare requirements as list and dict literals
//! inside a `setup(...)` call. This reader understands exactly those
//! literals (strings, lists, tuples, dicts, and `dict(key=...)` calls) and
//! refuses everything else, so the source is never executed.

use thiserror::Error;

/// A Python literal value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Str(String),
    /// List or tuple
    List(Vec<Literal>),
    /// Dict entries in source order
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Str(_) => "string",
            Literal::List(_) => "list",
            Literal::Dict(_) => "dict",
        }
    }
}

/// Error raised when the input is not a supported literal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at byte {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

/// Parse the literal at the start of `src`
///
/// Text after the literal is ignored. Returns the literal and the number of
/// bytes it spans.
pub fn parse_literal(src: &str) -> Result<(Literal, usize), LiteralError> {
    let mut parser = Parser { src, pos: 0 };
    parser.skip_trivia();
    let value = parser.value()?;
    Ok((value, parser.pos))
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.into(),
        }
    }

    /// Skip whitespace, comments and backslash line continuations
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('\\') if self.rest()[1..].starts_with('\n') => {
                    self.pos += 2;
                }
                _ => return,
            }
        }
    }

    fn expect(&mut self, want: char) -> Result<(), LiteralError> {
        self.skip_trivia();
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", want, c))),
            None => Err(self.error(format!("expected '{}', found end of input", want))),
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        self.skip_trivia();
        match self.peek() {
            Some('[') => {
                self.bump();
                let (items, _) = self.sequence(']')?;
                Ok(Literal::List(items))
            }
            Some('(') => {
                self.bump();
                let (mut items, saw_comma) = self.sequence(')')?;
                // `(x)` is grouping, `(x,)` is a tuple
                if items.len() == 1 && !saw_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(Literal::List(items))
                }
            }
            Some('{') => {
                self.bump();
                self.dict()
            }
            Some(_) if self.at_string_start() => self.strings(),
            Some('d') if self.at_dict_call() => self.dict_call(),
            Some(_) => {
                let snippet: String = self.rest().chars().take(24).collect();
                Err(self.error(format!("unsupported expression '{}'", snippet.trim())))
            }
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Comma-separated values up to `close`; reports whether a comma was seen
    fn sequence(&mut self, close: char) -> Result<(Vec<Literal>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_trivia();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, saw_comma));
            }
            items.push(self.value()?);
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    saw_comma = true;
                }
                Some(c) if c == close => {}
                _ => return Err(self.error(format!("expected ',' or '{}'", close))),
            }
        }
    }

    fn dict(&mut self) -> Result<Literal, LiteralError> {
        let mut entries = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Literal::Dict(entries));
            }
            let key = self.value()?;
            self.expect(':')?;
            let value = self.value()?;
            entries.push((key, value));
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    /// `dict(` with optional whitespace before the parenthesis
    fn at_dict_call(&self) -> bool {
        self.rest()
            .strip_prefix("dict")
            .is_some_and(|after| after.trim_start().starts_with('('))
    }

    /// `dict(key=value, ...)`: keyword arguments become string keys
    fn dict_call(&mut self) -> Result<Literal, LiteralError> {
        self.pos += "dict".len();
        self.expect('(')?;
        let mut entries = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(')') {
                self.bump();
                return Ok(Literal::Dict(entries));
            }
            let key = self.identifier()?;
            self.expect('=')?;
            let value = self.value()?;
            entries.push((Literal::Str(key), value));
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(')') => {}
                _ => return Err(self.error("expected ',' or ')'")),
            }
        }
    }

    fn identifier(&mut self) -> Result<String, LiteralError> {
        let len = self
            .rest()
            .char_indices()
            .take_while(|&(i, c)| c == '_' || c.is_alphabetic() || (i > 0 && c.is_numeric()))
            .map(|(_, c)| c.len_utf8())
            .sum::<usize>();
        if len == 0 {
            return Err(self.error("expected a keyword argument"));
        }
        let ident = self.rest()[..len].to_string();
        self.pos += len;
        Ok(ident)
    }

    /// Length of a string prefix (r, u, b, rb, ...) followed by a quote
    fn string_prefix_len(&self) -> Option<usize> {
        let rest = self.rest();
        let prefix_len = rest
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .count();
        if prefix_len > 2 {
            return None;
        }
        match rest[prefix_len..].chars().next() {
            Some('\'') | Some('"') => Some(prefix_len),
            _ => None,
        }
    }

    fn at_string_start(&self) -> bool {
        self.string_prefix_len().is_some()
    }

    /// One or more adjacent string literals, concatenated
    fn strings(&mut self) -> Result<Literal, LiteralError> {
        let mut out = String::new();
        loop {
            self.string(&mut out)?;
            self.skip_trivia();
            if !self.at_string_start() {
                return Ok(Literal::Str(out));
            }
        }
    }

    fn string(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let prefix_len = self
            .string_prefix_len()
            .ok_or_else(|| self.error("expected a string"))?;
        let prefix = self.rest()[..prefix_len].to_ascii_lowercase();
        if prefix.contains('f') {
            return Err(self.error("f-strings are not literals"));
        }
        if !prefix.chars().all(|c| matches!(c, 'r' | 'u' | 'b')) {
            return Err(self.error(format!("unknown string prefix '{}'", prefix)));
        }
        let raw = prefix.contains('r');
        self.pos += prefix_len;

        let quote = self.bump().ok_or_else(|| self.error("expected a quote"))?;
        let triple = self.rest().starts_with(&format!("{quote}{quote}"));
        if triple {
            self.pos += 2;
        }

        loop {
            let c = self
                .bump()
                .ok_or_else(|| self.error("unterminated string"))?;
            if c == quote {
                if !triple {
                    return Ok(());
                }
                if self.rest().starts_with(&format!("{quote}{quote}")) {
                    self.pos += 2;
                    return Ok(());
                }
                out.push(c);
                continue;
            }
            if c == '\n' && !triple {
                return Err(self.error("unterminated string"));
            }
            if c == '\\' {
                let escaped = self
                    .bump()
                    .ok_or_else(|| self.error("unterminated string"))?;
                if raw {
                    out.push('\\');
                    out.push(escaped);
                    continue;
                }
                match escaped {
                    '\n' => {}
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '0' => out.push('\0'),
                    '\\' | '\'' | '"' => out.push(escaped),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
                continue;
            }
            out.push(c);
        }
    }
}
