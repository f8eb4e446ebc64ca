//! Structured entity blobs.
//!
//! A blob is a hierarchical tag tree describing the complete state of an
//! entity. Its string form is a compact, brace-delimited notation:
//!
//! ```text
//! {id:"minecraft:zombie",CustomName:"§cGrave Keeper",Health:40.0d,Tags:["Boss"]}
//! ```
//!
//! Serialization is canonical: compounds keep their key order, strings are
//! always double-quoted and every number carries its type suffix, so a string
//! produced by [`TagCompound`]'s `Display` impl parses back to a value that
//! prints byte-for-byte identically.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error raised when a blob string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Blob parse error at byte {position}: {message}")]
pub struct TagParseError {
    pub position: usize,
    pub message: String,
}

/// A single value in a tag tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<Tag>),
    Compound(TagCompound),
    ByteArray(Vec<i8>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    /// Any numeric tag widened to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Tag::Byte(v) => Some(v as f64),
            Tag::Short(v) => Some(v as f64),
            Tag::Int(v) => Some(v as f64),
            Tag::Long(v) => Some(v as f64),
            Tag::Float(v) => Some(v as f64),
            Tag::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tag]> {
        match self {
            Tag::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&TagCompound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }
}

/// Ordered key/value tag container. Insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagCompound {
    entries: Vec<(String, Tag)>,
}

impl TagCompound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a blob from its string form.
    pub fn parse(source: &str) -> Result<Self, TagParseError> {
        let mut parser = Parser::new(source);
        parser.skip_whitespace();
        let compound = parser.parse_compound()?;
        parser.skip_whitespace();
        if parser.peek().is_some() {
            return Err(parser.error("trailing characters after blob"));
        }
        Ok(compound)
    }

    /// Insert or replace `key`. Replacing keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, tag: Tag) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = tag,
            None => self.entries.push((key, tag)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, tag: Tag) -> Self {
        self.insert(key, tag);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Tag::as_str)
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Tag::as_f64)
    }

    pub fn get_list(&self, key: &str) -> Option<&[Tag]> {
        self.get(key).and_then(Tag::as_list)
    }

    /// String elements of the list at `key`; non-string elements are skipped.
    pub fn string_list(&self, key: &str) -> Vec<&str> {
        self.get_list(key)
            .map(|items| items.iter().filter_map(Tag::as_str).collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for TagCompound {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ----------------------------------------------------------------------------
// Serialization
// ----------------------------------------------------------------------------

fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-')
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    f.write_str("\"")
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    if !key.is_empty() && key.chars().all(is_bare_char) {
        f.write_str(key)
    } else {
        write_quoted(f, key)
    }
}

fn write_joined<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    mut write_item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write_item(f, item)?;
    }
    Ok(())
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Byte(v) => write!(f, "{}b", v),
            Tag::Short(v) => write!(f, "{}s", v),
            Tag::Int(v) => write!(f, "{}", v),
            Tag::Long(v) => write!(f, "{}L", v),
            Tag::Float(v) => write!(f, "{}f", v),
            Tag::Double(v) => write!(f, "{}d", v),
            Tag::String(s) => write_quoted(f, s),
            Tag::List(items) => {
                f.write_str("[")?;
                write_joined(f, items, |f, t| write!(f, "{}", t))?;
                f.write_str("]")
            }
            Tag::Compound(c) => write!(f, "{}", c),
            Tag::ByteArray(values) => {
                f.write_str("[B;")?;
                write_joined(f, values, |f, v| write!(f, "{}b", v))?;
                f.write_str("]")
            }
            Tag::IntArray(values) => {
                f.write_str("[I;")?;
                write_joined(f, values, |f, v| write!(f, "{}", v))?;
                f.write_str("]")
            }
            Tag::LongArray(values) => {
                f.write_str("[L;")?;
                write_joined(f, values, |f, v| write!(f, "{}L", v))?;
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for TagCompound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        write_joined(f, &self.entries, |f, (key, value)| {
            write_key(f, key)?;
            write!(f, ":{}", value)
        })?;
        f.write_str("}")
    }
}

// ----------------------------------------------------------------------------
// Parsing
// ----------------------------------------------------------------------------

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn error(&self, message: impl Into<String>) -> TagParseError {
        TagParseError {
            position: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), TagParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn parse_compound(&mut self) -> Result<TagCompound, TagParseError> {
        self.expect('{')?;
        let mut compound = TagCompound::new();
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(compound);
        }
        loop {
            self.skip_whitespace();
            let key = self.parse_key()?;
            self.expect(':')?;
            let value = self.parse_value()?;
            if compound.contains_key(&key) {
                return Err(self.error(format!("duplicate key '{}'", key)));
            }
            compound.entries.push((key, value));
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(compound),
                _ => return Err(self.error("expected ',' or '}' in compound")),
            }
        }
    }

    fn parse_key(&mut self) -> Result<String, TagParseError> {
        match self.peek() {
            Some('"') | Some('\'') => self.parse_quoted(),
            _ => {
                let token = self.parse_bare();
                if token.is_empty() {
                    Err(self.error("expected key"))
                } else {
                    Ok(token.to_string())
                }
            }
        }
    }

    fn parse_value(&mut self) -> Result<Tag, TagParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => Ok(Tag::Compound(self.parse_compound()?)),
            Some('[') => self.parse_list_or_array(),
            Some('"') | Some('\'') => Ok(Tag::String(self.parse_quoted()?)),
            Some(_) => {
                let start = self.pos;
                let token = self.parse_bare();
                if token.is_empty() {
                    self.pos = start;
                    return Err(self.error("expected value"));
                }
                Ok(scalar_from_token(token))
            }
            None => Err(self.error("expected value, found end of input")),
        }
    }

    fn parse_quoted(&mut self) -> Result<String, TagParseError> {
        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("expected quoted string")),
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some(c) => out.push(c),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_bare(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_bare_char(c)) {
            self.bump();
        }
        &src[start..self.pos]
    }

    fn parse_list_or_array(&mut self) -> Result<Tag, TagParseError> {
        self.expect('[')?;
        let src = self.src;
        let mut prefix = src[self.pos..].chars();
        if let (Some(kind @ ('B' | 'I' | 'L')), Some(';')) = (prefix.next(), prefix.next()) {
            self.pos += 2;
            return self.parse_array(kind);
        }

        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(Tag::List(items));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(Tag::List(items)),
                _ => return Err(self.error("expected ',' or ']' in list")),
            }
        }
    }

    fn parse_array(&mut self, kind: char) -> Result<Tag, TagParseError> {
        let mut values: Vec<Tag> = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.bump();
        } else {
            loop {
                values.push(self.parse_value()?);
                self.skip_whitespace();
                match self.bump() {
                    Some(',') => continue,
                    Some(']') => break,
                    _ => return Err(self.error("expected ',' or ']' in array")),
                }
            }
        }

        let narrow = |tag: &Tag| -> Option<i64> {
            match *tag {
                Tag::Byte(v) => Some(v as i64),
                Tag::Short(v) => Some(v as i64),
                Tag::Int(v) => Some(v as i64),
                Tag::Long(v) => Some(v),
                _ => None,
            }
        };
        let mut ints = Vec::with_capacity(values.len());
        for value in &values {
            match narrow(value) {
                Some(v) => ints.push(v),
                None => return Err(self.error(format!("non-integer element in [{};] array", kind))),
            }
        }

        let out_of_range = || self.error(format!("element out of range for [{};] array", kind));
        match kind {
            'B' => ints
                .into_iter()
                .map(|v| i8::try_from(v).map_err(|_| out_of_range()))
                .collect::<Result<_, _>>()
                .map(Tag::ByteArray),
            'I' => ints
                .into_iter()
                .map(|v| i32::try_from(v).map_err(|_| out_of_range()))
                .collect::<Result<_, _>>()
                .map(Tag::IntArray),
            _ => Ok(Tag::LongArray(ints)),
        }
    }
}

fn looks_numeric(body: &str) -> bool {
    let mut chars = body.chars();
    let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
    starts_ok
        && body.chars().any(|c| c.is_ascii_digit())
        && body.chars().all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
}

/// Interpret an unquoted token as a typed number, a boolean or a bare string.
fn scalar_from_token(token: &str) -> Tag {
    match token {
        "true" => return Tag::Byte(1),
        "false" => return Tag::Byte(0),
        _ => {}
    }

    if let Some(last) = token.chars().last() {
        let body = &token[..token.len() - last.len_utf8()];
        if looks_numeric(body) {
            let typed = match last {
                'b' | 'B' => body.parse().ok().map(Tag::Byte),
                's' | 'S' => body.parse().ok().map(Tag::Short),
                'l' | 'L' => body.parse().ok().map(Tag::Long),
                'f' | 'F' => body.parse::<f32>().ok().filter(|v| v.is_finite()).map(Tag::Float),
                'd' | 'D' => body.parse::<f64>().ok().filter(|v| v.is_finite()).map(Tag::Double),
                _ => None,
            };
            if let Some(tag) = typed {
                return tag;
            }
        }
    }

    if looks_numeric(token) {
        if let Ok(v) = token.parse::<i32>() {
            return Tag::Int(v);
        }
        if token.contains(['.', 'e', 'E']) {
            // Out-of-range values stay strings; `inf` would not parse back.
            if let Ok(v) = token.parse::<f64>() {
                if v.is_finite() {
                    return Tag::Double(v);
                }
            }
        }
    }

    Tag::String(token.to_string())
}
