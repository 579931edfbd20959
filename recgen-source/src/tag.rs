//! Structured field tags.
//!
//! A tag is a space separated list of `key:"value"` pairs, where the value
//! is a comma separated list whose first element is the tag's name and the
//! rest are options:
//!
//! ```text
//! json:"user_id,omitempty" accessor:"id,readonly"
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Why a tag string could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("tag key is empty or contains invalid characters")]
    KeySyntax,

    #[error("tag key is not followed by ':'")]
    Syntax,

    #[error("tag value is not a valid quoted string")]
    ValueSyntax,

    #[error("tag attribute value is not a string literal")]
    NotAString,
}

/// One `key:"name,options..."` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub key: String,
    pub name: String,
    pub options: Vec<String>,
}

impl Tag {
    /// Returns true if `option` appears among the tag's options.
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// The unquoted value (`name` and options joined by commas).
    pub fn value(&self) -> String {
        let mut value = self.name.clone();
        for option in &self.options {
            value.push(',');
            value.push_str(option);
        }
        value
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:\"", self.key)?;
        for c in self.value().chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\t' => f.write_str("\\t")?,
                '\r' => f.write_str("\\r")?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")
    }
}

/// Parsed tags of one field, in declaration order.
///
/// Keys are matched case-sensitively. When a key appears more than once,
/// every entry is kept and [`Tags::get`] returns the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tags {
    tags: Vec<Tag>,
}

impl Tags {
    /// Parse a raw tag string.
    pub fn parse(text: &str) -> Result<Self, TagError> {
        let mut tags = Vec::new();
        let mut rest = text;

        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }

            let bytes = rest.as_bytes();
            let key_len = bytes
                .iter()
                .position(|&b| b <= b' ' || b == b':' || b == b'"' || b == 0x7f)
                .unwrap_or(bytes.len());
            if key_len == 0 {
                return Err(TagError::KeySyntax);
            }
            if key_len + 1 >= bytes.len() || bytes[key_len] != b':' {
                return Err(TagError::Syntax);
            }
            if bytes[key_len + 1] != b'"' {
                return Err(TagError::ValueSyntax);
            }

            let key = &rest[..key_len];
            rest = &rest[key_len + 1..];

            let (value, remaining) = take_quoted(rest)?;
            rest = remaining;

            let mut parts = value.split(',').map(str::to_string);
            let name = parts.next().unwrap_or_default();
            tags.push(Tag {
                key: key.to_string(),
                name,
                options: parts.collect(),
            });
        }

        Ok(Self { tags })
    }

    /// Look up a tag by key (first entry wins).
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.key == key)
    }

    /// All keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.key.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{tag}")?;
        }
        Ok(())
    }
}

/// Split a leading double-quoted string off `input`, returning its
/// unescaped contents and the remainder after the closing quote.
fn take_quoted(input: &str) -> Result<(String, &str), TagError> {
    let mut chars = input.char_indices();
    if !matches!(chars.next(), Some((_, '"'))) {
        return Err(TagError::ValueSyntax);
    }

    let mut value = String::new();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((value, &input[i + 1..])),
            '\\' => {
                let (_, escaped) = chars.next().ok_or(TagError::ValueSyntax)?;
                let unescaped = match escaped {
                    '"' => '"',
                    '\'' => '\'',
                    '\\' => '\\',
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    'x' => {
                        let hi = chars.next().and_then(|(_, c)| c.to_digit(16));
                        let lo = chars.next().and_then(|(_, c)| c.to_digit(16));
                        match (hi, lo) {
                            (Some(hi), Some(lo)) if hi < 8 => {
                                char::from_u32(hi * 16 + lo).ok_or(TagError::ValueSyntax)?
                            }
                            _ => return Err(TagError::ValueSyntax),
                        }
                    }
                    'u' => unescape_unicode(&mut chars)?,
                    _ => return Err(TagError::ValueSyntax),
                };
                value.push(unescaped);
            }
            c => value.push(c),
        }
    }

    Err(TagError::ValueSyntax)
}

/// Decode the `{XXXX}` part of a `\u{XXXX}` escape.
fn unescape_unicode(chars: &mut std::str::CharIndices<'_>) -> Result<char, TagError> {
    if !matches!(chars.next(), Some((_, '{'))) {
        return Err(TagError::ValueSyntax);
    }
    let mut code = 0u32;
    let mut digits = 0;
    for (_, c) in chars.by_ref() {
        if c == '}' {
            return if digits == 0 {
                Err(TagError::ValueSyntax)
            } else {
                char::from_u32(code).ok_or(TagError::ValueSyntax)
            };
        }
        let digit = c.to_digit(16).ok_or(TagError::ValueSyntax)?;
        digits += 1;
        if digits > 6 {
            return Err(TagError::ValueSyntax);
        }
        code = code * 16 + digit;
    }
    Err(TagError::ValueSyntax)
}
