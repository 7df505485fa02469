//! Core data types for tokenfield-rs
//!
//! This module defines the fundamental data structures shared by the
//! tokenizer, suggestion engine and widget.
//!
//! # Main Types
//!
//! - [`Segment`] - One tokenizer output unit (plain text or a token)
//! - [`SegmentKind`] - Text, `{{variable}}` or `:path` token
//! - [`VariableBinding`] / [`PathBinding`] - Externally supplied catalog entries
//! - [`Resolution`] - Outcome of resolving a token, with an explicit not-found state
//!
//! # Offsets
//!
//! Every offset in this crate counts characters, not bytes, so it lines up with
//! egui's `CCursor` indices. Use [`char_to_byte`] when slicing a `&str`.

use serde::{Deserialize, Serialize};

/// Kind of a tokenizer segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Literal text
    Text,
    /// `{{name}}` reference to an environment-style variable
    Variable,
    /// `:name` path placeholder
    PathVariable,
}

impl SegmentKind {
    /// Whether segments of this kind are interactive tokens
    pub fn is_token(&self) -> bool {
        !matches!(self, SegmentKind::Text)
    }
}

/// A contiguous slice of the raw value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Exact source text, decorations included (`{{ user }}`, `:id`)
    pub content: String,
    /// Inner identifier, trimmed. `None` for text segments.
    pub name: Option<String>,
    /// Character offset of the first character of `content`
    pub start_offset: usize,
}

impl Segment {
    pub fn text(content: impl Into<String>, start_offset: usize) -> Self {
        Self {
            kind: SegmentKind::Text,
            content: content.into(),
            name: None,
            start_offset,
        }
    }

    pub fn variable(
        content: impl Into<String>,
        name: impl Into<String>,
        start_offset: usize,
    ) -> Self {
        Self {
            kind: SegmentKind::Variable,
            content: content.into(),
            name: Some(name.into()),
            start_offset,
        }
    }

    pub fn path_variable(
        content: impl Into<String>,
        name: impl Into<String>,
        start_offset: usize,
    ) -> Self {
        Self {
            kind: SegmentKind::PathVariable,
            content: content.into(),
            name: Some(name.into()),
            start_offset,
        }
    }

    /// Length of `content` in characters
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Character offset one past the last character of this segment
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.char_len()
    }

    pub fn is_token(&self) -> bool {
        self.kind.is_token()
    }
}

/// A known environment-style variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableBinding {
    pub key: String,
    pub value: String,
}

impl VariableBinding {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A known path placeholder, resolved by exact key match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathBinding {
    pub key: String,
    pub value: String,
}

impl PathBinding {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Result of resolving a token against the caller's bindings
///
/// `Found(String::new())` (a binding whose value is empty) and `NotFound`
/// are deliberately different states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(String),
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Resolution::Found(v) => Some(v),
            Resolution::NotFound => None,
        }
    }
}

impl From<Option<String>> for Resolution {
    fn from(value: Option<String>) -> Self {
        value.map_or(Resolution::NotFound, Resolution::Found)
    }
}

/// Convert a character offset into a byte offset, clamped to the string length
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Drop later duplicates of a key, keeping catalog order
pub fn dedup_by_key<T>(items: Vec<T>, key: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item).to_string()))
        .collect()
}
