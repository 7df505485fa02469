//! Tokenizer for `{{variable}}` and `:path` references
//!
//! [`tokenize`] scans the raw value once, left to right. At every position it
//! tries a variable token first, then a path token; anything else accumulates
//! into a text segment. The output is lossless: concatenating the `content` of
//! every segment gives back the input.
//!
//! # Token rules
//!
//! - **Variable**: `{{`, one or more characters that are not `}` and do not
//!   start another `{{`, then `}}`. The name is the inner text, trimmed.
//! - **Path**: `:` immediately followed by one or more `[A-Za-z0-9_]`; the
//!   token ends at the first character outside that set.
//!
//! An unterminated `{{` is plain text.

use crate::types::Segment;

/// Split `text` into an ordered, contiguous list of segments
pub fn tokenize(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let bytes = text.as_bytes();

    // Pending text run, as (byte start, char start)
    let mut text_start = (0usize, 0usize);
    let mut byte = 0usize;
    let mut chars = 0usize;

    while byte < bytes.len() {
        let matched = match_variable(text, byte)
            .map(|(end, name)| (end, name, true))
            .or_else(|| match_path(text, byte).map(|(end, name)| (end, name, false)));

        if let Some((end, name, is_variable)) = matched {
            if text_start.0 < byte {
                segments.push(Segment::text(&text[text_start.0..byte], text_start.1));
            }

            let content = &text[byte..end];
            segments.push(if is_variable {
                Segment::variable(content, name, chars)
            } else {
                Segment::path_variable(content, name, chars)
            });

            chars += content.chars().count();
            byte = end;
            text_start = (byte, chars);
            continue;
        }

        // Advance one character
        let step = text[byte..].chars().next().map_or(1, char::len_utf8);
        byte += step;
        chars += 1;
    }

    if text_start.0 < text.len() {
        segments.push(Segment::text(&text[text_start.0..], text_start.1));
    }

    segments
}

/// Try to match `{{inner}}` at byte offset `start`.
///
/// Returns the byte offset one past the closing braces and the trimmed name.
fn match_variable(text: &str, start: usize) -> Option<(usize, String)> {
    let rest = text.get(start..)?;
    let inner_and_tail = rest.strip_prefix("{{")?;

    let close = inner_and_tail.find('}')?;
    let inner = &inner_and_tail[..close];
    if inner.is_empty() || inner.contains("{{") {
        return None;
    }
    if !inner_and_tail[close..].starts_with("}}") {
        return None;
    }

    let end = start + 2 + close + 2;
    Some((end, inner.trim().to_string()))
}

/// Try to match `:ident` at byte offset `start`.
fn match_path(text: &str, start: usize) -> Option<(usize, String)> {
    let rest = text.get(start..)?;
    let ident_and_tail = rest.strip_prefix(':')?;

    let ident_len = ident_and_tail
        .bytes()
        .take_while(|b| is_ident_byte(*b))
        .count();
    if ident_len == 0 {
        return None;
    }

    let end = start + 1 + ident_len;
    Some((end, ident_and_tail[..ident_len].to_string()))
}

/// `[A-Za-z0-9_]`
pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
