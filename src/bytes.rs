//! Low-level field helpers shared by the format codecs
//!
//! Tab splitting goes through `memchr`, decimal parsing through `atoi`
//! with a full-consumption check so that `12a` or `-3` never parse.

use atoi::FromRadix10Checked;
use memchr::memchr_iter;

use crate::document::Features;

/// Placeholder for an empty field in CoNLL-U and VRT
pub const EMPTY_FIELD: &str = "_";

/// Split a line on tab characters
#[inline]
pub fn split_fields(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut fields = Vec::with_capacity(10);
    let mut start = 0;
    for tab in memchr_iter(b'\t', bytes) {
        // Tabs are ASCII, so every split point is a char boundary
        fields.push(&line[start..tab]);
        start = tab + 1;
    }
    fields.push(&line[start..]);
    fields
}

/// Parse an unsigned decimal, rejecting empty input, signs, and trailing garbage
#[inline]
pub fn parse_index(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    match usize::from_radix_10_checked(bytes) {
        (Some(n), used) if used == bytes.len() => Some(n),
        _ => None,
    }
}

/// Map the `_` placeholder to the empty string
#[inline]
pub fn field_value(s: &str) -> &str {
    if s == EMPTY_FIELD { "" } else { s }
}

/// Map the empty string back to the `_` placeholder
#[inline]
pub fn field_or_placeholder(s: &str) -> &str {
    if s.is_empty() { EMPTY_FIELD } else { s }
}

/// Parse a `Key=Value|Key=Value` list (FEATS, MISC)
///
/// Pairs without `=` are dropped. Splits on the first `=` only.
pub fn parse_pairs(s: &str) -> Features {
    let mut pairs = Features::new();
    if s.is_empty() || s == EMPTY_FIELD {
        return pairs;
    }
    for pair in s.split('|') {
        if let Some((key, value)) = pair.split_once('=') {
            if !key.is_empty() {
                pairs.insert(key.to_string(), value.to_string());
            }
        }
    }
    pairs
}

/// Join a feature map back into `Key=Value|Key=Value`, keys in lexical order
pub fn format_pairs(pairs: &Features) -> String {
    if pairs.is_empty() {
        return EMPTY_FIELD.to_string();
    }
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("|")
}
