//! Sliding-window matching of compiled patterns over token streams
//!
//! A window the length of the pattern is moved one token at a time; every
//! start position where all constraints hold is reported, so matches may
//! overlap. Each match carries up to `context_size` tokens on either side,
//! clamped at the edges of the stream.

use crate::document::{Sentence, Token, token_stream};
use crate::pattern::QueryPattern;
use crate::query::{QueryError, compile_query};

/// Default number of context tokens on each side of a match
pub const DEFAULT_CONTEXT_SIZE: usize = 5;

/// One pattern occurrence with its surrounding tokens
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch<'t, T> {
    /// Offset of the first matched token in the stream
    pub position: usize,
    pub left_context: &'t [T],
    pub tokens: &'t [T],
    pub right_context: &'t [T],
}

impl<T: AsRef<Token>> PatternMatch<'_, T> {
    pub fn left_text(&self) -> String {
        join_forms(self.left_context)
    }

    pub fn match_text(&self) -> String {
        join_forms(self.tokens)
    }

    pub fn right_text(&self) -> String {
        join_forms(self.right_context)
    }
}

/// Space-join the surface forms of a token slice
pub fn join_forms<T: AsRef<Token>>(tokens: &[T]) -> String {
    tokens
        .iter()
        .map(|t| t.as_ref().form.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Finds all occurrences of a pattern in a token stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatcher {
    pub context_size: usize,
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_SIZE)
    }
}

impl PatternMatcher {
    pub fn new(context_size: usize) -> Self {
        Self { context_size }
    }

    /// Every start position where the pattern matches, in stream order
    pub fn find_matches<'t, T: AsRef<Token>>(
        &self,
        pattern: &QueryPattern,
        tokens: &'t [T],
    ) -> Vec<PatternMatch<'t, T>> {
        let len = pattern.len();
        if len == 0 || tokens.len() < len {
            return Vec::new();
        }

        tokens
            .windows(len)
            .enumerate()
            .filter(|(_, window)| pattern.matches_at(window))
            .map(|(start, _)| self.extract(tokens, start, len))
            .collect()
    }

    /// Match against each sentence separately so no match crosses a boundary
    ///
    /// Returns `(sentence, match)` pairs; positions are relative to the sentence.
    pub fn find_in_sentences<'t>(
        &self,
        pattern: &QueryPattern,
        sentences: &'t [Sentence],
    ) -> Vec<(&'t Sentence, PatternMatch<'t, Token>)> {
        sentences
            .iter()
            .flat_map(|sentence| {
                self.find_matches(pattern, &sentence.tokens)
                    .into_iter()
                    .map(move |m| (sentence, m))
            })
            .collect()
    }

    fn extract<'t, T>(&self, tokens: &'t [T], start: usize, len: usize) -> PatternMatch<'t, T> {
        let end = start + len;
        let left_start = start.saturating_sub(self.context_size);
        let right_end = end.saturating_add(self.context_size).min(tokens.len());

        PatternMatch {
            position: start,
            left_context: &tokens[left_start..start],
            tokens: &tokens[start..end],
            right_context: &tokens[end..right_end],
        }
    }
}

/// Compile `query` and count its matches across the concatenated sentences
pub fn count_matches(query: &str, sentences: &[Sentence]) -> Result<usize, QueryError> {
    let pattern = compile_query(query)?;
    let stream = token_stream(sentences);
    Ok(PatternMatcher::default().find_matches(&pattern, &stream).len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pairs: &[(&str, &str)]) -> Vec<Token> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (form, pos))| Token::new(i + 1, form, form, pos))
            .collect()
    }

    #[test]
    fn test_adj_noun_single_match() {
        let tokens = tokens(&[("güzel", "ADJ"), ("ev", "NOUN"), ("çok", "ADV")]);
        let pattern = compile_query(r#"[pos="ADJ"] [pos="NOUN"]"#).unwrap();
        let matches = PatternMatcher::default().find_matches(&pattern, &tokens);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].position, 0);
        assert_eq!(matches[0].match_text(), "güzel ev");
        assert!(matches[0].left_context.is_empty());
        assert_eq!(matches[0].right_text(), "çok");
    }

    #[test]
    fn test_overlapping_matches() {
        let tokens = tokens(&[("a", "NOUN"), ("b", "NOUN"), ("c", "NOUN")]);
        let pattern = compile_query(r#"[pos="NOUN"] [pos="NOUN"]"#).unwrap();
        let positions: Vec<_> = PatternMatcher::default()
            .find_matches(&pattern, &tokens)
            .iter()
            .map(|m| m.position)
            .collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn test_context_clamped() {
        let tokens = tokens(&[
            ("a", "X"),
            ("b", "X"),
            ("c", "X"),
            ("hedef", "NOUN"),
            ("d", "X"),
        ]);
        let pattern = compile_query(r#"[word="hedef"]"#).unwrap();
        let matches = PatternMatcher::new(2).find_matches(&pattern, &tokens);

        assert_eq!(matches[0].left_text(), "b c");
        assert_eq!(matches[0].right_text(), "d");

        let matches = PatternMatcher::new(0).find_matches(&pattern, &tokens);
        assert!(matches[0].left_context.is_empty());
        assert!(matches[0].right_context.is_empty());
    }

    #[test]
    fn test_pattern_longer_than_stream() {
        let tokens = tokens(&[("ev", "NOUN")]);
        let pattern = compile_query(r#"[pos="NOUN"] [pos="NOUN"]"#).unwrap();
        assert!(PatternMatcher::default().find_matches(&pattern, &tokens).is_empty());
    }

    #[test]
    fn test_matches_over_token_refs() {
        let first = Sentence::new(1, tokens(&[("güzel", "ADJ")]));
        let second = Sentence::new(2, tokens(&[("ev", "NOUN")]));
        let sentences = vec![first, second];
        let pattern = compile_query(r#"[pos="ADJ"] [pos="NOUN"]"#).unwrap();

        // The document stream crosses the sentence boundary
        let stream = token_stream(&sentences);
        let matches = PatternMatcher::default().find_matches(&pattern, &stream);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].tokens[1].sentence_id, 2);

        // Sentence-bounded matching does not
        let bounded = PatternMatcher::default().find_in_sentences(&pattern, &sentences);
        assert!(bounded.is_empty());

        assert_eq!(count_matches(r#"[pos="NOUN"]"#, &sentences).unwrap(), 1);
    }
}
