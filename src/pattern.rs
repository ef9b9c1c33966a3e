//! Token constraints and compiled query patterns
//!
//! A [`QueryPattern`] is an ordered sequence of [`TokenConstraint`]s, one per
//! token position. Each constraint optionally restricts the surface form,
//! the lemma and the UPOS tag of the token at that position.

use regex::{Regex, RegexBuilder};
use std::fmt::Debug;

use crate::document::Token;

/// Value in a constraint: a literal string or a compiled regex
#[derive(Clone)]
pub enum ConstraintValue {
    /// Whole-field equality
    Literal { value: String, case_sensitive: bool },
    /// Substring match, also the fallback for an invalid regex
    Contains { value: String, case_sensitive: bool },
    Regex(String, Regex), // Pattern string + compiled regex
}

// Manual Debug implementation
impl Debug for ConstraintValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintValue::Literal { value, .. } => f.debug_tuple("Literal").field(value).finish(),
            ConstraintValue::Contains { value, .. } => {
                f.debug_tuple("Contains").field(value).finish()
            }
            ConstraintValue::Regex(pattern, _) => f.debug_tuple("Regex").field(pattern).finish(),
        }
    }
}

// Manual PartialEq implementation (compare pattern strings, not compiled regex)
impl PartialEq for ConstraintValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ConstraintValue::Literal {
                    value: a,
                    case_sensitive: x,
                },
                ConstraintValue::Literal {
                    value: b,
                    case_sensitive: y,
                },
            )
            | (
                ConstraintValue::Contains {
                    value: a,
                    case_sensitive: x,
                },
                ConstraintValue::Contains {
                    value: b,
                    case_sensitive: y,
                },
            ) => a == b && x == y,
            (ConstraintValue::Regex(a, _), ConstraintValue::Regex(b, _)) => a == b,
            _ => false,
        }
    }
}

impl ConstraintValue {
    /// Regex that must match the whole field
    pub fn anchored(pattern: &str, case_sensitive: bool) -> Self {
        Self::compile(pattern, &format!("^(?:{pattern})$"), case_sensitive)
    }

    /// Regex that may match anywhere in the field
    pub fn search(pattern: &str, case_sensitive: bool) -> Self {
        Self::compile(pattern, pattern, case_sensitive)
    }

    pub fn literal(value: &str, case_sensitive: bool) -> Self {
        ConstraintValue::Literal {
            value: fold(value, case_sensitive),
            case_sensitive,
        }
    }

    pub fn contains(value: &str, case_sensitive: bool) -> Self {
        ConstraintValue::Contains {
            value: fold(value, case_sensitive),
            case_sensitive,
        }
    }

    fn compile(pattern: &str, source: &str, case_sensitive: bool) -> Self {
        match RegexBuilder::new(source)
            .case_insensitive(!case_sensitive)
            .build()
        {
            Ok(re) => ConstraintValue::Regex(pattern.to_string(), re),
            Err(e) => {
                tracing::debug!(pattern, error = %e, "invalid regex, matching as substring");
                // Fallback is always case-insensitive
                Self::contains(pattern, false)
            }
        }
    }

    /// Test a token field. An empty field never matches.
    pub fn matches(&self, field: &str) -> bool {
        if field.is_empty() {
            return false;
        }
        match self {
            ConstraintValue::Literal {
                value,
                case_sensitive,
            } => {
                if *case_sensitive {
                    field == value
                } else {
                    field.to_lowercase() == *value
                }
            }
            ConstraintValue::Contains {
                value,
                case_sensitive,
            } => {
                if *case_sensitive {
                    field.contains(value.as_str())
                } else {
                    field.to_lowercase().contains(value.as_str())
                }
            }
            ConstraintValue::Regex(_, re) => re.is_match(field),
        }
    }

    /// The pattern or literal as written
    pub fn as_str(&self) -> &str {
        match self {
            ConstraintValue::Literal { value, .. } | ConstraintValue::Contains { value, .. } => {
                value
            }
            ConstraintValue::Regex(pattern, _) => pattern,
        }
    }
}

fn fold(value: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        value.to_string()
    } else {
        value.to_lowercase()
    }
}

/// Token attribute addressed by a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenField {
    Word,
    Lemma,
    Pos,
}

impl TokenField {
    pub fn name(self) -> &'static str {
        match self {
            TokenField::Word => "word",
            TokenField::Lemma => "lemma",
            TokenField::Pos => "pos",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "word" => Some(TokenField::Word),
            "lemma" => Some(TokenField::Lemma),
            "pos" => Some(TokenField::Pos),
            _ => None,
        }
    }

    /// The token attribute this field reads
    pub fn get(self, token: &Token) -> &str {
        match self {
            TokenField::Word => &token.form,
            TokenField::Lemma => &token.lemma,
            TokenField::Pos => &token.upos,
        }
    }
}

/// Constraints on a single token position; absent sub-patterns always hold
#[derive(Debug, Clone, PartialEq)]
pub struct TokenConstraint {
    pub word: Option<ConstraintValue>,
    pub lemma: Option<ConstraintValue>,
    pub pos: Option<ConstraintValue>,
    pub is_regex: bool,
    pub case_sensitive: bool,
}

impl Default for TokenConstraint {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl TokenConstraint {
    pub fn new(is_regex: bool, case_sensitive: bool) -> Self {
        Self {
            word: None,
            lemma: None,
            pos: None,
            is_regex,
            case_sensitive,
        }
    }

    /// Set the sub-pattern for `field`, replacing any earlier one
    ///
    /// Word and lemma regexes may match anywhere in the field; a POS regex
    /// must match the whole tag.
    pub fn set(&mut self, field: TokenField, pattern: &str) {
        let value = if !self.is_regex {
            ConstraintValue::literal(pattern, self.case_sensitive)
        } else if field == TokenField::Pos {
            ConstraintValue::anchored(pattern, self.case_sensitive)
        } else {
            ConstraintValue::search(pattern, self.case_sensitive)
        };
        *self.slot(field) = Some(value);
    }

    pub fn with(mut self, field: TokenField, pattern: &str) -> Self {
        self.set(field, pattern);
        self
    }

    fn slot(&mut self, field: TokenField) -> &mut Option<ConstraintValue> {
        match field {
            TokenField::Word => &mut self.word,
            TokenField::Lemma => &mut self.lemma,
            TokenField::Pos => &mut self.pos,
        }
    }

    pub fn get(&self, field: TokenField) -> Option<&ConstraintValue> {
        match field {
            TokenField::Word => self.word.as_ref(),
            TokenField::Lemma => self.lemma.as_ref(),
            TokenField::Pos => self.pos.as_ref(),
        }
    }

    /// Fields this constraint restricts
    pub fn fields(&self) -> impl Iterator<Item = TokenField> + '_ {
        [TokenField::Word, TokenField::Lemma, TokenField::Pos]
            .into_iter()
            .filter(|&f| self.get(f).is_some())
    }

    pub fn matches(&self, token: &Token) -> bool {
        [TokenField::Word, TokenField::Lemma, TokenField::Pos]
            .into_iter()
            .all(|field| match self.get(field) {
                Some(value) => value.matches(field.get(token)),
                None => true,
            })
    }
}

/// A compiled query: one constraint per consecutive token
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryPattern {
    pub constraints: Vec<TokenConstraint>,
}

impl QueryPattern {
    pub fn new(constraints: Vec<TokenConstraint>) -> Self {
        Self { constraints }
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn is_sequence(&self) -> bool {
        self.constraints.len() > 1
    }

    /// Does the pattern match `tokens` position by position?
    pub fn matches_at<T: AsRef<Token>>(&self, tokens: &[T]) -> bool {
        tokens.len() == self.constraints.len()
            && self
                .constraints
                .iter()
                .zip(tokens)
                .all(|(c, t)| c.matches(t.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchored_regex() {
        let value = ConstraintValue::anchored("NOUN", false);
        assert!(value.matches("NOUN"));
        assert!(value.matches("noun"));
        assert!(!value.matches("PROPNOUN"));

        let value = ConstraintValue::anchored("ev.*", false);
        assert!(value.matches("evler"));
        assert!(!value.matches("bu evler"));
    }

    #[test]
    fn test_case_sensitive_regex() {
        let value = ConstraintValue::anchored("Ev", true);
        assert!(value.matches("Ev"));
        assert!(!value.matches("ev"));
    }

    #[test]
    fn test_search_regex() {
        let value = ConstraintValue::search("ler$", false);
        assert!(value.matches("evler"));
        assert!(!value.matches("lerde"));
    }

    #[test]
    fn test_invalid_regex_falls_back_to_substring() {
        let value = ConstraintValue::anchored("ev(", true);
        assert_eq!(
            value,
            ConstraintValue::Contains {
                value: "ev(".to_string(),
                case_sensitive: false
            }
        );
        assert!(value.matches("EV(ler"));
        assert!(!value.matches("evler"));
    }

    #[test]
    fn test_literal() {
        let value = ConstraintValue::literal("Ev", false);
        assert!(value.matches("ev"));
        assert!(value.matches("EV"));
        assert!(!value.matches("evler"));

        // Literal mode does not interpret metacharacters
        let value = ConstraintValue::literal("e.", true);
        assert!(value.matches("e."));
        assert!(!value.matches("ev"));
    }

    #[test]
    fn test_empty_field_never_matches() {
        assert!(!ConstraintValue::anchored(".*", false).matches(""));
        assert!(!ConstraintValue::contains("", false).matches(""));
    }

    #[test]
    fn test_token_constraint_and() {
        let constraint = TokenConstraint::default()
            .with(TokenField::Word, "ev.*")
            .with(TokenField::Pos, "NOUN");

        assert!(constraint.matches(&Token::new(1, "evler", "ev", "NOUN")));
        assert!(!constraint.matches(&Token::new(1, "evler", "ev", "VERB")));
        assert!(!constraint.matches(&Token::new(1, "kedi", "kedi", "NOUN")));

        let fields: Vec<_> = constraint.fields().collect();
        assert_eq!(fields, vec![TokenField::Word, TokenField::Pos]);
    }

    #[test]
    fn test_word_and_lemma_match_anywhere() {
        let constraint = TokenConstraint::default()
            .with(TokenField::Word, "ev")
            .with(TokenField::Lemma, "^ev");
        assert!(constraint.matches(&Token::new(1, "evler", "ev", "NOUN")));
        assert!(constraint.matches(&Token::new(1, "Güzelevler", "evlilik", "NOUN")));
        assert!(!constraint.matches(&Token::new(1, "evler", "yev", "NOUN")));

        // Tags are compared whole
        let constraint = TokenConstraint::default().with(TokenField::Pos, "NOUN");
        assert!(constraint.matches(&Token::new(1, "Ali", "Ali", "NOUN")));
        assert!(!constraint.matches(&Token::new(1, "Ali", "Ali", "PROPNOUN")));
    }

    #[test]
    fn test_unconstrained_matches_everything() {
        let constraint = TokenConstraint::default();
        assert!(constraint.matches(&Token::new(1, "ev", "", "")));
    }

    #[test]
    fn test_lemma_requires_value() {
        let constraint = TokenConstraint::default().with(TokenField::Lemma, ".*");
        assert!(!constraint.matches(&Token::new(1, "ev", "", "NOUN")));
    }

    #[test]
    fn test_pattern_matches_at() {
        let pattern = QueryPattern::new(vec![
            TokenConstraint::default().with(TokenField::Pos, "ADJ"),
            TokenConstraint::default().with(TokenField::Pos, "NOUN"),
        ]);
        let tokens = vec![
            Token::new(1, "güzel", "güzel", "ADJ"),
            Token::new(2, "ev", "ev", "NOUN"),
        ];
        assert!(pattern.is_sequence());
        assert!(pattern.matches_at(&tokens));
        assert!(!pattern.matches_at(&tokens[..1]));
    }
}
