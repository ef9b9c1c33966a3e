//! Keyword-in-context (KWIC) concordance
//!
//! Three ways to find keywords, all producing [`KwicRow`]s:
//! - a compiled CQP pattern, matched over tokens
//! - a single-field search (word, lemma or POS)
//! - a regex or substring search over the sentence text itself
//!
//! Token-based and text-based searches may disagree where tokenization does
//! not line up with the literal text.

use regex::RegexBuilder;
use serde::Serialize;

use crate::document::{Sentence, Token, token_stream};
use crate::pattern::{ConstraintValue, QueryPattern, TokenConstraint, TokenField};
use crate::query::{CompileOptions, QueryError, compile_query_with};
use crate::searcher::{DEFAULT_CONTEXT_SIZE, PatternMatch, PatternMatcher, join_forms};

/// One concordance line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KwicRow {
    pub left_context: String,
    pub keyword: String,
    pub right_context: String,
    /// Token offset in the document stream, or character offset in the
    /// sentence text for text searches
    pub position: usize,
    pub sentence_index: usize,
    /// 1-based index of the first keyword token; `None` for text searches
    pub token_index: Option<usize>,
    pub lemma: String,
    pub pos: String,
    pub confidence: f64,
}

/// Single-field search parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FieldQuery {
    pub field: TokenField,
    pub term: String,
    /// Search with a regex anywhere in the field
    pub regex: bool,
    pub case_sensitive: bool,
}

impl FieldQuery {
    pub fn new(field: TokenField, term: &str) -> Self {
        Self {
            field,
            term: term.to_string(),
            regex: false,
            case_sensitive: false,
        }
    }

    pub fn regex(mut self, regex: bool) -> Self {
        self.regex = regex;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Regex search, else substring for words and equality for lemma and POS
    fn to_value(&self) -> ConstraintValue {
        if self.regex {
            ConstraintValue::search(&self.term, self.case_sensitive)
        } else if self.field == TokenField::Word {
            ConstraintValue::contains(&self.term, self.case_sensitive)
        } else {
            ConstraintValue::literal(&self.term, self.case_sensitive)
        }
    }
}

/// Builds KWIC rows over a document's sentences
#[derive(Debug, Clone, PartialEq)]
pub struct ConcordanceEngine {
    pub context_size: usize,
    /// Keep matches and their context inside one sentence
    pub sentence_bounded: bool,
    pub limit: Option<usize>,
    pub options: CompileOptions,
}

impl Default for ConcordanceEngine {
    fn default() -> Self {
        Self {
            context_size: DEFAULT_CONTEXT_SIZE,
            sentence_bounded: false,
            limit: None,
            options: CompileOptions::default(),
        }
    }
}

impl ConcordanceEngine {
    pub fn new(context_size: usize) -> Self {
        Self {
            context_size,
            ..Self::default()
        }
    }

    /// Compile a CQP query and build rows from its matches
    pub fn query(&self, query: &str, sentences: &[Sentence]) -> Result<Vec<KwicRow>, QueryError> {
        let pattern = compile_query_with(query, self.options)?;
        Ok(self.from_pattern(&pattern, sentences))
    }

    /// Build rows from the matches of an already compiled pattern
    pub fn from_pattern(&self, pattern: &QueryPattern, sentences: &[Sentence]) -> Vec<KwicRow> {
        let matcher = PatternMatcher::new(self.context_size);
        let limit = self.limit.unwrap_or(usize::MAX);

        if self.sentence_bounded {
            let mut offset = 0;
            let mut rows = Vec::new();
            for sentence in sentences {
                for m in matcher.find_matches(pattern, &sentence.tokens) {
                    if rows.len() >= limit {
                        return rows;
                    }
                    rows.push(row_from_match(&m, offset + m.position));
                }
                offset += sentence.len();
            }
            rows
        } else {
            let stream = token_stream(sentences);
            matcher
                .find_matches(pattern, &stream)
                .iter()
                .take(limit)
                .map(|m| row_from_match(m, m.position))
                .collect()
        }
    }

    /// Search one token field
    pub fn search_field(&self, query: &FieldQuery, sentences: &[Sentence]) -> Vec<KwicRow> {
        let mut constraint = TokenConstraint::new(query.regex, query.case_sensitive);
        let value = Some(query.to_value());
        match query.field {
            TokenField::Word => constraint.word = value,
            TokenField::Lemma => constraint.lemma = value,
            TokenField::Pos => constraint.pos = value,
        }
        self.from_pattern(&QueryPattern::new(vec![constraint]), sentences)
    }

    /// Search the literal sentence text, ignoring tokenization
    ///
    /// Context is counted in whitespace-separated words. An invalid regex is
    /// searched as a literal string.
    pub fn search_text(
        &self,
        pattern: &str,
        regex: bool,
        case_sensitive: bool,
        sentences: &[Sentence],
    ) -> Vec<KwicRow> {
        let escaped = regex::escape(pattern);
        let source = if regex { pattern } else { escaped.as_str() };
        let re = match RegexBuilder::new(source)
            .case_insensitive(!case_sensitive)
            .build()
        {
            Ok(re) => re,
            Err(e) => {
                tracing::debug!(pattern, error = %e, "invalid regex, searching text literally");
                match RegexBuilder::new(&escaped).case_insensitive(true).build() {
                    Ok(re) => re,
                    Err(_) => return Vec::new(),
                }
            }
        };

        let limit = self.limit.unwrap_or(usize::MAX);
        let mut rows = Vec::new();
        for sentence in sentences {
            let text = sentence.text();
            for m in re.find_iter(&text) {
                if m.as_str().is_empty() {
                    continue;
                }
                if rows.len() >= limit {
                    return rows;
                }
                rows.push(KwicRow {
                    left_context: last_words(&text[..m.start()], self.context_size),
                    keyword: m.as_str().to_string(),
                    right_context: first_words(&text[m.end()..], self.context_size),
                    position: text[..m.start()].chars().count(),
                    sentence_index: sentence.index,
                    token_index: None,
                    lemma: String::new(),
                    pos: String::new(),
                    confidence: 1.0,
                });
            }
        }
        rows
    }
}

fn row_from_match<T: AsRef<Token>>(m: &PatternMatch<'_, T>, position: usize) -> KwicRow {
    let first: Option<&Token> = m.tokens.first().map(|t| t.as_ref());
    let join = |f: fn(&Token) -> &str| {
        m.tokens
            .iter()
            .map(|t| f(t.as_ref()))
            .collect::<Vec<_>>()
            .join(" ")
    };

    KwicRow {
        left_context: join_forms(m.left_context),
        keyword: join_forms(m.tokens),
        right_context: join_forms(m.right_context),
        position,
        sentence_index: first.map_or(0, |t| t.sentence_id),
        token_index: first.map(|t| t.index),
        lemma: join(|t| t.lemma.as_str()),
        pos: join(|t| t.upos.as_str()),
        // A multi-token keyword is as reliable as its weakest token
        confidence: m
            .tokens
            .iter()
            .map(|t| t.as_ref().confidence())
            .fold(1.0, f64::min),
    }
}

fn last_words(text: &str, n: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    words[words.len().saturating_sub(n)..].join(" ")
}

fn first_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}
