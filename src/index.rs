//! Inverted indices for field-equality token lookup
//!
//! A [`TokenIndex`] is built once per document and maps each form, lemma,
//! UPOS tag and relation label to the positions of the tokens carrying it.
//! Positions are stored in document order, so intersecting posting lists
//! preserves that order.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::document::{Document, Token};

/// Position of a token inside a document: sentence slot, then token slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TokenRef {
    pub sentence: usize,
    pub token: usize,
}

/// Token attributes the index can look up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexedField {
    Form,
    Lemma,
    Upos,
    Deprel,
}

impl IndexedField {
    pub fn get(self, token: &Token) -> &str {
        match self {
            IndexedField::Form => &token.form,
            IndexedField::Lemma => &token.lemma,
            IndexedField::Upos => &token.upos,
            IndexedField::Deprel => &token.deprel,
        }
    }
}

/// Inverted index for one document's tokens
#[derive(Debug, Clone, Default)]
pub struct TokenIndex {
    by_form: FxHashMap<String, Vec<TokenRef>>,
    by_lemma: FxHashMap<String, Vec<TokenRef>>,
    by_upos: FxHashMap<String, Vec<TokenRef>>,
    by_deprel: FxHashMap<String, Vec<TokenRef>>,
    len: usize,
}

impl TokenIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(document: &Document) -> Self {
        let mut index = Self::new();
        for (s, sentence) in document.sentences.iter().enumerate() {
            for (t, token) in sentence.tokens.iter().enumerate() {
                index.add_token(
                    TokenRef {
                        sentence: s,
                        token: t,
                    },
                    token,
                );
            }
        }
        index
    }

    fn add_token(&mut self, at: TokenRef, token: &Token) {
        for field in [
            IndexedField::Form,
            IndexedField::Lemma,
            IndexedField::Upos,
            IndexedField::Deprel,
        ] {
            let value = field.get(token);
            if value.is_empty() {
                continue;
            }
            self.postings_mut(field)
                .entry(value.to_string())
                .or_default()
                .push(at);
        }
        self.len += 1;
    }

    fn postings(&self, field: IndexedField) -> &FxHashMap<String, Vec<TokenRef>> {
        match field {
            IndexedField::Form => &self.by_form,
            IndexedField::Lemma => &self.by_lemma,
            IndexedField::Upos => &self.by_upos,
            IndexedField::Deprel => &self.by_deprel,
        }
    }

    fn postings_mut(&mut self, field: IndexedField) -> &mut FxHashMap<String, Vec<TokenRef>> {
        match field {
            IndexedField::Form => &mut self.by_form,
            IndexedField::Lemma => &mut self.by_lemma,
            IndexedField::Upos => &mut self.by_upos,
            IndexedField::Deprel => &mut self.by_deprel,
        }
    }

    /// Number of tokens indexed
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Tokens whose `field` equals `value`, in document order
    pub fn get(&self, field: IndexedField, value: &str) -> &[TokenRef] {
        self.postings(field)
            .get(value)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Tokens satisfying every `(field, value)` condition, in document order
    ///
    /// With no conditions every token matches; `None` signals that case so
    /// the caller can walk the document instead.
    pub fn lookup(&self, conditions: &[(IndexedField, &str)]) -> Option<Vec<TokenRef>> {
        let mut lists: Vec<&[TokenRef]> = conditions
            .iter()
            .map(|&(field, value)| self.get(field, value))
            .collect();
        // Shortest list first keeps the intersection small
        lists.sort_by_key(|l| l.len());

        let (first, rest) = lists.split_first()?;
        let hits = first
            .iter()
            .filter(|r| rest.iter().all(|l| l.binary_search(r).is_ok()))
            .copied()
            .collect();
        Some(hits)
    }
}
