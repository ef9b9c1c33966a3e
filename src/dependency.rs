//! Dependency-relation queries over a sentence collection
//!
//! All lookups are linear scans over immutable sentences. Heads are resolved
//! within the token's own sentence; `head == 0` resolves to [`Head::Root`]
//! and a HEAD naming no token in the sentence to [`Head::Missing`].

use serde::{Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

use crate::document::{Features, Sentence, Token};
use crate::frequency::ranked_counts;
use crate::tree::{DependencyTree, TreeError, TreeNode};

/// Label used for the synthetic head of a root token
pub const ROOT: &str = "ROOT";

#[derive(Debug, Error, PartialEq)]
pub enum DependencyError {
    #[error("Invalid pattern: {0}. Use format 'POS:deprel>POS'")]
    InvalidPattern(String),

    #[error("Sentence {0} not found")]
    SentenceNotFound(usize),

    #[error("Sentence {sentence}: {source}")]
    Tree {
        sentence: usize,
        #[source]
        source: TreeError,
    },
}

/// The governor of a token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Head<'a> {
    Root,
    Token(&'a Token),
    /// HEAD id with no token in the sentence; reported like the root
    Missing(usize),
}

impl<'a> Head<'a> {
    pub fn token(&self) -> Option<&'a Token> {
        match self {
            Head::Root | Head::Missing(_) => None,
            Head::Token(t) => Some(t),
        }
    }

    pub fn form(&self) -> &'a str {
        self.token().map_or(ROOT, |t| t.form.as_str())
    }

    pub fn lemma(&self) -> &'a str {
        self.token().map_or(ROOT, |t| t.lemma.as_str())
    }

    pub fn upos(&self) -> &'a str {
        self.token().map_or(ROOT, |t| t.upos.as_str())
    }
}

impl Serialize for Head<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Head::Root | Head::Missing(_) => serializer.serialize_str(ROOT),
            Head::Token(t) => t.serialize(serializer),
        }
    }
}

/// A token carrying the requested relation, with its resolved head
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeprelMatch<'a> {
    pub token: &'a Token,
    pub head: Head<'a>,
    pub sentence_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadDependentPair<'a> {
    pub head: &'a Token,
    pub dependent: &'a Token,
    pub deprel: &'a str,
    pub sentence_index: usize,
}

/// Filters for [`DependencyGraphService::find_head_dependent_pairs`]; unset
/// filters accept everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairFilter {
    pub head_lemma: Option<String>,
    pub head_pos: Option<String>,
    pub deprel: Option<String>,
    pub dependent_pos: Option<String>,
}

impl PairFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head_lemma(mut self, lemma: &str) -> Self {
        self.head_lemma = Some(lemma.to_string());
        self
    }

    pub fn head_pos(mut self, pos: &str) -> Self {
        self.head_pos = Some(pos.to_string());
        self
    }

    pub fn deprel(mut self, deprel: &str) -> Self {
        self.deprel = Some(deprel.to_string());
        self
    }

    pub fn dependent_pos(mut self, pos: &str) -> Self {
        self.dependent_pos = Some(pos.to_string());
        self
    }

    fn accepts(&self, head: &Token, dependent: &Token) -> bool {
        fn check(filter: &Option<String>, value: &str) -> bool {
            filter.as_deref().is_none_or(|f| f == value)
        }
        check(&self.head_lemma, &head.lemma)
            && check(&self.head_pos, &head.upos)
            && check(&self.deprel, &dependent.deprel)
            && check(&self.dependent_pos, &dependent.upos)
    }
}

/// `DEPENDENT_POS:deprel>HEAD_POS`, e.g. `NOUN:nsubj>VERB`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprelPattern {
    pub dependent_pos: String,
    pub deprel: String,
    pub head_pos: String,
}

impl FromStr for DeprelPattern {
    type Err = DependencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DependencyError::InvalidPattern(s.to_string());

        let (dependent_pos, rest) = s.split_once(':').ok_or_else(invalid)?;
        let (deprel, head_pos) = rest.split_once('>').ok_or_else(invalid)?;

        let is_tag = |t: &str| !t.is_empty() && t.bytes().all(|b| b.is_ascii_uppercase());
        let is_rel = |r: &str| {
            !r.is_empty()
                && !r.starts_with(':')
                && r.chars().all(|c| c.is_alphanumeric() || c == '_' || c == ':')
        };
        if !is_tag(dependent_pos) || !is_rel(deprel) || !is_tag(head_pos) {
            return Err(invalid());
        }

        Ok(Self {
            dependent_pos: dependent_pos.to_string(),
            deprel: deprel.to_string(),
            head_pos: head_pos.to_string(),
        })
    }
}

impl From<&DeprelPattern> for PairFilter {
    fn from(pattern: &DeprelPattern) -> Self {
        PairFilter::new()
            .head_pos(&pattern.head_pos)
            .deprel(&pattern.deprel)
            .dependent_pos(&pattern.dependent_pos)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceTree<'a> {
    pub sentence_index: usize,
    pub text: String,
    pub token_count: usize,
    pub tree: TreeNode<'a>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyStatistics {
    pub sentence_count: usize,
    pub token_count: usize,
    pub avg_sentence_length: f64,
    pub pos_distribution: Vec<(String, usize)>,
    pub deprel_distribution: Vec<(String, usize)>,
    /// Mean `|index - head|` over non-root tokens
    pub avg_dependency_distance: f64,
}

pub struct DependencyGraphService<'a> {
    sentences: &'a [Sentence],
}

impl<'a> DependencyGraphService<'a> {
    pub fn new(sentences: &'a [Sentence]) -> Self {
        Self { sentences }
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    fn tokens(&self) -> impl Iterator<Item = (&'a Sentence, &'a Token)> + 'a {
        let sentences = self.sentences;
        sentences
            .iter()
            .flat_map(|s| s.tokens.iter().map(move |t| (s, t)))
    }

    /// Tokens whose relation is `relation`, optionally restricted to one UPOS
    pub fn find_by_deprel(&self, relation: &str, pos: Option<&str>) -> Vec<DeprelMatch<'a>> {
        self.tokens()
            .filter(|(_, t)| t.deprel == relation)
            .filter(|(_, t)| pos.is_none_or(|p| t.upos == p))
            .map(|(sentence, token)| {
                let head = if token.is_root() {
                    Head::Root
                } else {
                    sentence
                        .token(token.head)
                        .map_or(Head::Missing(token.head), Head::Token)
                };
                DeprelMatch {
                    token,
                    head,
                    sentence_index: sentence.index,
                }
            })
            .collect()
    }

    pub fn find_head_dependent_pairs(&self, filter: &PairFilter) -> Vec<HeadDependentPair<'a>> {
        self.tokens()
            .filter(|(_, t)| !t.is_root())
            .filter_map(|(sentence, dependent)| {
                let head = sentence.token(dependent.head)?;
                filter.accepts(head, dependent).then_some(HeadDependentPair {
                    head,
                    dependent,
                    deprel: dependent.deprel.as_str(),
                    sentence_index: sentence.index,
                })
            })
            .collect()
    }

    /// Pairs matching a `DEPENDENT_POS:deprel>HEAD_POS` pattern
    pub fn find_by_pattern(
        &self,
        pattern: &str,
    ) -> Result<Vec<HeadDependentPair<'a>>, DependencyError> {
        let pattern: DeprelPattern = pattern.parse()?;
        Ok(self.find_head_dependent_pairs(&PairFilter::from(&pattern)))
    }

    /// Nested tree for the sentence with the given 1-based index
    pub fn get_sentence_tree(&self, sentence_index: usize) -> Result<SentenceTree<'a>, DependencyError> {
        let sentence = self
            .sentences
            .iter()
            .find(|s| s.index == sentence_index)
            .ok_or(DependencyError::SentenceNotFound(sentence_index))?;

        let tree = DependencyTree::build(sentence).map_err(|source| DependencyError::Tree {
            sentence: sentence_index,
            source,
        })?;

        Ok(SentenceTree {
            sentence_index,
            text: sentence.text().into_owned(),
            token_count: sentence.len(),
            tree: tree.to_node(),
        })
    }

    /// Tokens carrying every given feature value, optionally of one UPOS
    pub fn search_by_features(&self, features: &Features, pos: Option<&str>) -> Vec<&'a Token> {
        self.tokens()
            .map(|(_, t)| t)
            .filter(|t| pos.is_none_or(|p| t.upos == p))
            .filter(|t| {
                features
                    .iter()
                    .all(|(k, v)| t.feats.get(k).is_some_and(|tv| tv == v))
            })
            .collect()
    }

    /// Full relation distribution, most frequent first
    pub fn deprel_distribution(&self) -> Vec<(String, usize)> {
        ranked_counts(self.tokens().map(|(_, t)| t.deprel.as_str()))
    }

    /// Corpus summary; distributions are cut to `top_k` entries
    pub fn get_statistics(&self, top_k: usize) -> DependencyStatistics {
        let sentence_count = self.sentences.len();
        let token_count: usize = self.sentences.iter().map(Sentence::len).sum();
        let avg_sentence_length = if sentence_count == 0 {
            0.0
        } else {
            token_count as f64 / sentence_count as f64
        };

        let mut pos_distribution = ranked_counts(self.tokens().map(|(_, t)| t.upos.as_str()));
        pos_distribution.truncate(top_k);
        let mut deprel_distribution = self.deprel_distribution();
        deprel_distribution.truncate(top_k);

        let (distance, arcs) = self
            .tokens()
            .filter(|(_, t)| !t.is_root())
            .fold((0usize, 0usize), |(sum, n), (_, t)| {
                (sum + t.index.abs_diff(t.head), n + 1)
            });
        let avg_dependency_distance = if arcs == 0 {
            0.0
        } else {
            distance as f64 / arcs as f64
        };

        DependencyStatistics {
            sentence_count,
            token_count,
            avg_sentence_length,
            pos_distribution,
            deprel_distribution,
            avg_dependency_distance,
        }
    }
}
