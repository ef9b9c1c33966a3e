//! N-gram frequency extraction
//!
//! Windows never cross a sentence boundary and any window containing a
//! `PUNCT` token is skipped. Results are ordered by descending frequency;
//! equal frequencies keep the order in which the n-grams were first seen.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::document::{Sentence, Token};

/// Token attribute an n-gram is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NgramKey {
    /// Lower-cased surface form
    #[default]
    Form,
    /// Lower-cased lemma
    Lemma,
    /// UPOS tag as written, for POS patterns
    Upos,
}

impl NgramKey {
    fn of(self, token: &Token) -> String {
        match self {
            NgramKey::Form => token.form.to_lowercase(),
            NgramKey::Lemma => token.lemma.to_lowercase(),
            NgramKey::Upos => token.upos.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ngram {
    /// Space-joined keys
    pub ngram: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgramExtractor {
    pub n: usize,
    pub min_frequency: usize,
    pub key: NgramKey,
    pub limit: Option<usize>,
}

impl Default for NgramExtractor {
    fn default() -> Self {
        Self {
            n: 2,
            min_frequency: 2,
            key: NgramKey::Form,
            limit: None,
        }
    }
}

impl NgramExtractor {
    pub fn new(n: usize, min_frequency: usize, key: NgramKey) -> Self {
        Self {
            n,
            min_frequency,
            key,
            limit: None,
        }
    }

    pub fn extract(&self, sentences: &[Sentence]) -> Vec<Ngram> {
        if self.n == 0 {
            return Vec::new();
        }

        // First-seen order lives in `ngrams`; the map points into it
        let mut slots: FxHashMap<String, usize> = FxHashMap::default();
        let mut ngrams: Vec<Ngram> = Vec::new();

        for sentence in sentences {
            for window in sentence.tokens.windows(self.n) {
                if window.iter().any(Token::is_punct) {
                    continue;
                }
                let ngram = window
                    .iter()
                    .map(|t| self.key.of(t))
                    .collect::<Vec<_>>()
                    .join(" ");

                match slots.get(&ngram) {
                    Some(&slot) => ngrams[slot].frequency += 1,
                    None => {
                        slots.insert(ngram.clone(), ngrams.len());
                        ngrams.push(Ngram {
                            ngram,
                            frequency: 1,
                        });
                    }
                }
            }
        }

        ngrams.retain(|g| g.frequency >= self.min_frequency);
        // Stable, so ties stay in first-seen order
        ngrams.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        if let Some(limit) = self.limit {
            ngrams.truncate(limit);
        }
        ngrams
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(index: usize, words: &[(&str, &str, &str)]) -> Sentence {
        let tokens = words
            .iter()
            .enumerate()
            .map(|(i, (form, lemma, pos))| Token::new(i + 1, form, lemma, pos))
            .collect();
        Sentence::new(index, tokens)
    }

    fn corpus() -> Vec<Sentence> {
        vec![
            sentence(
                1,
                &[
                    ("Güzel", "güzel", "ADJ"),
                    ("evler", "ev", "NOUN"),
                    (",", ",", "PUNCT"),
                    ("güzel", "güzel", "ADJ"),
                    ("evler", "ev", "NOUN"),
                ],
            ),
            sentence(2, &[("büyük", "büyük", "ADJ"), ("ev", "ev", "NOUN")]),
            sentence(3, &[("güzel", "güzel", "ADJ")]),
        ]
    }

    #[test]
    fn test_bigrams_by_form() {
        let ngrams = NgramExtractor::new(2, 1, NgramKey::Form).extract(&corpus());
        assert_eq!(
            ngrams,
            vec![
                Ngram {
                    ngram: "güzel evler".to_string(),
                    frequency: 2
                },
                Ngram {
                    ngram: "büyük ev".to_string(),
                    frequency: 1
                },
            ]
        );
    }

    #[test]
    fn test_bigrams_by_lemma() {
        let ngrams = NgramExtractor::new(2, 1, NgramKey::Lemma).extract(&corpus());
        assert_eq!(ngrams[0].ngram, "güzel ev");
        assert_eq!(ngrams[0].frequency, 2);
        assert_eq!(ngrams[1].ngram, "büyük ev");
    }

    #[test]
    fn test_pos_patterns() {
        let ngrams = NgramExtractor::new(2, 2, NgramKey::Upos).extract(&corpus());
        assert_eq!(ngrams.len(), 1);
        assert_eq!(ngrams[0].ngram, "ADJ NOUN");
        assert_eq!(ngrams[0].frequency, 3);
    }

    #[test]
    fn test_no_cross_sentence_ngrams() {
        // "evler büyük" and "ev güzel" would only exist across boundaries
        let ngrams = NgramExtractor::new(2, 1, NgramKey::Form).extract(&corpus());
        assert!(ngrams.iter().all(|g| g.ngram != "evler büyük"));
        assert!(ngrams.iter().all(|g| g.ngram != "ev güzel"));
    }

    #[test]
    fn test_tie_break_first_seen() {
        let sentences = vec![
            sentence(1, &[("c", "c", "X"), ("d", "d", "X")]),
            sentence(2, &[("a", "a", "X"), ("b", "b", "X")]),
        ];
        let ngrams = NgramExtractor::new(2, 1, NgramKey::Form).extract(&sentences);
        let order: Vec<_> = ngrams.iter().map(|g| g.ngram.as_str()).collect();
        assert_eq!(order, vec!["c d", "a b"]);
    }

    #[test]
    fn test_min_frequency_and_limit() {
        let extractor = NgramExtractor::default();
        assert_eq!(extractor.extract(&corpus()).len(), 1);

        let extractor = NgramExtractor {
            limit: Some(1),
            ..NgramExtractor::new(1, 1, NgramKey::Lemma)
        };
        let ngrams = extractor.extract(&corpus());
        assert_eq!(ngrams.len(), 1);
        assert_eq!(ngrams[0].ngram, "güzel");
        assert_eq!(ngrams[0].frequency, 3);
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(NgramExtractor::new(0, 1, NgramKey::Form).extract(&corpus()).is_empty());
        assert!(NgramExtractor::new(9, 1, NgramKey::Form).extract(&corpus()).is_empty());
    }
}
