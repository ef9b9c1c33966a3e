//! Collocation analysis
//!
//! For each occurrence of a target word, every non-punctuation token within
//! `window` positions in the same sentence is counted as a co-occurrence.
//! Collocates that reach `min_frequency` are scored with
//!
//! ```text
//! p1 = f(target) / N    p2 = f(collocate) / N    p12 = f(co-occurrence) / N
//! MI = log2(p12 / (p1 * p2))
//! T  = (p12 - p1 * p2) / sqrt(p12 / N)
//! ```
//!
//! where N is the number of tokens in the analysed sentences. Either score is
//! 0 when it cannot be computed.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::document::{Sentence, Token};
use crate::pattern::ConstraintValue;

/// Token attribute used to identify targets and collocates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollocationKey {
    #[default]
    Lemma,
    Form,
}

impl CollocationKey {
    /// Lower-cased key for a token
    fn of(self, token: &Token) -> String {
        match self {
            CollocationKey::Lemma => token.lemma.to_lowercase(),
            CollocationKey::Form => token.form.to_lowercase(),
        }
    }
}

/// Association measure used to order results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    #[default]
    Mi,
    TScore,
    Frequency,
}

/// One collocate of the target with its association scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collocate {
    pub collocate: String,
    /// Co-occurrences with the target inside the window
    pub frequency: usize,
    pub left: usize,
    pub right: usize,
    pub collocate_frequency: usize,
    pub target_frequency: usize,
    pub mutual_information: f64,
    pub t_score: f64,
}

#[derive(Default)]
struct Cooccurrence {
    left: usize,
    right: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollocationAnalyzer {
    pub window: usize,
    pub min_frequency: usize,
    pub key: CollocationKey,
    pub rank_by: RankBy,
    pub limit: Option<usize>,
    /// Treat the target as a regex matching the whole key
    pub target_regex: bool,
}

impl Default for CollocationAnalyzer {
    fn default() -> Self {
        Self {
            window: 5,
            min_frequency: 2,
            key: CollocationKey::Lemma,
            rank_by: RankBy::Mi,
            limit: None,
            target_regex: false,
        }
    }
}

impl CollocationAnalyzer {
    pub fn new(window: usize, min_frequency: usize) -> Self {
        Self {
            window,
            min_frequency,
            ..Self::default()
        }
    }

    pub fn analyze(&self, sentences: &[Sentence], target: &str) -> Vec<Collocate> {
        let matcher = if self.target_regex {
            ConstraintValue::anchored(target, false)
        } else {
            ConstraintValue::literal(target, false)
        };

        let mut total = 0usize;
        let mut target_frequency = 0usize;
        let mut frequencies: FxHashMap<String, usize> = FxHashMap::default();
        let mut cooccurrences: FxHashMap<String, Cooccurrence> = FxHashMap::default();

        for sentence in sentences {
            let keys: Vec<String> = sentence.tokens.iter().map(|t| self.key.of(t)).collect();
            let is_target: Vec<bool> = keys.iter().map(|k| matcher.matches(k)).collect();

            total += sentence.len();
            for key in &keys {
                *frequencies.entry(key.clone()).or_default() += 1;
            }

            for (pos, _) in is_target.iter().enumerate().filter(|(_, t)| **t) {
                target_frequency += 1;
                let start = pos.saturating_sub(self.window);
                let end = pos.saturating_add(self.window).min(keys.len() - 1);

                for other in start..=end {
                    let token = &sentence.tokens[other];
                    if other == pos || is_target[other] || token.is_punct() || keys[other].is_empty() {
                        continue;
                    }
                    let entry = cooccurrences.entry(keys[other].clone()).or_default();
                    if other < pos {
                        entry.left += 1;
                    } else {
                        entry.right += 1;
                    }
                }
            }
        }

        let mut collocates: Vec<Collocate> = cooccurrences
            .into_iter()
            .filter_map(|(collocate, co)| {
                let frequency = co.left + co.right;
                if frequency < self.min_frequency {
                    return None;
                }
                let collocate_frequency = frequencies.get(&collocate).copied().unwrap_or(0);
                let (mutual_information, t_score) =
                    association(total, target_frequency, collocate_frequency, frequency);
                Some(Collocate {
                    collocate,
                    frequency,
                    left: co.left,
                    right: co.right,
                    collocate_frequency,
                    target_frequency,
                    mutual_information,
                    t_score,
                })
            })
            .collect();

        collocates.sort_by(|a, b| self.rank(a, b));
        if let Some(limit) = self.limit {
            collocates.truncate(limit);
        }

        tracing::debug!(
            target,
            occurrences = target_frequency,
            collocates = collocates.len(),
            "collocation analysis"
        );
        collocates
    }

    /// Descending score, then descending frequency, then collocate
    fn rank(&self, a: &Collocate, b: &Collocate) -> Ordering {
        let score = |c: &Collocate| match self.rank_by {
            RankBy::Mi => c.mutual_information,
            RankBy::TScore => c.t_score,
            RankBy::Frequency => c.frequency as f64,
        };
        score(b)
            .total_cmp(&score(a))
            .then_with(|| b.frequency.cmp(&a.frequency))
            .then_with(|| a.collocate.cmp(&b.collocate))
    }
}

/// Mutual information and T-score, each 0 when undefined
pub fn association(
    total: usize,
    target_frequency: usize,
    collocate_frequency: usize,
    cooccurrence: usize,
) -> (f64, f64) {
    if total == 0 {
        return (0.0, 0.0);
    }
    let n = total as f64;
    let p1 = target_frequency as f64 / n;
    let p2 = collocate_frequency as f64 / n;
    let p12 = cooccurrence as f64 / n;

    let quotient = p12 / (p1 * p2);
    let mi = if quotient > 0.0 && quotient.is_finite() {
        quotient.log2()
    } else {
        0.0
    };

    let t = (p12 - p1 * p2) / (p12 / n).sqrt();
    let t = if t.is_finite() { t } else { 0.0 };

    (mi, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(index: usize, words: &[(&str, &str)]) -> Sentence {
        let tokens = words
            .iter()
            .enumerate()
            .map(|(i, (lemma, pos))| Token::new(i + 1, lemma, lemma, pos))
            .collect();
        Sentence::new(index, tokens)
    }

    fn corpus() -> Vec<Sentence> {
        vec![
            sentence(1, &[("güzel", "ADJ"), ("ev", "NOUN"), ("var", "VERB"), (".", "PUNCT")]),
            sentence(2, &[("büyük", "ADJ"), ("ev", "NOUN"), ("güzel", "ADJ")]),
            sentence(3, &[("güzel", "ADJ"), ("kedi", "NOUN")]),
        ]
    }

    #[test]
    fn test_counts_and_directions() {
        let analyzer = CollocationAnalyzer::new(1, 1);
        let collocates = analyzer.analyze(&corpus(), "ev");

        let guzel = collocates.iter().find(|c| c.collocate == "güzel").unwrap();
        assert_eq!(guzel.frequency, 2);
        assert_eq!(guzel.left, 1);
        assert_eq!(guzel.right, 1);
        assert_eq!(guzel.collocate_frequency, 3);
        assert_eq!(guzel.target_frequency, 2);

        // Punctuation and tokens outside the window are not counted
        assert!(collocates.iter().all(|c| c.collocate != "."));
        assert!(collocates.iter().all(|c| c.collocate != "kedi"));
    }

    #[test]
    fn test_scores() {
        let analyzer = CollocationAnalyzer::new(1, 1);
        let collocates = analyzer.analyze(&corpus(), "ev");
        let guzel = collocates.iter().find(|c| c.collocate == "güzel").unwrap();

        // N = 9, p1 = 2/9, p2 = 3/9, p12 = 2/9
        let n = 9.0_f64;
        let (p1, p2, p12) = (2.0 / n, 3.0 / n, 2.0 / n);
        let mi = (p12 / (p1 * p2)).log2();
        let t = (p12 - p1 * p2) / (p12 / n).sqrt();
        assert!((guzel.mutual_information - mi).abs() < 1e-12);
        assert!((guzel.t_score - t).abs() < 1e-12);
    }

    #[test]
    fn test_min_frequency_filter() {
        let analyzer = CollocationAnalyzer::new(5, 2);
        let collocates = analyzer.analyze(&corpus(), "ev");
        let names: Vec<_> = collocates.iter().map(|c| c.collocate.as_str()).collect();
        assert_eq!(names, vec!["güzel"]);
    }

    #[test]
    fn test_case_insensitive_target() {
        let analyzer = CollocationAnalyzer::new(1, 1);
        assert_eq!(analyzer.analyze(&corpus(), "EV").len(), 3);
    }

    #[test]
    fn test_rank_by_frequency() {
        let analyzer = CollocationAnalyzer {
            rank_by: RankBy::Frequency,
            ..CollocationAnalyzer::new(5, 1)
        };
        let collocates = analyzer.analyze(&corpus(), "ev");
        assert_eq!(collocates[0].collocate, "güzel");
        let rest: Vec<_> = collocates[1..].iter().map(|c| c.collocate.as_str()).collect();
        assert_eq!(rest, vec!["büyük", "var"]);
    }

    #[test]
    fn test_regex_target_and_fallback() {
        let analyzer = CollocationAnalyzer {
            target_regex: true,
            ..CollocationAnalyzer::new(1, 1)
        };
        let collocates = analyzer.analyze(&corpus(), "ke.*");
        assert_eq!(collocates.len(), 1);
        assert_eq!(collocates[0].collocate, "güzel");

        // Invalid regex degrades to substring matching
        assert!(analyzer.analyze(&corpus(), "ev(").is_empty());
    }

    #[test]
    fn test_empty_corpus() {
        let collocates = CollocationAnalyzer::default().analyze(&[], "ev");
        assert!(collocates.is_empty());
        assert_eq!(association(0, 0, 0, 0), (0.0, 0.0));
        assert_eq!(association(10, 0, 3, 0), (0.0, 0.0));
    }

    #[test]
    fn test_limit() {
        let analyzer = CollocationAnalyzer {
            limit: Some(1),
            ..CollocationAnalyzer::new(5, 1)
        };
        assert_eq!(analyzer.analyze(&corpus(), "ev").len(), 1);
    }
}
