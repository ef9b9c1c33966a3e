//! Frequency lists and distribution counts

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::document::{Sentence, Token};

/// Count values, most frequent first; ties keep first-seen order
///
/// Empty values are not counted.
pub fn ranked_counts<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut slots: FxHashMap<&str, usize> = FxHashMap::default();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        if value.is_empty() {
            continue;
        }
        match slots.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}

/// Which attribute a frequency list is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyKey {
    Form,
    #[default]
    Lemma,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    pub word: String,
    /// Same as `word` for lemma lists, empty for form lists
    pub lemma: String,
    /// Most common UPOS among the counted tokens
    pub pos: String,
    pub frequency: usize,
    /// Share of all non-punctuation tokens, in percent
    pub percentage: f64,
}

/// Word or lemma frequencies over non-punctuation tokens, keys lower-cased
pub fn word_frequency(
    sentences: &[Sentence],
    key: FrequencyKey,
    limit: Option<usize>,
) -> Vec<FrequencyRow> {
    let tokens: Vec<&Token> = sentences
        .iter()
        .flat_map(|s| s.tokens.iter())
        .filter(|t| !t.is_punct())
        .collect();
    let total = tokens.len();

    let keys: Vec<String> = tokens
        .iter()
        .map(|t| match key {
            FrequencyKey::Form => t.form.to_lowercase(),
            FrequencyKey::Lemma => t.lemma.to_lowercase(),
        })
        .collect();

    let mut tags: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for (k, token) in keys.iter().zip(&tokens) {
        tags.entry(k.as_str()).or_default().push(token.upos.as_str());
    }

    let mut rows: Vec<FrequencyRow> = ranked_counts(keys.iter().map(String::as_str))
        .into_iter()
        .map(|(word, frequency)| {
            let pos = tags
                .get(word.as_str())
                .and_then(|t| ranked_counts(t.iter().copied()).into_iter().next())
                .map(|(tag, _)| tag)
                .unwrap_or_default();
            FrequencyRow {
                lemma: match key {
                    FrequencyKey::Lemma => word.clone(),
                    FrequencyKey::Form => String::new(),
                },
                word,
                pos,
                frequency,
                percentage: percentage(frequency, total),
            }
        })
        .collect();

    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Distinct surface forms over all tokens; 0 for an empty corpus
pub fn type_token_ratio(sentences: &[Sentence]) -> f64 {
    let mut types: FxHashSet<&str> = FxHashSet::default();
    let mut tokens = 0usize;
    for token in sentences.iter().flat_map(|s| s.tokens.iter()) {
        types.insert(token.form.as_str());
        tokens += 1;
    }
    if tokens == 0 {
        0.0
    } else {
        types.len() as f64 / tokens as f64
    }
}

/// Full UPOS distribution
pub fn pos_distribution(sentences: &[Sentence]) -> Vec<(String, usize)> {
    ranked_counts(
        sentences
            .iter()
            .flat_map(|s| s.tokens.iter())
            .map(|t| t.upos.as_str()),
    )
}
