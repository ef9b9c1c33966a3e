//! Engine configuration loaded from TOML
//!
//! Every section and every key is optional; missing values take the
//! defaults below and unknown keys are ignored.
//!
//! ```toml
//! [query]
//! context_size = 5
//! case_sensitive = false
//! regex = true
//! sentence_bounded = false
//!
//! [collocation]
//! window = 5
//! min_frequency = 2
//! key = "lemma"      # or "form"
//! rank_by = "mi"     # or "t_score", "frequency"
//!
//! [ngram]
//! n = 2
//! min_frequency = 2
//! key = "form"       # or "lemma", "upos"
//!
//! [statistics]
//! top_k = 10
//!
//! [vrt]
//! columns = ["form", "upos", "lemma", "feats"]
//! ```

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::collocation::{CollocationAnalyzer, CollocationKey, RankBy};
use crate::concordance::ConcordanceEngine;
use crate::ngram::{NgramExtractor, NgramKey};
use crate::query::CompileOptions;
use crate::searcher::DEFAULT_CONTEXT_SIZE;
use crate::vrt::{VrtCodec, VrtColumn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// `[query]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuerySection {
    pub context_size: usize,
    pub case_sensitive: bool,
    pub regex: bool,
    pub sentence_bounded: bool,
    pub limit: Option<usize>,
}

impl Default for QuerySection {
    fn default() -> Self {
        Self {
            context_size: DEFAULT_CONTEXT_SIZE,
            case_sensitive: false,
            regex: true,
            sentence_bounded: false,
            limit: None,
        }
    }
}

/// `[collocation]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CollocationSection {
    pub window: usize,
    pub min_frequency: usize,
    pub key: CollocationKey,
    pub rank_by: RankBy,
    pub limit: Option<usize>,
}

impl Default for CollocationSection {
    fn default() -> Self {
        Self {
            window: 5,
            min_frequency: 2,
            key: CollocationKey::Lemma,
            rank_by: RankBy::Mi,
            limit: None,
        }
    }
}

/// `[ngram]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NgramSection {
    pub n: usize,
    pub min_frequency: usize,
    pub key: NgramKey,
    pub limit: Option<usize>,
}

impl Default for NgramSection {
    fn default() -> Self {
        Self {
            n: 2,
            min_frequency: 2,
            key: NgramKey::Form,
            limit: None,
        }
    }
}

/// `[statistics]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatisticsSection {
    /// Entries kept in each distribution
    pub top_k: usize,
}

impl Default for StatisticsSection {
    fn default() -> Self {
        Self { top_k: 10 }
    }
}

/// `[vrt]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VrtSection {
    pub columns: Vec<VrtColumn>,
}

impl Default for VrtSection {
    fn default() -> Self {
        Self {
            columns: VrtColumn::DEFAULT_LAYOUT.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub query: QuerySection,
    pub collocation: CollocationSection,
    pub ngram: NgramSection,
    pub statistics: StatisticsSection,
    pub vrt: VrtSection,
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("query.context_size", self.query.context_size),
            ("collocation.window", self.collocation.window),
            ("ngram.n", self.ngram.n),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be at least 1")));
            }
        }

        let columns = &self.vrt.columns;
        if columns.is_empty() {
            return Err(ConfigError::Invalid("vrt.columns must not be empty".to_string()));
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(ConfigError::Invalid(format!(
                    "vrt.columns lists {column:?} more than once"
                )));
            }
        }
        Ok(())
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            regex: self.query.regex,
            case_sensitive: self.query.case_sensitive,
        }
    }

    pub fn concordance_engine(&self) -> ConcordanceEngine {
        ConcordanceEngine {
            sentence_bounded: self.query.sentence_bounded,
            limit: self.query.limit,
            options: self.compile_options(),
            ..ConcordanceEngine::new(self.query.context_size)
        }
    }

    pub fn collocation_analyzer(&self) -> CollocationAnalyzer {
        let section = &self.collocation;
        CollocationAnalyzer {
            key: section.key,
            rank_by: section.rank_by,
            limit: section.limit,
            ..CollocationAnalyzer::new(section.window, section.min_frequency)
        }
    }

    pub fn ngram_extractor(&self) -> NgramExtractor {
        let section = &self.ngram;
        NgramExtractor {
            limit: section.limit,
            ..NgramExtractor::new(section.n, section.min_frequency, section.key)
        }
    }

    pub fn vrt_codec(&self) -> VrtCodec {
        VrtCodec::new(self.vrt.columns.clone())
    }
}
