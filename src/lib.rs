//! corpusql: query engine for annotated linguistic corpora
//!
//! Reads CoNLL-U and VRT into one token/sentence model and answers
//! keyword-in-context, CQP-style pattern, collocation, n-gram, frequency and
//! dependency queries over it.

// Data model and formats
pub mod bytes; // Field splitting and Key=Value lists
pub mod codec; // Shared codec contract
pub mod conllu; // CoNLL-U codec
pub mod document; // Token / sentence / document model
pub mod vrt; // VRT codec and CoNLL-U conversion

// Pattern queries
pub mod pattern; // Token constraints and query patterns
pub mod query; // CQP query compiler
pub mod searcher; // Sliding-window matcher

// Analyses
pub mod collocation;
pub mod concordance;
pub mod dependency;
pub mod frequency;
pub mod ngram;
pub mod tree; // Arena dependency trees

// Storage and loading
pub mod config;
pub mod corpus;
pub mod index; // Inverted token index
pub mod store;

// Re-exports for convenience
pub use codec::{CodecError, FormatCodec, ParseWarning, Parsed, Validation};
pub use collocation::{Collocate, CollocationAnalyzer, CollocationKey, RankBy};
pub use concordance::{ConcordanceEngine, FieldQuery, KwicRow};
pub use config::{ConfigError, EngineConfig};
pub use conllu::ConlluCodec;
pub use corpus::{Corpus, CorpusError, Format};
pub use dependency::{
    DependencyError, DependencyGraphService, DependencyStatistics, DeprelMatch, Head,
    HeadDependentPair, PairFilter, SentenceTree,
};
pub use document::{Document, Features, Metadata, Sentence, Token};
pub use frequency::{FrequencyKey, FrequencyRow, pos_distribution, type_token_ratio, word_frequency};
pub use ngram::{Ngram, NgramExtractor, NgramKey};
pub use pattern::{ConstraintValue, QueryPattern, TokenConstraint, TokenField};
pub use query::{CompileOptions, QueryError, QueryInfo, compile_query, query_info, validate_query};
pub use searcher::{PatternMatch, PatternMatcher};
pub use store::{
    CorpusStore, DocumentId, InMemoryStore, Page, SentenceRef, StoreError, TokenFilter, TokenHit,
};
pub use tree::{DependencyTree, TreeError, TreeNode};
pub use vrt::{VrtCodec, VrtColumn, conllu_to_vrt, vrt_to_conllu};
