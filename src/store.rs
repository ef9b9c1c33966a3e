//! Corpus storage contract and an in-memory implementation
//!
//! The query engines never talk to storage; callers fetch sentences through
//! [`CorpusStore`] and hand them over. [`InMemoryStore`] keeps each imported
//! document as an immutable snapshot together with its [`TokenIndex`], and
//! publishes it with a single write so readers see all of a document or
//! none of it.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use thiserror::Error;

use crate::document::{Document, Sentence, Token};
use crate::index::{IndexedField, TokenIndex, TokenRef};

pub type DocumentId = u64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Document {0} not found")]
    DocumentNotFound(DocumentId),

    #[error("Sentence {sentence} not found in document {document}")]
    SentenceNotFound { document: DocumentId, sentence: usize },
}

/// Address of a sentence: owning document and 1-based sentence index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SentenceRef {
    pub document: DocumentId,
    pub sentence: usize,
}

/// Field-equality conditions; unset fields accept any token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFilter {
    pub form: Option<String>,
    pub lemma: Option<String>,
    pub upos: Option<String>,
    pub deprel: Option<String>,
}

impl TokenFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(mut self, form: &str) -> Self {
        self.form = Some(form.to_string());
        self
    }

    pub fn lemma(mut self, lemma: &str) -> Self {
        self.lemma = Some(lemma.to_string());
        self
    }

    pub fn upos(mut self, upos: &str) -> Self {
        self.upos = Some(upos.to_string());
        self
    }

    pub fn deprel(mut self, deprel: &str) -> Self {
        self.deprel = Some(deprel.to_string());
        self
    }

    fn conditions(&self) -> Vec<(IndexedField, &str)> {
        [
            (IndexedField::Form, &self.form),
            (IndexedField::Lemma, &self.lemma),
            (IndexedField::Upos, &self.upos),
            (IndexedField::Deprel, &self.deprel),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

/// Offset/limit window over a result list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Page {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    fn apply<T>(&self, items: impl Iterator<Item = T>) -> Vec<T> {
        let items = items.skip(self.offset);
        match self.limit {
            Some(limit) => items.take(limit).collect(),
            None => items.collect(),
        }
    }
}

/// A token found by [`CorpusStore::find_tokens`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenHit {
    pub sentence: SentenceRef,
    pub token: Token,
}

pub trait CorpusStore {
    /// Store a document and return its id
    fn import(&self, document: Document) -> DocumentId;

    /// Sentences of a document, in order
    fn get_sentences(&self, document: DocumentId) -> Result<Vec<Sentence>, StoreError>;

    /// Tokens of one sentence, in order
    fn get_tokens(&self, sentence: SentenceRef) -> Result<Vec<Token>, StoreError>;

    /// Tokens matching `filter` across all documents, by document id then
    /// position
    fn find_tokens(&self, filter: &TokenFilter, page: Page) -> Vec<TokenHit>;
}

#[derive(Debug)]
struct StoredDocument {
    document: Arc<Document>,
    index: TokenIndex,
}

impl StoredDocument {
    fn resolve(&self, id: DocumentId, at: TokenRef) -> Option<TokenHit> {
        let sentence = self.document.sentences.get(at.sentence)?;
        let token = sentence.tokens.get(at.token)?;
        Some(TokenHit {
            sentence: SentenceRef {
                document: id,
                sentence: sentence.index,
            },
            token: token.clone(),
        })
    }

    fn positions(&self) -> impl Iterator<Item = TokenRef> + '_ {
        self.document
            .sentences
            .iter()
            .enumerate()
            .flat_map(|(s, sentence)| {
                (0..sentence.len()).map(move |t| TokenRef {
                    sentence: s,
                    token: t,
                })
            })
    }
}

/// Thread-safe store holding every document in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<BTreeMap<DocumentId, Arc<StoredDocument>>>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn document_ids(&self) -> Vec<DocumentId> {
        self.read().keys().copied().collect()
    }

    /// Shared snapshot of a stored document, without copying it
    pub fn document(&self, id: DocumentId) -> Result<Arc<Document>, StoreError> {
        Ok(Arc::clone(&self.stored(id)?.document))
    }

    fn read(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, BTreeMap<DocumentId, Arc<StoredDocument>>> {
        // Entries are only ever inserted whole, so a poisoned map is still
        // consistent
        self.documents.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn stored(&self, id: DocumentId) -> Result<Arc<StoredDocument>, StoreError> {
        self.read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::DocumentNotFound(id))
    }
}

impl CorpusStore for InMemoryStore {
    fn import(&self, document: Document) -> DocumentId {
        // Index outside the lock; publish in one insert
        let index = TokenIndex::build(&document);
        let tokens = index.len();
        let stored = Arc::new(StoredDocument {
            document: Arc::new(document),
            index,
        });

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, stored);

        tracing::debug!(document = id, tokens, "imported document");
        id
    }

    fn get_sentences(&self, document: DocumentId) -> Result<Vec<Sentence>, StoreError> {
        Ok(self.stored(document)?.document.sentences.clone())
    }

    fn get_tokens(&self, sentence: SentenceRef) -> Result<Vec<Token>, StoreError> {
        let stored = self.stored(sentence.document)?;
        stored
            .document
            .sentence(sentence.sentence)
            .map(|s| s.tokens.clone())
            .ok_or(StoreError::SentenceNotFound {
                document: sentence.document,
                sentence: sentence.sentence,
            })
    }

    fn find_tokens(&self, filter: &TokenFilter, page: Page) -> Vec<TokenHit> {
        let conditions = filter.conditions();
        // Snapshot the entries so the lock is not held while paging
        let documents: Vec<(DocumentId, Arc<StoredDocument>)> = self
            .read()
            .iter()
            .map(|(&id, stored)| (id, Arc::clone(stored)))
            .collect();

        let hits = documents.iter().flat_map(|(id, stored)| {
            let positions: Box<dyn Iterator<Item = TokenRef> + '_> =
                match stored.index.lookup(&conditions) {
                    Some(refs) => Box::new(refs.into_iter()),
                    None => Box::new(stored.positions()),
                };
            positions.filter_map(move |at| stored.resolve(*id, at))
        });
        page.apply(hits)
    }
}
