//! Canonical token / sentence / document model
//!
//! Both codecs produce these values and every query engine consumes them.
//! Values are immutable once a codec has built them; corrections replace a
//! whole `Token` rather than editing fields in place.

use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Feature name to value. Ordered so that serialization is deterministic.
pub type Features = BTreeMap<String, String>;

/// String-keyed metadata (comments, structural attributes)
pub type Metadata = BTreeMap<String, String>;

/// UPOS tag marking punctuation
pub const PUNCT: &str = "PUNCT";

/// One annotated word or punctuation mark
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Token {
    /// 1-based position within the sentence
    pub index: usize,
    pub form: String,
    pub lemma: String,
    pub upos: String,
    pub xpos: String,
    pub feats: Features,
    /// Index of the governing token, 0 for the sentence root
    pub head: usize,
    pub deprel: String,
    /// Enhanced dependencies, kept verbatim
    pub deps: String,
    pub misc: Features,
    /// Unrecognised trailing VRT columns, kept verbatim
    pub extra: Vec<String>,
    /// Index of the owning sentence
    pub sentence_id: usize,
}

impl Token {
    /// Create a token with the attributes the query engines look at
    pub fn new(index: usize, form: &str, lemma: &str, upos: &str) -> Self {
        Self {
            index,
            form: form.to_string(),
            lemma: lemma.to_string(),
            upos: upos.to_string(),
            ..Self::default()
        }
    }

    /// Attach the token to `head` with relation `deprel`
    pub fn with_head(mut self, head: usize, deprel: &str) -> Self {
        self.head = head;
        self.deprel = deprel.to_string();
        self
    }

    pub fn with_feature(mut self, key: &str, value: &str) -> Self {
        self.feats.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_punct(&self) -> bool {
        self.upos == PUNCT
    }

    pub fn is_root(&self) -> bool {
        self.head == 0
    }

    /// True unless MISC carries `SpaceAfter=No`
    pub fn space_after(&self) -> bool {
        self.misc.get("SpaceAfter").map(String::as_str) != Some("No")
    }

    /// Annotation confidence from a `Confidence=<float>` MISC entry, else 1.0
    pub fn confidence(&self) -> f64 {
        self.misc
            .get("Confidence")
            .and_then(|c| c.parse::<f64>().ok())
            .filter(|c| c.is_finite())
            .unwrap_or(1.0)
    }
}

impl AsRef<Token> for Token {
    fn as_ref(&self) -> &Token {
        self
    }
}

/// An ordered, non-empty sequence of tokens
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Sentence {
    /// 1-based position within the document
    pub index: usize,
    /// Literal sentence text, when the source supplied one
    pub text: Option<String>,
    pub metadata: Metadata,
    pub tokens: Vec<Token>,
}

impl Sentence {
    /// Create a sentence and point every token's back-reference at it
    pub fn new(index: usize, mut tokens: Vec<Token>) -> Self {
        for token in &mut tokens {
            token.sentence_id = index;
        }
        Self {
            index,
            text: None,
            metadata: Metadata::new(),
            tokens,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Look up a token by its 1-based index
    pub fn token(&self, index: usize) -> Option<&Token> {
        // Dense indices are the norm; fall back to a scan otherwise
        match index.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) if token.index == index => Some(token),
            _ => self.tokens.iter().find(|t| t.index == index),
        }
    }

    /// First token with `head == 0`
    pub fn root(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| t.is_root())
    }

    /// Sentence text, reconstructed from forms when none was supplied
    ///
    /// Reconstruction joins forms with single spaces, except after a token
    /// whose MISC says `SpaceAfter=No`.
    pub fn text(&self) -> Cow<'_, str> {
        if let Some(text) = &self.text {
            return Cow::Borrowed(text);
        }
        let mut text = String::new();
        let mut glue = false;
        for token in &self.tokens {
            if glue {
                text.push(' ');
            }
            text.push_str(&token.form);
            glue = token.space_after();
        }
        Cow::Owned(text)
    }
}

/// An ordered sequence of sentences plus document-level metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    pub metadata: Metadata,
    pub sentences: Vec<Sentence>,
}

impl Document {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self {
            metadata: Metadata::new(),
            sentences,
        }
    }

    /// All tokens in document order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.sentences.iter().flat_map(|s| s.tokens.iter())
    }

    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(Sentence::len).sum()
    }

    /// Look up a sentence by its 1-based index
    pub fn sentence(&self, index: usize) -> Option<&Sentence> {
        match index.checked_sub(1).and_then(|i| self.sentences.get(i)) {
            Some(sentence) if sentence.index == index => Some(sentence),
            _ => self.sentences.iter().find(|s| s.index == index),
        }
    }
}

/// Flatten sentences into one token stream, in order
pub fn token_stream<'a, I>(sentences: I) -> Vec<&'a Token>
where
    I: IntoIterator<Item = &'a Sentence>,
{
    sentences
        .into_iter()
        .flat_map(|s| s.tokens.iter())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sentence() -> Sentence {
        let mut cumle = Token::new(4, "cümlesidir", "cümle", "NOUN");
        cumle.misc.insert("SpaceAfter".to_string(), "No".to_string());
        Sentence::new(
            1,
            vec![
                Token::new(1, "Bu", "bu", "DET").with_head(4, "det"),
                Token::new(2, "bir", "bir", "DET").with_head(4, "det"),
                Token::new(3, "test", "test", "NOUN").with_head(4, "nmod"),
                cumle.with_head(0, "root"),
                Token::new(5, ".", ".", "PUNCT").with_head(4, "punct"),
            ],
        )
    }

    #[test]
    fn test_sentence_back_reference() {
        let sentence = Sentence::new(7, vec![Token::new(1, "ev", "ev", "NOUN")]);
        assert_eq!(sentence.tokens[0].sentence_id, 7);
    }

    #[test]
    fn test_text_reconstruction() {
        let sentence = sample_sentence();
        assert_eq!(sentence.text(), "Bu bir test cümlesidir.");

        let literal = sample_sentence().with_text("Bu bir test cümlesidir .");
        assert_eq!(literal.text(), "Bu bir test cümlesidir .");
    }

    #[test]
    fn test_token_lookup_and_root() {
        let sentence = sample_sentence();
        assert_eq!(sentence.token(3).unwrap().form, "test");
        assert!(sentence.token(9).is_none());
        assert!(sentence.token(0).is_none());
        assert_eq!(sentence.root().unwrap().index, 4);
    }

    #[test]
    fn test_confidence() {
        let mut token = Token::new(1, "ev", "ev", "NOUN");
        assert_eq!(token.confidence(), 1.0);
        token.misc.insert("Confidence".to_string(), "0.75".to_string());
        assert_eq!(token.confidence(), 0.75);
        token.misc.insert("Confidence".to_string(), "high".to_string());
        assert_eq!(token.confidence(), 1.0);
    }

    #[test]
    fn test_document_tokens() {
        let doc = Document::new(vec![sample_sentence(), {
            let mut s = sample_sentence();
            s.index = 2;
            s
        }]);
        assert_eq!(doc.token_count(), 10);
        assert_eq!(doc.tokens().count(), 10);
        assert_eq!(doc.sentence(2).unwrap().index, 2);
        assert_eq!(token_stream(&doc.sentences).len(), 10);
    }
}
