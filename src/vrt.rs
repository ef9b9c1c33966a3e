//! VRT (vertical text) parsing and serialization
//!
//! One token per line with tab-separated positional attributes, interleaved
//! with XML-like structural tags:
//!
//! ```text
//! <text id="doc1" author="Ahmet Yılmaz">
//! <p>
//! <s>
//! Türk	NOUN	türk	Case=Nom
//! dili	NOUN	dil	Case=Nom|Number=Sing
//! </s>
//! </p>
//! </text>
//! ```
//!
//! Structural tags must nest properly; a mismatched or unclosed tag fails the
//! whole parse.

use crate::bytes::{field_or_placeholder, field_value, format_pairs, parse_pairs, split_fields};
use crate::codec::{CodecError, FormatCodec, ParseWarning, Parsed, Validation};
use crate::conllu::ConlluCodec;
use crate::document::{Document, Metadata, Sentence, Token};
use serde::{Deserialize, Serialize};

/// Sentence metadata key recording the enclosing `<p>` element
pub const PARAGRAPH_KEY: &str = "paragraph";

/// Positional attribute carried by a VRT column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VrtColumn {
    Form,
    Lemma,
    Upos,
    Xpos,
    Feats,
    Misc,
}

impl VrtColumn {
    /// Column layout used when none is configured
    pub const DEFAULT_LAYOUT: [VrtColumn; 4] = [
        VrtColumn::Form,
        VrtColumn::Upos,
        VrtColumn::Lemma,
        VrtColumn::Feats,
    ];

    fn read(self, token: &mut Token, value: &str) {
        let value = field_value(value);
        match self {
            VrtColumn::Form => token.form = value.to_string(),
            VrtColumn::Lemma => token.lemma = value.to_string(),
            VrtColumn::Upos => token.upos = value.to_string(),
            VrtColumn::Xpos => token.xpos = value.to_string(),
            VrtColumn::Feats => token.feats = parse_pairs(value),
            VrtColumn::Misc => token.misc = parse_pairs(value),
        }
    }

    fn write(self, token: &Token) -> String {
        match self {
            VrtColumn::Form => field_or_placeholder(&token.form).to_string(),
            VrtColumn::Lemma => field_or_placeholder(&token.lemma).to_string(),
            VrtColumn::Upos => field_or_placeholder(&token.upos).to_string(),
            VrtColumn::Xpos => field_or_placeholder(&token.xpos).to_string(),
            VrtColumn::Feats => format_pairs(&token.feats),
            VrtColumn::Misc => format_pairs(&token.misc),
        }
    }
}

/// A structural tag line
#[derive(Debug, PartialEq)]
struct Tag<'a> {
    closing: bool,
    self_closing: bool,
    name: &'a str,
    attributes: &'a str,
}

/// Recognise `<name attrs>`, `</name>` and `<name/>` at the start of a line
fn parse_tag(line: &str) -> Option<Tag<'_>> {
    let rest = line.strip_prefix('<')?;
    let (closing, rest) = match rest.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };

    let name_len = rest
        .char_indices()
        .find(|&(_, c)| !is_word_char(c))
        .map_or(rest.len(), |(i, _)| i);
    if name_len == 0 {
        return None;
    }
    let (name, rest) = rest.split_at(name_len);

    let end = rest.find('>')?;
    let attributes = rest[..end].trim();
    let (attributes, self_closing) = match attributes.strip_suffix('/') {
        Some(attrs) => (attrs.trim_end(), true),
        None => (attributes, false),
    };

    Some(Tag {
        closing,
        self_closing,
        name,
        attributes,
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Parse `key="value"` pairs; anything else in the tag is ignored
fn parse_attributes(s: &str) -> Metadata {
    let mut attributes = Metadata::new();
    let parts: Vec<&str> = s.split('"').collect();

    // Even segments precede an opening quote, odd segments are quoted values
    let mut i = 0;
    while i + 2 < parts.len() {
        if let Some(before) = parts[i].strip_suffix('=') {
            let key_start = before
                .char_indices()
                .rev()
                .take_while(|&(_, c)| is_word_char(c))
                .last()
                .map(|(idx, _)| idx);
            if let Some(start) = key_start {
                attributes.insert(before[start..].to_string(), unescape_value(parts[i + 1]));
            }
        }
        i += 2;
    }
    attributes
}

fn format_attributes(name: &str, attributes: &Metadata) -> String {
    let mut tag = format!("<{name}");
    for (key, value) in attributes {
        tag.push_str(&format!(" {key}=\"{}\"", escape_value(value)));
    }
    tag.push('>');
    tag
}

/// XML entities for characters that would end a value or a tag
fn escape_value(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape_value(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Sentence under construction
struct PendingSentence {
    line: usize,
    metadata: Metadata,
    tokens: Vec<Token>,
}

/// Codec for VRT with a configurable column layout
#[derive(Debug, Clone, PartialEq)]
pub struct VrtCodec {
    columns: Vec<VrtColumn>,
}

impl Default for VrtCodec {
    fn default() -> Self {
        Self::new(VrtColumn::DEFAULT_LAYOUT.to_vec())
    }
}

impl VrtCodec {
    pub fn new(columns: Vec<VrtColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[VrtColumn] {
        &self.columns
    }

    /// Parse every `<text>` element in the input
    ///
    /// Sentences found outside any `<text>` element are gathered into an
    /// implicit document without metadata.
    pub fn parse_all(&self, text: &str) -> Result<(Vec<Document>, Vec<ParseWarning>), CodecError> {
        let mut documents: Vec<Document> = Vec::new();
        let mut warnings = Vec::new();
        let mut stack: Vec<&str> = Vec::new();

        let mut in_text = false;
        // Index of the implicit document collecting loose sentences
        let mut loose: Option<usize> = None;
        let mut paragraphs = 0usize;
        let mut paragraph: Option<usize> = None;
        let mut sentence: Option<PendingSentence> = None;

        for (line_idx, raw) in text.lines().enumerate() {
            let line_num = line_idx + 1;
            let line = raw.trim_end();
            if line.is_empty() {
                continue;
            }

            let Some(tag) = parse_tag(line) else {
                // Token line
                match sentence.as_mut() {
                    Some(pending) => {
                        let token = self.parse_token(line, pending.tokens.len() + 1);
                        pending.tokens.push(token);
                    }
                    None => warn_skip(&mut warnings, line_num, "Token outside <s> element"),
                }
                continue;
            };

            if tag.closing {
                if stack.last() != Some(&tag.name) {
                    return Err(CodecError::MismatchedClosingTag {
                        line: line_num,
                        tag: tag.name.to_string(),
                    });
                }
                stack.pop();

                match tag.name {
                    "s" => {
                        if let Some(pending) = sentence.take() {
                            let doc = target_document(&mut documents, in_text, &mut loose);
                            finish_sentence(doc, pending, &mut warnings);
                        }
                    }
                    "p" => paragraph = None,
                    "text" => in_text = false,
                    _ => {}
                }
                continue;
            }

            if !tag.self_closing {
                stack.push(tag.name);
            }

            match tag.name {
                "text" => {
                    let mut document = Document::default();
                    document.metadata = parse_attributes(tag.attributes);
                    documents.push(document);
                    in_text = true;
                    loose = None;
                    paragraphs = 0;
                    paragraph = None;
                }
                "p" => {
                    paragraphs += 1;
                    paragraph = Some(paragraphs);
                }
                "s" => {
                    // A nested <s> ends the enclosing one
                    if let Some(pending) = sentence.take() {
                        let doc = target_document(&mut documents, in_text, &mut loose);
                        finish_sentence(doc, pending, &mut warnings);
                    }
                    let mut metadata = parse_attributes(tag.attributes);
                    if let Some(n) = paragraph {
                        metadata.insert(PARAGRAPH_KEY.to_string(), n.to_string());
                    }
                    if tag.self_closing {
                        warn_skip(&mut warnings, line_num, "Empty <s> element");
                    } else {
                        sentence = Some(PendingSentence {
                            line: line_num,
                            metadata,
                            tokens: Vec::new(),
                        });
                    }
                }
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(CodecError::UnclosedTags(
                stack.into_iter().map(str::to_string).collect(),
            ));
        }

        tracing::debug!(
            documents = documents.len(),
            sentences = documents.iter().map(|d| d.sentences.len()).sum::<usize>(),
            skipped = warnings.len(),
            "parsed VRT"
        );

        Ok((documents, warnings))
    }

    /// Serialize several documents, one `<text>` element each
    pub fn serialize_all(&self, documents: &[Document]) -> String {
        documents.iter().map(|d| self.serialize(d)).collect()
    }

    fn parse_token(&self, line: &str, index: usize) -> Token {
        let fields = split_fields(line);
        let mut token = Token {
            index,
            ..Token::default()
        };
        for (column, value) in self.columns.iter().zip(&fields) {
            column.read(&mut token, value);
        }
        if fields.len() > self.columns.len() {
            token.extra = fields[self.columns.len()..]
                .iter()
                .map(|s| s.to_string())
                .collect();
        }
        token
    }

    fn format_token(&self, token: &Token) -> String {
        let mut fields: Vec<String> = self.columns.iter().map(|c| c.write(token)).collect();
        fields.extend(token.extra.iter().cloned());
        fields.join("\t")
    }
}

impl FormatCodec for VrtCodec {
    /// Parse a single document; more than one `<text>` element is an error
    fn parse(&self, text: &str) -> Result<Parsed, CodecError> {
        let (mut documents, warnings) = self.parse_all(text)?;
        if documents.len() > 1 {
            return Err(CodecError::MultipleDocuments(documents.len()));
        }
        Ok(Parsed {
            document: documents.pop().unwrap_or_default(),
            warnings,
        })
    }

    fn serialize(&self, document: &Document) -> String {
        let mut out = String::new();
        let mut push_line = |line: &str| {
            out.push_str(line);
            out.push('\n');
        };

        push_line(&format_attributes("text", &document.metadata));

        let mut open_paragraph: Option<&str> = None;
        for sentence in &document.sentences {
            let paragraph = sentence.metadata.get(PARAGRAPH_KEY).map(String::as_str);
            if paragraph != open_paragraph {
                if open_paragraph.is_some() {
                    push_line("</p>");
                }
                if paragraph.is_some() {
                    push_line("<p>");
                }
                open_paragraph = paragraph;
            }

            let mut attributes = sentence.metadata.clone();
            attributes.remove(PARAGRAPH_KEY);
            push_line(&format_attributes("s", &attributes));
            for token in &sentence.tokens {
                push_line(&self.format_token(token));
            }
            push_line("</s>");
        }
        if open_paragraph.is_some() {
            push_line("</p>");
        }

        push_line("</text>");
        out
    }

    fn validate(&self, text: &str) -> Validation {
        let mut validation = Validation::default();
        match self.parse_all(text) {
            Ok((documents, _)) => {
                if documents.is_empty() {
                    validation.errors.push("No documents found".to_string());
                }
                if documents.iter().all(|d| d.sentences.is_empty()) {
                    validation.errors.push("No sentences found".to_string());
                }
                if documents.iter().all(|d| d.token_count() == 0) {
                    validation.errors.push("No tokens found".to_string());
                }
            }
            Err(e) => validation.errors.push(format!("Parse error: {e}")),
        }
        validation
    }
}

fn warn_skip(warnings: &mut Vec<ParseWarning>, line: usize, message: &str) {
    tracing::warn!(line, reason = message, "skipping VRT content");
    warnings.push(ParseWarning {
        line,
        message: message.to_string(),
    });
}

fn target_document<'a>(
    documents: &'a mut Vec<Document>,
    in_text: bool,
    loose: &mut Option<usize>,
) -> &'a mut Document {
    let idx = match (in_text, *loose) {
        (true, _) => documents.len() - 1,
        (false, Some(idx)) => idx,
        (false, None) => {
            documents.push(Document::default());
            *loose = Some(documents.len() - 1);
            documents.len() - 1
        }
    };
    &mut documents[idx]
}

fn finish_sentence(document: &mut Document, pending: PendingSentence, warnings: &mut Vec<ParseWarning>) {
    if pending.tokens.is_empty() {
        warn_skip(warnings, pending.line, "Empty <s> element");
        return;
    }
    let mut sentence = Sentence::new(document.sentences.len() + 1, pending.tokens);
    sentence.metadata = pending.metadata;
    document.sentences.push(sentence);
}

/// Convert VRT documents to CoNLL-U
///
/// Sentences without metadata get a `sent_id` comment. HEAD and DEPREL are
/// written as `_` since VRT carries no syntax.
pub fn vrt_to_conllu(documents: &[Document]) -> String {
    let codec = ConlluCodec::new();
    let mut out = String::new();
    for document in documents {
        let mut document = document.clone();
        for sentence in &mut document.sentences {
            if sentence.metadata.is_empty() {
                sentence
                    .metadata
                    .insert("sent_id".to_string(), sentence.index.to_string());
            }
        }
        out.push_str(&codec.write_document(&document, false));
    }
    out
}

/// Convert a CoNLL-U document to VRT with the default column layout
pub fn conllu_to_vrt(document: &Document) -> String {
    VrtCodec::default().serialize(document)
}
