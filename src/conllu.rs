//! CoNLL-U parsing and serialization
//!
//! Ten tab-separated columns per token line, `#` comments, blank line
//! between sentences. Multiword token ranges (`1-2`) and empty nodes (`1.1`)
//! are skipped. A malformed token line never fails the parse: it is logged,
//! recorded as a [`ParseWarning`], and skipped.
//!
//! CoNLL-U format: https://universaldependencies.org/format.html

use crate::bytes::{
    field_or_placeholder, field_value, format_pairs, parse_index, parse_pairs, split_fields,
};
use crate::codec::{CodecError, FormatCodec, ParseWarning, Parsed, Validation};
use crate::document::{Document, Metadata, Sentence, Token};
use rustc_hash::FxHashSet;

/// Number of columns on a token line
pub const COLUMN_COUNT: usize = 10;

/// Comment prefix for document-level metadata
const NEWDOC: &str = "newdoc";

/// Kind of the ID column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenId {
    /// Regular token: 1, 2, 3
    Single(usize),
    /// Multiword token range: 1-2
    Range,
    /// Empty node: 2.1
    Decimal,
}

/// `None` for anything that is not a well-formed ID, such as `-1` or `3-`
fn classify_id(s: &str) -> Option<TokenId> {
    if let Some((start, end)) = s.split_once('-') {
        let (start, end) = (parse_index(start)?, parse_index(end)?);
        (start > 0 && end > start).then_some(TokenId::Range)
    } else if let Some((word, node)) = s.split_once('.') {
        parse_index(word)?;
        parse_index(node).filter(|&n| n > 0)?;
        Some(TokenId::Decimal)
    } else {
        parse_index(s).filter(|&id| id > 0).map(TokenId::Single)
    }
}

/// A token line that was kept, with a note when a field had to be repaired
struct TokenLine {
    token: Token,
    note: Option<String>,
}

/// Sentence under construction
#[derive(Default)]
struct PendingSentence {
    text: Option<String>,
    metadata: Metadata,
    tokens: Vec<Token>,
    ids: FxHashSet<usize>,
}

/// Codec for the CoNLL-U format
#[derive(Debug, Clone, Copy, Default)]
pub struct ConlluCodec;

impl ConlluCodec {
    pub fn new() -> Self {
        Self
    }

    /// Parse CoNLL-U text. Never fails; skipped lines are reported as warnings.
    pub fn parse_str(&self, text: &str) -> Parsed {
        let mut document = Document::default();
        let mut warnings = Vec::new();
        let mut pending = PendingSentence::default();

        for (line_idx, raw) in text.lines().enumerate() {
            let line_num = line_idx + 1;
            let line = raw.trim_matches(|c| c == ' ' || c == '\r');

            if line.is_empty() {
                // Blank line = sentence boundary
                flush_sentence(&mut document, &mut pending);
                continue;
            }

            if let Some(comment) = line.strip_prefix('#') {
                parse_comment(comment, &mut document.metadata, &mut pending);
                continue;
            }

            match parse_token_line(line) {
                Ok(Some(TokenLine { token, note })) => {
                    if let Some(message) = note {
                        tracing::warn!(line = line_num, reason = %message, "repaired CoNLL-U line");
                        warnings.push(ParseWarning {
                            line: line_num,
                            message,
                        });
                    }
                    if pending.ids.insert(token.index) {
                        pending.tokens.push(token);
                    } else {
                        warn_skip(
                            &mut warnings,
                            line_num,
                            format!("Duplicate token ID {}", token.index),
                        );
                    }
                }
                Ok(None) => {} // multiword token or empty node
                Err(message) => warn_skip(&mut warnings, line_num, message),
            }
        }
        flush_sentence(&mut document, &mut pending);

        tracing::debug!(
            sentences = document.sentences.len(),
            tokens = document.token_count(),
            skipped = warnings.len(),
            "parsed CoNLL-U"
        );

        Parsed { document, warnings }
    }

    /// Serialize a document, optionally blanking HEAD and DEPREL to `_`
    ///
    /// Blanking is used when the document came from a format without syntax.
    pub(crate) fn write_document(&self, document: &Document, with_syntax: bool) -> String {
        let mut out = String::new();

        for (key, value) in &document.metadata {
            push_comment(&mut out, &format!("{NEWDOC} {key}"), value);
        }

        for sentence in &document.sentences {
            for (key, value) in &sentence.metadata {
                push_comment(&mut out, key, value);
            }
            if let Some(text) = &sentence.text {
                push_comment(&mut out, "text", text);
            }
            for token in &sentence.tokens {
                out.push_str(&format_token(token, with_syntax));
                out.push('\n');
            }
            out.push('\n');
        }

        out
    }
}

impl FormatCodec for ConlluCodec {
    fn parse(&self, text: &str) -> Result<Parsed, CodecError> {
        Ok(self.parse_str(text))
    }

    fn serialize(&self, document: &Document) -> String {
        self.write_document(document, true)
    }

    fn validate(&self, text: &str) -> Validation {
        let mut validation = Validation::default();
        let mut sentence_ids: FxHashSet<usize> = FxHashSet::default();
        // (line, head) pairs checked once the sentence is complete
        let mut heads: Vec<(usize, usize)> = Vec::new();

        let check_heads = |validation: &mut Validation,
                           ids: &FxHashSet<usize>,
                           heads: &mut Vec<(usize, usize)>| {
            for (line_num, head) in heads.drain(..) {
                if head != 0 && !ids.contains(&head) {
                    validation.push(
                        line_num,
                        format!("HEAD {head} does not refer to a token in the sentence"),
                    );
                }
            }
        };

        for (line_idx, raw) in text.lines().enumerate() {
            let line_num = line_idx + 1;
            let line = raw.trim_matches(|c| c == ' ' || c == '\r');

            if line.is_empty() {
                check_heads(&mut validation, &sentence_ids, &mut heads);
                sentence_ids.clear();
                continue;
            }
            if line.starts_with('#') {
                continue;
            }

            let fields = split_fields(line);
            if fields.len() != COLUMN_COUNT {
                validation.push(
                    line_num,
                    format!("Expected {COLUMN_COUNT} fields, got {}", fields.len()),
                );
                continue;
            }

            let id = match classify_id(fields[0]) {
                Some(TokenId::Single(id)) => id,
                Some(TokenId::Range) | Some(TokenId::Decimal) => continue,
                None => {
                    validation.push(line_num, format!("Invalid token ID '{}'", fields[0]));
                    continue;
                }
            };
            if !sentence_ids.insert(id) {
                validation.push(line_num, format!("Duplicate token ID {id} in sentence"));
            }

            let head_field = fields[6];
            if head_field != "_" {
                match parse_index(head_field) {
                    Some(head) => heads.push((line_num, head)),
                    None if head_field.starts_with('-') => validation.push(
                        line_num,
                        format!("HEAD must be non-negative, got {head_field}"),
                    ),
                    None => {
                        validation.push(line_num, format!("Invalid HEAD value '{head_field}'"))
                    }
                }
            }

            let feats_field = fields[5];
            if feats_field != "_" && !is_well_formed_feats(feats_field) {
                validation.push(line_num, format!("Invalid FEATS format '{feats_field}'"));
            }
        }
        check_heads(&mut validation, &sentence_ids, &mut heads);

        validation
    }
}

fn warn_skip(warnings: &mut Vec<ParseWarning>, line: usize, message: String) {
    tracing::warn!(line, reason = %message, "skipping CoNLL-U line");
    warnings.push(ParseWarning { line, message });
}

fn flush_sentence(document: &mut Document, pending: &mut PendingSentence) {
    let finished = std::mem::take(pending);
    if finished.tokens.is_empty() {
        // Comments without tokens have no sentence to attach to
        return;
    }
    let mut sentence = Sentence::new(document.sentences.len() + 1, finished.tokens);
    sentence.text = finished.text;
    sentence.metadata = finished.metadata;
    document.sentences.push(sentence);
}

/// Parse a comment line (without the leading `#`)
fn parse_comment(comment: &str, doc_metadata: &mut Metadata, pending: &mut PendingSentence) {
    let comment = comment.trim();
    if comment.is_empty() {
        return;
    }

    if let Some(rest) = comment.strip_prefix(NEWDOC) {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            let rest = rest.trim();
            if rest.is_empty() {
                return;
            }
            let (key, value) = split_comment(rest);
            doc_metadata.insert(key.to_string(), value.to_string());
            return;
        }
    }

    let (key, value) = split_comment(comment);
    if key == "text" {
        pending.text = Some(value.to_string());
    } else {
        pending.metadata.insert(key.to_string(), value.to_string());
    }
}

fn split_comment(comment: &str) -> (&str, &str) {
    match comment.split_once('=') {
        Some((key, value)) => (key.trim(), value.trim()),
        None => (comment, ""),
    }
}

fn push_comment(out: &mut String, key: &str, value: &str) {
    out.push_str("# ");
    out.push_str(key);
    if !value.is_empty() {
        out.push_str(" = ");
        out.push_str(value);
    }
    out.push('\n');
}

/// Parse one token line. `Ok(None)` for multiword tokens and empty nodes.
fn parse_token_line(line: &str) -> Result<Option<TokenLine>, String> {
    let fields = split_fields(line);

    // Ranges and empty nodes are recognised before the column count is checked
    let first = fields[0];
    if let Some(TokenId::Range | TokenId::Decimal) = classify_id(first) {
        return Ok(None);
    }

    if fields.len() != COLUMN_COUNT {
        return Err(format!(
            "Expected {COLUMN_COUNT} fields, got {}",
            fields.len()
        ));
    }

    let index = match classify_id(first) {
        Some(TokenId::Single(id)) => id,
        _ => return Err(format!("Invalid token ID '{first}'")),
    };

    // An unreadable HEAD falls back to 0 rather than losing the token
    let head_field = fields[6];
    let (head, note) = if head_field == "_" {
        (0, None)
    } else {
        match parse_index(head_field) {
            Some(head) => (head, None),
            None => (
                0,
                Some(format!("Invalid HEAD value '{head_field}', attached to root")),
            ),
        }
    };

    let token = Token {
        index,
        form: field_value(fields[1]).to_string(),
        lemma: field_value(fields[2]).to_string(),
        upos: field_value(fields[3]).to_string(),
        xpos: field_value(fields[4]).to_string(),
        feats: parse_pairs(fields[5]),
        head,
        deprel: field_value(fields[7]).to_string(),
        deps: field_value(fields[8]).to_string(),
        misc: parse_pairs(fields[9]),
        extra: Vec::new(),
        sentence_id: 0,
    };
    Ok(Some(TokenLine { token, note }))
}

fn format_token(token: &Token, with_syntax: bool) -> String {
    let head = if with_syntax {
        token.head.to_string()
    } else {
        "_".to_string()
    };
    let deprel = if with_syntax { token.deprel.as_str() } else { "" };
    let index = token.index.to_string();
    let feats = format_pairs(&token.feats);
    let misc = format_pairs(&token.misc);

    [
        index.as_str(),
        field_or_placeholder(&token.form),
        field_or_placeholder(&token.lemma),
        field_or_placeholder(&token.upos),
        field_or_placeholder(&token.xpos),
        feats.as_str(),
        head.as_str(),
        field_or_placeholder(deprel),
        field_or_placeholder(&token.deps),
        misc.as_str(),
    ]
    .join("\t")
}

/// `Key=Value(|Key=Value)*`, keys may carry a layer suffix like `Number[psor]`
fn is_well_formed_feats(s: &str) -> bool {
    s.split('|').all(|pair| match pair.split_once('=') {
        Some((key, value)) => {
            !key.is_empty()
                && !value.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '[' || c == ']')
        }
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TURKISH: &str = "1\tBu\tbu\tDET\tDet\t_\t4\tdet\t_\t_\n\
                           2\tbir\tbir\tDET\tDet\t_\t4\tdet\t_\t_\n\
                           3\ttest\ttest\tNOUN\tNoun\tCase=Nom\t4\tnmod\t_\t_\n\
                           4\tcümlesidir\tcümle\tNOUN\tNoun\tCase=Nom|Polarity=Pos\t0\troot\t_\tSpaceAfter=No\n\
                           5\t.\t.\tPUNCT\tPunc\t_\t4\tpunct\t_\t_";

    #[test]
    fn test_parse_simple_sentence() {
        let conllu = r#"# text = The dog runs.
1	The	the	DET	DT	_	2	det	_	_
2	dog	dog	NOUN	NN	_	3	nsubj	_	_
3	runs	run	VERB	VBZ	_	0	root	_	SpaceAfter=No
4	.	.	PUNCT	.	_	3	punct	_	_

"#;

        let parsed = ConlluCodec::new().parse_str(conllu);
        assert!(parsed.warnings.is_empty());

        let doc = parsed.document;
        assert_eq!(doc.sentences.len(), 1);
        let sentence = &doc.sentences[0];
        assert_eq!(sentence.index, 1);
        assert_eq!(sentence.text.as_deref(), Some("The dog runs."));
        assert_eq!(sentence.tokens.len(), 4);

        assert_eq!(sentence.tokens[0].form, "The");
        assert_eq!(sentence.tokens[0].lemma, "the");
        assert_eq!(sentence.tokens[0].upos, "DET");
        assert_eq!(sentence.tokens[0].deprel, "det");
        assert_eq!(sentence.tokens[0].sentence_id, 1);

        assert_eq!(sentence.root().unwrap().form, "runs");
        assert!(!sentence.tokens[2].space_after());
    }

    #[test]
    fn test_parse_turkish_example() {
        let doc = ConlluCodec::new().parse_str(TURKISH).document;
        assert_eq!(doc.token_count(), 5);

        let sentence = &doc.sentences[0];
        let root = sentence.root().unwrap();
        assert_eq!(root.index, 4);
        assert_eq!(root.form, "cümlesidir");
        assert_eq!(root.feats.get("Polarity").map(String::as_str), Some("Pos"));
        assert_eq!(sentence.text(), "Bu bir test cümlesidir.");
    }

    #[test]
    fn test_parse_with_features() {
        let conllu = "1\tdogs\tdog\tNOUN\tNNS\tNumber=Plur\t2\tnsubj\t_\t_\n\
                      2\trun\trun\tVERB\tVBP\tNumber=Plur|Tense=Pres\t0\troot\t_\t_\n";
        let doc = ConlluCodec::new().parse_str(conllu).document;
        let tokens = &doc.sentences[0].tokens;

        assert_eq!(tokens[0].feats.get("Number").map(String::as_str), Some("Plur"));
        assert_eq!(tokens[1].feats.get("Tense").map(String::as_str), Some("Pres"));
        assert_eq!(tokens[1].feats.len(), 2);
    }

    #[test]
    fn test_underscore_fields() {
        let conllu = "1\tev\t_\t_\t_\t_\t_\t_\t_\t_\n";
        let doc = ConlluCodec::new().parse_str(conllu).document;
        let token = &doc.sentences[0].tokens[0];

        assert_eq!(token.form, "ev");
        assert_eq!(token.lemma, "");
        assert_eq!(token.upos, "");
        assert_eq!(token.xpos, "");
        assert!(token.feats.is_empty());
        assert_eq!(token.head, 0);
        assert_eq!(token.deprel, "");
        assert_eq!(token.deps, "");
        assert!(token.misc.is_empty());
    }

    #[test]
    fn test_skip_multiword_and_empty_nodes() {
        let conllu = "1-2\tyapıyorum\t_\t_\t_\t_\t_\t_\t_\t_\n\
                      1\tyapı\tyapı\tNOUN\t_\t_\t2\tobj\t_\t_\n\
                      2\tyorum\tyor\tVERB\t_\t_\t0\troot\t_\t_\n\
                      2.1\tgizli\t_\t_\t_\t_\t_\t_\t_\t_\n";
        let parsed = ConlluCodec::new().parse_str(conllu);

        assert!(parsed.warnings.is_empty());
        let tokens = &parsed.document.sentences[0].tokens;
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].index, 1);
        assert_eq!(tokens[1].index, 2);
    }

    #[test]
    fn test_malformed_lines_are_skipped_with_warnings() {
        let conllu = "1\tev\tev\tNOUN\t_\t_\t0\troot\t_\t_\n\
                      2\tbroken\tline\n\
                      x\tbad\tbad\tNOUN\t_\t_\t1\tdep\t_\t_\n\
                      3\tgüzel\tgüzel\tADJ\t_\t_\t1\tamod\t_\t_\n";
        let parsed = ConlluCodec::new().parse_str(conllu);

        assert_eq!(parsed.document.token_count(), 2);
        assert_eq!(parsed.warnings.len(), 2);
        assert_eq!(parsed.warnings[0].line, 2);
        assert_eq!(parsed.warnings[0].message, "Expected 10 fields, got 3");
        assert_eq!(parsed.warnings[1].line, 3);
        assert!(parsed.warnings[1].message.contains("Invalid token ID"));
    }

    #[test]
    fn test_malformed_ids_are_not_ranges() {
        let conllu = "-1\tev\tev\tNOUN\t_\t_\t0\troot\t_\t_\n\
                      3-\tev\tev\tNOUN\t_\t_\t0\troot\t_\t_\n\
                      1.x\tev\tev\tNOUN\t_\t_\t0\troot\t_\t_\n\
                      1\tev\tev\tNOUN\t_\t_\t0\troot\t_\t_\n";
        let parsed = ConlluCodec::new().parse_str(conllu);

        assert_eq!(parsed.document.token_count(), 1);
        let lines: Vec<_> = parsed.warnings.iter().map(|w| w.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
        assert_eq!(parsed.warnings[0].message, "Invalid token ID '-1'");
        assert_eq!(parsed.warnings[1].message, "Invalid token ID '3-'");

        let validation = ConlluCodec::new().validate(conllu);
        assert!(validation.errors.join("\n").contains("Line 2: Invalid token ID '3-'"));
    }

    #[test]
    fn test_classify_id() {
        assert_eq!(classify_id("3"), Some(TokenId::Single(3)));
        assert_eq!(classify_id("1-2"), Some(TokenId::Range));
        assert_eq!(classify_id("2.1"), Some(TokenId::Decimal));
        assert_eq!(classify_id("0"), None);
        assert_eq!(classify_id("2-2"), None);
        assert_eq!(classify_id("-1"), None);
        assert_eq!(classify_id("2."), None);
    }

    #[test]
    fn test_unreadable_head_warns() {
        let conllu = "1\tev\tev\tNOUN\t_\t_\t0\troot\t_\t_\n\
                      2\tbüyük\tbüyük\tADJ\t_\t_\tx\tamod\t_\t_\n\
                      3\tçok\tçok\tADV\t_\t_\t-1\tadvmod\t_\t_\n";
        let parsed = ConlluCodec::new().parse_str(conllu);

        // Tokens are kept and attached to the root
        let tokens = &parsed.document.sentences[0].tokens;
        assert_eq!(tokens.len(), 3);
        assert!(tokens[1].is_root() && tokens[2].is_root());

        assert_eq!(parsed.warnings.len(), 2);
        assert_eq!(parsed.warnings[0].line, 2);
        assert_eq!(
            parsed.warnings[0].message,
            "Invalid HEAD value 'x', attached to root"
        );
        assert_eq!(parsed.warnings[1].line, 3);
    }

    #[test]
    fn test_duplicate_id_skipped() {
        let conllu = "1\tev\tev\tNOUN\t_\t_\t0\troot\t_\t_\n\
                      1\tev\tev\tNOUN\t_\t_\t0\troot\t_\t_\n";
        let parsed = ConlluCodec::new().parse_str(conllu);
        assert_eq!(parsed.document.token_count(), 1);
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let parsed = ConlluCodec::new().parse("").unwrap();
        assert!(parsed.document.sentences.is_empty());

        let parsed = ConlluCodec::new().parse("# just a comment\n\n\n").unwrap();
        assert!(parsed.document.sentences.is_empty());
    }

    #[test]
    fn test_multiple_sentences_and_blank_lines() {
        let conllu = "1\tA\ta\tDET\t_\t_\t0\troot\t_\t_\n\n\n\n\
                      # sent_id = s2\n\
                      1\tB\tb\tNOUN\t_\t_\t0\troot\t_\t_\n";
        let doc = ConlluCodec::new().parse_str(conllu).document;

        assert_eq!(doc.sentences.len(), 2);
        assert_eq!(doc.sentences[1].index, 2);
        assert_eq!(doc.sentences[1].tokens[0].sentence_id, 2);
        assert_eq!(
            doc.sentences[1].metadata.get("sent_id").map(String::as_str),
            Some("s2")
        );
    }

    #[test]
    fn test_newdoc_metadata() {
        let conllu = "# newdoc id = doc1\n# newdoc author = Ahmet\n# newpar\n\
                      1\tA\ta\tDET\t_\t_\t0\troot\t_\t_\n";
        let doc = ConlluCodec::new().parse_str(conllu).document;

        assert_eq!(doc.metadata.get("id").map(String::as_str), Some("doc1"));
        assert_eq!(doc.metadata.get("author").map(String::as_str), Some("Ahmet"));
        assert_eq!(
            doc.sentences[0].metadata.get("newpar").map(String::as_str),
            Some("")
        );
    }

    #[test]
    fn test_serialize_sorts_features() {
        let conllu = "1\tev\tev\tNOUN\t_\tNumber=Sing|Case=Acc\t0\troot\t_\tSpaceAfter=No|Gloss=house\n";
        let codec = ConlluCodec::new();
        let doc = codec.parse_str(conllu).document;
        let out = codec.serialize(&doc);

        assert_eq!(
            out,
            "1\tev\tev\tNOUN\t_\tCase=Acc|Number=Sing\t0\troot\t_\tGloss=house|SpaceAfter=No\n\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let conllu = "# newdoc id = d1\n# sent_id = 1\n# text = Bu bir test cümlesidir.\n".to_string()
            + TURKISH
            + "\n\n1\tev\tev\tNOUN\t_\t_\t0\troot\t1:root\tConfidence=0.9\n";
        let codec = ConlluCodec::new();
        let first = codec.parse_str(&conllu).document;
        let text = codec.serialize(&first);
        let second = codec.parse_str(&text).document;

        assert_eq!(first, second);
        assert_eq!(second.sentences[1].tokens[0].deps, "1:root");
        // Idempotent
        assert_eq!(text, codec.serialize(&second));
    }

    #[test]
    fn test_write_without_syntax() {
        let codec = ConlluCodec::new();
        let doc = codec.parse_str(TURKISH).document;
        let out = codec.write_document(&doc, false);
        let first_line = out.lines().next().unwrap();
        assert_eq!(first_line, "1\tBu\tbu\tDET\tDet\t_\t_\t_\t_\t_");
    }

    #[test]
    fn test_validate_ok() {
        let validation = ConlluCodec::new().validate(TURKISH);
        assert!(validation.is_valid(), "{:?}", validation.errors);
    }

    #[test]
    fn test_validate_errors() {
        let conllu = "1\tev\tev\tNOUN\t_\t_\t0\troot\t_\t_\n\
                      1\tev\tev\tNOUN\t_\t_\t0\troot\t_\t_\n\
                      x\tev\tev\tNOUN\t_\t_\t0\troot\t_\t_\n\
                      2\tev\tev\tNOUN\t_\t_\t-1\troot\t_\t_\n\
                      3\tev\tev\tNOUN\t_\tCase\t9\troot\t_\t_\n\
                      4\tshort\n";
        let validation = ConlluCodec::new().validate(conllu);
        let errors = validation.errors.join("\n");

        assert!(!validation.is_valid());
        assert!(errors.contains("Line 2: Duplicate token ID 1 in sentence"));
        assert!(errors.contains("Line 3: Invalid token ID 'x'"));
        assert!(errors.contains("Line 4: HEAD must be non-negative, got -1"));
        assert!(errors.contains("Line 5: Invalid FEATS format 'Case'"));
        assert!(errors.contains("Line 5: HEAD 9 does not refer to a token in the sentence"));
        assert!(errors.contains("Line 6: Expected 10 fields, got 2"));
    }

    #[test]
    fn test_feats_format() {
        assert!(is_well_formed_feats("Case=Nom"));
        assert!(is_well_formed_feats("Case=Nom|Number[psor]=Sing"));
        assert!(!is_well_formed_feats("Case"));
        assert!(!is_well_formed_feats("Case=Nom|"));
        assert!(!is_well_formed_feats("=Nom"));
    }
}
