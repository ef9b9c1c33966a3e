//! Loading documents from strings, files and glob patterns
//!
//! The format of a file is chosen from its extension: `.conllu`/`.conll`
//! for CoNLL-U and `.vrt` for VRT, either one optionally followed by `.gz`.
//! Iterating a [`Corpus`] logs and skips files that cannot be read;
//! [`Corpus::load`] reports the first failure instead.
//!
//! ```no_run
//! use corpusql::Corpus;
//!
//! for document in Corpus::from_glob("data/*.conllu").unwrap() {
//!     println!("{} sentences", document.sentences.len());
//! }
//! ```

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::codec::CodecError;
use crate::conllu::ConlluCodec;
use crate::document::Document;
use crate::vrt::VrtCodec;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Unknown corpus format for {}", .0.display())]
    UnknownFormat(PathBuf),

    #[error(transparent)]
    Glob(#[from] glob::PatternError),
}

/// Annotation format of a corpus source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Conllu,
    Vrt,
}

impl Format {
    /// Format and compression implied by a file name
    pub fn from_path(path: &Path) -> Option<(Format, bool)> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        let (name, gzipped) = match name.strip_suffix(".gz") {
            Some(stem) => (stem.to_string(), true),
            None => (name, false),
        };
        let format = match Path::new(&name).extension()?.to_str()? {
            "conllu" | "conll" => Format::Conllu,
            "vrt" => Format::Vrt,
            _ => return None,
        };
        Some((format, gzipped))
    }
}

#[derive(Debug, Clone)]
enum CorpusSource {
    String(String, Format),
    File(PathBuf),
    Files(Vec<PathBuf>),
}

/// Documents from a string, a file, or a set of files
#[derive(Debug, Clone)]
pub struct Corpus {
    source: CorpusSource,
    vrt: VrtCodec,
}

impl Corpus {
    fn with_source(source: CorpusSource) -> Self {
        Self {
            source,
            vrt: VrtCodec::default(),
        }
    }

    pub fn from_string(text: &str, format: Format) -> Self {
        Self::with_source(CorpusSource::String(text.to_string(), format))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self::with_source(CorpusSource::File(path.as_ref().to_path_buf()))
    }

    /// Files matching a glob pattern, in sorted order
    pub fn from_glob(pattern: &str) -> Result<Self, CorpusError> {
        let mut paths: Vec<PathBuf> = glob::glob(pattern)?.filter_map(Result::ok).collect();
        paths.sort();
        Ok(Self::from_paths(paths))
    }

    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self::with_source(CorpusSource::Files(paths))
    }

    /// Use a non-default VRT column layout
    pub fn with_vrt_codec(mut self, codec: VrtCodec) -> Self {
        self.vrt = codec;
        self
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = Document>> {
        self.clone().into_iter()
    }

    /// Every document, failing on the first unreadable source
    pub fn load(&self) -> Result<Vec<Document>, CorpusError> {
        match &self.source {
            CorpusSource::String(text, format) => {
                parse_text(text, *format, &self.vrt).map_err(|source| CorpusError::Codec {
                    path: PathBuf::from("<string>"),
                    source,
                })
            }
            CorpusSource::File(path) => read_documents(path, &self.vrt),
            CorpusSource::Files(paths) => {
                let mut documents = Vec::new();
                for path in paths {
                    documents.extend(read_documents(path, &self.vrt)?);
                }
                Ok(documents)
            }
        }
    }
}

impl IntoIterator for Corpus {
    type Item = Document;
    type IntoIter = Box<dyn Iterator<Item = Self::Item>>;

    fn into_iter(self) -> Self::IntoIter {
        let vrt = self.vrt;
        match self.source {
            CorpusSource::String(text, format) => match parse_text(&text, format, &vrt) {
                Ok(documents) => Box::new(documents.into_iter()),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unparsable corpus string");
                    Box::new(std::iter::empty())
                }
            },
            CorpusSource::File(path) => Box::new(open_documents(&path, &vrt)),
            CorpusSource::Files(paths) => Box::new(
                paths
                    .into_iter()
                    .flat_map(move |path| open_documents(&path, &vrt)),
            ),
        }
    }
}

fn parse_text(text: &str, format: Format, vrt: &VrtCodec) -> Result<Vec<Document>, CodecError> {
    match format {
        Format::Conllu => Ok(vec![ConlluCodec::new().parse_str(text).document]),
        Format::Vrt => vrt.parse_all(text).map(|(documents, _)| documents),
    }
}

/// Read and parse one file, decompressing `.gz` input
pub fn read_documents(path: &Path, vrt: &VrtCodec) -> Result<Vec<Document>, CorpusError> {
    let (format, gzipped) =
        Format::from_path(path).ok_or_else(|| CorpusError::UnknownFormat(path.to_path_buf()))?;
    let io_error = |source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let mut text = String::new();
    let read = if gzipped {
        BufReader::new(GzDecoder::new(file)).read_to_string(&mut text)
    } else {
        BufReader::new(file).read_to_string(&mut text)
    };
    read.map_err(io_error)?;

    let documents = parse_text(&text, format, vrt).map_err(|source| CorpusError::Codec {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), documents = documents.len(), "loaded corpus file");
    Ok(documents)
}

/// Logs read errors and yields nothing for that file
fn open_documents(path: &Path, vrt: &VrtCodec) -> std::vec::IntoIter<Document> {
    match read_documents(path, vrt) {
        Ok(documents) => documents.into_iter(),
        Err(e) => {
            tracing::warn!(error = %e, "skipping corpus file");
            Vec::new().into_iter()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::fs;
    use std::io::Write;
    use tempfile::{TempDir, tempdir};

    const CONLLU: &str = "1\tKedi\tkedi\tNOUN\t_\t_\t2\tnsubj\t_\t_\n\
                          2\tuyudu\tuyu\tVERB\t_\t_\t0\troot\t_\t_\n\n";

    const VRT: &str = r#"<text id="a">
<s>
Ev	NOUN	ev	_
</s>
</text>
<text id="b">
<s>
Yol	NOUN	yol	_
</s>
</text>
"#;

    fn create_test_files(contents: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
        let dir = tempdir().unwrap();
        let mut paths = Vec::new();
        for (filename, content) in contents {
            let path = dir.path().join(filename);
            fs::write(&path, content).unwrap();
            paths.push(path);
        }
        (dir, paths)
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            Format::from_path(Path::new("a/b.conllu")),
            Some((Format::Conllu, false))
        );
        assert_eq!(
            Format::from_path(Path::new("b.CONLL.gz")),
            Some((Format::Conllu, true))
        );
        assert_eq!(
            Format::from_path(Path::new("b.vrt.gz")),
            Some((Format::Vrt, true))
        );
        assert_eq!(Format::from_path(Path::new("b.txt")), None);
        assert_eq!(Format::from_path(Path::new("b.gz")), None);
    }

    #[test]
    fn test_from_string() {
        let documents: Vec<_> = Corpus::from_string(CONLLU, Format::Conllu).into_iter().collect();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].token_count(), 2);

        let documents = Corpus::from_string(VRT, Format::Vrt).load().unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1].metadata["id"], "b");
    }

    #[test]
    fn test_from_glob_sorted() {
        let (dir, _) = create_test_files(&[
            ("b.conllu", CONLLU),
            ("a.vrt", VRT),
            ("notes.txt", "ignored"),
        ]);
        let pattern = format!("{}/*.*", dir.path().display());
        let corpus = Corpus::from_glob(&pattern).unwrap();

        // a.vrt (two texts) then b.conllu; notes.txt is skipped
        let documents: Vec<_> = corpus.iter().collect();
        assert_eq!(documents.len(), 3);
        assert_eq!(documents[0].metadata["id"], "a");
        assert_eq!(documents[2].token_count(), 2);

        assert!(matches!(
            corpus.load().unwrap_err(),
            CorpusError::UnknownFormat(_)
        ));
    }

    #[test]
    fn test_gzip_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.conllu.gz");
        let mut encoder = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(CONLLU.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let documents = Corpus::from_file(&path).load().unwrap();
        assert_eq!(documents[0].sentences[0].tokens[0].form, "Kedi");
    }

    #[test]
    fn test_skips_bad_files() {
        let (dir, mut paths) = create_test_files(&[
            ("good.conllu", CONLLU),
            ("broken.vrt", "<text>\n<s>\nEv\tNOUN\tev\t_\n</text>\n"),
        ]);
        paths.push(dir.path().join("missing.conllu"));
        paths.push(paths[0].clone());

        let documents: Vec<_> = Corpus::from_paths(paths.clone()).into_iter().collect();
        assert_eq!(documents.len(), 2);

        let err = Corpus::from_paths(paths[1..].to_vec()).load().unwrap_err();
        assert!(matches!(err, CorpusError::Codec { .. }));

        let err = Corpus::from_file(dir.path().join("missing.conllu")).load().unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }

    #[test]
    fn test_bad_glob_pattern() {
        assert!(matches!(
            Corpus::from_glob("[").unwrap_err(),
            CorpusError::Glob(_)
        ));
    }
}
