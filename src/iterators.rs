//! Iterators over treebank files
//!
//! Provides collection interfaces for:
//! - Iterating over sentences from a string, file, or glob pattern
//! - Iterating file by file, for callers that report per source
//!
//! Unlike sentence-level problems, file errors (open, gzip, malformed XML)
//! are yielded as `Err` items: a run over a treebank stops at the first one.

use crate::config::open_input;
use crate::tree::Sentence;
use crate::treebank::{Schema, TreebankError, TreebankReader};
use flate2::read::MultiGzDecoder;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reader over one treebank source, plain or gzip-compressed
pub type SourceReader = TreebankReader<Box<dyn BufRead>>;

/// Name of a document and a reader over its sentences
pub type Document = (Arc<str>, SourceReader);

/// Source of treebank documents for a collection
#[derive(Debug, Clone)]
enum TreeSource {
    /// In-memory XML text
    String(String),
    /// Single file path
    File(PathBuf),
    /// Multiple file paths (from glob or explicit paths)
    Files(Vec<PathBuf>),
}

/// A sentence together with the document it came from
#[derive(Debug, Clone)]
pub struct SourcedSentence {
    pub source: Arc<str>,
    pub sentence: Sentence,
}

/// Collection of treebank documents from a string, file, or glob pattern
///
/// # Examples
///
/// ```no_run
/// use treeparenth::Treebank;
///
/// let treebank = Treebank::from_glob("AGDT_treebanks/*.xml").unwrap();
/// for item in treebank {
///     let item = item.unwrap();
///     println!("{} has {} words", item.sentence.display_id(), item.sentence.len());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Treebank {
    source: TreeSource,
    schema: Option<Schema>,
}

impl Treebank {
    /// Create from an in-memory XML string
    pub fn from_string(text: &str) -> Self {
        Self::with_source(TreeSource::String(text.to_string()))
    }

    /// Create from a single file path
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self::with_source(TreeSource::File(path.as_ref().to_path_buf()))
    }

    /// Create from a glob pattern
    ///
    /// Files are processed in sorted order for deterministic results.
    pub fn from_glob(pattern: &str) -> Result<Self, TreebankError> {
        let mut file_paths = glob::glob(pattern)?.collect::<Result<Vec<PathBuf>, _>>()?;
        file_paths.sort();
        Ok(Self::from_paths(file_paths))
    }

    /// Create from explicit file paths
    pub fn from_paths(file_paths: Vec<PathBuf>) -> Self {
        Self::with_source(TreeSource::Files(file_paths))
    }

    /// Create from command-line inputs
    ///
    /// A directory contributes its `*.xml` and `*.xml.gz` files, an existing
    /// file is taken as is, and an input with glob metacharacters is
    /// expanded. Anything else is a file path, reported when opened.
    /// Each input's expansion is sorted; inputs keep their given order.
    pub fn from_inputs<S: AsRef<str>>(inputs: &[S]) -> Result<Self, TreebankError> {
        let mut file_paths = Vec::new();
        for input in inputs {
            let input = input.as_ref();
            let path = Path::new(input);
            if path.is_dir() {
                let dir = glob::Pattern::escape(input);
                let mut found = Vec::new();
                for pattern in [format!("{dir}/*.xml"), format!("{dir}/*.xml.gz")] {
                    for entry in glob::glob(&pattern)? {
                        found.push(entry?);
                    }
                }
                found.sort();
                file_paths.extend(found);
            } else if !path.exists() && input.contains(['*', '?', '[']) {
                file_paths.extend(Self::from_glob(input)?.into_paths());
            } else {
                file_paths.push(path.to_path_buf());
            }
        }
        Ok(Self::from_paths(file_paths))
    }

    fn into_paths(self) -> Vec<PathBuf> {
        match self.source {
            TreeSource::String(_) => Vec::new(),
            TreeSource::File(path) => vec![path],
            TreeSource::Files(paths) => paths,
        }
    }

    fn with_source(source: TreeSource) -> Self {
        Self {
            source,
            schema: None,
        }
    }

    /// Force a schema instead of detecting it per document
    pub fn with_schema(mut self, schema: Option<Schema>) -> Self {
        self.schema = schema;
        self
    }

    /// Number of documents in the collection
    pub fn len(&self) -> usize {
        match &self.source {
            TreeSource::String(_) | TreeSource::File(_) => 1,
            TreeSource::Files(paths) => paths.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open every document in order, yielding its name and a sentence reader
    pub fn documents(&self) -> Box<dyn Iterator<Item = Result<Document, TreebankError>>> {
        let schema = self.schema;
        match self.source.clone() {
            TreeSource::String(text) => {
                let inner: Box<dyn BufRead> = Box::new(Cursor::new(text.into_bytes()));
                let name: Arc<str> = Arc::from("<string>");
                Box::new(std::iter::once(Ok((name, TreebankReader::new(inner, schema)))))
            }
            TreeSource::File(path) => Box::new(std::iter::once(open_document(path, schema))),
            TreeSource::Files(paths) => Box::new(
                paths
                    .into_iter()
                    .map(move |path| open_document(path, schema)),
            ),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = Result<SourcedSentence, TreebankError>>> {
        self.clone().into_iter()
    }
}

impl IntoIterator for Treebank {
    type Item = Result<SourcedSentence, TreebankError>;
    type IntoIter = Box<dyn Iterator<Item = Self::Item>>;

    fn into_iter(self) -> Self::IntoIter {
        let iter = self.documents().flat_map(|document| -> Self::IntoIter {
            match document {
                Ok((source, reader)) => Box::new(reader.map(move |sentence| {
                    sentence.map(|sentence| SourcedSentence {
                        source: Arc::clone(&source),
                        sentence,
                    })
                })),
                Err(e) => Box::new(std::iter::once(Err(e))),
            }
        });
        Box::new(iter)
    }
}

/// Helper: open a document, decompressing `.gz` files on the fly
fn open_document(
    path: PathBuf,
    schema: Option<Schema>,
) -> Result<Document, TreebankError> {
    let file = open_input(&path)?;

    let inner: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let name: Arc<str> = Arc::from(path.display().to_string());
    Ok((name, TreebankReader::new(inner, schema)))
}
