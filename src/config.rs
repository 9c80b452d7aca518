//! Run configuration and output layout
//!
//! Every run writes into `<out_dir>/<model>/`:
//! `outparenth-<label>.txt`, `outstring-<label>.txt` and
//! `leftbehind-<label>.txt`. Without a fixed label each document's output
//! goes to the files of its detected schema, so AGDT and PROIEL runs into
//! one model keep separate files.

use crate::cleanup::StopList;
use crate::treebank::{Schema, TreebankError};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUT_DIR: &str = "outputs";

/// Label of documents whose schema could not be detected
pub const FALLBACK_LABEL: &str = "treebank";

/// Settings of one conversion run
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub out_dir: PathBuf,
    pub model: String,
    /// Schema forced on every input; detected per document when unset
    pub schema: Option<Schema>,
    /// Output file suffix; defaults to the schema label of each document
    pub label: Option<String>,
    pub stops: StopList,
}

/// Paths of the three files a conversion run writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub parenth: PathBuf,
    pub strings: PathBuf,
    pub leftbehind: PathBuf,
}

impl ConvertConfig {
    pub fn new(out_dir: impl Into<PathBuf>, model: &str) -> Self {
        Self {
            out_dir: out_dir.into(),
            model: model.to_string(),
            schema: None,
            label: None,
            stops: StopList::greek(),
        }
    }

    pub fn model_dir(&self) -> PathBuf {
        model_dir(&self.out_dir, &self.model)
    }

    /// Label shared by every document, if the run fixes one
    pub fn fixed_label(&self) -> Option<&str> {
        match (&self.label, self.schema) {
            (Some(label), _) => Some(label),
            (None, Some(schema)) => Some(schema.label()),
            (None, None) => None,
        }
    }

    /// Label of a document read with `detected`
    pub fn label_for(&self, detected: Option<Schema>) -> &str {
        self.fixed_label()
            .or(detected.map(Schema::label))
            .unwrap_or(FALLBACK_LABEL)
    }

    pub fn output_paths(&self, label: &str) -> OutputPaths {
        let dir = self.model_dir();
        OutputPaths {
            parenth: dir.join(format!("outparenth-{label}.txt")),
            strings: dir.join(format!("outstring-{label}.txt")),
            leftbehind: dir.join(format!("leftbehind-{label}.txt")),
        }
    }
}

pub fn model_dir(out_dir: &Path, model: &str) -> PathBuf {
    out_dir.join(model)
}

/// Create (or truncate) an output file, naming the path on failure
pub(crate) fn create_output(path: &Path) -> Result<File, TreebankError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| TreebankError::FileOpen {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    File::create(path).map_err(|source| TreebankError::FileOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Open an input file, naming the path on failure
pub(crate) fn open_input(path: &Path) -> Result<File, TreebankError> {
    File::open(path).map_err(|source| TreebankError::FileOpen {
        path: path.to_path_buf(),
        source,
    })
}
