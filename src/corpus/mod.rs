// Document model: the corpus is an immutable set of named text blobs,
// each tagged with the format it was originally extracted from. Built
// once at the start of a run and read by every later stage.

pub mod loader;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared source format of a document — a small closed set, so the
/// comparison-mode filters can match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Docx,
    Pdf,
    Pptx,
    Xlsx,
    /// The extraction stage couldn't determine the original format.
    /// Participates in `all`-mode comparisons but never matches another
    /// `unknown` under `same_type` (two undetermined files sharing a
    /// bucket says nothing about their content).
    Unknown,
}

impl DocType {
    /// Parse a type tag as produced by the extraction stage.
    /// Anything unrecognized lands in the `Unknown` bucket.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "docx" => DocType::Docx,
            "pdf" => DocType::Pdf,
            "pptx" => DocType::Pptx,
            "xlsx" => DocType::Xlsx,
            _ => DocType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Docx => "docx",
            DocType::Pdf => "pdf",
            DocType::Pptx => "pptx",
            DocType::Xlsx => "xlsx",
            DocType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single document: unique name, extracted text, declared format.
/// Immutable once loaded; chunks and embeddings are derived from it by
/// the pipeline and never written back.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub text: String,
    pub doc_type: DocType,
}

/// The full document set for one run, plus any external metadata keyed
/// by document name. Metadata is merged into the report only — it is
/// never consulted by the similarity or clustering logic.
#[derive(Debug, Default)]
pub struct Corpus {
    pub documents: Vec<Document>,
    pub metadata: HashMap<String, Value>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// External metadata for a document, defaulting to an empty object
    /// (mirrors how the report treats documents with no metadata entry).
    pub fn metadata_for(&self, name: &str) -> Value {
        self.metadata
            .get(name)
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()))
    }

    /// Count of documents per declared type, sorted by type tag.
    pub fn type_counts(&self) -> Vec<(DocType, usize)> {
        let mut counts: std::collections::BTreeMap<DocType, usize> = Default::default();
        for doc in &self.documents {
            *counts.entry(doc.doc_type).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// Whether any document carries the given type.
    pub fn has_type(&self, doc_type: DocType) -> bool {
        self.documents.iter().any(|d| d.doc_type == doc_type)
    }
}
