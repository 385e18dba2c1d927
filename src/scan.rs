// Pair scanner: enumerates candidate document pairs, applies the
// comparison-mode policy, scores each candidate with the pairwise
// engine, and keeps pairs at or above the threshold.
//
// A document set of size N yields exactly C(N,2) candidates — no
// self-pairs, no duplicates. Pair identity is canonicalized (doc1 is
// the lexicographically smaller name) so downstream lookups are
// deterministic regardless of scan order.

use std::collections::{BTreeSet, HashMap};

use crate::corpus::DocType;
use crate::similarity::max_chunk_similarity;

/// Default minimum similarity for a pair to be retained.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Which document-type combinations are eligible for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareMode {
    /// Every pair is a candidate regardless of type — finds cross-format
    /// duplicates (a docx exported to pdf, say).
    All,
    /// Only pairs sharing a declared type. Two `unknown` documents never
    /// match: an undetermined format says nothing about content.
    SameType,
    /// Cross-format comparison restricted to the given types: each
    /// document's type must be in the set AND the two types must differ.
    Select(BTreeSet<DocType>),
}

impl CompareMode {
    /// Mode tag as it appears in the report settings.
    pub fn name(&self) -> &'static str {
        match self {
            CompareMode::All => "all",
            CompareMode::SameType => "same_type",
            CompareMode::Select(_) => "select",
        }
    }

    /// The selected type list for `select` mode, None otherwise.
    pub fn selected_types(&self) -> Option<Vec<DocType>> {
        match self {
            CompareMode::Select(types) => Some(types.iter().copied().collect()),
            _ => None,
        }
    }

    /// Whether a pair with these two declared types is a candidate.
    pub fn allows(&self, a: DocType, b: DocType) -> bool {
        match self {
            CompareMode::All => true,
            CompareMode::SameType => a == b && a != DocType::Unknown,
            CompareMode::Select(types) => types.contains(&a) && types.contains(&b) && a != b,
        }
    }
}

/// A document as the scanner sees it: identity, declared type, a short
/// text preview for display, and the per-chunk embeddings. The raw text
/// is not needed past embedding.
#[derive(Debug, Clone)]
pub struct EmbeddedDocument {
    pub name: String,
    pub doc_type: DocType,
    pub preview: String,
    pub embeddings: Vec<Vec<f64>>,
}

/// A retained pair: two distinct documents whose best chunk match is at
/// or above the threshold. `doc1` is always the lexicographically
/// smaller name.
#[derive(Debug, Clone)]
pub struct SimilarPair {
    pub doc1: String,
    pub doc2: String,
    pub type1: DocType,
    pub type2: DocType,
    pub similarity: f64,
    pub preview1: String,
    pub preview2: String,
}

/// Scan all C(N,2) candidate pairs and keep those scoring at or above
/// `threshold` under the given mode.
///
/// The result is sorted by descending similarity (canonical name pair as
/// tie-break) for presentation; clustering downstream is order-independent
/// either way. Pure computation — each pair's score depends only on its
/// two documents' embeddings.
pub fn find_similar_pairs(
    docs: &[EmbeddedDocument],
    threshold: f64,
    mode: &CompareMode,
) -> Vec<SimilarPair> {
    let mut pairs = Vec::new();

    for i in 0..docs.len() {
        for j in (i + 1)..docs.len() {
            let (a, b) = (&docs[i], &docs[j]);

            if !mode.allows(a.doc_type, b.doc_type) {
                continue;
            }

            let similarity = max_chunk_similarity(&a.embeddings, &b.embeddings);
            if similarity < threshold {
                continue;
            }

            // Canonical order: doc1 is the smaller name
            let (first, second) = if a.name <= b.name { (a, b) } else { (b, a) };
            pairs.push(SimilarPair {
                doc1: first.name.clone(),
                doc2: second.name.clone(),
                type1: first.doc_type,
                type2: second.doc_type,
                similarity,
                preview1: first.preview.clone(),
                preview2: second.preview.clone(),
            });
        }
    }

    pairs.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| (&a.doc1, &a.doc2).cmp(&(&b.doc1, &b.doc2)))
    });

    pairs
}

/// Read-only lookup from a canonical document pair to its retained
/// similarity score. Built once after the filter stage and passed into
/// clustering so cluster statistics never recompute similarities.
#[derive(Debug, Default)]
pub struct SimilarityIndex {
    scores: HashMap<(String, String), f64>,
}

impl SimilarityIndex {
    pub fn from_pairs(pairs: &[SimilarPair]) -> Self {
        let mut scores = HashMap::with_capacity(pairs.len());
        for pair in pairs {
            // Pairs are already canonical, but normalize anyway so the
            // index never depends on its input's ordering discipline.
            scores.insert(Self::key(&pair.doc1, &pair.doc2), pair.similarity);
        }
        Self { scores }
    }

    /// Score for the pair (a, b), in either argument order.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.scores.get(&Self::key(a, b)).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }
}
