// Report builder: the engine's sole externally visible artifact.
//
// Assembles the run settings, the retained pair list, and the cluster
// list into one serializable object. Similarity values keep full
// precision internally and are rounded to 4 decimal places only when
// serialized.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::cluster::Cluster;
use crate::corpus::{Corpus, DocType};
use crate::scan::{CompareMode, SimilarPair};

/// Discrete similarity tier, applied to pair scores and to cluster
/// average scores with the same breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityLevel {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl SimilarityLevel {
    /// Breakpoints: very_high ≥ 0.95, high ≥ 0.85, medium ≥ 0.7, else low.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.95 {
            SimilarityLevel::VeryHigh
        } else if score >= 0.85 {
            SimilarityLevel::High
        } else if score >= 0.7 {
            SimilarityLevel::Medium
        } else {
            SimilarityLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityLevel::VeryHigh => "very_high",
            SimilarityLevel::High => "high",
            SimilarityLevel::Medium => "medium",
            SimilarityLevel::Low => "low",
        }
    }
}

/// Round to 4 decimal places at serialization time only.
fn round4<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 10_000.0).round() / 10_000.0)
}

#[derive(Debug, Serialize)]
pub struct ReportSettings {
    pub threshold: f64,
    pub mode: String,
    pub selected_types: Option<Vec<DocType>>,
    pub total_documents: usize,
}

#[derive(Debug, Serialize)]
pub struct PairReport {
    pub doc1: String,
    pub doc2: String,
    pub type1: DocType,
    pub type2: DocType,
    #[serde(serialize_with = "round4")]
    pub similarity: f64,
    pub level: SimilarityLevel,
    pub cross_format: bool,
    pub doc1_metadata: Value,
    pub doc2_metadata: Value,
    /// Opening text of each document, for terminal display only. The
    /// serialized report keeps its fixed shape, so these never reach
    /// the JSON output.
    #[serde(skip)]
    pub preview1: String,
    #[serde(skip)]
    pub preview2: String,
}

#[derive(Debug, Serialize)]
pub struct ClusterMember {
    pub filename: String,
    #[serde(rename = "type")]
    pub doc_type: DocType,
    pub metadata: Value,
}

#[derive(Debug, Serialize)]
pub struct ClusterReport {
    pub cluster_id: usize,
    pub size: usize,
    #[serde(serialize_with = "round4")]
    pub avg_similarity: f64,
    #[serde(serialize_with = "round4")]
    pub max_similarity: f64,
    pub level: SimilarityLevel,
    pub members: Vec<ClusterMember>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub settings: ReportSettings,
    pub pairs: Vec<PairReport>,
    pub clusters: Vec<ClusterReport>,
}

/// Assemble the final report from the retained pairs and clusters,
/// enriching every document reference with external metadata when the
/// corpus carries any.
pub fn build_report(
    corpus: &Corpus,
    pairs: &[SimilarPair],
    clusters: &[Cluster],
    threshold: f64,
    mode: &CompareMode,
) -> Report {
    let type_of: std::collections::HashMap<&str, DocType> = corpus
        .documents
        .iter()
        .map(|d| (d.name.as_str(), d.doc_type))
        .collect();

    let pair_reports = pairs
        .iter()
        .map(|pair| PairReport {
            doc1: pair.doc1.clone(),
            doc2: pair.doc2.clone(),
            type1: pair.type1,
            type2: pair.type2,
            similarity: pair.similarity,
            level: SimilarityLevel::from_score(pair.similarity),
            cross_format: pair.type1 != pair.type2,
            doc1_metadata: corpus.metadata_for(&pair.doc1),
            doc2_metadata: corpus.metadata_for(&pair.doc2),
            preview1: pair.preview1.clone(),
            preview2: pair.preview2.clone(),
        })
        .collect();

    let cluster_reports = clusters
        .iter()
        .enumerate()
        .map(|(i, cluster)| ClusterReport {
            cluster_id: i + 1,
            size: cluster.size(),
            avg_similarity: cluster.avg_similarity,
            max_similarity: cluster.max_similarity,
            level: SimilarityLevel::from_score(cluster.avg_similarity),
            members: cluster
                .members
                .iter()
                .map(|name| ClusterMember {
                    filename: name.clone(),
                    doc_type: type_of.get(name.as_str()).copied().unwrap_or(DocType::Unknown),
                    metadata: corpus.metadata_for(name),
                })
                .collect(),
        })
        .collect();

    Report {
        settings: ReportSettings {
            threshold,
            mode: mode.name().to_string(),
            selected_types: mode.selected_types(),
            total_documents: corpus.len(),
        },
        pairs: pair_reports,
        clusters: cluster_reports,
    }
}
