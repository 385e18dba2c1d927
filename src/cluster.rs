// Clustering engine: connected components over the retained-pair graph.
//
// Documents linked transitively through retained pairs form a cluster.
// A component may be a sparse graph rather than a clique — A~B and B~C
// above threshold puts A, B, C in one cluster even if A~C scored below
// it — so cluster statistics average only the pairs that actually
// survived the filter, never all C(n,2) combinations.
//
// The union-find is array-backed over dense integer ids assigned to the
// document names appearing in at least one retained pair. Path
// compression plus union by rank; the resulting partition is identical
// regardless of pair processing order.

use std::collections::HashMap;

use crate::scan::{SimilarPair, SimilarityIndex};

/// A group of 2+ documents transitively connected by retained pairs.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Member document names, sorted lexicographically.
    pub members: Vec<String>,
    /// Mean of the retained pair scores with both endpoints in this
    /// cluster. Missing intra-cluster pairs are excluded, not zero.
    pub avg_similarity: f64,
    /// Maximum of those same scores.
    pub max_similarity: f64,
}

impl Cluster {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Array-backed disjoint-set over integer indices.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        // Union by rank
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Group documents into clusters from the retained pair set.
///
/// Only documents appearing in at least one retained pair enter the
/// structure; singletons are never reported. Clusters come back sorted
/// by descending size, then descending average similarity.
pub fn group_similar_documents(pairs: &[SimilarPair], index: &SimilarityIndex) -> Vec<Cluster> {
    if pairs.is_empty() {
        return Vec::new();
    }

    // Assign a dense integer id to every participating document
    let mut ids: HashMap<&str, usize> = HashMap::new();
    let mut names: Vec<&str> = Vec::new();
    for pair in pairs {
        for name in [pair.doc1.as_str(), pair.doc2.as_str()] {
            ids.entry(name).or_insert_with(|| {
                names.push(name);
                names.len() - 1
            });
        }
    }

    let mut sets = DisjointSet::new(names.len());
    for pair in pairs {
        sets.union(ids[pair.doc1.as_str()], ids[pair.doc2.as_str()]);
    }

    // Group members by final representative
    let mut groups: HashMap<usize, Vec<&str>> = HashMap::new();
    for (id, name) in names.iter().enumerate() {
        groups.entry(sets.find(id)).or_default().push(*name);
    }

    let mut clusters: Vec<Cluster> = groups
        .into_values()
        .filter(|members| members.len() >= 2)
        .map(|mut members| {
            members.sort_unstable();

            // Average and max over only the retained intra-cluster pairs
            let mut sims = Vec::new();
            for i in 0..members.len() {
                for j in (i + 1)..members.len() {
                    if let Some(sim) = index.get(members[i], members[j]) {
                        sims.push(sim);
                    }
                }
            }
            // A cluster of 2+ members is always connected by at least one
            // retained pair, but guard the empty case anyway.
            let (avg, max) = if sims.is_empty() {
                (0.0, 0.0)
            } else {
                (
                    sims.iter().sum::<f64>() / sims.len() as f64,
                    sims.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                )
            };

            Cluster {
                members: members.into_iter().map(String::from).collect(),
                avg_similarity: avg,
                max_similarity: max,
            }
        })
        .collect();

    // Largest first, ties broken by average similarity, then by first
    // member so the ordering is fully deterministic.
    clusters.sort_by(|a, b| {
        b.size()
            .cmp(&a.size())
            .then_with(|| {
                b.avg_similarity
                    .partial_cmp(&a.avg_similarity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.members.cmp(&b.members))
    });

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::DocType;

    fn pair(doc1: &str, doc2: &str, similarity: f64) -> SimilarPair {
        let (doc1, doc2) = if doc1 <= doc2 {
            (doc1, doc2)
        } else {
            (doc2, doc1)
        };
        SimilarPair {
            doc1: doc1.to_string(),
            doc2: doc2.to_string(),
            type1: DocType::Pdf,
            type2: DocType::Pdf,
            similarity,
            preview1: String::new(),
            preview2: String::new(),
        }
    }

    fn cluster_all(pairs: &[SimilarPair]) -> Vec<Cluster> {
        let index = SimilarityIndex::from_pairs(pairs);
        group_similar_documents(pairs, &index)
    }

    #[test]
    fn test_single_pair_forms_one_cluster() {
        let pairs = vec![pair("x.txt", "y.txt", 0.9)];
        let clusters = cluster_all(&pairs);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members, vec!["x.txt", "y.txt"]);
        assert!((clusters[0].avg_similarity - 0.9).abs() < 1e-10);
        assert!((clusters[0].max_similarity - 0.9).abs() < 1e-10);
    }

    #[test]
    fn test_transitive_connection_merges_clusters() {
        // A~B and B~C connect all three even without an A~C pair
        let pairs = vec![pair("a", "b", 0.9), pair("b", "c", 0.8)];
        let clusters = cluster_all(&pairs);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members, vec!["a", "b", "c"]);
        // Average over retained pairs only — the missing a~c edge is
        // excluded, not counted as zero
        assert!((clusters[0].avg_similarity - 0.85).abs() < 1e-10);
        assert!((clusters[0].max_similarity - 0.9).abs() < 1e-10);
    }

    #[test]
    fn test_disjoint_components_stay_separate() {
        let pairs = vec![pair("a", "b", 0.9), pair("c", "d", 0.7)];
        let clusters = cluster_all(&pairs);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec!["a", "b"]);
        assert_eq!(clusters[1].members, vec!["c", "d"]);
    }

    #[test]
    fn test_no_singleton_clusters() {
        let pairs = vec![pair("a", "b", 0.9)];
        let clusters = cluster_all(&pairs);
        assert!(clusters.iter().all(|c| c.size() >= 2));
    }

    #[test]
    fn test_empty_pairs_yield_no_clusters() {
        assert!(cluster_all(&[]).is_empty());
    }

    #[test]
    fn test_partition_is_order_independent() {
        let forward = vec![pair("a", "b", 0.9), pair("b", "c", 0.8), pair("d", "e", 0.7)];
        let mut backward = forward.clone();
        backward.reverse();

        let from_forward = cluster_all(&forward);
        let from_backward = cluster_all(&backward);

        assert_eq!(from_forward.len(), from_backward.len());
        for (x, y) in from_forward.iter().zip(from_backward.iter()) {
            assert_eq!(x.members, y.members);
            assert!((x.avg_similarity - y.avg_similarity).abs() < 1e-10);
        }
    }

    #[test]
    fn test_sorted_by_size_then_average() {
        let pairs = vec![
            pair("a", "b", 0.65),
            pair("b", "c", 0.65),
            pair("x", "y", 0.99),
        ];
        let clusters = cluster_all(&pairs);
        // The 3-member cluster outranks the higher-similarity 2-member one
        assert_eq!(clusters[0].size(), 3);
        assert_eq!(clusters[1].size(), 2);

        let same_size = vec![pair("a", "b", 0.7), pair("x", "y", 0.95)];
        let clusters = cluster_all(&same_size);
        assert!((clusters[0].avg_similarity - 0.95).abs() < 1e-10);
    }

    #[test]
    fn test_dense_component_averages_all_retained_edges() {
        let pairs = vec![
            pair("a", "b", 0.9),
            pair("b", "c", 0.8),
            pair("a", "c", 0.7),
        ];
        let clusters = cluster_all(&pairs);
        assert_eq!(clusters.len(), 1);
        assert!((clusters[0].avg_similarity - 0.8).abs() < 1e-10);
        assert!((clusters[0].max_similarity - 0.9).abs() < 1e-10);
    }
}
