// Unit tests for the engine's pure functions: chunk coverage
// properties, similarity symmetry and bounds, mode filtering, and
// clustering invariants from the retained-pair set.

use doppel::chunk::chunk_text;
use doppel::cluster::group_similar_documents;
use doppel::corpus::DocType;
use doppel::report::SimilarityLevel;
use doppel::scan::{CompareMode, SimilarPair, SimilarityIndex};
use doppel::similarity::{cosine_similarity, max_chunk_similarity};

// ============================================================
// Chunker — coverage properties
// ============================================================

fn words(n: usize) -> (String, Vec<String>) {
    let list: Vec<String> = (0..n).map(|i| format!("word{i}")).collect();
    (list.join(" "), list)
}

#[test]
fn chunks_cover_every_word_with_exact_overlap() {
    for (total, size, overlap) in [(1000, 500, 100), (750, 200, 50), (320, 100, 20)] {
        let (text, list) = words(total);
        let chunks = chunk_text(&text, size, overlap);

        // Non-final chunks are exactly `size` words
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.split_whitespace().count(), size);
        }

        // Consecutive starts advance by size - overlap
        let step = size - overlap;
        for (i, chunk) in chunks.iter().enumerate() {
            let first = chunk.split_whitespace().next().unwrap();
            assert_eq!(first, list[i * step]);
        }

        // The final chunk reaches the last word
        assert!(chunks.last().unwrap().ends_with(list.last().unwrap()));
    }
}

#[test]
fn document_at_or_below_chunk_size_is_one_chunk() {
    for total in [1, 10, 499, 500] {
        let (text, _) = words(total);
        let chunks = chunk_text(&text, 500, 100);
        assert_eq!(chunks.len(), 1, "{total} words should give one chunk");
        assert_eq!(chunks[0], text);
    }
}

// ============================================================
// Similarity — symmetry and bounds
// ============================================================

#[test]
fn cosine_is_symmetric_and_bounded() {
    let vectors = [
        vec![1.0, 2.0, 3.0],
        vec![-4.0, 0.5, 1.0],
        vec![0.0, 0.0, 0.0],
        vec![1e-8, -1e-8, 1e8],
    ];
    for a in &vectors {
        for b in &vectors {
            let ab = cosine_similarity(a, b);
            let ba = cosine_similarity(b, a);
            assert!((ab - ba).abs() < 1e-12);
            assert!((-1.0..=1.0).contains(&ab), "out of bounds: {ab}");
        }
    }
}

#[test]
fn identical_embedding_sets_score_near_one() {
    let doc = vec![vec![0.3, -0.2, 0.9], vec![1.0, 0.0, 0.5]];
    let sim = max_chunk_similarity(&doc, &doc);
    assert!(sim >= 0.999);
}

#[test]
fn zero_norm_chunk_never_faults() {
    let a = vec![vec![0.0, 0.0], vec![1.0, 0.0]];
    let b = vec![vec![0.0, 0.0]];
    // Similarity against a zero-norm chunk is 0, not an error
    assert!(max_chunk_similarity(&a, &b).abs() < f64::EPSILON);
}

// ============================================================
// Mode filtering — exhaustive over the closed type set
// ============================================================

const ALL_TYPES: [DocType; 5] = [
    DocType::Docx,
    DocType::Pdf,
    DocType::Pptx,
    DocType::Xlsx,
    DocType::Unknown,
];

#[test]
fn all_mode_admits_every_combination() {
    for a in ALL_TYPES {
        for b in ALL_TYPES {
            assert!(CompareMode::All.allows(a, b));
        }
    }
}

#[test]
fn same_type_admits_only_equal_known_types() {
    for a in ALL_TYPES {
        for b in ALL_TYPES {
            let expected = a == b && a != DocType::Unknown;
            assert_eq!(CompareMode::SameType.allows(a, b), expected, "{a} vs {b}");
        }
    }
}

#[test]
fn select_admits_only_distinct_selected_types() {
    let mode = CompareMode::Select([DocType::Docx, DocType::Pdf].into_iter().collect());
    for a in ALL_TYPES {
        for b in ALL_TYPES {
            let in_set =
                |t: DocType| t == DocType::Docx || t == DocType::Pdf;
            let expected = in_set(a) && in_set(b) && a != b;
            assert_eq!(mode.allows(a, b), expected, "{a} vs {b}");
        }
    }
}

// ============================================================
// Clustering — invariants over the retained-pair set
// ============================================================

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

#[test]
fn clustering_is_idempotent_across_processing_orders() {
    let base = vec![
        pair("a", "b", 0.9),
        pair("b", "c", 0.8),
        pair("d", "e", 0.7),
        pair("e", "f", 0.65),
        pair("a", "c", 0.61),
    ];

    // Three different traversal orders of the same retained set
    let mut reversed = base.clone();
    reversed.reverse();
    let mut rotated = base.clone();
    rotated.rotate_left(2);

    let partitions: Vec<Vec<Vec<String>>> = [&base, &reversed, &rotated]
        .iter()
        .map(|pairs| {
            let index = SimilarityIndex::from_pairs(pairs);
            group_similar_documents(pairs, &index)
                .into_iter()
                .map(|c| c.members)
                .collect()
        })
        .collect();

    assert_eq!(partitions[0], partitions[1]);
    assert_eq!(partitions[0], partitions[2]);
    assert_eq!(partitions[0], vec![
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
        vec!["d".to_string(), "e".to_string(), "f".to_string()],
    ]);
}

#[test]
fn no_cluster_smaller_than_two() {
    let pairs = vec![pair("a", "b", 0.9), pair("c", "d", 0.8), pair("a", "d", 0.7)];
    let index = SimilarityIndex::from_pairs(&pairs);
    let clusters = group_similar_documents(&pairs, &index);
    assert!(clusters.iter().all(|c| c.size() >= 2));
}

#[test]
fn single_pair_cluster_average_equals_its_score() {
    let pairs = vec![pair("x", "y", 0.9)];
    let index = SimilarityIndex::from_pairs(&pairs);
    let clusters = group_similar_documents(&pairs, &index);
    assert_eq!(clusters.len(), 1);
    assert!((clusters[0].avg_similarity - 0.9).abs() < 1e-12);
    assert!((clusters[0].max_similarity - 0.9).abs() < 1e-12);
}

// ============================================================
// Tier breakpoints
// ============================================================

#[test]
fn tier_breakpoints_are_inclusive_lower_bounds() {
    let cases = [
        (0.95, SimilarityLevel::VeryHigh),
        (0.9499, SimilarityLevel::High),
        (0.85, SimilarityLevel::High),
        (0.8499, SimilarityLevel::Medium),
        (0.70, SimilarityLevel::Medium),
        (0.6999, SimilarityLevel::Low),
        (-1.0, SimilarityLevel::Low),
    ];
    for (score, expected) in cases {
        assert_eq!(SimilarityLevel::from_score(score), expected, "score {score}");
    }
}
