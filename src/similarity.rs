// Pairwise document similarity from chunk embeddings.
//
// Two documents are compared by taking the cosine similarity of every
// chunk of one against every chunk of the other and keeping the maximum.
// Max-over-chunks is deliberate: a report that reuses one paragraph from
// another document should register as highly similar even when the rest
// of both documents differ. A whole-document centroid would wash that
// signal out.

/// Cosine similarity between two embedding vectors.
///
/// Returns a value in [-1.0, 1.0]. Mismatched dimensions or a zero-norm
/// vector score 0.0 rather than erroring — an all-zero embedding
/// legitimately carries no signal (e.g. an empty chunk).
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}

/// Document-to-document similarity: the maximum cosine similarity over
/// every (chunk of A, chunk of B) combination.
///
/// This is the dominant cost of the whole pipeline — O(m·n·d) per pair —
/// and is computed exactly once per pair by the scanner. Empty embedding
/// sets score 0.0.
pub fn max_chunk_similarity(a: &[Vec<f64>], b: &[Vec<f64>]) -> f64 {
    let mut max_sim = f64::NEG_INFINITY;

    for chunk_a in a {
        for chunk_b in b {
            let sim = cosine_similarity(chunk_a, chunk_b);
            if sim > max_sim {
                max_sim = sim;
            }
        }
    }

    if max_sim == f64::NEG_INFINITY {
        0.0
    } else {
        max_sim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let a = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&a, &a);
        assert!((sim - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_proportional() {
        // Same direction, different magnitudes — should be 1.0
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![2.0, 4.0, 6.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_opposite_is_negative_one() {
        // Full [-1, 1] range — opposite vectors are NOT clamped to zero
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_zero_vector_scores_zero() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert!(cosine_similarity(&a, &b).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cosine_empty_vectors() {
        let a: Vec<f64> = vec![];
        assert!(cosine_similarity(&a, &a).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cosine_mismatched_dimensions() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert!(cosine_similarity(&a, &b).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let a = vec![1.0, 3.0, -2.0, 0.5];
        let b = vec![2.0, -1.0, 4.0, 0.0];
        let sim_ab = cosine_similarity(&a, &b);
        let sim_ba = cosine_similarity(&b, &a);
        assert!((sim_ab - sim_ba).abs() < 1e-10);
    }

    #[test]
    fn test_max_picks_best_chunk_pair() {
        let a = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let b = vec![vec![0.0, 1.0], vec![1.0, 1.0]];
        // a[1] vs b[0] are identical → 1.0
        let sim = max_chunk_similarity(&a, &b);
        assert!((sim - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_max_is_symmetric() {
        let a = vec![vec![1.0, 2.0, 3.0], vec![-1.0, 0.5, 2.0]];
        let b = vec![vec![3.0, 2.0, 1.0]];
        let ab = max_chunk_similarity(&a, &b);
        let ba = max_chunk_similarity(&b, &a);
        assert!((ab - ba).abs() < 1e-10);
    }

    #[test]
    fn test_max_within_bounds() {
        let a = vec![vec![1.0, -2.0], vec![-3.0, 0.1]];
        let b = vec![vec![0.5, 0.5], vec![-1.0, -1.0]];
        let sim = max_chunk_similarity(&a, &b);
        assert!((-1.0..=1.0).contains(&sim));
    }

    #[test]
    fn test_max_empty_sets_score_zero() {
        let a: Vec<Vec<f64>> = vec![];
        let b = vec![vec![1.0, 2.0]];
        assert!(max_chunk_similarity(&a, &b).abs() < f64::EPSILON);
        assert!(max_chunk_similarity(&a, &a).abs() < f64::EPSILON);
    }

    #[test]
    fn test_max_all_negative_pairs_keeps_negative() {
        // The best match can still be negative; it must not be rounded up to 0
        let a = vec![vec![1.0, 0.0]];
        let b = vec![vec![-1.0, 0.0]];
        let sim = max_chunk_similarity(&a, &b);
        assert!((sim + 1.0).abs() < 1e-10);
    }
}
