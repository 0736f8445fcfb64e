//! Answer confidence

use crate::types::SearchResult;

/// Arithmetic mean of the retrieved scores, 0.0 when nothing was retrieved
///
/// Scores are `1 - cosine distance`, so the result is a relevance heuristic
/// that can fall outside `[0, 1]`.
pub fn mean_score(results: &[SearchResult]) -> f32 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.score).sum::<f32>() / results.len() as f32
}
