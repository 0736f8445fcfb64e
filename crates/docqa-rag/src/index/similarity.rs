//! Vector distance

use crate::error::{Error, Result};

/// Cosine distance `1 - cos(a, b)`, in `[0, 2]`
///
/// A zero vector has no direction; its distance to anything is 1.0.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::index_read(format!(
            "dimension mismatch: query has {}, stored vector has {}",
            a.len(),
            b.len()
        )));
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(1.0);
    }

    let similarity = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);
    Ok((1.0 - similarity).max(0.0))
}
