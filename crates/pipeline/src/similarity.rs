//! Cosine similarity between feature vectors.

use crate::features::FeatureVector;

/// `dot(a, b) / (|a| * |b|)`, or 0 when either vector has zero magnitude.
///
/// The result is clamped to [-1, 1] to absorb rounding.
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
