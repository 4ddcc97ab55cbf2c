use serde::{Deserialize, Serialize};

/// Fixed-length embedding produced by an [`EmbeddingProvider`].
///
/// [`EmbeddingProvider`]: crate::application::ports::EmbeddingProvider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn has_dimension(&self, expected: usize) -> bool {
        self.0.len() == expected
    }

    /// Cosine distance (`1 - cosine similarity`), matching pgvector's `<=>`.
    ///
    /// Zero vectors and mismatched lengths are maximally distant from everything.
    pub fn cosine_distance(&self, other: &EmbeddingVector) -> f64 {
        if self.0.len() != other.0.len() {
            return 1.0;
        }

        let mut dot = 0.0f64;
        let mut norm_a = 0.0f64;
        let mut norm_b = 0.0f64;
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            let (a, b) = (f64::from(*a), f64::from(*b));
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }

        if norm_a == 0.0 || norm_b == 0.0 {
            return 1.0;
        }

        1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}

impl From<Vec<f32>> for EmbeddingVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}
