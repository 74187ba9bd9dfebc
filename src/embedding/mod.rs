//! Text embedding capability used for semantic similarity.
//!
//! The scorer only needs "text in, vector out". The ONNX Runtime backend
//! (cargo feature `onnx`) runs a sentence-transformers model such as
//! all-MiniLM-L6-v2; tests plug in their own implementations.

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxEmbedder;

use std::path::Path;
use std::sync::Arc;

use crate::error::InitError;

/// Something that turns text into a fixed-length vector.
///
/// Implementations are shared read-only across scoring calls.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    /// Cosine similarity of the two texts' embeddings, in [-1, 1].
    fn similarity(&self, a: &str, b: &str) -> anyhow::Result<f32> {
        Ok(cosine_similarity(&self.embed(a)?, &self.embed(b)?))
    }
}

/// Cosine similarity in [-1, 1]. Zero vectors (or empty input) give 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Bring up the embedding backend from a model directory.
///
/// The caller decides what to do with an error; the scoring engine turns it
/// into neutral semantic scores.
pub fn initialize(model_dir: Option<&Path>) -> Result<Arc<dyn TextEmbedder>, InitError> {
    let dir = model_dir.ok_or(InitError::NoModelConfigured)?;
    load_backend(dir)
}

#[cfg(feature = "onnx")]
fn load_backend(dir: &Path) -> Result<Arc<dyn TextEmbedder>, InitError> {
    Ok(Arc::new(OnnxEmbedder::load(dir)?))
}

#[cfg(not(feature = "onnx"))]
fn load_backend(_dir: &Path) -> Result<Arc<dyn TextEmbedder>, InitError> {
    Err(InitError::BackendDisabled)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<f32>);

    impl TextEmbedder for Fixed {
        fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_cosine_identical() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite() {
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 2.0]), 0.0);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_default_similarity_uses_embed() {
        let embedder = Fixed(vec![1.0, 2.0]);
        let sim = embedder.similarity("a", "b").unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_initialize_without_model_dir() {
        let err = initialize(None).err().unwrap();
        assert!(matches!(err, InitError::NoModelConfigured));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_initialize_backend_disabled() {
        let err = initialize(Some(Path::new("models/all-MiniLM-L6-v2")))
            .err()
            .unwrap();
        assert!(matches!(err, InitError::BackendDisabled));
    }
}
