use std::sync::Arc;

use tracing::warn;

use crate::embedding::TextEmbedder;
use crate::error::InitError;

/// Semantic score used for every criterion when no embedder is available.
pub const NEUTRAL_SEMANTIC_SCORE: f64 = 0.5;

/// Normalized semantic similarity between a transcript and a criterion
/// description, backed by an optional embedder.
#[derive(Clone)]
pub struct SemanticScorer {
    embedder: Option<Arc<dyn TextEmbedder>>,
}

impl SemanticScorer {
    pub fn new(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self {
            embedder: Some(embedder),
        }
    }

    /// A scorer that always returns [`NEUTRAL_SEMANTIC_SCORE`].
    pub fn neutral() -> Self {
        Self { embedder: None }
    }

    /// Take the outcome of embedding initialization. A failure is logged
    /// here, once, and the scorer degrades to neutral scores.
    pub fn from_init(init: Result<Arc<dyn TextEmbedder>, InitError>) -> Self {
        match init {
            Ok(embedder) => Self::new(embedder),
            Err(e) => {
                warn!(
                    "semantic scoring unavailable ({}); using neutral score {}",
                    e, NEUTRAL_SEMANTIC_SCORE
                );
                Self::neutral()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.embedder.is_some()
    }

    /// Similarity mapped from [-1, 1] to [0, 1].
    pub fn score(&self, transcript: &str, description: &str) -> f64 {
        let Some(embedder) = &self.embedder else {
            return NEUTRAL_SEMANTIC_SCORE;
        };

        match embedder.similarity(transcript, description) {
            Ok(cosine) => ((f64::from(cosine) + 1.0) / 2.0).clamp(0.0, 1.0),
            Err(e) => {
                warn!("embedding failed, using neutral semantic score: {:#}", e);
                NEUTRAL_SEMANTIC_SCORE
            }
        }
    }
}

impl std::fmt::Debug for SemanticScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScorer")
            .field("available", &self.is_available())
            .finish()
    }
}
