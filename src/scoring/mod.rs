pub mod engine;
pub mod keywords;
pub mod length;
pub mod semantic;

pub use engine::{round_to, CriterionResult, ScoringEngine, ScoringResult};
pub use keywords::{match_keywords, KeywordCoverage};
pub use length::{length_penalty, LengthBounds, LengthPenalty};
pub use semantic::{SemanticScorer, NEUTRAL_SEMANTIC_SCORE};
