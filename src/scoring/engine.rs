use std::time::Instant;

use serde::{Serialize, Serializer};
use tracing::{debug, info};

use super::keywords::match_keywords;
use super::length::{length_penalty, LengthBounds};
use super::semantic::SemanticScorer;
use crate::rubric::{resolve_criterion, Criterion, RubricTable};
use crate::text::Transcript;

/// Share of the blended score taken by keyword coverage.
pub const KEYWORD_BLEND: f64 = 0.5;
/// Share of the blended score taken by semantic similarity.
pub const SEMANTIC_BLEND: f64 = 0.5;

/// Per-criterion outcome. Numbers are kept at full precision; serialization
/// rounds scores to 3 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionResult {
    pub criterion: String,
    pub weight: f64,
    #[serde(serialize_with = "round3")]
    pub keyword_score: f64,
    #[serde(serialize_with = "round3")]
    pub semantic_score: f64,
    #[serde(serialize_with = "round3")]
    pub length_penalty: f64,
    #[serde(serialize_with = "round3")]
    pub final_score: f64,
    pub keywords_found: Vec<String>,
    pub keywords_missing: Vec<String>,
    pub length_feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringResult {
    /// Weighted mean of final scores on a 0-100 scale, 2 decimals.
    pub overall_score: f64,
    pub word_count: usize,
    /// In rubric row order.
    pub per_criterion: Vec<CriterionResult>,
}

/// Scores transcripts against rubric tables.
///
/// Holds only the semantic scorer, which is read-only, so one engine can
/// serve any number of calls.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    semantic: SemanticScorer,
}

impl ScoringEngine {
    pub fn new(semantic: SemanticScorer) -> Self {
        Self { semantic }
    }

    pub fn semantic(&self) -> &SemanticScorer {
        &self.semantic
    }

    /// Score a raw transcript against every row of `rubric`.
    pub fn score(&self, transcript: &str, rubric: &RubricTable) -> ScoringResult {
        let start = Instant::now();
        let transcript = Transcript::new(transcript);

        let per_criterion: Vec<CriterionResult> = rubric
            .rows()
            .iter()
            .map(|row| self.score_criterion(&transcript, &resolve_criterion(row)))
            .collect();

        let overall = weighted_mean(&per_criterion);
        let result = ScoringResult {
            overall_score: round_to(overall * 100.0, 2),
            word_count: transcript.word_count,
            per_criterion,
        };

        info!(
            overall = result.overall_score,
            words = result.word_count,
            criteria = result.per_criterion.len(),
            elapsed = %humantime::format_duration(start.elapsed()),
            "scored transcript"
        );
        result
    }

    /// Score one resolved criterion against an already normalized transcript.
    pub fn score_criterion(&self, transcript: &Transcript, criterion: &Criterion) -> CriterionResult {
        let coverage = match_keywords(&transcript.text, &criterion.keywords);
        let semantic = self.semantic.score(&transcript.text, &criterion.description);
        let length = length_penalty(
            transcript.word_count,
            LengthBounds {
                min_words: criterion.min_words,
                max_words: criterion.max_words,
            },
        );

        let base = KEYWORD_BLEND * coverage.score + SEMANTIC_BLEND * semantic;
        let final_score = base * length.penalty;

        debug!(
            criterion = %criterion.name,
            keyword = coverage.score,
            semantic,
            length = length.penalty,
            final_score,
            "scored criterion"
        );

        CriterionResult {
            criterion: criterion.name.clone(),
            weight: criterion.weight,
            keyword_score: coverage.score,
            semantic_score: semantic,
            length_penalty: length.penalty,
            final_score,
            keywords_found: coverage.found,
            keywords_missing: coverage.missing,
            length_feedback: length.feedback,
        }
    }
}

impl Default for ScoringEngine {
    /// An engine without an embedder: semantic scores are neutral.
    fn default() -> Self {
        Self::new(SemanticScorer::neutral())
    }
}

/// Weighted mean of final scores in [0, 1]; 0 when the weights sum to 0.
///
/// Weights are scaled by the largest one first so that huge weights cannot
/// overflow the sum.
fn weighted_mean(results: &[CriterionResult]) -> f64 {
    let max_weight = results.iter().map(|r| r.weight).fold(0.0, f64::max);
    if max_weight <= 0.0 {
        return 0.0;
    }
    let (weighted_sum, total_weight) = results.iter().fold((0.0, 0.0), |(sum, total), r| {
        let w = r.weight / max_weight;
        (sum + r.final_score * w, total + w)
    });
    weighted_sum / total_weight
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn round3<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 3))
}
