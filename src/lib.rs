//! Rubric-based scoring of spoken self-introduction transcripts.
//!
//! A transcript is normalized once, then scored against every criterion of a
//! rubric table: keyword coverage and semantic similarity are blended
//! equally, a length penalty is applied, and the weighted mean of all
//! criteria gives the overall 0-100 score.

pub mod config;
pub mod embedding;
pub mod error;
pub mod logging;
pub mod output;
pub mod rubric;
pub mod scoring;
pub mod text;

pub use error::{InitError, RubricError};
pub use rubric::{Criterion, RubricRow, RubricTable};
pub use scoring::{CriterionResult, ScoringEngine, ScoringResult};
