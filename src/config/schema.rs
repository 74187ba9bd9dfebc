use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Contents of `config.yaml`. Every field is optional.
///
/// Example YAML:
/// ```yaml
/// rubric: ~/rubrics/introduction.yaml
/// model_dir: ~/models/all-MiniLM-L6-v2
/// sample_transcript: ~/rubrics/sample.txt
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Rubric file (YAML or JSON)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric: Option<PathBuf>,

    /// Directory holding `model.onnx` and `tokenizer.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_dir: Option<PathBuf>,

    /// Transcript used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_transcript: Option<PathBuf>,
}

impl Config {
    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(mut self, rubric: Option<PathBuf>, model_dir: Option<PathBuf>) -> Self {
        if rubric.is_some() {
            self.rubric = rubric;
        }
        if model_dir.is_some() {
            self.model_dir = model_dir;
        }
        self
    }
}
