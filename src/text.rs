use serde::Serialize;

/// A transcript after whitespace normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub text: String,
    pub word_count: usize,
}

impl Transcript {
    pub fn new(raw: &str) -> Self {
        let text = normalize(raw);
        let word_count = word_count(&text);
        Self { text, word_count }
    }
}

/// Collapse every run of whitespace (newlines included) into a single space
/// and trim both ends.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
