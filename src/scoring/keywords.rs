/// Keyword coverage for one criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordCoverage {
    /// Fraction of keywords found, in [0, 1]. 1.0 when there are no keywords.
    pub score: f64,
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

/// Check each keyword against the transcript.
///
/// Matching is case-insensitive substring containment, not whole-word: "art"
/// is found inside "start". Order and duplicates of `keywords` carry over to
/// `found` and `missing`.
pub fn match_keywords(transcript: &str, keywords: &[String]) -> KeywordCoverage {
    let haystack = transcript.to_lowercase();

    let (found, missing): (Vec<String>, Vec<String>) = keywords
        .iter()
        .cloned()
        .partition(|kw| !kw.is_empty() && haystack.contains(&kw.to_lowercase()));

    let score = if keywords.is_empty() {
        1.0
    } else {
        found.len() as f64 / keywords.len() as f64
    };

    KeywordCoverage {
        score,
        found,
        missing,
    }
}
