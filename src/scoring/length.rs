/// Lowest multiplier the length check can apply.
pub const PENALTY_FLOOR: f64 = 0.4;

/// Word-count bounds for one criterion; `None` is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LengthBounds {
    pub min_words: Option<f64>,
    pub max_words: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LengthPenalty {
    /// Multiplier in [PENALTY_FLOOR, 1.0].
    pub penalty: f64,
    /// Suggestion for the speaker; empty when no penalty applies.
    pub feedback: String,
}

impl LengthPenalty {
    fn none() -> Self {
        Self {
            penalty: 1.0,
            feedback: String::new(),
        }
    }
}

/// Penalty for a transcript of `word_count` words.
///
/// Being under the minimum is checked first; only one side ever applies.
pub fn length_penalty(word_count: usize, bounds: LengthBounds) -> LengthPenalty {
    let words = word_count as f64;
    let min = bounds.min_words.filter(|m| m.is_finite());
    let max = bounds.max_words.filter(|m| m.is_finite());

    if let Some(min) = min.filter(|&m| words < m) {
        let deficit = min - words;
        return LengthPenalty {
            penalty: scaled_penalty(deficit, min),
            feedback: format!(
                "Too short by about {} words. Try adding a bit more detail.",
                deficit.trunc() as i64
            ),
        };
    }

    if let Some(max) = max.filter(|&m| words > m) {
        let excess = words - max;
        return LengthPenalty {
            penalty: scaled_penalty(excess, max),
            feedback: format!(
                "Too long by about {} words. Try being a bit more concise.",
                excess.trunc() as i64
            ),
        };
    }

    LengthPenalty::none()
}

fn scaled_penalty(distance: f64, bound: f64) -> f64 {
    (1.0 - distance / bound.max(1.0)).clamp(PENALTY_FLOOR, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min: Option<f64>, max: Option<f64>) -> LengthBounds {
        LengthBounds {
            min_words: min,
            max_words: max,
        }
    }

    #[test]
    fn test_unbounded_no_penalty() {
        let result = length_penalty(3, LengthBounds::default());
        assert_eq!(result.penalty, 1.0);
        assert!(result.feedback.is_empty());
    }

    #[test]
    fn test_within_bounds_no_penalty() {
        let result = length_penalty(50, bounds(Some(40.0), Some(60.0)));
        assert_eq!(result.penalty, 1.0);
        assert!(result.feedback.is_empty());
    }

    #[test]
    fn test_on_the_bounds_no_penalty() {
        assert_eq!(length_penalty(40, bounds(Some(40.0), Some(60.0))).penalty, 1.0);
        assert_eq!(length_penalty(60, bounds(Some(40.0), Some(60.0))).penalty, 1.0);
    }

    #[test]
    fn test_slightly_short() {
        // 1 - 10/100
        let result = length_penalty(90, bounds(Some(100.0), None));
        assert!((result.penalty - 0.9).abs() < 1e-9);
        assert!(result.feedback.contains("Too short by about 10 words"));
    }

    #[test]
    fn test_far_too_short_hits_floor() {
        let result = length_penalty(12, bounds(Some(50.0), None));
        assert_eq!(result.penalty, PENALTY_FLOOR);
        assert!(result.feedback.contains("about 38 words"));
    }

    #[test]
    fn test_too_long() {
        // 1 - 30/100
        let result = length_penalty(130, bounds(None, Some(100.0)));
        assert!((result.penalty - 0.7).abs() < 1e-9);
        assert!(result.feedback.contains("Too long by about 30 words"));
    }

    #[test]
    fn test_fractional_bound_truncates_in_feedback() {
        let result = length_penalty(10, bounds(Some(12.5), None));
        assert!(result.feedback.contains("about 2 words"));
        assert!((result.penalty - (1.0 - 2.5 / 12.5)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_max_uses_unit_denominator() {
        let result = length_penalty(1, bounds(None, Some(0.0)));
        assert_eq!(result.penalty, PENALTY_FLOOR);
    }

    #[test]
    fn test_inverted_bounds_prefer_minimum() {
        // Below min=80 and above max=20 at once: under-length wins.
        let result = length_penalty(50, bounds(Some(80.0), Some(20.0)));
        assert!(result.feedback.starts_with("Too short"));
        assert!((result.penalty - (1.0 - 30.0 / 80.0)).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_bounds_ignored() {
        let result = length_penalty(5, bounds(Some(f64::INFINITY), Some(f64::NAN)));
        assert_eq!(result.penalty, 1.0);
    }

    #[test]
    fn test_penalty_always_in_range() {
        for words in [0usize, 1, 5, 50, 500, 5000] {
            for b in [
                bounds(Some(30.0), Some(200.0)),
                bounds(Some(1000.0), None),
                bounds(None, Some(2.0)),
            ] {
                let p = length_penalty(words, b).penalty;
                assert!((PENALTY_FLOOR..=1.0).contains(&p), "{words} words -> {p}");
            }
        }
    }
}
