//! Evidence records backing classified production elements.

use serde::{Deserialize, Serialize};

/// The text span, excerpt, and rationale justifying a classification.
///
/// Invariant: `span_start < span_end <= source_text.len()`, both on char
/// boundaries of the source text the evidence was extracted from.
///
/// # Examples
///
/// ```
/// use callsheet_core::Evidence;
///
/// let source = "أحمد يحمل كوب قهوة.";
/// let evidence = Evidence {
///     span_start: 18,
///     span_end: 24,
///     text_excerpt: "كوب".to_string(),
///     rationale: "keyword match".to_string(),
///     confidence: 0.6,
/// };
/// assert!(evidence.is_valid_for(source));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Byte offset of the span start in the source text
    pub span_start: usize,
    /// Byte offset one past the span end in the source text
    pub span_end: usize,
    /// The extracted excerpt
    pub text_excerpt: String,
    /// Human-readable justification for the classification
    pub rationale: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl Evidence {
    /// Whether the span is a valid, non-empty range into `source`.
    pub fn is_valid_for(&self, source: &str) -> bool {
        self.span_start < self.span_end
            && self.span_end <= source.len()
            && source.is_char_boundary(self.span_start)
            && source.is_char_boundary(self.span_end)
            && (0.0..=1.0).contains(&self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_must_be_nonempty_and_in_bounds() {
        let source = "مشهد 1";
        let mut evidence = Evidence {
            span_start: 0,
            span_end: source.len(),
            text_excerpt: source.to_string(),
            rationale: String::new(),
            confidence: 0.5,
        };
        assert!(evidence.is_valid_for(source));

        evidence.span_end = evidence.span_start;
        assert!(!evidence.is_valid_for(source));

        evidence.span_end = source.len() + 1;
        assert!(!evidence.is_valid_for(source));
    }

    #[test]
    fn confidence_out_of_bounds_is_invalid() {
        let evidence = Evidence {
            span_start: 0,
            span_end: 4,
            text_excerpt: "test".to_string(),
            rationale: String::new(),
            confidence: 1.2,
        };
        assert!(!evidence.is_valid_for("test"));
    }
}
