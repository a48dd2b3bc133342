//! Classification rules.

use callsheet_core::Category;
use derive_getters::Getters;
use regex::Regex;

/// The matching rule for one taxonomy category.
///
/// One rule exists per category; the full set is the [`crate::TaxonomyRegistry`].
/// Rules are immutable after load. Patterns are compiled at registry load
/// time so a bad pattern is a fatal configuration error, never a runtime one.
#[derive(Debug, Clone, Getters)]
pub struct ClassificationRule {
    /// Category this rule classifies into
    category: Category,
    /// Keywords matched case-insensitively as substrings
    keywords: Vec<String>,
    /// Patterns that strengthen a match when found in text or context
    context_patterns: Vec<Regex>,
    /// Patterns that weaken a match when found in text or context
    exclusion_patterns: Vec<Regex>,
    /// Minimum confidence for a match to stand, in [0, 1]
    confidence_threshold: f64,
    /// Tie-break priority; lower wins on equal confidence
    priority: i32,
}

impl ClassificationRule {
    /// Create a rule from already-compiled patterns.
    ///
    /// Range validation of `confidence_threshold` happens at registry load;
    /// this constructor stores what it is given.
    pub fn new(
        category: Category,
        keywords: Vec<String>,
        context_patterns: Vec<Regex>,
        exclusion_patterns: Vec<Regex>,
        confidence_threshold: f64,
        priority: i32,
    ) -> Self {
        Self {
            category,
            keywords,
            context_patterns,
            exclusion_patterns,
            confidence_threshold,
            priority,
        }
    }
}
