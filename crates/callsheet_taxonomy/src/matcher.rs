//! Scoring one text fragment against one classification rule.

use crate::ClassificationRule;
use callsheet_core::Category;

/// Score contribution of one matched keyword.
const KEYWORD_WEIGHT: f64 = 0.3;
/// Score contribution of one matched context pattern.
const PATTERN_WEIGHT: f64 = 0.2;
/// Score penalty of one matched exclusion pattern.
const EXCLUSION_PENALTY: f64 = 0.4;
/// Span length used when nothing concrete anchored the match in the text.
const FALLBACK_SPAN_CHARS: usize = 20;

/// A candidate match of one rule against one text fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    /// Category of the matched rule
    pub category: Category,
    /// Final clamped confidence in (0, 1]
    pub confidence: f64,
    /// Keywords that contributed to the score, in rule order
    pub matched_keywords: Vec<String>,
    /// Number of context patterns that matched
    pub pattern_hits: usize,
    /// Byte offset of the evidence span start in the fragment
    pub span_start: usize,
    /// Byte offset one past the evidence span end in the fragment
    pub span_end: usize,
    /// The extracted excerpt, `fragment[span_start..span_end]`
    pub excerpt: String,
    /// Tie-break priority copied from the rule
    pub priority: i32,
}

/// Score `text` (with surrounding `context`) against one rule.
///
/// Additive scoring, clamped to [0, 1] at the end: +0.3 per keyword found
/// case-insensitively in `text` or `context`, +0.2 per context pattern
/// matching either, −0.4 per exclusion pattern matching either. The match
/// is discarded when the final confidence is ≤ 0 or below the rule's own
/// threshold.
///
/// The evidence span anchors to the first keyword hit in `text`, else the
/// first context-pattern match in `text`, else the first 20 characters of
/// `text`; a match that arose only from `context` spans the whole fragment.
///
/// # Examples
///
/// ```
/// use callsheet_core::Category;
/// use callsheet_taxonomy::{match_rule, ClassificationRule};
///
/// let rule = ClassificationRule::new(
///     Category::Props,
///     vec!["كوب".to_string()],
///     vec![],
///     vec![],
///     0.25,
///     10,
/// );
/// let hit = match_rule(&rule, "أحمد يحمل كوب قهوة", "").unwrap();
/// assert_eq!(hit.excerpt, "كوب");
/// ```
pub fn match_rule(rule: &ClassificationRule, text: &str, context: &str) -> Option<RuleMatch> {
    let mut score = 0.0_f64;
    let mut matched_keywords = Vec::new();
    let mut first_keyword_span: Option<(usize, usize)> = None;
    let mut keyword_in_context_only = false;

    for keyword in rule.keywords() {
        let in_text = find_case_insensitive(text, keyword);
        let in_context = in_text.is_none() && find_case_insensitive(context, keyword).is_some();
        if in_text.is_some() || in_context {
            score += KEYWORD_WEIGHT;
            matched_keywords.push(keyword.clone());
            if first_keyword_span.is_none() {
                first_keyword_span = in_text;
            }
            keyword_in_context_only |= in_context;
        }
    }

    let mut pattern_hits = 0_usize;
    let mut first_pattern_span: Option<(usize, usize)> = None;
    let mut pattern_in_context_only = false;

    for pattern in rule.context_patterns() {
        let in_text = pattern.find(text).map(|m| (m.start(), m.end()));
        let in_context = in_text.is_none() && pattern.is_match(context);
        if in_text.is_some() || in_context {
            pattern_hits += 1;
            score += PATTERN_WEIGHT;
            if first_pattern_span.is_none() {
                first_pattern_span = in_text;
            }
            pattern_in_context_only |= in_context;
        }
    }

    for pattern in rule.exclusion_patterns() {
        if pattern.is_match(text) || pattern.is_match(context) {
            score -= EXCLUSION_PENALTY;
        }
    }

    if score <= 0.0 {
        return None;
    }
    let confidence = score.min(1.0);
    if confidence < *rule.confidence_threshold() {
        return None;
    }

    let (span_start, span_end) = match (first_keyword_span, first_pattern_span) {
        (Some(span), _) => span,
        (None, Some(span)) => span,
        (None, None) if keyword_in_context_only || pattern_in_context_only => (0, text.len()),
        (None, None) => (0, char_floor(text, FALLBACK_SPAN_CHARS)),
    };
    if span_start >= span_end {
        return None;
    }

    Some(RuleMatch {
        category: *rule.category(),
        confidence,
        matched_keywords,
        pattern_hits,
        span_start,
        span_end,
        excerpt: text[span_start..span_end].to_string(),
        priority: *rule.priority(),
    })
}

/// Locate `needle` in `haystack` ignoring case, returning byte offsets
/// valid in the *original* haystack.
///
/// Lowercasing can change byte lengths, so this scans char-wise with
/// case folding rather than lowercasing the haystack and indexing into it.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() || haystack.is_empty() {
        return None;
    }
    let folded_needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    let chars: Vec<(usize, char)> = haystack.char_indices().collect();

    for start in 0..chars.len() {
        let mut matched = 0_usize;
        let mut end_byte = None;
        for &(offset, ch) in &chars[start..] {
            let mut fold_ok = true;
            for folded in ch.to_lowercase() {
                if matched >= folded_needle.len() || folded_needle[matched] != folded {
                    fold_ok = false;
                    break;
                }
                matched += 1;
            }
            if !fold_ok {
                break;
            }
            if matched == folded_needle.len() {
                end_byte = Some(offset + ch.len_utf8());
                break;
            }
        }
        if let Some(end) = end_byte {
            return Some((chars[start].0, end));
        }
    }
    None
}

/// Byte offset of the `n`-th char, or the full length for shorter text.
fn char_floor(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map(|(i, _)| i).unwrap_or(text.len())
}
